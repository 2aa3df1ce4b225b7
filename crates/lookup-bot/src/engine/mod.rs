//! Conversation engine and lookup result types

pub mod conversation;
pub mod result;

pub use conversation::{Action, ConversationEngine};
pub use result::{IpInfo, LookupKind, LookupRequest, LookupResult, PhoneRecord};
