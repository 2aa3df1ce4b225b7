//! Bot platform interfaces
//!
//! Platform-agnostic response, session and formatting types

pub mod formatter;
pub mod interface;
pub mod session;

pub use formatter::{Formatter, FormatterFactory, PlainFormatter, TelegramFormatter};
pub use interface::{BotPlatform, BotResponse, ResponseType};
pub use session::{
    ConversationState, InMemoryStorage, SessionManager, SessionStorage, UserSession,
};
