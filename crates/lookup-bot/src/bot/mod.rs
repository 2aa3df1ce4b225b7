//! Inbound message handling
//!
//! Classification of raw text into commands, menu selections and free text,
//! plus the shape checks applied before a lookup is issued.

pub mod commands;
pub mod validate;

pub use commands::{Command, Inbound, MenuAction};
