//! Platform-specific bot implementations

pub mod cli;
pub mod telegram;

pub use cli::CliBot;
pub use telegram::{TelegramBot, TelegramConfig};
