//! Platform identifiers and outbound responses

use serde::{Deserialize, Serialize};

/// Platform identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BotPlatform {
    /// Local stdin REPL
    Cli,

    /// Telegram bot
    Telegram,
}

impl std::fmt::Display for BotPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotPlatform::Cli => write!(f, "CLI"),
            BotPlatform::Telegram => write!(f, "Telegram"),
        }
    }
}

/// Type of bot response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    /// Formatted text in the platform's markup
    Formatted,

    /// Negative outcome (invalid input, failed lookup)
    Error,
}

/// Bot response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotResponse {
    /// Response content
    pub content: String,

    /// Response type
    pub response_type: ResponseType,

    /// Attach the main menu keyboard
    pub show_menu: bool,
}

impl BotResponse {
    /// Create a formatted response
    pub fn formatted(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            response_type: ResponseType::Formatted,
            show_menu: false,
        }
    }

    /// Create an error response
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            response_type: ResponseType::Error,
            show_menu: false,
        }
    }

    /// Attach the main menu
    pub fn with_menu(mut self) -> Self {
        self.show_menu = true;
        self
    }
}
