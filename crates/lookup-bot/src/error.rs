//! Error types for lookup bot operations

use thiserror::Error;

/// Lookup bot errors
#[derive(Debug, Error)]
pub enum BotError {
    /// Network or HTTP error (connection failure, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with something that is not the expected JSON
    #[error("Decode error: {0}")]
    Decode(String),

    /// Well-formed upstream answer with nothing in it
    #[error("Not found: {0}")]
    NotFound(String),

    /// User input failed the shape check
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session store error
    #[error("Session error: {0}")]
    Session(String),

    /// Chat transport error
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    /// Whether this error comes from talking to an upstream service
    /// rather than from the data it returned
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, BotError::Network(_) | BotError::Decode(_))
    }
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

impl From<teloxide::RequestError> for BotError {
    fn from(err: teloxide::RequestError) -> Self {
        BotError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BotError::InvalidInput("12345".to_string());
        assert_eq!(err.to_string(), "Invalid input: 12345");

        let err = BotError::Config("BOT_TOKEN is not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: BOT_TOKEN is not set");
    }

    #[test]
    fn test_transport_failure_classification() {
        assert!(BotError::Decode("bad json".to_string()).is_transport_failure());
        assert!(!BotError::NotFound("8.8.8.8".to_string()).is_transport_failure());
        assert!(!BotError::InvalidInput("abc".to_string()).is_transport_failure());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: BotError = json_err.into();
        assert!(matches!(err, BotError::Decode(_)));
    }
}
