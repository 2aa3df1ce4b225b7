//! Phone number and IP address lookup bot
//!
//! Relays user queries from a chat to two HTTP lookup services and renders
//! the answers. It includes:
//!
//! - A per-user menu state machine (`Idle`, `AwaitingPhone`, `AwaitingIp`)
//! - Phone and GeoIP HTTP clients behind the [`LookupService`] trait
//! - Plain-text and Telegram HTML formatters
//! - A Telegram long-polling transport and a local REPL
//! - A liveness endpoint for hosting platforms
//!
//! # Example
//!
//! ```rust,ignore
//! use lookup_bot::{BotConfig, ConversationEngine, HttpLookupClient};
//! use lookup_bot::interface::{BotPlatform, SessionManager};
//! use std::sync::Arc;
//!
//! let config = BotConfig::from_env()?;
//! let lookup = Arc::new(HttpLookupClient::new(&config)?);
//! let sessions = Arc::new(SessionManager::new(BotPlatform::Cli).with_ttl(config.session_ttl));
//! let engine = ConversationEngine::new(sessions, lookup);
//!
//! let response = engine.respond("42", None, "/start").await?;
//! println!("{}", response.content);
//! ```

pub mod api;
pub mod bot;
pub mod config;
pub mod engine;
pub mod error;
pub mod health;
pub mod interface;
pub mod platforms;

// Re-export main types for convenience
pub use api::{HttpLookupClient, LookupService};
pub use config::BotConfig;
pub use engine::{Action, ConversationEngine, LookupRequest, LookupResult};
pub use error::{BotError, Result};
