//! Conversation engine
//!
//! Drives the per-user menu state machine:
//!
//! ```text
//! Idle ──📱 Phone Lookup──▶ AwaitingPhone ──any text──▶ Idle (lookup if 10 digits)
//! Idle ──🌐 IP Lookup────▶ AwaitingIp    ──any text──▶ Idle (lookup if 4 dot parts)
//! Idle ──other text──────▶ Idle (menu hint)
//! ```
//!
//! Status, Help and the slash commands reply immediately and never touch the
//! pending state.

use crate::api::LookupService;
use crate::bot::validate;
use crate::bot::{Command, Inbound, MenuAction};
use crate::engine::{LookupKind, LookupRequest, LookupResult};
use crate::error::Result;
use crate::interface::{BotResponse, ConversationState, Formatter, FormatterFactory, SessionManager};
use std::sync::Arc;
use tracing::debug;

/// What the transport should do with an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send this reply
    Reply(BotResponse),
    /// Post `request.progress_text()`, run [`ConversationEngine::execute`],
    /// send its reply, then delete the progress message
    Lookup(LookupRequest),
}

pub struct ConversationEngine {
    sessions: Arc<SessionManager>,
    lookup: Arc<dyn LookupService>,
    formatter: Box<dyn Formatter>,
}

impl ConversationEngine {
    /// Create an engine; output is formatted for the session manager's platform
    pub fn new(sessions: Arc<SessionManager>, lookup: Arc<dyn LookupService>) -> Self {
        let formatter = FormatterFactory::create(sessions.platform());
        Self {
            sessions,
            lookup,
            formatter,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    /// Classify `text` from `user_id` and advance their state
    pub fn route(&self, user_id: &str, first_name: Option<&str>, text: &str) -> Result<Action> {
        let f = self.formatter.as_ref();

        let action = match Inbound::parse(text) {
            Inbound::Command(Command::Start) => {
                self.sessions.touch(user_id)?;
                Action::Reply(BotResponse::formatted(f.welcome(first_name)).with_menu())
            }
            Inbound::Command(Command::Help) | Inbound::Menu(MenuAction::Help) => {
                Action::Reply(BotResponse::formatted(f.help()))
            }
            Inbound::Command(Command::Unknown(name)) => {
                debug!(user_id, command = %name, "Unknown command");
                Action::Reply(BotResponse::formatted(f.menu_hint()))
            }
            Inbound::Menu(MenuAction::PhoneLookup) => {
                self.sessions.expect(user_id, ConversationState::AwaitingPhone)?;
                Action::Reply(BotResponse::formatted(f.phone_prompt()))
            }
            Inbound::Menu(MenuAction::IpLookup) => {
                self.sessions.expect(user_id, ConversationState::AwaitingIp)?;
                Action::Reply(BotResponse::formatted(f.ip_prompt()))
            }
            Inbound::Menu(MenuAction::Status) => Action::Reply(BotResponse::formatted(
                f.status(self.sessions.active_count()),
            )),
            Inbound::Text(text) => self.route_text(user_id, text)?,
        };

        Ok(action)
    }

    fn route_text(&self, user_id: &str, text: String) -> Result<Action> {
        let f = self.formatter.as_ref();

        let action = match self.sessions.take_state(user_id)? {
            ConversationState::Idle => Action::Reply(BotResponse::formatted(f.menu_hint())),
            ConversationState::AwaitingPhone => match validate::phone_number(&text) {
                Ok(_) => Action::Lookup(LookupRequest::Phone(text)),
                Err(e) => {
                    debug!(user_id, error = %e, "Rejected phone input");
                    Action::Reply(BotResponse::error(f.invalid_phone()))
                }
            },
            ConversationState::AwaitingIp => match validate::ip_address(&text) {
                Ok(_) => Action::Lookup(LookupRequest::Ip(text)),
                Err(e) => {
                    debug!(user_id, error = %e, "Rejected IP input");
                    Action::Reply(BotResponse::error(f.invalid_ip()))
                }
            },
        };

        Ok(action)
    }

    /// Run a lookup and format the result. Never fails.
    pub async fn execute(&self, request: &LookupRequest) -> BotResponse {
        let kind = request.kind();
        debug!(%kind, "Running lookup");

        let result = match kind {
            LookupKind::Phone => self.lookup.lookup_phone(request.query()).await,
            LookupKind::Ip => self.lookup.lookup_ip(request.query()).await,
        };

        let content = self.formatter.format_lookup(request, &result);
        match result {
            LookupResult::NotFound | LookupResult::Error => BotResponse::error(content),
            LookupResult::Phone(_) | LookupResult::Ip(_) => BotResponse::formatted(content),
        }
    }

    /// `route` then `execute`, for transports without ephemeral messages
    pub async fn respond(
        &self,
        user_id: &str,
        first_name: Option<&str>,
        text: &str,
    ) -> Result<BotResponse> {
        match self.route(user_id, first_name, text)? {
            Action::Reply(response) => Ok(response),
            Action::Lookup(request) => Ok(self.execute(&request).await),
        }
    }
}
