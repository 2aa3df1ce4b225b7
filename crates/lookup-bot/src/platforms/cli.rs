//! Local REPL transport
//!
//! Runs the same conversation engine from stdin for operators. Menu captions
//! are hard to type, so `:phone`, `:ip`, `:status` and `:help` stand in for
//! the buttons.

use crate::bot::MenuAction;
use crate::engine::{Action, ConversationEngine};
use crate::error::Result;
use crate::interface::{BotResponse, ResponseType};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub struct CliBot {
    engine: Arc<ConversationEngine>,
    user_id: String,
}

impl CliBot {
    pub fn new(engine: Arc<ConversationEngine>, user_id: impl Into<String>) -> Self {
        Self {
            engine,
            user_id: user_id.into(),
        }
    }

    fn expand_alias(line: &str) -> &str {
        match line {
            ":phone" => MenuAction::PhoneLookup.caption(),
            ":ip" => MenuAction::IpLookup.caption(),
            ":status" => MenuAction::Status.caption(),
            ":help" => MenuAction::Help.caption(),
            other => other,
        }
    }

    fn menu_line() -> BotResponse {
        BotResponse::formatted(
            MenuAction::ALL
                .iter()
                .map(|action| format!("[{}]", action.caption()))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    /// Handle one input line; returns everything that would be shown, in order
    pub async fn process_line(&self, line: &str) -> Result<Vec<BotResponse>> {
        let input = Self::expand_alias(line);
        let mut output = Vec::new();

        match self.engine.route(&self.user_id, None, input)? {
            Action::Reply(response) => {
                let show_menu = response.show_menu;
                output.push(response);
                if show_menu {
                    output.push(Self::menu_line());
                }
            }
            Action::Lookup(request) => {
                output.push(BotResponse::formatted(request.progress_text()));
                output.push(self.engine.execute(&request).await);
            }
        }

        Ok(output)
    }

    fn print(responses: Vec<BotResponse>) {
        for response in responses {
            match response.response_type {
                ResponseType::Error => eprintln!("{}\n", response.content),
                ResponseType::Formatted => println!("{}\n", response.content),
            }
        }
    }

    /// Read stdin until EOF or `:quit`
    pub async fn run(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        Self::print(self.process_line("/start").await?);

        while let Some(line) = lines.next_line().await? {
            let line = line.trim_end_matches(['\r', '\n']);
            if line == ":quit" {
                break;
            }
            if line.is_empty() {
                continue;
            }

            Self::print(self.process_line(line).await?);
        }

        println!("Goodbye!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockLookupService;
    use crate::engine::LookupResult;
    use crate::interface::{BotPlatform, SessionManager};

    fn cli(mock: MockLookupService) -> CliBot {
        let sessions = Arc::new(SessionManager::new(BotPlatform::Cli));
        CliBot::new(Arc::new(ConversationEngine::new(sessions, Arc::new(mock))), "local")
    }

    #[tokio::test]
    async fn test_start_prints_menu() {
        let bot = cli(MockLookupService::new());
        let output = bot.process_line("/start").await.unwrap();
        assert_eq!(output.len(), 2);
        assert!(output[1].content.contains("[📱 Phone Lookup]"));
    }

    #[test]
    fn test_free_text_never_looks_up() {
        let bot = cli(MockLookupService::new());
        let output = tokio_test::block_on(bot.process_line("9876543210")).unwrap();
        assert!(!output.iter().any(|line| line.content.starts_with("🔍")));
    }

    #[tokio::test]
    async fn test_alias_lookup_shows_progress() {
        let mut mock = MockLookupService::new();
        mock.expect_lookup_phone()
            .times(1)
            .returning(|_| LookupResult::NotFound);
        let bot = cli(mock);

        let prompt = bot.process_line(":phone").await.unwrap();
        assert!(prompt[0].content.contains("10-digit"));

        let output = bot.process_line("9876543210").await.unwrap();
        assert_eq!(
            output,
            vec![
                BotResponse::formatted("🔍 Searching database..."),
                BotResponse::error("❌ No records found.")
            ]
        );
    }
}
