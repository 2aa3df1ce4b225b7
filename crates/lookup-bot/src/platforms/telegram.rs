//! Telegram bot implementation
//!
//! Long-polling teloxide dispatcher in front of the [`ConversationEngine`].
//! Updates are handled concurrently across chats and sequentially within one.

use crate::bot::MenuAction;
use crate::engine::{Action, ConversationEngine};
use crate::error::{BotError, Result};
use crate::interface::BotResponse;
use lookup_utils::EnvSource;
use std::fmt;
use std::sync::Arc;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, MessageId, ParseMode};
use tracing::{debug, error, info, warn};

/// Telegram caps message text at 4096 characters
pub const MESSAGE_LIMIT: usize = 4096;

/// Telegram bot configuration
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from BotFather
    pub token: String,

    /// Chat notified on startup (optional)
    pub admin_id: Option<ChatId>,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("admin_id", &self.admin_id)
            .finish()
    }
}

impl TelegramConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_source(&lookup_utils::ProcessEnv)
    }

    /// Create config from any [`EnvSource`]. `BOT_TOKEN` is required.
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        let token = env
            .get("BOT_TOKEN")
            .ok_or_else(|| BotError::Config("BOT_TOKEN is not set".to_string()))?;

        let admin_id = env
            .parse::<i64>("ADMIN_ID")
            .map_err(|raw| BotError::Config(format!("ADMIN_ID is not a chat id: {raw:?}")))?
            .map(ChatId);

        Ok(Self { token, admin_id })
    }
}

/// Telegram bot
pub struct TelegramBot {
    config: TelegramConfig,
    engine: Arc<ConversationEngine>,
}

impl TelegramBot {
    /// Create a new Telegram bot
    pub fn new(config: TelegramConfig, engine: Arc<ConversationEngine>) -> Self {
        Self { config, engine }
    }

    /// Authenticate, drop pending updates and poll until Ctrl+C
    pub async fn run(self) -> Result<()> {
        let bot = Bot::new(self.config.token.clone());

        let me = bot.get_me().await?;
        info!(
            username = me.username.as_deref().unwrap_or("unknown"),
            id = %me.id,
            "Bot authenticated"
        );

        bot.delete_webhook().drop_pending_updates(true).await?;

        if let Some(admin) = self.config.admin_id {
            match bot.send_message(admin, "🤖 Lookup bot started").await {
                Ok(_) => info!(%admin, "Sent startup notification"),
                Err(e) => warn!(%admin, error = %e, "Failed to send startup notification"),
            }
        }

        let handler = Update::filter_message().endpoint(message_handler);

        info!("Starting dispatcher with long polling");
        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![self.engine])
            .default_handler(|upd| async move {
                debug!("Unhandled update: {:?}", upd.kind);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "Error in message handler",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        warn!("Dispatcher stopped");
        Ok(())
    }
}

/// Message handler endpoint for the dispatcher
async fn message_handler(
    bot: Bot,
    msg: Message,
    engine: Arc<ConversationEngine>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat_id = msg.chat.id;
    let user = msg.from.as_ref();
    let user_id = user.map_or_else(|| chat_id.to_string(), |u| u.id.to_string());
    let first_name = user.map(|u| u.first_name.as_str());

    debug!(user_id = %user_id, chat = %chat_id, "Message received");

    let action = match engine.route(&user_id, first_name, text) {
        Ok(action) => action,
        Err(e) => {
            error!(user_id = %user_id, error = %e, "Failed to route message");
            Action::Reply(BotResponse::error(engine.formatter().menu_hint()))
        }
    };

    match action {
        Action::Reply(response) => send_response(&bot, chat_id, &response).await?,
        Action::Lookup(request) => {
            let progress = bot
                .send_message(chat_id, request.progress_text())
                .await?;

            let response = engine.execute(&request).await;
            finish_lookup(&bot, chat_id, progress.id, &response).await?;
        }
    }

    Ok(())
}

/// Send the lookup answer, then remove the progress message even if the
/// answer could not be delivered
async fn finish_lookup(
    bot: &Bot,
    chat_id: ChatId,
    progress: MessageId,
    response: &BotResponse,
) -> ResponseResult<()> {
    let sent = send_response(bot, chat_id, response).await;

    if let Err(e) = bot.delete_message(chat_id, progress).await {
        warn!(chat = %chat_id, error = %e, "Failed to delete progress message");
    }
    sent
}

async fn send_response(bot: &Bot, chat_id: ChatId, response: &BotResponse) -> ResponseResult<()> {
    let chunks = split_message(&response.content, MESSAGE_LIMIT);
    let last = chunks.len() - 1;

    for (i, chunk) in chunks.into_iter().enumerate() {
        let mut request = bot.send_message(chat_id, chunk).parse_mode(ParseMode::Html);
        if response.show_menu && i == last {
            request = request.reply_markup(main_menu());
        }
        request.await?;
    }

    Ok(())
}

/// The 2×2 reply keyboard
pub fn main_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(
        MenuAction::rows().map(|row| row.map(|action| KeyboardButton::new(action.caption()))),
    )
    .resize_keyboard()
}

/// Split `text` on line boundaries into chunks of at most `limit` characters.
///
/// Lines are never broken, so a single line longer than `limit` becomes its
/// own oversized chunk. Always returns at least one chunk.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len > 0 && current_len + line_len > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}
