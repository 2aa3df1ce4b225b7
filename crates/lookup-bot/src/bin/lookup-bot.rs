//! Lookup Bot
//!
//! Telegram bot for phone number and IP address lookups.
//!
//! # Usage
//!
//! ```bash
//! # Set up environment variables
//! export BOT_TOKEN="123456:ABC..."
//! export PHONE_API_URL="https://phone-api.example.com/search"
//! export PHONE_API_KEY="your-key"
//!
//! # Run the bot
//! cargo run --bin lookup-bot -p lookup-bot
//!
//! # Or try the conversation locally without Telegram
//! cargo run --bin lookup-bot -p lookup-bot -- --cli --no-health
//! ```

use clap::Parser;
use lookup_bot::interface::{BotPlatform, SessionManager};
use lookup_bot::platforms::{CliBot, TelegramBot, TelegramConfig};
use lookup_bot::{BotConfig, ConversationEngine, HttpLookupClient, health};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "lookup-bot", version, about = "Phone number and IP lookup bot")]
struct Args {
    /// Run a local REPL instead of connecting to Telegram
    #[arg(long)]
    cli: bool,

    /// Do not start the liveness HTTP endpoint
    #[arg(long)]
    no_health: bool,

    /// User id for the REPL session
    #[arg(long, default_value = "local")]
    user: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lookup_utils::init_tracing("warn,lookup_bot=info");

    let args = Args::parse();

    let config = BotConfig::from_env().inspect_err(|e| error!(error = %e, "Invalid configuration"))?;

    let platform = if args.cli {
        BotPlatform::Cli
    } else {
        BotPlatform::Telegram
    };

    // Fail before any network activity if the transport is misconfigured
    let telegram = if args.cli {
        None
    } else {
        Some(TelegramConfig::from_env().inspect_err(|e| error!(error = %e, "Invalid configuration"))?)
    };

    let lookup = Arc::new(HttpLookupClient::new(&config)?);
    let sessions = Arc::new(SessionManager::new(platform).with_ttl(config.session_ttl));
    let sweeper = Arc::clone(&sessions).spawn_sweeper(config.session_sweep_interval);
    let engine = Arc::new(ConversationEngine::new(sessions, lookup));

    if !args.no_health {
        let port = config.health_port;
        tokio::spawn(async move {
            let shutdown = async {
                let _ = tokio::signal::ctrl_c().await;
            };
            if let Err(e) = health::serve(port, shutdown).await {
                error!(port, error = %e, "Liveness endpoint failed");
            }
        });
    }

    info!(%platform, "Starting lookup bot");

    let result = match telegram {
        Some(telegram) => TelegramBot::new(telegram, engine).run().await,
        None => CliBot::new(engine, args.user).run().await,
    };

    sweeper.abort();

    if let Err(e) = &result {
        error!(error = %e, "Bot stopped with error");
    }
    result?;
    Ok(())
}
