mod config;
mod relay;
mod telegram;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::relay::AppState;
use crate::telegram::TelegramClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tg_relay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    if config.credentials().is_none() {
        // Keep serving anyway: OPTIONS and validation errors still work, and
        // send attempts answer 500 until the operator sets both variables.
        warn!(
            has_bot_token = config.has_bot_token(),
            has_chat_id = config.has_chat_id(),
            "Telegram credentials incomplete; set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID"
        );
    }

    let state = AppState {
        config: Arc::new(config),
        telegram: Arc::new(TelegramClient::new()),
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Relay listening on {addr}");
    axum::serve(listener, relay::router(state))
        .await
        .context("Server error")?;

    Ok(())
}
