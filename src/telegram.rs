use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Parsed `sendMessage` response. Telegram signals business failures through
/// `ok:false` in the body, not through the HTTP status code, so the status is
/// ignored entirely.
#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    #[serde(default)]
    ok: bool,
    result: Option<SentMessage>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Outcome of one delivery attempt that reached the Telegram API. Transport
/// failures (DNS, refused connection, unparseable body) surface as `Err`.
#[derive(Debug, PartialEq)]
pub enum SendOutcome {
    Delivered { message_id: i64 },
    Rejected { description: String },
}

pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
}

impl TelegramClient {
    pub fn new() -> Self {
        Self::with_api_base(TELEGRAM_API_BASE)
    }

    /// Client against a non-default API base; used by tests to point at a
    /// local mock server.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    /// Sends `text` to `chat_id` as HTML. One attempt, no retry; the request
    /// inherits the client's default timeout behavior.
    pub async fn send_message(
        &self,
        bot_token: &str,
        chat_id: &str,
        text: &str,
    ) -> Result<SendOutcome> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, bot_token);

        debug!("POST {}/bot<token>/sendMessage", self.api_base);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&SendMessageRequest {
                chat_id,
                text,
                parse_mode: "HTML",
            })
            .send()
            .await?;

        let payload: SendMessageResponse = response.json().await?;

        if payload.ok {
            let message_id = payload
                .result
                .map(|r| r.message_id)
                .context("Telegram reported ok without a result payload")?;
            Ok(SendOutcome::Delivered { message_id })
        } else {
            error!(?payload, "Telegram API rejected sendMessage");
            Ok(SendOutcome::Rejected {
                description: payload
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }
}

impl Default for TelegramClient {
    fn default() -> Self {
        Self::new()
    }
}
