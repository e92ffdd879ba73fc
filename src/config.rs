use std::env;

/// Telegram credentials, read once at startup and shared read-only across
/// all requests. Either value may be empty: the process still starts (and
/// answers OPTIONS / 405 / 400 correctly), and the missing credential is
/// reported as a 500 on each send attempt instead.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub bot_token: String,
    pub chat_id: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bot_token: env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            chat_id: env::var("TELEGRAM_CHAT_ID").unwrap_or_default(),
        }
    }

    /// Both credentials, or `None` if either is unset/empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.bot_token.is_empty() || self.chat_id.is_empty() {
            None
        } else {
            Some((&self.bot_token, &self.chat_id))
        }
    }

    pub fn has_bot_token(&self) -> bool {
        !self.bot_token.is_empty()
    }

    pub fn has_chat_id(&self) -> bool {
        !self.chat_id.is_empty()
    }
}
