use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use tracing::error;

use crate::config::Config;
use crate::telegram::{SendOutcome, TelegramClient};

const ALLOW_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
const ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
     Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// Shared per-process state: read-only credentials plus one reqwest client
/// reused across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub telegram: Arc<TelegramClient>,
}

/// The relay accepts any path; only the HTTP method matters. A fallback-only
/// router gives exactly that shape.
pub fn router(state: AppState) -> Router {
    Router::new().fallback(handle).with_state(state)
}

#[derive(Serialize)]
struct SentBody {
    success: bool,
    message: &'static str,
    #[serde(rename = "messageId")]
    message_id: i64,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// Every way one relay attempt can fail. Each variant maps to exactly one
/// status code and error text, folded into the response by matching.
enum RelayError {
    MethodNotAllowed,
    MissingMessage,
    MissingCredentials,
    Rejected { description: String },
    Internal { message: String },
}

impl RelayError {
    fn status(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::MissingMessage | RelayError::Rejected { .. } => StatusCode::BAD_REQUEST,
            RelayError::MissingCredentials | RelayError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn text(&self) -> String {
        match self {
            RelayError::MethodNotAllowed => "Method not allowed. Use POST.".to_string(),
            RelayError::MissingMessage => "Message is required".to_string(),
            RelayError::MissingCredentials => {
                "Server configuration error: Missing Telegram credentials".to_string()
            }
            RelayError::Rejected { description } => format!("Telegram API: {description}"),
            RelayError::Internal { message } => format!("Internal server error: {message}"),
        }
    }
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers
}

async fn handle(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    let cors = cors_headers();

    // Preflight short-circuits everything, including the credential check.
    if method == Method::OPTIONS {
        return (StatusCode::OK, cors).into_response();
    }

    match process(&state, &method, &body).await {
        Ok(message_id) => (
            StatusCode::OK,
            cors,
            Json(SentBody {
                success: true,
                message: "Message sent successfully",
                message_id,
            }),
        )
            .into_response(),
        Err(err) => (
            err.status(),
            cors,
            Json(ErrorBody {
                success: false,
                error: err.text(),
            }),
        )
            .into_response(),
    }
}

async fn process(state: &AppState, method: &Method, body: &[u8]) -> Result<i64, RelayError> {
    if *method != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    let message = extract_message(body)?;

    let Some((bot_token, chat_id)) = state.config.credentials() else {
        error!(
            has_bot_token = state.config.has_bot_token(),
            has_chat_id = state.config.has_chat_id(),
            "Missing Telegram credentials"
        );
        return Err(RelayError::MissingCredentials);
    };

    match state.telegram.send_message(bot_token, chat_id, &message).await {
        Ok(SendOutcome::Delivered { message_id }) => Ok(message_id),
        Ok(SendOutcome::Rejected { description }) => Err(RelayError::Rejected { description }),
        Err(err) => {
            error!("Failed to reach Telegram: {err:#}");
            Err(RelayError::Internal {
                message: format!("{err:#}"),
            })
        }
    }
}

/// Pulls `message` out of the JSON body. Validation trims, but the value
/// handed to the upstream call stays untrimmed.
fn extract_message(body: &[u8]) -> Result<String, RelayError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|err| RelayError::Internal {
            message: err.to_string(),
        })?;

    match value.get("message").and_then(serde_json::Value::as_str) {
        Some(message) if !message.trim().is_empty() => Ok(message.to_string()),
        _ => Err(RelayError::MissingMessage),
    }
}
