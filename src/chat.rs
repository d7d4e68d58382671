//! HTTP client for the remote chat API.
//!
//! One-shot request/response: `POST {base_url}/api/v1/chat` with
//! `{"message": ...}`, expecting `{"answer": ...}` on HTTP 200. Nothing is
//! retried; failures are classified for the caller to present as-is.

use reqwest::redirect::Policy;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

const CHAT_ENDPOINT: &str = "/api/v1/chat";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawReply {
    answer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub answer: String,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Request timed out. Please try again.")]
    Timeout,
    #[error("{0}")]
    Server(String),
    #[error("No response from server. Please check your connection.")]
    NoResponse,
    #[error("Invalid response format from server")]
    InvalidResponse,
}

pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .redirect(Policy::limited(5))
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    #[instrument(skip(self, prompt))]
    pub async fn chat(&self, prompt: &str) -> Result<ChatReply, ChatError> {
        let url = format!("{}{}", self.base_url, CHAT_ENDPOINT);
        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message: prompt })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Timeout
                } else {
                    ChatError::NoResponse
                }
            })?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let message = server_error_message(response.json::<ServerErrorBody>().await.ok());
            info!(%status, "Chat request rejected by server");
            return Err(ChatError::Server(message));
        }

        let raw: RawReply = response
            .json()
            .await
            .map_err(|_| ChatError::InvalidResponse)?;
        validate_reply(raw)
    }
}

/// A 200 body must carry a non-empty `answer`; anything else is malformed.
fn validate_reply(raw: RawReply) -> Result<ChatReply, ChatError> {
    match raw.answer {
        Some(answer) if !answer.is_empty() => Ok(ChatReply { answer }),
        _ => Err(ChatError::InvalidResponse),
    }
}

fn server_error_message(body: Option<ServerErrorBody>) -> String {
    body.and_then(|b| b.error)
        .unwrap_or_else(|| "Server error occurred".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_match_the_ui_copy() {
        assert_eq!(
            ChatError::Timeout.to_string(),
            "Request timed out. Please try again."
        );
        assert_eq!(
            ChatError::NoResponse.to_string(),
            "No response from server. Please check your connection."
        );
        assert_eq!(
            ChatError::Server("quota exhausted".to_string()).to_string(),
            "quota exhausted"
        );
    }

    #[test]
    fn reply_body_answer_is_optional() {
        let raw: RawReply = serde_json::from_str(r#"{"answer":"hello"}"#).unwrap();
        assert_eq!(raw.answer.as_deref(), Some("hello"));

        let missing: RawReply = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(missing.answer.is_none());
    }

    #[test]
    fn validate_reply_accepts_a_nonempty_answer() {
        let reply = validate_reply(RawReply {
            answer: Some("hello".to_string()),
        })
        .unwrap();
        assert_eq!(reply.answer, "hello");
    }

    #[test]
    fn validate_reply_rejects_missing_or_empty_answer() {
        let missing = validate_reply(RawReply { answer: None });
        assert!(matches!(missing, Err(ChatError::InvalidResponse)));

        let empty = validate_reply(RawReply {
            answer: Some(String::new()),
        });
        assert!(matches!(empty, Err(ChatError::InvalidResponse)));
    }

    #[test]
    fn server_error_message_prefers_the_body_error_field() {
        let body: ServerErrorBody = serde_json::from_str(r#"{"error":"rate limited"}"#).unwrap();
        assert_eq!(server_error_message(Some(body)), "rate limited");
    }

    #[test]
    fn server_error_message_falls_back_without_a_body() {
        assert_eq!(server_error_message(None), "Server error occurred");

        let no_field: ServerErrorBody = serde_json::from_str(r#"{"detail":"x"}"#).unwrap();
        assert_eq!(server_error_message(Some(no_field)), "Server error occurred");
    }
}
