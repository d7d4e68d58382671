
//! Manages the chat history types: sessions, messages, and title derivation.
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    /// Last-modified time, unix milliseconds.
    #[serde(default = "current_timestamp")]
    pub timestamp: u64,
}

impl ChatSession {
    pub fn new(id: String) -> Self {
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            timestamp: current_timestamp(),
        }
    }
}

pub const DEFAULT_TITLE: &str = "New Chat";

const TITLE_MAX_CHARS: usize = 30;

pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

/// Derives a session title from the first user-sent message, truncated to
/// 30 characters with an ellipsis. Falls back to "New Chat" when the
/// transcript has no user message yet, or when that message's text is empty.
pub fn derive_title(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .find(|m| m.sender == Sender::User)
        .map(|m| m.text.as_str())
        .filter(|text| !text.is_empty())
        .map(|text| {
            let mut title: String = text.chars().take(TITLE_MAX_CHARS).collect();
            if text.chars().count() > TITLE_MAX_CHARS {
                title.push_str("...");
            }
            title
        })
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

// --- Per-user prompt/response journal ---

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoryEntry {
    pub username: String,
    pub prompt: String,
    pub response: String,
    pub timestamp: u64,
}

/// In-memory log of prompt/response exchanges. Not persisted; it lives for
/// the duration of the process only.
#[derive(Default)]
pub struct UserHistory {
    entries: Vec<HistoryEntry>,
}

impl UserHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, username: &str, prompt: &str, response: &str) {
        self.entries.push(HistoryEntry {
            username: username.to_string(),
            prompt: prompt.to_string(),
            response: response.to_string(),
            timestamp: current_timestamp(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_uses_first_user_message() {
        let messages = vec![
            ChatMessage::assistant("hi"),
            ChatMessage::user("short question"),
            ChatMessage::user("a later message"),
        ];
        assert_eq!(derive_title(&messages), "short question");
    }

    #[test]
    fn title_truncates_long_user_message() {
        let messages = vec![
            ChatMessage::assistant("hi"),
            ChatMessage::user("this is a very long message exceeding thirty chars"),
        ];
        assert_eq!(derive_title(&messages), "this is a very long message ex...");
    }

    #[test]
    fn title_exactly_thirty_chars_is_not_truncated() {
        let text = "x".repeat(30);
        let messages = vec![ChatMessage::user(text.clone())];
        assert_eq!(derive_title(&messages), text);
    }

    #[test]
    fn title_truncation_respects_char_boundaries() {
        let text = "日".repeat(31);
        let messages = vec![ChatMessage::user(text)];
        let title = derive_title(&messages);
        assert_eq!(title, format!("{}...", "日".repeat(30)));
    }

    #[test]
    fn title_defaults_without_user_message() {
        let messages = vec![ChatMessage::assistant("hello there")];
        assert_eq!(derive_title(&messages), "New Chat");
        assert_eq!(derive_title(&[]), "New Chat");
    }

    #[test]
    fn title_defaults_when_first_user_message_is_empty() {
        let messages = vec![ChatMessage::user(""), ChatMessage::user("ignored")];
        assert_eq!(derive_title(&messages), "New Chat");
    }

    #[test]
    fn message_round_trips_through_json() {
        let msg = ChatMessage::user("hello");
        let raw = serde_json::to_string(&msg).unwrap();
        assert_eq!(raw, r#"{"sender":"user","text":"hello"}"#);
        let back: ChatMessage = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn user_history_appends_and_clears() {
        let mut history = UserHistory::new();
        history.add("alice", "what is rust", "a language");
        history.add("alice", "and cargo", "its build tool");
        assert_eq!(history.entries().len(), 2);
        assert_eq!(history.entries()[0].prompt, "what is rust");
        assert_eq!(history.entries()[1].response, "its build tool");

        history.clear();
        assert!(history.entries().is_empty());
    }
}
