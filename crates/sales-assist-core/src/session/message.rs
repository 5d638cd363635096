//! Conversation message types.
//!
//! `Message` is the view-side record held by the conversation store;
//! `HistoryEntry` is the shape the backend expects for prior turns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id of the model message every conversation starts with.
pub const WELCOME_MESSAGE_ID: &str = "welcome";

const WELCOME_TEXT: &str = "Hello! I'm your Sales Assistant. I can help you with RPA, IT Infrastructure, HR Solutions, and more. How can I assist you today?";

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Model => "model",
        }
    }
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque id, unique within the conversation.
    pub id: String,
    pub role: MessageRole,
    pub text: String,
    /// Set on the model placeholder until the backend replies.
    #[serde(default)]
    pub is_typing: bool,
}

impl Message {
    /// A user message with a fresh id.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::User,
            text: text.into(),
            is_typing: false,
        }
    }

    /// An empty model message that is still typing.
    pub fn placeholder() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::Model,
            text: String::new(),
            is_typing: true,
        }
    }

    /// The seeded greeting.
    pub fn welcome() -> Self {
        Self {
            id: WELCOME_MESSAGE_ID.to_string(),
            role: MessageRole::Model,
            text: WELCOME_TEXT.to_string(),
            is_typing: false,
        }
    }

    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            role: self.role.as_str().to_string(),
            parts: vec![HistoryPart {
                text: self.text.clone(),
            }],
        }
    }
}

/// In-place update for an existing message. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePatch {
    pub text: Option<String>,
    pub is_typing: Option<bool>,
}

impl MessagePatch {
    /// Final text for a placeholder; also clears the typing flag.
    pub fn resolve(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            is_typing: Some(false),
        }
    }
}

/// One prior turn as sent to `/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub parts: Vec<HistoryPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPart {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Message::user("hi");
        let b = Message::user("hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_history_entry_shape() {
        let entry = Message::user("What is our HR onboarding policy?").to_history_entry();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "role": "user",
                "parts": [{ "text": "What is our HR onboarding policy?" }]
            })
        );
    }

    #[test]
    fn test_placeholder_is_typing_model() {
        let placeholder = Message::placeholder();
        assert_eq!(placeholder.role, MessageRole::Model);
        assert!(placeholder.is_typing);
        assert!(placeholder.text.is_empty());
    }
}
