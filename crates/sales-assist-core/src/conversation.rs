//! In-memory conversation state.
//!
//! `ConversationStore` owns the ordered message list, the follow-up
//! suggestions and the loading flag. Messages are append-only; the only
//! in-place change allowed is patching a message's text and typing flag,
//! which is how a model placeholder gets resolved.

use crate::error::{AssistError, Result};
use crate::session::{HistoryEntry, Message, MessagePatch};

/// Whether a turn is waiting on the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadingState {
    #[default]
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
    suggestions: Vec<String>,
    loading: LoadingState,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Creates a store seeded with the welcome message.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::welcome()],
            suggestions: Vec::new(),
            loading: LoadingState::Idle,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn loading(&self) -> LoadingState {
        self.loading
    }

    pub fn is_idle(&self) -> bool {
        self.loading == LoadingState::Idle
    }

    /// Appends a message at the end. Ids must be unique.
    pub fn append_message(&mut self, message: Message) -> Result<()> {
        if self.message(&message.id).is_some() {
            return Err(AssistError::internal(format!(
                "duplicate message id '{}'",
                message.id
            )));
        }
        self.messages.push(message);
        Ok(())
    }

    /// Patches text and/or typing flag of an existing message in place.
    pub fn replace_message(&mut self, id: &str, patch: MessagePatch) -> Result<()> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AssistError::not_found("message", id))?;

        if let Some(text) = patch.text {
            message.text = text;
        }
        if let Some(is_typing) = patch.is_typing {
            message.is_typing = is_typing;
        }
        Ok(())
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    pub fn set_loading(&mut self, loading: LoadingState) {
        self.loading = loading;
    }

    /// Current messages in the shape the backend expects as history.
    pub fn history_snapshot(&self) -> Vec<HistoryEntry> {
        self.messages.iter().map(Message::to_history_entry).collect()
    }

    /// Drops everything and re-seeds the welcome message.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MessageRole, WELCOME_MESSAGE_ID};

    #[test]
    fn test_new_store_is_seeded() {
        let store = ConversationStore::new();
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].id, WELCOME_MESSAGE_ID);
        assert_eq!(store.messages()[0].role, MessageRole::Model);
        assert!(store.suggestions().is_empty());
        assert!(store.is_idle());
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let mut store = ConversationStore::new();
        let first = Message::user("first");
        let second = Message::placeholder();
        store.append_message(first.clone()).unwrap();
        store.append_message(second.clone()).unwrap();

        let ids: Vec<&str> = store.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec![WELCOME_MESSAGE_ID, first.id.as_str(), second.id.as_str()]);
    }

    #[test]
    fn test_append_rejects_duplicate_id() {
        let mut store = ConversationStore::new();
        let message = Message::user("hello");
        store.append_message(message.clone()).unwrap();

        assert!(store.append_message(message).is_err());
        assert_eq!(store.messages().len(), 2);
    }

    #[test]
    fn test_replace_patches_only_given_fields() {
        let mut store = ConversationStore::new();
        let placeholder = Message::placeholder();
        let id = placeholder.id.clone();
        store.append_message(placeholder).unwrap();

        store
            .replace_message(
                &id,
                MessagePatch {
                    text: Some("partial".to_string()),
                    is_typing: None,
                },
            )
            .unwrap();
        let message = store.message(&id).unwrap();
        assert_eq!(message.text, "partial");
        assert!(message.is_typing);

        store.replace_message(&id, MessagePatch::resolve("done")).unwrap();
        let message = store.message(&id).unwrap();
        assert_eq!(message.text, "done");
        assert!(!message.is_typing);
    }

    #[test]
    fn test_replace_unknown_id() {
        let mut store = ConversationStore::new();
        let err = store
            .replace_message("nope", MessagePatch::resolve("x"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_history_snapshot_mirrors_messages() {
        let mut store = ConversationStore::new();
        store.append_message(Message::user("question")).unwrap();

        let history = store.history_snapshot();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "model");
        assert_eq!(history[1].role, "user");
        assert_eq!(history[1].parts[0].text, "question");
    }

    #[test]
    fn test_reset() {
        let mut store = ConversationStore::new();
        store.append_message(Message::user("question")).unwrap();
        store.set_suggestions(vec!["a".to_string()]);
        store.set_loading(LoadingState::AwaitingResponse);

        store.reset();
        assert_eq!(store.messages().len(), 1);
        assert!(store.suggestions().is_empty());
        assert!(store.is_idle());
    }
}
