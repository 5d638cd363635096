//! Aggregate view state for one chat screen.

use crate::conversation::ConversationStore;
use crate::domain::Domain;
use crate::selection::SelectionPolicy;

/// Conversation store plus selection policy.
///
/// Operations that must touch both (a domain switch clears suggestions and
/// the file selection together) live here so they cannot be half-applied.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub conversation: ConversationStore,
    pub selection: SelectionPolicy,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_domain(&self) -> Option<Domain> {
        self.selection.active_domain()
    }

    /// Switches the active domain, clearing suggestions and selected files.
    pub fn select_domain(&mut self, domain: Domain) {
        self.selection.select_domain(domain);
        self.conversation.clear_suggestions();
    }

    /// Back to a fresh screen: welcome message only, no domain.
    pub fn reset(&mut self) {
        self.conversation.reset();
        self.selection.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileMeta;
    use crate::session::Message;

    #[test]
    fn test_domain_switch_clears_suggestions_and_files() {
        let mut state = ChatState::new();
        state.select_domain(Domain::Hr);
        state.selection.set_available_files(
            Domain::Hr,
            vec![FileMeta {
                file_id: "f1".to_string(),
                filename: "policy.pdf".to_string(),
                created_at: None,
                processing_status: Some("completed".to_string()),
                domain: Some(Domain::Hr),
            }],
        );
        state.selection.toggle_file("f1").unwrap();
        state
            .conversation
            .set_suggestions(vec!["a".to_string(), "b".to_string()]);

        state.select_domain(Domain::Security);

        assert_eq!(state.active_domain(), Some(Domain::Security));
        assert!(state.conversation.suggestions().is_empty());
        assert!(state.selection.effective_file_ids().is_empty());
    }

    #[test]
    fn test_domain_switch_keeps_messages() {
        let mut state = ChatState::new();
        state.select_domain(Domain::Hr);
        state.conversation.append_message(Message::user("hi")).unwrap();

        state.select_domain(Domain::It);
        assert_eq!(state.conversation.messages().len(), 2);
    }

    #[test]
    fn test_reset() {
        let mut state = ChatState::new();
        state.select_domain(Domain::Rpa);
        state.conversation.append_message(Message::user("hi")).unwrap();

        state.reset();
        assert_eq!(state.active_domain(), None);
        assert_eq!(state.conversation.messages().len(), 1);
    }
}
