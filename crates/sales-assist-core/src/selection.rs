//! Domain and file selection policy.
//!
//! Tracks the active domain, the mirrored file list for that domain and the
//! set of file ids the user picked for retrieval. Rules:
//!
//! - at most [`MAX_SELECTED_FILES`] ids can be selected
//! - a file can be selected only once its processing status is `completed`
//! - a selected file can always be deselected, whatever its status
//! - the unrestricted domain has no file actions and an empty selection
//!
//! Switching domains clears the selection and the mirrored list. Clearing the
//! suggestions that go with it is done by [`crate::state::ChatState`].

use crate::domain::Domain;
use crate::error::{AssistError, Result};
use crate::file::FileMeta;

/// Upper bound on files sent to retrieval in one turn.
pub const MAX_SELECTED_FILES: usize = 10;

/// Result of a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
}

/// A mirrored file with its view flags.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry<'a> {
    pub meta: &'a FileMeta,
    pub selected: bool,
    /// Whether the user may toggle it right now.
    pub actionable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionPolicy {
    active_domain: Option<Domain>,
    available_files: Vec<FileMeta>,
    // Vec rather than a set: the outgoing file_ids keep selection order.
    selected: Vec<String>,
}

impl SelectionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_domain(&self) -> Option<Domain> {
        self.active_domain
    }

    /// Returns the active domain or `DomainRequired`.
    pub fn require_domain(&self) -> Result<Domain> {
        self.active_domain.ok_or(AssistError::DomainRequired)
    }

    /// `unselected -> selected(domain)` or `selected(a) -> selected(domain)`.
    ///
    /// Always clears the selected set and the mirrored list, including when the
    /// same domain is chosen again.
    pub fn select_domain(&mut self, domain: Domain) {
        self.active_domain = Some(domain);
        self.selected.clear();
        self.available_files.clear();
    }

    /// Back to `unselected`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether file upload and toggling are currently possible.
    pub fn file_actions_enabled(&self) -> bool {
        self.active_domain
            .is_some_and(|domain| domain.allows_file_actions())
    }

    /// Checks that upload or toggle is allowed, returning the active domain.
    pub fn require_file_actions(&self) -> Result<Domain> {
        let domain = self.require_domain()?;
        if !domain.allows_file_actions() {
            return Err(AssistError::FileActionsDisabled {
                domain: domain.to_string(),
            });
        }
        Ok(domain)
    }

    /// Replaces the mirrored list. Ignored if `domain` is no longer active.
    pub fn set_available_files(&mut self, domain: Domain, files: Vec<FileMeta>) -> bool {
        if self.active_domain != Some(domain) {
            tracing::debug!(
                "[SelectionPolicy] Dropping file list for inactive domain '{}'",
                domain
            );
            return false;
        }
        self.available_files = files;
        true
    }

    pub fn available_files(&self) -> &[FileMeta] {
        &self.available_files
    }

    pub fn is_selected(&self, file_id: &str) -> bool {
        self.selected.iter().any(|id| id == file_id)
    }

    /// File ids to send with a chat turn. Always empty for the unrestricted domain.
    pub fn effective_file_ids(&self) -> Vec<String> {
        if self.file_actions_enabled() {
            self.selected.clone()
        } else {
            Vec::new()
        }
    }

    pub fn selected_count(&self) -> usize {
        self.effective_file_ids().len()
    }

    /// Mirrored files with their selected/actionable flags.
    pub fn file_entries(&self) -> Vec<FileEntry<'_>> {
        let enabled = self.file_actions_enabled();
        self.available_files
            .iter()
            .map(|meta| {
                let selected = enabled && self.is_selected(&meta.file_id);
                FileEntry {
                    meta,
                    selected,
                    actionable: enabled && (selected || meta.is_ready()),
                }
            })
            .collect()
    }

    /// Selects or deselects a mirrored file.
    ///
    /// # Errors
    ///
    /// - `DomainRequired` when no domain is selected
    /// - `FileActionsDisabled` in the unrestricted domain
    /// - `NotFound` when the id is neither mirrored nor selected
    /// - `FileNotReady` when selecting a file that is still processing
    /// - `Capacity` when selecting with [`MAX_SELECTED_FILES`] already selected
    pub fn toggle_file(&mut self, file_id: &str) -> Result<ToggleOutcome> {
        self.require_file_actions()?;

        if self.is_selected(file_id) {
            self.selected.retain(|id| id != file_id);
            return Ok(ToggleOutcome::Deselected);
        }

        let meta = self
            .available_files
            .iter()
            .find(|f| f.file_id == file_id)
            .ok_or_else(|| AssistError::not_found("file", file_id))?;

        if !meta.is_ready() {
            return Err(AssistError::FileNotReady {
                file_id: file_id.to_string(),
                status: meta.status().to_string(),
            });
        }

        self.push_checked(file_id)?;
        Ok(ToggleOutcome::Selected)
    }

    /// Adds a freshly uploaded file to the selection.
    ///
    /// Returns `Ok(false)` when it was already selected. Readiness is not
    /// checked: the backend accepted it for this turn.
    pub fn merge_upload(&mut self, file_id: &str) -> Result<bool> {
        self.require_file_actions()?;
        if self.is_selected(file_id) {
            return Ok(false);
        }
        self.push_checked(file_id)?;
        Ok(true)
    }

    fn push_checked(&mut self, file_id: &str) -> Result<()> {
        if self.selected.len() >= MAX_SELECTED_FILES {
            tracing::warn!(
                "[SelectionPolicy] Maximum of {} files can be selected, rejecting '{}'",
                MAX_SELECTED_FILES,
                file_id
            );
            return Err(AssistError::Capacity {
                limit: MAX_SELECTED_FILES,
            });
        }
        self.selected.push(file_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: &str, status: Option<&str>) -> FileMeta {
        FileMeta {
            file_id: id.to_string(),
            filename: format!("{id}.pdf"),
            created_at: None,
            processing_status: status.map(str::to_string),
            domain: Some(Domain::Hr),
        }
    }

    fn ready_files(count: usize) -> Vec<FileMeta> {
        (0..count)
            .map(|i| file(&format!("f{i}"), Some("completed")))
            .collect()
    }

    fn policy_with(files: Vec<FileMeta>) -> SelectionPolicy {
        let mut policy = SelectionPolicy::new();
        policy.select_domain(Domain::Hr);
        assert!(policy.set_available_files(Domain::Hr, files));
        policy
    }

    #[test]
    fn test_toggle_requires_domain() {
        let mut policy = SelectionPolicy::new();
        assert_eq!(
            policy.toggle_file("f0").unwrap_err(),
            AssistError::DomainRequired
        );
    }

    #[test]
    fn test_toggle_select_and_deselect() {
        let mut policy = policy_with(ready_files(2));
        assert_eq!(policy.toggle_file("f1").unwrap(), ToggleOutcome::Selected);
        assert_eq!(policy.effective_file_ids(), vec!["f1".to_string()]);
        assert_eq!(policy.toggle_file("f1").unwrap(), ToggleOutcome::Deselected);
        assert!(policy.effective_file_ids().is_empty());
    }

    #[test]
    fn test_eleventh_file_is_rejected() {
        let mut policy = policy_with(ready_files(11));
        for i in 0..10 {
            policy.toggle_file(&format!("f{i}")).unwrap();
        }
        let before = policy.effective_file_ids();

        let err = policy.toggle_file("f10").unwrap_err();
        assert!(err.is_capacity());
        assert_eq!(policy.effective_file_ids(), before);
        assert_eq!(policy.selected_count(), MAX_SELECTED_FILES);
    }

    #[test]
    fn test_pending_file_not_selectable() {
        let mut policy = policy_with(vec![file("f0", Some("processing")), file("f1", None)]);
        assert!(matches!(
            policy.toggle_file("f0").unwrap_err(),
            AssistError::FileNotReady { .. }
        ));
        match policy.toggle_file("f1").unwrap_err() {
            AssistError::FileNotReady { status, .. } => assert_eq!(status, "uploaded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_selected_pending_file_can_be_deselected() {
        // Uploaded during a turn: selected before ingestion finished.
        let mut policy = policy_with(vec![file("f0", Some("processing"))]);
        assert!(policy.merge_upload("f0").unwrap());

        let entries = policy.file_entries();
        assert!(entries[0].selected);
        assert!(entries[0].actionable);

        assert_eq!(policy.toggle_file("f0").unwrap(), ToggleOutcome::Deselected);
        assert!(!policy.file_entries()[0].actionable);
    }

    #[test]
    fn test_unknown_file() {
        let mut policy = policy_with(ready_files(1));
        assert!(policy.toggle_file("ghost").unwrap_err().is_not_found());
    }

    #[test]
    fn test_domain_switch_clears_selection() {
        let mut policy = policy_with(ready_files(3));
        policy.toggle_file("f0").unwrap();
        policy.toggle_file("f2").unwrap();

        policy.select_domain(Domain::It);
        assert_eq!(policy.active_domain(), Some(Domain::It));
        assert!(policy.effective_file_ids().is_empty());
        assert!(policy.available_files().is_empty());
    }

    #[test]
    fn test_general_domain_disables_files() {
        let mut policy = SelectionPolicy::new();
        policy.select_domain(Domain::General);
        policy.set_available_files(Domain::General, ready_files(2));

        assert!(!policy.file_actions_enabled());
        assert!(matches!(
            policy.toggle_file("f0").unwrap_err(),
            AssistError::FileActionsDisabled { .. }
        ));
        assert!(matches!(
            policy.merge_upload("f0").unwrap_err(),
            AssistError::FileActionsDisabled { .. }
        ));
        assert!(policy.effective_file_ids().is_empty());
        assert!(policy.file_entries().iter().all(|e| !e.actionable && !e.selected));
    }

    #[test]
    fn test_stale_file_list_dropped() {
        let mut policy = SelectionPolicy::new();
        policy.select_domain(Domain::Hr);
        policy.select_domain(Domain::Security);

        assert!(!policy.set_available_files(Domain::Hr, ready_files(2)));
        assert!(policy.available_files().is_empty());
    }

    #[test]
    fn test_merge_upload_respects_cap_and_duplicates() {
        let mut policy = policy_with(ready_files(10));
        for i in 0..10 {
            policy.toggle_file(&format!("f{i}")).unwrap();
        }
        assert!(!policy.merge_upload("f3").unwrap());
        assert!(policy.merge_upload("new").unwrap_err().is_capacity());
        assert!(!policy.is_selected("new"));
    }
}
