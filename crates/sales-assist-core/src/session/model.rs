//! Session domain model.

use crate::error::{AssistError, Result};
use serde::{Deserialize, Serialize};

/// A backend chat session, created by login and terminated by logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
}

/// Local lifecycle of the backend session: `None -> Active -> None`.
///
/// Passed by reference to whoever needs the session instead of being read
/// from ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    None,
    Active(Session),
}

impl SessionState {
    /// Moves into `Active`, replacing any previous session.
    pub fn activate(&mut self, session: Session) {
        *self = SessionState::Active(session);
    }

    /// Returns to `None`, handing back the session that was active.
    pub fn clear(&mut self) -> Option<Session> {
        match std::mem::take(self) {
            SessionState::Active(session) => Some(session),
            SessionState::None => None,
        }
    }

    pub fn active(&self) -> Option<&Session> {
        match self {
            SessionState::Active(session) => Some(session),
            SessionState::None => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    /// Returns the active session or a `Session` error.
    pub fn require_active(&self) -> Result<&Session> {
        self.active()
            .ok_or_else(|| AssistError::session("no active session, please log in"))
    }
}
