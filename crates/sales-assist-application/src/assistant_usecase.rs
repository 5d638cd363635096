//! AssistantUseCase - the full client flow behind a single handle.
//!
//! Owns the session, the chat state and the turn orchestrator. Front ends
//! call these methods and render [`AssistantUseCase::state`] afterwards.

use crate::turn::{StateObserver, TurnInput, TurnOrchestrator, TurnOutcome};
use sales_assist_core::domain::Domain;
use sales_assist_core::error::{AssistError, Result};
use sales_assist_core::file::FileStatus;
use sales_assist_core::gateway::{BackendGateway, HistoryResponse};
use sales_assist_core::selection::ToggleOutcome;
use sales_assist_core::session::{Session, SessionState};
use sales_assist_core::state::ChatState;
use std::sync::Arc;

pub struct AssistantUseCase {
    gateway: Arc<dyn BackendGateway>,
    orchestrator: TurnOrchestrator,
    session: SessionState,
    state: ChatState,
}

impl AssistantUseCase {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            orchestrator: TurnOrchestrator::new(gateway.clone()),
            gateway,
            session: SessionState::default(),
            state: ChatState::new(),
        }
    }

    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.orchestrator = self.orchestrator.with_observer(observer);
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Starts a backend session for `user_id`.
    pub async fn login(&mut self, user_id: &str) -> Result<&Session> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AssistError::session("user id must not be empty"));
        }
        if let Some(active) = self.session.active() {
            return Err(AssistError::session(format!(
                "already logged in as {}",
                active.user_id
            )));
        }

        let session = self.gateway.start_session(user_id).await?;
        tracing::info!(
            "[AssistantUseCase] Logged in as {} (session {})",
            session.user_id,
            session.session_id
        );
        self.session.activate(session);
        self.session.require_active()
    }

    /// Ends the session.
    ///
    /// Local state is cleared before the backend is told, so a failed
    /// `end_session` still leaves the client logged out. The error is
    /// returned for display only.
    pub async fn logout(&mut self) -> Result<()> {
        let ended = self.session.clear();
        self.state.reset();

        let Some(session) = ended else {
            return Ok(());
        };
        match self.gateway.end_session(&session.session_id).await {
            Ok(response) => {
                tracing::info!(
                    "[AssistantUseCase] Session {} ended: {}",
                    session.session_id,
                    response.status
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "[AssistantUseCase] Failed to end session {}: {}",
                    session.session_id,
                    e
                );
                Err(e)
            }
        }
    }

    /// Switches domain, dropping suggestions, file list and selection, then
    /// fetches the new domain's files. A failed listing is only logged.
    pub async fn select_domain(&mut self, domain: Domain) -> Result<()> {
        self.session.require_active()?;
        self.state.select_domain(domain);
        tracing::info!("[AssistantUseCase] Domain selected: {}", domain);

        if domain.allows_file_actions() {
            if let Err(e) = self.refresh_files().await {
                tracing::warn!("[AssistantUseCase] Failed to fetch files: {}", e);
            }
        }
        Ok(())
    }

    /// Reloads the file list of the active domain; returns how many files it holds.
    pub async fn refresh_files(&mut self) -> Result<usize> {
        self.session.require_active()?;
        let domain = self.state.selection.require_file_actions()?;
        let files = self.gateway.list_files(Some(domain)).await?;
        self.state.selection.set_available_files(domain, files);
        Ok(self.state.selection.available_files().len())
    }

    pub fn toggle_file(&mut self, file_id: &str) -> Result<ToggleOutcome> {
        self.session.require_active()?;
        self.state.selection.toggle_file(file_id)
    }

    /// Sends a user turn.
    pub async fn send(&mut self, input: TurnInput) -> Result<TurnOutcome> {
        let session = self.session.require_active()?;
        self.orchestrator
            .run_turn(session, &mut self.state, input)
            .await
    }

    /// Sends the suggestion at `index` as a new turn.
    pub async fn send_suggestion(&mut self, index: usize) -> Result<TurnOutcome> {
        let suggestion = self
            .state
            .conversation
            .suggestions()
            .get(index)
            .cloned()
            .ok_or_else(|| AssistError::not_found("Suggestion", (index + 1).to_string()))?;
        self.send(TurnInput::text(suggestion)).await
    }

    /// Stored history of the active session in the active domain.
    pub async fn load_history(&self) -> Result<HistoryResponse> {
        let session = self.session.require_active()?;
        let domain = self.state.selection.require_domain()?;
        self.gateway.get_history(&session.session_id, domain).await
    }

    pub async fn file_status(&self, file_id: &str) -> Result<FileStatus> {
        self.session.require_active()?;
        self.gateway.file_status(file_id).await
    }

    pub async fn health(&self) -> Result<()> {
        self.gateway.health().await
    }
}
