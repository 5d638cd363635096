//! Turn orchestration.
//!
//! A turn is one user message plus the model reply. The orchestrator
//! inserts the user message and a typing placeholder right away, uploads an
//! attached file if there is one, calls the backend, and resolves the
//! placeholder with either the answer or a fixed apology. The loading flag
//! is back to idle when `run_turn` returns, whatever happened.

use sales_assist_core::conversation::LoadingState;
use sales_assist_core::domain::Domain;
use sales_assist_core::error::{AssistError, Result};
use sales_assist_core::file::Attachment;
use sales_assist_core::gateway::{BackendGateway, ChatRequest, Source};
use sales_assist_core::session::{HistoryEntry, Message, MessagePatch, Session};
use sales_assist_core::state::ChatState;
use std::sync::Arc;

/// Text shown in place of the reply when the backend call fails.
pub const APOLOGY_TEXT: &str =
    "I'm sorry, I encountered an error connecting to the service. Please try again.";

/// Callback invoked with the state whenever a renderer should redraw mid-turn.
pub type StateObserver = Arc<dyn Fn(&ChatState) + Send + Sync>;

/// What the user submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnInput {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl TurnInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Display text for the conversation and the message sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedTurn {
    pub display_text: String,
    pub backend_message: String,
}

/// Builds the two texts of a turn.
///
/// With an attachment the display text gets an `[Attached: name]` marker and,
/// when nothing was typed, the backend is asked to analyze the file.
pub fn compose_turn(text: &str, attachment_name: Option<&str>) -> ComposedTurn {
    let has_text = !text.trim().is_empty();
    match attachment_name {
        Some(name) if has_text => ComposedTurn {
            display_text: format!("{text} \n[Attached: {name}]"),
            backend_message: text.to_string(),
        },
        Some(name) => ComposedTurn {
            display_text: format!("[Attached: {name}]"),
            backend_message: format!("Analyze file: {name}"),
        },
        None => ComposedTurn {
            display_text: text.to_string(),
            backend_message: text.to_string(),
        },
    }
}

/// How the placeholder was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnStatus {
    Answered {
        sources: Vec<Source>,
        confidence_score: f64,
        latency_ms: f64,
    },
    Failed {
        error: AssistError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub user_message_id: String,
    pub reply_message_id: String,
    pub status: TurnStatus,
    /// Id the backend assigned to the attachment, if the upload succeeded.
    pub uploaded_file_id: Option<String>,
    /// Non-fatal problems, e.g. a failed upload or a full file selection.
    pub warnings: Vec<AssistError>,
}

impl TurnOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self.status, TurnStatus::Answered { .. })
    }
}

/// Runs turns against a [`BackendGateway`].
#[derive(Clone)]
pub struct TurnOrchestrator {
    gateway: Arc<dyn BackendGateway>,
    observer: Option<StateObserver>,
}

impl TurnOrchestrator {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self {
            gateway,
            observer: None,
        }
    }

    /// Sets the callback notified once the placeholder is visible and again
    /// when the turn has settled.
    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Runs one turn.
    ///
    /// Returns `Err` only when the turn is refused before anything is
    /// inserted: no domain (`DomainRequired`), nothing to send
    /// (`EmptyInput`), an attachment-only turn in the unrestricted domain
    /// (`FileActionsDisabled`), or a turn already pending (`TurnInProgress`).
    /// Backend failures are reported through [`TurnOutcome::status`] and
    /// [`TurnOutcome::warnings`].
    pub async fn run_turn(
        &self,
        session: &Session,
        state: &mut ChatState,
        input: TurnInput,
    ) -> Result<TurnOutcome> {
        let domain = state.selection.require_domain()?;
        if !state.conversation.is_idle() {
            return Err(AssistError::TurnInProgress);
        }
        if !input.has_text() && input.attachment.is_none() {
            return Err(AssistError::EmptyInput);
        }

        let mut warnings = Vec::new();
        let has_text = input.has_text();
        let TurnInput { text, mut attachment } = input;

        if attachment.is_some() && !domain.allows_file_actions() {
            if !has_text {
                return Err(AssistError::FileActionsDisabled {
                    domain: domain.to_string(),
                });
            }
            tracing::warn!(
                "[TurnOrchestrator] Dropping attachment: uploads are disabled for '{}'",
                domain
            );
            warnings.push(AssistError::upload(format!(
                "uploads are disabled for the '{}' domain",
                domain
            )));
            attachment = None;
        }

        let composed = compose_turn(&text, attachment.as_ref().map(|a| a.filename.as_str()));

        // Prior turns only; the new message travels as `message`.
        let history = state.conversation.history_snapshot();

        let user_message = Message::user(composed.display_text);
        let user_message_id = user_message.id.clone();
        state.conversation.append_message(user_message)?;
        state.conversation.clear_suggestions();
        state.conversation.set_loading(LoadingState::AwaitingResponse);

        let resolved = self
            .resolve_reply(
                session,
                state,
                domain,
                composed.backend_message,
                history,
                attachment,
                &mut warnings,
            )
            .await;

        state.conversation.set_loading(LoadingState::Idle);
        self.notify(state);

        let (reply_message_id, status, uploaded_file_id) = resolved?;
        Ok(TurnOutcome {
            user_message_id,
            reply_message_id,
            status,
            uploaded_file_id,
            warnings,
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn resolve_reply(
        &self,
        session: &Session,
        state: &mut ChatState,
        domain: Domain,
        message: String,
        history: Vec<HistoryEntry>,
        attachment: Option<Attachment>,
        warnings: &mut Vec<AssistError>,
    ) -> Result<(String, TurnStatus, Option<String>)> {
        let placeholder = Message::placeholder();
        let reply_message_id = placeholder.id.clone();
        state.conversation.append_message(placeholder)?;
        self.notify(state);

        let uploaded_file_id = match attachment {
            Some(attachment) => self.upload_attachment(state, domain, &attachment, warnings).await,
            None => None,
        };

        let request = ChatRequest {
            domain,
            session_id: session.session_id.clone(),
            message,
            file_ids: state.selection.effective_file_ids(),
            history,
        };

        let status = match self.gateway.send_chat_turn(&request).await {
            Ok(response) => {
                state
                    .conversation
                    .replace_message(&reply_message_id, MessagePatch::resolve(response.answer))?;
                state
                    .conversation
                    .set_suggestions(response.follow_up_questions);
                tracing::info!(
                    "[TurnOrchestrator] Turn answered in {:.0}ms with {} sources",
                    response.latency_ms,
                    response.sources.len()
                );
                TurnStatus::Answered {
                    sources: response.sources,
                    confidence_score: response.confidence_score,
                    latency_ms: response.latency_ms,
                }
            }
            Err(error) => {
                tracing::error!("[TurnOrchestrator] Chat Error: {}", error);
                state
                    .conversation
                    .replace_message(&reply_message_id, MessagePatch::resolve(APOLOGY_TEXT))?;
                TurnStatus::Failed { error }
            }
        };

        Ok((reply_message_id, status, uploaded_file_id))
    }

    /// Uploads the attachment and folds it into the selection.
    ///
    /// Failures are recorded in `warnings`; the turn goes on without the file.
    async fn upload_attachment(
        &self,
        state: &mut ChatState,
        domain: Domain,
        attachment: &Attachment,
        warnings: &mut Vec<AssistError>,
    ) -> Option<String> {
        let receipt = match self.gateway.upload_file(attachment, domain).await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(
                    "[TurnOrchestrator] Upload of {} failed, continuing without it: {}",
                    attachment.filename,
                    e
                );
                warnings.push(e);
                return None;
            }
        };

        if let Err(e) = state.selection.merge_upload(&receipt.file_id) {
            tracing::warn!(
                "[TurnOrchestrator] New upload {} not added to selection: {}",
                receipt.file_id,
                e
            );
            warnings.push(e);
        }

        match self.gateway.list_files(Some(domain)).await {
            Ok(files) => {
                state.selection.set_available_files(domain, files);
            }
            Err(e) => {
                tracing::warn!("[TurnOrchestrator] Failed to refresh files: {}", e);
            }
        }

        Some(receipt.file_id)
    }

    fn notify(&self, state: &ChatState) {
        if let Some(observer) = &self.observer {
            observer(state);
        }
    }
}
