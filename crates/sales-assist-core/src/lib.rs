//! Core model of the Sales Assistant client: domains, sessions, messages,
//! the conversation store, the file selection policy and the backend
//! gateway contract.

pub mod config;
pub mod conversation;
pub mod domain;
pub mod error;
pub mod file;
pub mod gateway;
pub mod selection;
pub mod session;
pub mod speech;
pub mod state;

// Re-export common types
pub use config::ClientConfig;
pub use conversation::{ConversationStore, LoadingState};
pub use domain::Domain;
pub use error::{AssistError, Result};
pub use file::{Attachment, FileMeta};
pub use gateway::BackendGateway;
pub use selection::{MAX_SELECTED_FILES, SelectionPolicy, ToggleOutcome};
pub use state::ChatState;
