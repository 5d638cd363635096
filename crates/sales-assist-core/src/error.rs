//! Error types for the Sales Assistant client.

use thiserror::Error;

/// A shared error type for the whole client.
///
/// The first five variants mirror the failure taxonomy of the backend
/// contract (session, list, upload, chat, capacity). The remaining variants
/// cover local validation and ambient concerns (config, IO, serialization).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssistError {
    /// Login/logout call failed, or an operation needed an active session
    #[error("Session error: {0}")]
    Session(String),

    /// File listing failed
    #[error("File list error: {0}")]
    List(String),

    /// Upload failed or is not allowed for the current domain
    #[error("Upload error: {0}")]
    Upload(String),

    /// Chat transport failure or response contract violation
    #[error("Chat error: {0}")]
    Chat(String),

    /// History fetch failed
    #[error("History error: {0}")]
    History(String),

    /// Backend health check failed
    #[error("Health check failed: {0}")]
    Health(String),

    /// File selection cap reached
    #[error("At most {limit} files can be selected")]
    Capacity { limit: usize },

    /// An operation needs a selected domain
    #[error("Select a domain first")]
    DomainRequired,

    /// File actions are disabled for this domain
    #[error("File actions are disabled for the '{domain}' domain")]
    FileActionsDisabled { domain: String },

    /// File is not processed yet and cannot be selected
    #[error("File '{file_id}' is not ready (status: {status})")]
    FileNotReady { file_id: String, status: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Neither text nor attachment was provided
    #[error("Nothing to send")]
    EmptyInput,

    /// A turn is already awaiting a response
    #[error("A response is still pending")]
    TurnInProgress,

    /// Speech capture failed
    #[error("Speech error: {0}")]
    Speech(String),

    /// Speech capture is not available on this platform
    #[error("Speech input is not supported")]
    SpeechUnsupported,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssistError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    /// Creates a List error
    pub fn list(message: impl Into<String>) -> Self {
        Self::List(message.into())
    }

    /// Creates an Upload error
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload(message.into())
    }

    /// Creates a Chat error
    pub fn chat(message: impl Into<String>) -> Self {
        Self::Chat(message.into())
    }

    /// Creates a History error
    pub fn history(message: impl Into<String>) -> Self {
        Self::History(message.into())
    }

    /// Creates a Health error
    pub fn health(message: impl Into<String>) -> Self {
        Self::Health(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a capacity error
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::Capacity { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from the backend contract rather than local validation.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Self::Session(_)
                | Self::List(_)
                | Self::Upload(_)
                | Self::Chat(_)
                | Self::History(_)
                | Self::Health(_)
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AssistError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AssistError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AssistError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, AssistError>`.
pub type Result<T> = std::result::Result<T, AssistError>;
