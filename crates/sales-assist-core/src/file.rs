//! Backend file metadata and local attachments.

use crate::domain::Domain;
use crate::error::{AssistError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Processing status a file must reach before it can be used for retrieval.
pub const STATUS_COMPLETED: &str = "completed";

/// Status shown when the backend has not reported one yet.
pub const STATUS_UPLOADED: &str = "uploaded";

/// Metadata of a file stored by the backend. Mirrored, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    pub file_id: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
}

impl FileMeta {
    /// Status for display; `uploaded` when the backend sent none.
    pub fn status(&self) -> &str {
        self.processing_status.as_deref().unwrap_or(STATUS_UPLOADED)
    }

    /// Whether ingestion finished and the file can be selected.
    pub fn is_ready(&self) -> bool {
        self.processing_status.as_deref() == Some(STATUS_COMPLETED)
    }
}

/// Response of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub file_id: String,
    pub processing_status: String,
    pub domain: String,
}

/// Response of `GET /files/{file_id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStatus {
    pub processing_status: String,
    #[serde(default)]
    pub embedding_status: Option<String>,
}

/// A local file the user attached to a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Builds an attachment from in-memory bytes, inferring the MIME type from the name.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime_type = infer_mime_type(&filename);
        Self {
            filename,
            mime_type,
            bytes,
        }
    }

    /// Reads a file from disk. Empty files are rejected since the backend refuses them.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AssistError::io(format!("Invalid file path: {}", path.display())))?
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Err(AssistError::upload(format!("{} is empty", filename)));
        }

        Ok(Self::new(filename, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

fn infer_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}
