//! Backend gateway contract.
//!
//! This module defines the trait the client uses to reach the Sales
//! Assistant backend, and the request/response types exchanged with it. The
//! HTTP implementation lives in `sales-assist-interaction`; tests use
//! in-memory fakes.

use crate::domain::Domain;
use crate::error::Result;
use crate::file::{Attachment, FileMeta, FileStatus, UploadReceipt};
use crate::session::{HistoryEntry, Session};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub domain: Domain,
    pub session_id: String,
    pub message: String,
    pub file_ids: Vec<String>,
    pub history: Vec<HistoryEntry>,
}

/// A retrieved chunk the answer was grounded on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub chunk_id: Option<String>,
    #[serde(default)]
    pub chunk_index: Option<u32>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub text_preview: Option<String>,
}

/// Validated response of `POST /chat`. `answer` is never blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub latency_ms: f64,
}

/// Response of `POST /session/end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub status: String,
}

/// A stored turn returned by `GET /history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub role: String,
    #[serde(alias = "text", alias = "message")]
    pub content: String,
    #[serde(default, alias = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response of `GET /history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub domain: String,
    #[serde(default)]
    pub messages: Vec<HistoryRecord>,
}

/// Remote backend operations. Each call is a single round trip; no retry.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// `POST /session/start`. Fails with `Session`.
    async fn start_session(&self, user_id: &str) -> Result<Session>;

    /// `POST /session/end`. Fails with `Session`; callers clear local state regardless.
    async fn end_session(&self, session_id: &str) -> Result<EndSessionResponse>;

    /// `GET /files`. `None` lists every domain. Fails with `List`.
    async fn list_files(&self, domain: Option<Domain>) -> Result<Vec<FileMeta>>;

    /// `POST /upload`. Fails with `Upload`, without any request, for the unrestricted domain.
    async fn upload_file(&self, attachment: &Attachment, domain: Domain) -> Result<UploadReceipt>;

    /// `POST /chat`. Fails with `Chat` on transport errors and when `answer` is missing or blank.
    async fn send_chat_turn(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// `GET /history`. Fails with `History`.
    async fn get_history(&self, session_id: &str, domain: Domain) -> Result<HistoryResponse>;

    /// `GET /files/{file_id}/status`. Fails with `List`.
    async fn file_status(&self, file_id: &str) -> Result<FileStatus>;

    /// `GET /health`.
    async fn health(&self) -> Result<()>;
}
