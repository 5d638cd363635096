//! HttpBackendGateway - REST implementation of [`BackendGateway`].
//!
//! One method per backend endpoint, each a single request with the
//! configured timeout and no retry. Non-2xx responses surface the response
//! body (or a per-operation default) as the error detail.

use async_trait::async_trait;
use reqwest::{Client, Response, Url, multipart};
use sales_assist_core::config::ClientConfig;
use sales_assist_core::domain::Domain;
use sales_assist_core::error::{AssistError, Result};
use sales_assist_core::file::{Attachment, FileMeta, FileStatus, UploadReceipt};
use sales_assist_core::gateway::{
    BackendGateway, ChatRequest, ChatResponse, EndSessionResponse, HistoryResponse, Source,
};
use sales_assist_core::session::Session;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which contract operation a request belongs to; picks the error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Session,
    List,
    Upload,
    Chat,
    History,
    Health,
}

impl Operation {
    fn error(self, message: impl Into<String>) -> AssistError {
        match self {
            Operation::Session => AssistError::session(message),
            Operation::List => AssistError::list(message),
            Operation::Upload => AssistError::upload(message),
            Operation::Chat => AssistError::chat(message),
            Operation::History => AssistError::history(message),
            Operation::Health => AssistError::health(message),
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Operation::Session => "Session request failed",
            Operation::List => "Failed to fetch files",
            Operation::Upload => "Upload failed",
            Operation::Chat => "Backend unavailable or returned error",
            Operation::History => "Failed to fetch history",
            Operation::Health => "Backend health check failed",
        }
    }
}

#[derive(Serialize)]
struct StartSessionRequest<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
struct EndSessionRequest<'a> {
    session_id: &'a str,
}

/// `/chat` body before the contract check; every field may be absent.
#[derive(Deserialize)]
struct RawChatResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    follow_up_questions: Option<Vec<String>>,
    #[serde(default)]
    sources: Option<Vec<Source>>,
    #[serde(default)]
    confidence_score: Option<f64>,
    #[serde(default)]
    latency_ms: Option<f64>,
}

/// Gateway that talks to the backend over HTTP.
#[derive(Clone)]
pub struct HttpBackendGateway {
    client: Client,
    base_url: String,
}

impl HttpBackendGateway {
    /// Creates a gateway for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistError::config(format!("Failed to build HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        tracing::info!(
            "[HttpBackendGateway] Initialized with URL: {}, timeout: {}s",
            base_url,
            timeout.as_secs()
        );

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.backend_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Joins `segments` onto the base URL, percent-encoding each one.
    fn segment_url(&self, segments: &[&str], operation: Operation) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| operation.error(format!("Invalid backend URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| operation.error("Backend URL cannot take a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: Operation,
    ) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|err| operation.error(describe_transport_error(&err)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                "[HttpBackendGateway] {:?} request returned {}: {}",
                operation,
                status,
                body_text
            );
            return Err(operation.error(error_detail(&body_text, operation)));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: Operation,
    ) -> Result<T> {
        let response = self.send(request, operation).await?;
        response.json::<T>().await.map_err(|err| {
            operation.error(format!("Failed to parse backend response: {err}"))
        })
    }
}

#[async_trait]
impl BackendGateway for HttpBackendGateway {
    async fn start_session(&self, user_id: &str) -> Result<Session> {
        let request = self
            .client
            .post(self.url("/session/start"))
            .json(&StartSessionRequest { user_id });
        let session: Session = self.send_json(request, Operation::Session).await?;
        tracing::info!(
            "[HttpBackendGateway] Session {} started for {}",
            session.session_id,
            session.user_id
        );
        Ok(session)
    }

    async fn end_session(&self, session_id: &str) -> Result<EndSessionResponse> {
        let request = self
            .client
            .post(self.url("/session/end"))
            .json(&EndSessionRequest { session_id });
        self.send_json(request, Operation::Session).await
    }

    async fn list_files(&self, domain: Option<Domain>) -> Result<Vec<FileMeta>> {
        let mut request = self.client.get(self.url("/files"));
        if let Some(domain) = domain {
            request = request.query(&[("domain", domain.as_str())]);
        }
        let files: Vec<FileMeta> = self.send_json(request, Operation::List).await?;
        tracing::debug!("[HttpBackendGateway] Listed {} files", files.len());
        Ok(files)
    }

    async fn upload_file(&self, attachment: &Attachment, domain: Domain) -> Result<UploadReceipt> {
        if !domain.allows_file_actions() {
            return Err(AssistError::upload(format!(
                "uploads are disabled for the '{}' domain",
                domain
            )));
        }

        let part = multipart::Part::bytes(attachment.bytes.clone())
            .file_name(attachment.filename.clone())
            .mime_str(&attachment.mime_type)
            .map_err(|e| AssistError::upload(format!("Invalid MIME type: {e}")))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("domain", domain.as_str().to_string());

        let request = self.client.post(self.url("/upload")).multipart(form);
        let receipt: UploadReceipt = self.send_json(request, Operation::Upload).await?;
        tracing::info!(
            "[HttpBackendGateway] Uploaded {} as {} ({})",
            attachment.filename,
            receipt.file_id,
            receipt.processing_status
        );
        Ok(receipt)
    }

    async fn send_chat_turn(&self, request: &ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(
            "[HttpBackendGateway] Chat request: domain={}, files={}, history={}",
            request.domain,
            request.file_ids.len(),
            request.history.len()
        );
        let http_request = self.client.post(self.url("/chat")).json(request);
        let raw: RawChatResponse = self.send_json(http_request, Operation::Chat).await?;
        validate_chat_response(raw)
    }

    async fn get_history(&self, session_id: &str, domain: Domain) -> Result<HistoryResponse> {
        let request = self
            .client
            .get(self.url("/history"))
            .query(&[("session_id", session_id), ("domain", domain.as_str())]);
        self.send_json(request, Operation::History).await
    }

    async fn file_status(&self, file_id: &str) -> Result<FileStatus> {
        let url = self.segment_url(&["files", file_id, "status"], Operation::List)?;
        self.send_json(self.client.get(url), Operation::List).await
    }

    async fn health(&self) -> Result<()> {
        let request = self.client.get(self.url("/health"));
        self.send(request, Operation::Health).await?;
        Ok(())
    }
}

/// Enforces the `/chat` contract: a non-blank `answer` is required even on HTTP 200.
fn validate_chat_response(raw: RawChatResponse) -> Result<ChatResponse> {
    let answer = raw
        .answer
        .filter(|answer| !answer.trim().is_empty())
        .ok_or_else(|| AssistError::chat("Backend response missing answer"))?;

    Ok(ChatResponse {
        answer,
        follow_up_questions: raw.follow_up_questions.unwrap_or_default(),
        sources: raw.sources.unwrap_or_default(),
        confidence_score: raw.confidence_score.unwrap_or_default(),
        latency_ms: raw.latency_ms.unwrap_or_default(),
    })
}

fn error_detail(body: &str, operation: Operation) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        operation.default_message().to_string()
    } else {
        trimmed.to_string()
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("could not connect to backend: {err}")
    } else {
        format!("request failed: {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(answer: Option<&str>) -> RawChatResponse {
        RawChatResponse {
            answer: answer.map(str::to_string),
            follow_up_questions: None,
            sources: None,
            confidence_score: None,
            latency_ms: None,
        }
    }

    #[test]
    fn test_missing_answer_is_chat_error() {
        let err = validate_chat_response(raw(None)).unwrap_err();
        assert_eq!(err, AssistError::chat("Backend response missing answer"));
    }

    #[test]
    fn test_blank_answer_is_chat_error() {
        assert!(validate_chat_response(raw(Some("   "))).is_err());
    }

    #[test]
    fn test_answer_with_null_lists() {
        let parsed: RawChatResponse = serde_json::from_str(
            r#"{"answer":"ok","follow_up_questions":null,"sources":null}"#,
        )
        .unwrap();
        let response = validate_chat_response(parsed).unwrap();
        assert_eq!(response.answer, "ok");
        assert!(response.follow_up_questions.is_empty());
        assert!(response.sources.is_empty());
    }

    #[test]
    fn test_error_detail_falls_back_to_default() {
        assert_eq!(error_detail("", Operation::Upload), "Upload failed");
        assert_eq!(error_detail("  \n", Operation::List), "Failed to fetch files");
        assert_eq!(error_detail("Invalid domain", Operation::List), "Invalid domain");
    }

    #[test]
    fn test_operation_maps_variant() {
        assert!(matches!(Operation::History.error("x"), AssistError::History(_)));
        assert!(matches!(Operation::Chat.error("x"), AssistError::Chat(_)));
        assert!(matches!(Operation::Health.error("x"), AssistError::Health(_)));
        assert_eq!(error_detail("", Operation::Health), "Backend health check failed");
    }

    #[test]
    fn test_file_id_is_one_path_segment() {
        let gateway =
            HttpBackendGateway::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        let url = gateway
            .segment_url(&["files", "a/b?c#d", "status"], Operation::List)
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/files/a%2Fb%3Fc%23d/status");

        let prefixed =
            HttpBackendGateway::new("http://localhost:8000/api", Duration::from_secs(5)).unwrap();
        let url = prefixed
            .segment_url(&["files", "f-1", "status"], Operation::List)
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/files/f-1/status");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let gateway =
            HttpBackendGateway::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:8000");
        assert_eq!(gateway.url("/chat"), "http://localhost:8000/chat");
    }
}
