#![allow(dead_code)]

use async_trait::async_trait;
use sales_assist_core::domain::Domain;
use sales_assist_core::error::{AssistError, Result};
use sales_assist_core::file::{Attachment, FileMeta, FileStatus, UploadReceipt};
use sales_assist_core::gateway::{
    BackendGateway, ChatRequest, ChatResponse, EndSessionResponse, HistoryResponse,
};
use sales_assist_core::session::Session;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// In-memory backend that records every call.
#[derive(Default)]
pub struct FakeGateway {
    pub calls: Mutex<Vec<String>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    pub chat_replies: Mutex<VecDeque<Result<ChatResponse>>>,
    pub files: Mutex<Vec<FileMeta>>,
    pub upload_error: Mutex<Option<AssistError>>,
    pub list_error: Mutex<Option<AssistError>>,
    pub end_error: Mutex<Option<AssistError>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_files(files: Vec<FileMeta>) -> Arc<Self> {
        let gateway = Self::default();
        *gateway.files.lock().unwrap() = files;
        Arc::new(gateway)
    }

    pub fn push_reply(&self, reply: Result<ChatResponse>) {
        self.chat_replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_chat(&self) -> ChatRequest {
        self.chat_requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no chat request recorded")
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl BackendGateway for FakeGateway {
    async fn start_session(&self, user_id: &str) -> Result<Session> {
        self.record("start_session");
        Ok(Session {
            session_id: "s-1".to_string(),
            user_id: user_id.to_string(),
        })
    }

    async fn end_session(&self, session_id: &str) -> Result<EndSessionResponse> {
        self.record(format!("end_session:{session_id}"));
        match self.end_error.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(EndSessionResponse {
                status: "ok".to_string(),
            }),
        }
    }

    async fn list_files(&self, domain: Option<Domain>) -> Result<Vec<FileMeta>> {
        let label = domain.map(|d| d.to_string()).unwrap_or_default();
        self.record(format!("list:{label}"));
        if let Some(e) = self.list_error.lock().unwrap().clone() {
            return Err(e);
        }
        Ok(self.files.lock().unwrap().clone())
    }

    async fn upload_file(&self, attachment: &Attachment, domain: Domain) -> Result<UploadReceipt> {
        self.record(format!("upload:{}", attachment.filename));
        if let Some(e) = self.upload_error.lock().unwrap().clone() {
            return Err(e);
        }
        let receipt = UploadReceipt {
            file_id: "f-new".to_string(),
            processing_status: "processing".to_string(),
            domain: domain.to_string(),
        };
        self.files.lock().unwrap().push(FileMeta {
            file_id: receipt.file_id.clone(),
            filename: attachment.filename.clone(),
            created_at: None,
            processing_status: Some("processing".to_string()),
            domain: Some(domain),
        });
        Ok(receipt)
    }

    async fn send_chat_turn(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.record("chat");
        self.chat_requests.lock().unwrap().push(request.clone());
        self.chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(answer("Default answer.", &[])))
    }

    async fn get_history(&self, session_id: &str, domain: Domain) -> Result<HistoryResponse> {
        self.record("history");
        Ok(HistoryResponse {
            session_id: session_id.to_string(),
            domain: domain.to_string(),
            messages: vec![],
        })
    }

    async fn file_status(&self, _file_id: &str) -> Result<FileStatus> {
        self.record("file_status");
        Ok(FileStatus {
            processing_status: "completed".to_string(),
            embedding_status: None,
        })
    }

    async fn health(&self) -> Result<()> {
        self.record("health");
        Ok(())
    }
}

pub fn answer(text: &str, follow_ups: &[&str]) -> ChatResponse {
    ChatResponse {
        answer: text.to_string(),
        follow_up_questions: follow_ups.iter().map(|s| s.to_string()).collect(),
        sources: vec![],
        confidence_score: 0.8,
        latency_ms: 42.0,
    }
}

pub fn file(id: &str, status: &str) -> FileMeta {
    FileMeta {
        file_id: id.to_string(),
        filename: format!("{id}.pdf"),
        created_at: None,
        processing_status: Some(status.to_string()),
        domain: Some(Domain::Hr),
    }
}
