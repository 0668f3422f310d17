//! Common test utilities for integration tests.
//!
//! Provides a fake OpenAI-compatible chat-completions server on an ephemeral
//! port and stores that fail on demand.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use lingo_core::WordMasteryRecord;
use lingo_practice::{JudgeConfig, MasteryStore, StoreError};

/// What the fake server answers with.
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// A chat completion whose message content is this string.
    Content(String),
    /// An error status with a short body.
    Status(u16),
    /// A 200 response with this raw body.
    Raw(String),
}

struct FakeState {
    reply: FakeReply,
    hits: AtomicUsize,
    last_request: Mutex<Option<Value>>,
    last_auth: Mutex<Option<String>>,
}

/// Fake chat-completions server running on localhost.
pub struct FakeJudgeServer {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeJudgeServer {
    pub async fn start(reply: FakeReply) -> Self {
        let state = Arc::new(FakeState {
            reply,
            hits: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_auth: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake judge server");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake judge server");
        });

        Self {
            base_url: format!("http://{addr}/v1"),
            state,
        }
    }

    /// Verdict reply helper.
    pub async fn answering(is_correct: bool, confidence: &str, reason: &str) -> Self {
        let content = json!({
            "isCorrect": is_correct,
            "confidence": confidence,
            "reason": reason,
        })
        .to_string();
        Self::start(FakeReply::Content(content)).await
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.state.last_request.lock().expect("lock").clone()
    }

    pub fn last_auth(&self) -> Option<String> {
        self.state.last_auth.lock().expect("lock").clone()
    }

    /// Judge configuration pointing at this server.
    pub fn judge_config(&self) -> JudgeConfig {
        JudgeConfig {
            api_key: Some("test-key".to_string()),
            model: "test-model".to_string(),
            api_endpoint: self.base_url.clone(),
            timeout: Duration::from_secs(2),
            max_retries: 0,
        }
    }
}

async fn chat_completions(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().expect("lock") = Some(body);
    *state.last_auth.lock().expect("lock") = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    match &state.reply {
        FakeReply::Content(content) => Json(json!({
            "id": "chatcmpl-test",
            "model": "test-model",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        FakeReply::Status(code) => (
            StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "upstream error",
        )
            .into_response(),
        FakeReply::Raw(body) => (StatusCode::OK, body.clone()).into_response(),
    }
}

/// Store whose reads and/or writes always fail.
#[derive(Debug, Default)]
pub struct FailingStore {
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub writes: AtomicUsize,
}

#[async_trait]
impl MasteryStore for FailingStore {
    async fn get(
        &self,
        _learner_id: &str,
        _word: &str,
    ) -> Result<Option<WordMasteryRecord>, StoreError> {
        if self.fail_reads {
            Err(StoreError::Backend("read refused".to_string()))
        } else {
            Ok(None)
        }
    }

    async fn upsert(&self, _learner_id: &str, _record: &WordMasteryRecord) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            Err(StoreError::Backend("write refused".to_string()))
        } else {
            Ok(())
        }
    }

    async fn list(&self, _learner_id: &str) -> Result<Vec<WordMasteryRecord>, StoreError> {
        if self.fail_reads {
            Err(StoreError::Backend("read refused".to_string()))
        } else {
            Ok(Vec::new())
        }
    }
}
