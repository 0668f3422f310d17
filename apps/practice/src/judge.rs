//! HTTP judge backed by an OpenAI-compatible chat-completions API.

use std::time::Duration;

use async_trait::async_trait;
use lingo_core::{Confidence, Judge, JudgeError, JudgeRequest, Verdict};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{error, warn};

use crate::config::JudgeConfig;
use crate::error::ConfigError;

const BASE_BACKOFF_MS: u64 = 200;

const GRADING_POLICY: &str = "You grade answers in a language-learning app. \
Compare the learner's answer with the expected answer and decide whether it is correct.\n\
Accept: synonyms, reordered words that keep the meaning, British or American spelling, \
contractions, and one- or two-character typos in ordinary words.\n\
Reject: changed meaning, missing content words, wrong grammatical person or tense, \
typos that form a different real word (\"form\" for \"from\"), and misspelled acronyms \
or proper nouns. Acronyms must be spelled exactly.\n\
Reply with JSON only: {\"isCorrect\": true|false, \"confidence\": \"high\"|\"medium\"|\"low\", \
\"reason\": string|null}.";

const IDIOM_POLICY: &str = "This is an idiom lesson. Only the exact idiomatic phrase counts, \
allowing purely grammatical variation. Reject paraphrases or explanations of the idiom's meaning.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// The verdict object the model is asked to reply with.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JudgeReply {
    is_correct: bool,
    confidence: String,
    #[serde(default)]
    reason: Option<String>,
}

/// Judge that asks a chat model to grade the answer.
#[derive(Clone)]
pub struct HttpJudge {
    config: JudgeConfig,
    client: reqwest::Client,
}

impl HttpJudge {
    pub fn new(config: JudgeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(JudgeConfig::from_env()?))
    }

    pub fn is_available(&self) -> bool {
        self.config.is_available()
    }

    fn request_error(&self, e: reqwest::Error) -> JudgeError {
        if e.is_timeout() {
            JudgeError::Timeout(self.config.timeout)
        } else {
            JudgeError::Unavailable(e.to_string())
        }
    }

    async fn post_with_retry(
        &self,
        url: &str,
        api_key: &str,
        payload: &serde_json::Value,
    ) -> Result<ChatResponse, JudgeError> {
        let mut retry: u32 = 0;
        loop {
            let err = match self.client.post(url).bearer_auth(api_key).json(payload).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let bytes = resp.bytes().await.map_err(|e| self.request_error(e))?;
                        return serde_json::from_slice(&bytes).map_err(|e| {
                            error!(error = %e, body = %String::from_utf8_lossy(&bytes), "judge response is not a chat completion");
                            JudgeError::Malformed(e.to_string())
                        });
                    }
                    let body = resp.text().await.unwrap_or_default();
                    let err = JudgeError::Unavailable(format!("HTTP {status}: {body}"));
                    if !is_retryable(status) {
                        return Err(err);
                    }
                    err
                }
                Err(e) => self.request_error(e),
            };

            if retry >= self.config.max_retries {
                return Err(err);
            }
            let backoff = Duration::from_millis(BASE_BACKOFF_MS * (1 << retry));
            warn!(retry, error = %err, "judge request failed, retrying");
            sleep(backoff).await;
            retry += 1;
        }
    }
}

#[async_trait]
impl Judge for HttpJudge {
    fn name(&self) -> &str {
        "http"
    }

    async fn judge(&self, request: &JudgeRequest<'_>) -> Result<Verdict, JudgeError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(JudgeError::NotConfigured("LINGO_JUDGE_API_KEY"))?;

        let url = format!(
            "{}/chat/completions",
            self.config.api_endpoint.trim_end_matches('/')
        );
        let payload = serde_json::json!({
            "model": self.config.model,
            "messages": build_messages(request),
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "stream": false
        });

        let response = self.post_with_retry(&url, api_key, &payload).await?;
        let content = response
            .first_content()
            .ok_or_else(|| JudgeError::Malformed("empty choices".to_string()))?;
        parse_verdict(content)
    }
}

/// System and user messages for one grading request.
pub fn build_messages(request: &JudgeRequest<'_>) -> Vec<ChatMessage> {
    let mut system = GRADING_POLICY.to_string();
    if request.is_idiom_lesson() {
        system.push('\n');
        system.push_str(IDIOM_POLICY);
    }

    let mut user = format!("Exercise type: {}\n", request.exercise_type.as_str());
    if let Some(kind) = request.lesson_kind {
        user.push_str(&format!("Lesson kind: {kind}\n"));
    }
    if let Some(context) = request.context {
        user.push_str(&format!("Context: {context}\n"));
    }
    user.push_str(&format!(
        "Expected answer: {}\nLearner answer: {}",
        request.correct_answer, request.user_answer
    ));

    vec![
        ChatMessage {
            role: "system".into(),
            content: system,
        },
        ChatMessage {
            role: "user".into(),
            content: user,
        },
    ]
}

/// Parse the model's reply, tolerating a surrounding code fence.
pub fn parse_verdict(content: &str) -> Result<Verdict, JudgeError> {
    let body = strip_code_fence(content);
    let reply: JudgeReply =
        serde_json::from_str(body).map_err(|e| JudgeError::Malformed(e.to_string()))?;
    let confidence = Confidence::from_str(&reply.confidence).ok_or_else(|| {
        JudgeError::Malformed(format!("unknown confidence {:?}", reply.confidence))
    })?;

    Ok(Verdict {
        is_correct: reply.is_correct,
        confidence,
        reason: reply.reason.filter(|r| !r.trim().is_empty()),
    })
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}
