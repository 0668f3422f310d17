//! Configuration from environment variables.
//!
//! Variables:
//! - LINGO_JUDGE_API_KEY: Judge API key (judge disabled when unset)
//! - LINGO_JUDGE_MODEL: Chat model name
//! - LINGO_JUDGE_ENDPOINT: OpenAI-compatible base URL
//! - LINGO_JUDGE_TIMEOUT_MS: Deadline for one judge call
//! - LINGO_JUDGE_MAX_RETRIES: Retries on transient failures

use std::time::Duration;

use lingo_core::EvaluatorConfig;

use crate::error::ConfigError;

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_MS: u64 = 8_000;
const DEFAULT_MAX_RETRIES: u32 = 1;

/// Remote judge connection settings.
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_endpoint: String,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl JudgeConfig {
    /// Load from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_ms = parse_or("LINGO_JUDGE_TIMEOUT_MS", get("LINGO_JUDGE_TIMEOUT_MS"), DEFAULT_TIMEOUT_MS)?;
        let max_retries = parse_or(
            "LINGO_JUDGE_MAX_RETRIES",
            get("LINGO_JUDGE_MAX_RETRIES"),
            DEFAULT_MAX_RETRIES,
        )?;

        Ok(Self {
            api_key: get("LINGO_JUDGE_API_KEY").map(|v| v.trim().to_string()),
            model: get("LINGO_JUDGE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_endpoint: normalize_endpoint(
                &get("LINGO_JUDGE_ENDPOINT").unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string()),
            ),
            timeout: Duration::from_millis(timeout_ms),
            max_retries,
        })
    }

    pub fn is_available(&self) -> bool {
        self.api_key.as_deref().is_some_and(|v| !v.trim().is_empty())
            && !self.model.trim().is_empty()
            && !self.api_endpoint.trim().is_empty()
    }
}

/// Everything a practice service needs.
#[derive(Debug, Clone, Default)]
pub struct PracticeConfig {
    pub judge: JudgeConfig,
    pub evaluator: EvaluatorConfig,
}

impl PracticeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let judge = JudgeConfig::from_env()?;
        Ok(Self::with_judge(judge))
    }

    /// Evaluator thresholds at their defaults, judge deadline from `judge`.
    pub fn with_judge(judge: JudgeConfig) -> Self {
        let evaluator = EvaluatorConfig {
            judge_timeout: judge.timeout,
            ..Default::default()
        };
        Self { judge, evaluator }
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

/// Trim trailing slashes and make sure the base URL ends in `/v1`.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.ends_with("/v1") || trimmed.contains("/v1/") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v1")
    }
}
