//! Error types for lingo-core.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using JudgeError.
pub type Result<T> = std::result::Result<T, JudgeError>;

/// Reasons the remote judge could not produce a verdict.
///
/// Every variant is recovered by the evaluator, which falls back to the
/// local heuristic result.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("judge not configured: {0}")]
    NotConfigured(&'static str),

    #[error("judge unavailable: {0}")]
    Unavailable(String),

    #[error("judge timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed judge response: {0}")]
    Malformed(String),
}
