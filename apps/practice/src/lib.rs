//! Practice-flow glue around lingo-core.
//!
//! Wires the answer evaluator to an HTTP language-model judge, applies the
//! mastery scheduler to each verdict and persists records through a
//! pluggable store.

pub mod config;
pub mod error;
pub mod judge;
pub mod logging;
pub mod service;
pub mod store;

pub use config::{JudgeConfig, PracticeConfig};
pub use error::{ConfigError, StoreError};
pub use judge::HttpJudge;
pub use service::{PracticeOutcome, PracticeService};
pub use store::{InMemoryStore, MasteryStore};
