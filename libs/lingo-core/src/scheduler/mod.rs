//! Word mastery scheduling and practice selection.
//!
//! The scheduler is pure: it takes a record (or none, for a first encounter)
//! and returns the updated record. Persisting it is the caller's job.

pub mod profile;
pub mod selection;
pub mod sm2;
