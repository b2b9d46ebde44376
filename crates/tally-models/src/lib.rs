//! Core data models for Tally.
//!
//! This crate provides the fundamental data types used throughout the
//! Tally grading system: question keys, deduction entries, per-subject
//! records, the reusable comment library, and the full session state.

pub mod entry;
pub mod key;
pub mod record;
pub mod session;

// Re-export main types
pub use entry::{DeductionEntry, SENTINEL_COMMENT};
pub use key::QuestionKey;
pub use record::{CommentLibrary, SubjectRecord};
pub use session::{SessionConfig, SessionState};
