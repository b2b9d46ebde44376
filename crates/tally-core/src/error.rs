//! Error types for core grading logic.

use thiserror::Error;

/// Errors produced by core grading operations.
///
/// `InvalidToken`, `MalformedComment`, and `InvalidDeduction` are
/// recoverable: the grading loop reports them and re-prompts the
/// operator. `ConfigMismatch` and `EmptyRoster` abort session startup.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Roster file yielded no subject names.
    #[error("roster contains no subjects")]
    EmptyRoster,

    /// Menu token does not resolve to an option or the "new comment"
    /// slot.
    #[error("invalid choice: {0}")]
    InvalidToken(String),

    /// New-comment text could not be split into comment and deduction.
    #[error("expected `comment, deduction`, got: {0}")]
    MalformedComment(String),

    /// Deduction part of a new comment is not an integer.
    #[error("deduction is not a number: {0}")]
    InvalidDeduction(String),

    /// Saved session and the re-read solutions file disagree on
    /// question/sub-item counts.
    #[error(
        "solutions file implies {found:?} sub-items per question, \
         but the saved session was configured with {expected:?}; \
         restore the solutions file or start a new session"
    )]
    ConfigMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}
