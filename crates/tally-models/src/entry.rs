//! Deduction entries.

use serde::{Deserialize, Serialize};

/// Comment text of the sentinel entry recorded when the operator makes
/// no selection for a sub-item.
pub const SENTINEL_COMMENT: &str = "None";

/// One (comment, deduction) annotation applied to a question key.
///
/// Deductions are stored as non-negative magnitudes subtracted from the
/// maximum score. The sentinel entry (`"None"`, 0) means "no entry
/// made" and is excluded from totals and from exported comment text; a
/// non-sentinel entry with a zero deduction is a real annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionEntry {
    /// Operator-entered comment text.
    pub comment: String,

    /// Points deducted, always non-negative.
    pub deduction: u32,
}

impl DeductionEntry {
    /// Creates a new entry.
    pub fn new(comment: impl Into<String>, deduction: u32) -> Self {
        Self {
            comment: comment.into(),
            deduction,
        }
    }

    /// Returns the sentinel entry meaning "no annotation made".
    pub fn sentinel() -> Self {
        Self::new(SENTINEL_COMMENT, 0)
    }

    /// True if this is the sentinel entry.
    pub fn is_sentinel(&self) -> bool {
        self.deduction == 0 && self.comment == SENTINEL_COMMENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_detection() {
        assert!(DeductionEntry::sentinel().is_sentinel());
        assert!(!DeductionEntry::new("None", 1).is_sentinel());
        assert!(!DeductionEntry::new("missed case", 0).is_sentinel());
    }
}
