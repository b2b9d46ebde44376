//! Question keys for Tally.
//!
//! A [`QuestionKey`] identifies one gradable unit: a question index and
//! a sub-item within it. Sub-items are displayed as lowercase letters
//! (`a`, `b`, `c`, ...), so question 1 sub-item 0 renders as `Q1a`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one (question, sub-item) gradable unit.
///
/// Ordering is question-major, sub-item-minor, which is the order the
/// export iterates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionKey {
    /// Question index, 1-based.
    pub question: usize,

    /// Sub-item index within the question, 0-based.
    pub sub_item: usize,
}

impl QuestionKey {
    /// Creates a new question key.
    ///
    /// `question` is 1-based; `sub_item` is 0-based.
    pub fn new(question: usize, sub_item: usize) -> Self {
        debug_assert!(question >= 1, "question indices are 1-based");
        Self { question, sub_item }
    }

    /// Returns the sub-item as a lowercase letter (`0` -> `a`).
    pub fn letter(&self) -> char {
        // Sub-item counts come from solution files; past 'z' the label
        // degrades but stays distinct in Display via the raw index.
        char::from_u32('a' as u32 + self.sub_item as u32).unwrap_or('?')
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}{}", self.question, self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        assert_eq!(QuestionKey::new(1, 0).to_string(), "Q1a");
        assert_eq!(QuestionKey::new(3, 2).to_string(), "Q3c");
        assert_eq!(QuestionKey::new(12, 1).to_string(), "Q12b");
    }

    #[test]
    fn test_ordering_is_question_major() {
        let mut keys = vec![
            QuestionKey::new(2, 0),
            QuestionKey::new(1, 1),
            QuestionKey::new(1, 0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                QuestionKey::new(1, 0),
                QuestionKey::new(1, 1),
                QuestionKey::new(2, 0),
            ]
        );
    }
}
