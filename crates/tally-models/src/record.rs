//! Per-subject records and the reusable comment library.
//!
//! Both structures are dense: for every (question, sub-item) pair
//! implied by the session configuration there is a slot, even when the
//! slot is empty. This lets the exporter and the grading loop iterate
//! without existence checks, and keeps the JSON snapshot free of
//! struct-keyed maps.

use serde::{Deserialize, Serialize};

use crate::entry::DeductionEntry;
use crate::key::QuestionKey;

fn dense<T>(sub_items: &[usize]) -> Vec<Vec<Vec<T>>> {
    sub_items
        .iter()
        .map(|&count| (0..count).map(|_| Vec::new()).collect())
        .collect()
}

/// All deduction entries recorded for one subject.
///
/// Indexed `[question - 1][sub_item]`; every key valid for the session
/// configuration exists, possibly with an empty entry list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    entries: Vec<Vec<Vec<DeductionEntry>>>,
}

impl SubjectRecord {
    /// Creates an empty record shaped by per-question sub-item counts.
    pub fn for_shape(sub_items: &[usize]) -> Self {
        Self {
            entries: dense(sub_items),
        }
    }

    /// Returns the entries recorded for `key`.
    ///
    /// `key` must be valid for the shape this record was created with.
    pub fn entries(&self, key: QuestionKey) -> &[DeductionEntry] {
        &self.entries[key.question - 1][key.sub_item]
    }

    /// Replaces the entry list for `key` with the result of one grading
    /// pass.
    pub fn record(&mut self, key: QuestionKey, entries: Vec<DeductionEntry>) {
        self.entries[key.question - 1][key.sub_item] = entries;
    }

    /// Clears every entry list, returning the record to its freshly
    /// initialized state.
    pub fn clear(&mut self) {
        for question in &mut self.entries {
            for slot in question {
                slot.clear();
            }
        }
    }

    /// True if no entries have been recorded anywhere.
    pub fn is_empty(&self) -> bool {
        self.entries
            .iter()
            .all(|q| q.iter().all(|slot| slot.is_empty()))
    }

    /// Per-question sub-item counts this record was shaped with.
    pub fn shape(&self) -> Vec<usize> {
        self.entries.iter().map(|q| q.len()).collect()
    }
}

/// Reusable catalog of previously entered (comment, deduction) options,
/// scoped per question key.
///
/// Append-only within a session: options are never reordered or
/// deduplicated, and the 1-based position returned by [`add_option`]
/// doubles as the selectable menu token.
///
/// [`add_option`]: CommentLibrary::add_option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentLibrary {
    options: Vec<Vec<Vec<DeductionEntry>>>,
}

impl CommentLibrary {
    /// Creates an empty library shaped by per-question sub-item counts.
    pub fn for_shape(sub_items: &[usize]) -> Self {
        Self {
            options: dense(sub_items),
        }
    }

    /// Returns the ordered options stored for `key`.
    pub fn options(&self, key: QuestionKey) -> &[DeductionEntry] {
        &self.options[key.question - 1][key.sub_item]
    }

    /// Appends an option for `key` and returns its 1-based menu
    /// position.
    pub fn add_option(
        &mut self,
        key: QuestionKey,
        comment: impl Into<String>,
        deduction: u32,
    ) -> usize {
        let slot = &mut self.options[key.question - 1][key.sub_item];
        slot.push(DeductionEntry::new(comment, deduction));
        slot.len()
    }
}
