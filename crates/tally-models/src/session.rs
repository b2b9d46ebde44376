//! Session configuration and full session state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::key::QuestionKey;
use crate::record::{CommentLibrary, SubjectRecord};

/// Fixed configuration of one grading session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sub-item count for each question, in question order.
    pub sub_items: Vec<usize>,

    /// Maximum achievable score for the assignment.
    pub max_score: i64,
}

impl SessionConfig {
    /// Creates a configuration from per-question sub-item counts.
    pub fn new(sub_items: Vec<usize>, max_score: i64) -> Self {
        Self {
            sub_items,
            max_score,
        }
    }

    /// Number of questions.
    pub fn num_questions(&self) -> usize {
        self.sub_items.len()
    }

    /// Iterates every valid question key, question ascending, sub-item
    /// ascending.
    pub fn keys(&self) -> impl Iterator<Item = QuestionKey> + '_ {
        self.sub_items
            .iter()
            .enumerate()
            .flat_map(|(q, &count)| (0..count).map(move |s| QuestionKey::new(q + 1, s)))
    }
}

/// The aggregate state of one grading session.
///
/// Owned exclusively by the running session process; only the session
/// store serializes or deserializes it. Records are keyed by roster
/// INDEX, so duplicate subject names never collide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Operator-supplied session identifier.
    pub session_id: String,

    /// Ordered roster of subject names; duplicates preserved as
    /// distinct positions.
    pub roster: Vec<String>,

    /// Number of subjects whose full question/sub-item sweep has
    /// completed. 0 means none graded; the grading loop starts at this
    /// index.
    pub subjects_done: usize,

    /// Question/sub-item counts and maximum score.
    pub config: SessionConfig,

    /// One record per roster position, parallel to `roster`.
    pub records: Vec<SubjectRecord>,

    /// Reusable comment options, shared across subjects.
    pub library: CommentLibrary,

    /// Path the roster was read from, kept for provenance.
    pub names_file: String,

    /// Filename prefix for exported reports.
    pub output_prefix: String,

    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl SessionState {
    /// Creates a fresh session, pre-populating an empty entry list for
    /// every subject and every question key implied by `config`.
    pub fn new(
        session_id: impl Into<String>,
        roster: Vec<String>,
        config: SessionConfig,
        names_file: impl Into<String>,
        output_prefix: impl Into<String>,
    ) -> Self {
        let records = roster
            .iter()
            .map(|_| SubjectRecord::for_shape(&config.sub_items))
            .collect();
        let library = CommentLibrary::for_shape(&config.sub_items);
        Self {
            session_id: session_id.into(),
            roster,
            subjects_done: 0,
            config,
            records,
            library,
            names_file: names_file.into(),
            output_prefix: output_prefix.into(),
            created_at: Utc::now(),
        }
    }

    /// True once every subject has been fully graded.
    pub fn is_complete(&self) -> bool {
        self.subjects_done >= self.roster.len()
    }
}
