//! Session construction, resume rules, and score arithmetic.

use tracing::{debug, info};

use tally_models::{DeductionEntry, QuestionKey, SessionState};

use crate::error::CoreError;
use crate::select::strip_quotes;

/// Checks a resumed session against the counts the re-read solutions
/// file now implies.
///
/// Reference answers may change between runs, but question/sub-item
/// counts are fixed once records exist; a drift here would silently
/// misalign every record, so it is a hard error.
pub fn verify_config(state: &SessionState, sub_items: &[usize]) -> Result<(), CoreError> {
    if state.config.sub_items != sub_items {
        return Err(CoreError::ConfigMismatch {
            expected: state.config.sub_items.clone(),
            found: sub_items.to_vec(),
        });
    }
    Ok(())
}

/// Discards partial entries of every subject at or past the progress
/// cursor.
///
/// An interrupt can land mid-sweep; the cursor only advances at sweep
/// boundaries, so anything recorded for a not-yet-done subject is a
/// partial pass and gets regraded in full on resume.
pub fn reset_incomplete(state: &mut SessionState) {
    let done = state.subjects_done;
    for (idx, record) in state.records.iter_mut().enumerate().skip(done) {
        if !record.is_empty() {
            debug!(subject = %state.roster[idx], "discarding partial entries");
            record.clear();
        }
    }
}

/// Resolves a stored comment option into a recordable entry.
///
/// The stored pair is reproduced verbatim except that double quotes
/// are stripped from the comment, matching what a freshly entered
/// comment would look like.
pub fn resolve_option(state: &SessionState, key: QuestionKey, index: usize) -> DeductionEntry {
    let option = &state.library.options(key)[index];
    DeductionEntry::new(strip_quotes(&option.comment), option.deduction)
}

/// Stores the result of one grading pass over `key` for a subject.
pub fn record_entries(
    state: &mut SessionState,
    subject: usize,
    key: QuestionKey,
    entries: Vec<DeductionEntry>,
) {
    state.records[subject].record(key, entries);
}

/// Marks a subject's full sweep as complete, advancing the cursor.
pub fn complete_subject(state: &mut SessionState, subject: usize) {
    debug_assert_eq!(subject, state.subjects_done, "subjects complete in order");
    state.subjects_done = subject + 1;
    info!(
        subject = %state.roster[subject],
        done = state.subjects_done,
        total = state.roster.len(),
        "subject graded"
    );
}

/// Total points lost by a subject: the sum of all non-sentinel
/// deduction values across every question key.
pub fn subject_points_lost(state: &SessionState, subject: usize) -> i64 {
    let record = &state.records[subject];
    state
        .config
        .keys()
        .flat_map(|key| record.entries(key))
        .filter(|entry| !entry.is_sentinel())
        .map(|entry| i64::from(entry.deduction))
        .sum()
}

/// Final score for a subject. May go negative; over-deduction is left
/// visible to the operator rather than clamped.
pub fn subject_score(state: &SessionState, subject: usize) -> i64 {
    state.config.max_score - subject_points_lost(state, subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_models::SessionConfig;

    fn sample() -> SessionState {
        SessionState::new(
            "hw3",
            vec!["Alice".into(), "Bob".into(), "Cleo".into()],
            SessionConfig::new(vec![2], 10),
            "names.csv",
            "scores",
        )
    }

    #[test]
    fn test_verify_config_accepts_matching_counts() {
        let state = sample();
        assert!(verify_config(&state, &[2]).is_ok());
    }

    #[test]
    fn test_verify_config_rejects_drift() {
        let state = sample();
        let err = verify_config(&state, &[2, 1]).unwrap_err();
        assert!(matches!(err, CoreError::ConfigMismatch { .. }));
    }

    #[test]
    fn test_reset_incomplete_keeps_done_subjects() {
        let mut state = sample();
        let key = QuestionKey::new(1, 0);
        record_entries(&mut state, 0, key, vec![DeductionEntry::new("late", 1)]);
        complete_subject(&mut state, 0);
        // Bob was mid-sweep when the interrupt hit.
        record_entries(&mut state, 1, key, vec![DeductionEntry::new("late", 1)]);

        reset_incomplete(&mut state);

        assert_eq!(
            state.records[0].entries(key),
            &[DeductionEntry::new("late", 1)]
        );
        assert!(state.records[1].is_empty());
    }

    #[test]
    fn test_score_arithmetic_holds() {
        let mut state = sample();
        record_entries(
            &mut state,
            0,
            QuestionKey::new(1, 0),
            vec![
                DeductionEntry::new("minor error", 2),
                DeductionEntry::new("style", 0),
            ],
        );
        record_entries(
            &mut state,
            0,
            QuestionKey::new(1, 1),
            vec![DeductionEntry::sentinel()],
        );

        let lost = subject_points_lost(&state, 0);
        assert_eq!(lost, 2);
        assert_eq!(subject_score(&state, 0) + lost, state.config.max_score);
    }

    #[test]
    fn test_sentinel_never_contributes() {
        let mut state = sample();
        for key in state.config.keys().collect::<Vec<_>>() {
            record_entries(&mut state, 2, key, vec![DeductionEntry::sentinel()]);
        }
        assert_eq!(subject_points_lost(&state, 2), 0);
        assert_eq!(subject_score(&state, 2), 10);
    }

    #[test]
    fn test_over_deduction_goes_negative() {
        let mut state = sample();
        record_entries(
            &mut state,
            0,
            QuestionKey::new(1, 0),
            vec![DeductionEntry::new("entirely wrong", 12)],
        );
        assert_eq!(subject_score(&state, 0), -2);
    }

    #[test]
    fn test_resolve_option_reproduces_stored_deduction() {
        let mut state = sample();
        let key = QuestionKey::new(1, 0);
        state.library.add_option(key, "\"minor\" error", 2);

        let first = resolve_option(&state, key, 0);
        let second = resolve_option(&state, key, 0);
        assert_eq!(first, DeductionEntry::new("minor error", 2));
        assert_eq!(first, second);
    }

    // Grading 1..k, checkpointing, and resuming 1..k+1..N must produce
    // the same records as one uninterrupted run with the same inputs.
    #[test]
    fn test_resume_equivalence() {
        let key_a = QuestionKey::new(1, 0);
        let key_b = QuestionKey::new(1, 1);
        let passes: Vec<Vec<DeductionEntry>> = vec![
            vec![DeductionEntry::new("minor error", 2)],
            vec![DeductionEntry::sentinel()],
            vec![DeductionEntry::new("missed case", 3)],
        ];

        let grade = |state: &mut SessionState, subject: usize| {
            record_entries(state, subject, key_a, passes[subject].clone());
            record_entries(state, subject, key_b, vec![DeductionEntry::sentinel()]);
            complete_subject(state, subject);
        };

        // Uninterrupted run.
        let mut full = sample();
        for subject in 0..3 {
            grade(&mut full, subject);
        }

        // Interrupted run: one subject, a snapshot roundtrip with a
        // partial second subject, then resume.
        let mut interrupted = sample();
        grade(&mut interrupted, 0);
        record_entries(
            &mut interrupted,
            1,
            key_a,
            vec![DeductionEntry::new("half graded", 1)],
        );
        let json = serde_json::to_string(&interrupted).unwrap();
        let mut resumed: SessionState = serde_json::from_str(&json).unwrap();
        reset_incomplete(&mut resumed);
        for subject in resumed.subjects_done..3 {
            grade(&mut resumed, subject);
        }

        assert_eq!(resumed.records, full.records);
        assert_eq!(resumed.subjects_done, full.subjects_done);
    }
}
