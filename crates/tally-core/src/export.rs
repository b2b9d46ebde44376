//! Score report rendering.
//!
//! The report is tabular UTF-8 text: a header row, then one row per
//! subject in roster order. Rendering is deterministic; the
//! persistence layer decides where the bytes land.

use tally_models::SessionState;

use crate::engine::{subject_points_lost, subject_score};

/// Header row of every exported report.
pub const REPORT_HEADER: &str = "Subject,Final Score,Points Lost,Comments";

/// Renders the full report for a session.
pub fn render_report(state: &SessionState) -> String {
    let mut report = String::from(REPORT_HEADER);
    for subject in 0..state.roster.len() {
        report.push('\n');
        report.push_str(&render_row(state, subject));
    }
    report.push('\n');
    report
}

/// Renders one subject's row.
pub fn render_row(state: &SessionState, subject: usize) -> String {
    format!(
        "{},{},{},\"{}\"",
        csv_field(&state.roster[subject]),
        subject_score(state, subject),
        subject_points_lost(state, subject),
        escape_quotes(&subject_comments(state, subject)),
    )
}

/// Concatenates a subject's exported comment text, in question-key
/// order, one line per non-sentinel entry. Entries with a positive
/// deduction show the point value; zero-deduction annotations show the
/// comment alone. Trailing whitespace is trimmed.
pub fn subject_comments(state: &SessionState, subject: usize) -> String {
    let record = &state.records[subject];
    let mut comments = String::new();
    for key in state.config.keys() {
        for entry in record.entries(key) {
            if entry.is_sentinel() {
                continue;
            }
            if entry.deduction > 0 {
                comments.push_str(&format!(
                    "{key}: {} (-{})\n",
                    entry.comment, entry.deduction
                ));
            } else {
                comments.push_str(&format!("{key}: {}\n", entry.comment));
            }
        }
    }
    comments.trim_end().to_string()
}

/// Quotes a field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", escape_quotes(value))
    } else {
        value.to_string()
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "\"\"")
}
