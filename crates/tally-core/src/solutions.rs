//! Solutions file parsing and configuration derivation.
//!
//! The solutions file is newline-delimited text, one line per sub-item:
//!
//! ```text
//! question:subitem:points:reference_answer
//! ```
//!
//! It is re-read on every startup, including resume, so reference
//! answers can be corrected mid-session. Lines that do not split into
//! exactly four fields, or whose question/points fields are not
//! numeric, are skipped with a diagnostic and excluded from the
//! derived configuration.

use tracing::warn;

use tally_models::QuestionKey;

/// Reference material for one sub-item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionItem {
    /// Points this sub-item is worth.
    pub points: i64,

    /// Reference answer shown at the grading prompt.
    pub answer: String,
}

/// Parsed solutions, indexed by question then sub-item in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solutions {
    items: Vec<Vec<SolutionItem>>,
}

impl Solutions {
    /// Parses solutions file contents, skipping malformed lines.
    pub fn parse(input: &str) -> Self {
        let mut items: Vec<Vec<SolutionItem>> = Vec::new();

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(':').collect();
            if fields.len() != 4 {
                warn!(line, "skipping solutions line with wrong field count");
                eprintln!("Invalid line in solutions file: {line}");
                continue;
            }

            let question: usize = match fields[0].trim().parse() {
                Ok(q) if q >= 1 => q,
                _ => {
                    warn!(line, "skipping solutions line with bad question index");
                    eprintln!("Invalid line in solutions file: {line}");
                    continue;
                }
            };
            let points: i64 = match fields[2].trim().parse() {
                Ok(p) => p,
                Err(_) => {
                    warn!(line, "skipping solutions line with non-numeric points");
                    eprintln!("Invalid line in solutions file: {line}");
                    continue;
                }
            };

            if items.len() < question {
                items.resize_with(question, Vec::new);
            }
            items[question - 1].push(SolutionItem {
                points,
                answer: fields[3].trim().to_string(),
            });
        }

        Self { items }
    }

    /// True if no usable lines were found.
    pub fn is_empty(&self) -> bool {
        self.items.iter().all(|q| q.is_empty())
    }

    /// Per-question sub-item counts implied by the file.
    pub fn sub_items(&self) -> Vec<usize> {
        self.items.iter().map(|q| q.len()).collect()
    }

    /// Reference material for `key`, if the file provided it.
    pub fn item(&self, key: QuestionKey) -> Option<&SolutionItem> {
        self.items
            .get(key.question - 1)
            .and_then(|q| q.get(key.sub_item))
    }
}
