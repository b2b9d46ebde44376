//! Roster parsing.
//!
//! The roster is a headerless tabular file whose first column holds
//! subject names. It is read once, at session creation; on resume the
//! roster stored in the snapshot is authoritative.

use crate::error::CoreError;

/// Parses subject names from roster file contents.
///
/// Takes the first comma-separated column of each non-empty line,
/// trimming whitespace and surrounding double quotes. Duplicate names
/// are preserved as distinct roster positions.
///
/// # Errors
///
/// Returns [`CoreError::EmptyRoster`] if no names remain.
pub fn parse_roster(input: &str) -> Result<Vec<String>, CoreError> {
    let names: Vec<String> = input
        .lines()
        .filter_map(|line| {
            let first = line.split(',').next().unwrap_or(line);
            let first = first.trim().trim_matches('"').trim();
            if first.is_empty() {
                None
            } else {
                Some(first.to_string())
            }
        })
        .collect();

    if names.is_empty() {
        return Err(CoreError::EmptyRoster);
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_column_only() {
        let roster = parse_roster("Alice,a01\nBob,b02\n").unwrap();
        assert_eq!(roster, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_quotes_and_blank_lines() {
        let roster = parse_roster("\"Garcia\",g03\n\n  Bob  \n").unwrap();
        assert_eq!(roster, vec!["Garcia", "Bob"]);
    }

    #[test]
    fn test_duplicates_preserved() {
        let roster = parse_roster("Kim\nKim\n").unwrap();
        assert_eq!(roster, vec!["Kim", "Kim"]);
    }

    #[test]
    fn test_empty_roster_is_an_error() {
        assert!(matches!(parse_roster("\n  \n"), Err(CoreError::EmptyRoster)));
    }
}
