//! Selection engine behind the interactive deduction recorder.
//!
//! All parsing here is pure so it can be tested without a terminal;
//! the CLI grading loop owns the prompts and drives re-prompting on
//! any error returned from these functions.

use tracing::warn;

use crate::error::CoreError;

/// One parsed menu token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// An existing comment option, 0-based index into the library.
    Existing(usize),

    /// The "add new comment" slot.
    New,
}

/// Parses a comma-separated token set against a menu of `option_count`
/// stored options plus one "add new comment" slot.
///
/// Empty input yields an empty token list, which the recorder maps to
/// the sentinel entry. Multiple tokens select multiple options for the
/// same sub-item in one pass.
///
/// # Errors
///
/// Returns [`CoreError::InvalidToken`] for any token that is not a
/// number in `1..=option_count + 1`.
pub fn parse_selection(input: &str, option_count: usize) -> Result<Vec<Token>, CoreError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut tokens = Vec::new();
    for raw in input.split(',') {
        let raw = raw.trim();
        let choice: usize = raw
            .parse()
            .map_err(|_| CoreError::InvalidToken(raw.to_string()))?;
        if choice >= 1 && choice <= option_count {
            tokens.push(Token::Existing(choice - 1));
        } else if choice == option_count + 1 {
            tokens.push(Token::New);
        } else {
            return Err(CoreError::InvalidToken(raw.to_string()));
        }
    }
    Ok(tokens)
}

/// Parses raw `comment, deduction` text for a new comment option.
///
/// Splits on the LAST comma so the comment itself may contain commas.
/// Double-quote characters are stripped from the comment (they would
/// break the exported report). The deduction keeps its sign here;
/// callers normalize it with [`normalize_deduction`] so they can tell
/// the operator when a flip happened.
///
/// # Errors
///
/// Returns [`CoreError::MalformedComment`] when there is no comma or
/// the comment half is empty, and [`CoreError::InvalidDeduction`] when
/// the deduction half is not an integer.
pub fn parse_new_comment(raw: &str) -> Result<(String, i64), CoreError> {
    let (comment, deduction) = raw
        .rsplit_once(',')
        .ok_or_else(|| CoreError::MalformedComment(raw.to_string()))?;

    let comment = strip_quotes(comment.trim());
    if comment.is_empty() {
        return Err(CoreError::MalformedComment(raw.to_string()));
    }

    let deduction: i64 = deduction
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidDeduction(deduction.trim().to_string()))?;

    Ok((comment, deduction))
}

/// Normalizes an operator-supplied deduction to a non-negative
/// magnitude, logging when the sign had to be flipped.
pub fn normalize_deduction(value: i64) -> u32 {
    if value < 0 {
        warn!(value, "flipping negative deduction to positive");
    }
    value.unsigned_abs().min(u32::MAX as u64) as u32
}

/// Removes double-quote characters from comment text.
pub fn strip_quotes(comment: &str) -> String {
    comment.replace('"', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_is_no_tokens() {
        assert_eq!(parse_selection("", 3).unwrap(), Vec::new());
        assert_eq!(parse_selection("   ", 3).unwrap(), Vec::new());
    }

    #[test]
    fn test_multiple_tokens() {
        let tokens = parse_selection("1, 3,4", 3).unwrap();
        assert_eq!(
            tokens,
            vec![Token::Existing(0), Token::Existing(2), Token::New]
        );
    }

    #[test]
    fn test_invalid_tokens_rejected() {
        assert!(matches!(
            parse_selection("5", 3),
            Err(CoreError::InvalidToken(_))
        ));
        assert!(matches!(
            parse_selection("0", 3),
            Err(CoreError::InvalidToken(_))
        ));
        assert!(matches!(
            parse_selection("1,banana", 3),
            Err(CoreError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_new_is_only_token_on_empty_menu() {
        assert_eq!(parse_selection("1", 0).unwrap(), vec![Token::New]);
        assert!(parse_selection("2", 0).is_err());
    }

    #[test]
    fn test_new_comment_splits_on_last_comma() {
        let (comment, deduction) = parse_new_comment("wrong sign, off by one, 4").unwrap();
        assert_eq!(comment, "wrong sign, off by one");
        assert_eq!(deduction, 4);
    }

    #[test]
    fn test_new_comment_strips_quotes() {
        let (comment, deduction) = parse_new_comment("\"careless\" mistake, 1").unwrap();
        assert_eq!(comment, "careless mistake");
        assert_eq!(deduction, 1);
    }

    #[test]
    fn test_new_comment_rejects_bad_input() {
        assert!(matches!(
            parse_new_comment("no comma here"),
            Err(CoreError::MalformedComment(_))
        ));
        assert!(matches!(
            parse_new_comment(", 3"),
            Err(CoreError::MalformedComment(_))
        ));
        assert!(matches!(
            parse_new_comment("comment, lots"),
            Err(CoreError::InvalidDeduction(_))
        ));
    }

    #[test]
    fn test_negative_deduction_normalizes_to_magnitude() {
        assert_eq!(normalize_deduction(-5), 5);
        assert_eq!(normalize_deduction(5), 5);
        assert_eq!(normalize_deduction(0), 0);
    }
}
