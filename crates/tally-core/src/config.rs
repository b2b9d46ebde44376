//! Shared configuration for Tally.
//!
//! Provides the base state directory under which every grading session
//! keeps its own subdirectory (snapshot plus timestamped exports).
//!
//! # Environment Variables
//!
//! - `TALLY_STATE_DIR`: Override the base state directory

use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "TALLY_STATE_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".tally";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the Tally state directory.
///
/// The state directory is determined by:
/// 1. `TALLY_STATE_DIR` environment variable if set
/// 2. `~/.tally` if home directory is available
/// 3. `.tally` in current directory as fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_dir_is_stable() {
        // The cache must hand back the same path on repeated calls.
        assert_eq!(state_dir(), state_dir());
    }
}
