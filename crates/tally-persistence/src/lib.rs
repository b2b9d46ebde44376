//! Persistence layer for Tally.
//!
//! This crate provides crash-safe persistence for grading sessions
//! using atomic file operations (write to temp file, then rename).
//! Each session owns one directory under the base state directory,
//! holding a single snapshot file plus a growing history of
//! timestamped score exports.
//!
//! # Example
//!
//! ```no_run
//! use tally_persistence::SessionStore;
//! use tally_models::{SessionConfig, SessionState};
//!
//! let store = SessionStore::new("/home/user/.tally");
//!
//! let state = SessionState::new(
//!     "hw3",
//!     vec!["Alice".into()],
//!     SessionConfig::new(vec![2], 10),
//!     "names.csv",
//!     "scores",
//! );
//! store.save_snapshot(&state).unwrap();
//!
//! // Load it back
//! let loaded = store.load_snapshot("hw3").unwrap();
//! ```

pub mod atomic;
pub mod error;
pub mod session_store;

pub use error::{PersistenceError, Result};
pub use session_store::{SessionStore, SNAPSHOT_FILE};
