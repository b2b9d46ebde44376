//! Core grading logic for Tally.
//!
//! This crate holds everything about a grading session that does not
//! touch a terminal or the filesystem: roster and solutions parsing,
//! the selection engine behind the interactive recorder, session
//! construction and resume rules, score arithmetic, and report
//! rendering. The CLI crate drives the prompts; the persistence crate
//! moves the resulting state to and from disk.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod roster;
pub mod select;
pub mod solutions;

pub use error::CoreError;
