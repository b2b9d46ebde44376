//! Tally CLI library.
//!
//! This crate provides the command-line interface and the interactive
//! grading loop for Tally.

pub mod cli;
pub mod commands;
pub mod grading;
