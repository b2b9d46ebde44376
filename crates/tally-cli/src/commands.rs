//! Command handlers for CLI subcommands.

use std::path::Path;

use tracing::warn;

use tally_core::export::render_report;
use tally_persistence::SessionStore;

use crate::cli::Commands;
use crate::grading::{self, GradeArgs};

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command.
pub fn execute(command: Commands, state_dir: &Path) -> Result<()> {
    match command {
        Commands::Grade {
            session,
            names,
            solutions,
            output,
            max_score,
        } => grading::run_grading(
            GradeArgs {
                session,
                names,
                solutions,
                output,
                max_score,
            },
            state_dir,
        ),
        Commands::Sessions => cmd_sessions(&SessionStore::new(state_dir)),
        Commands::Status { session } => cmd_status(&SessionStore::new(state_dir), &session),
        Commands::Export { session } => cmd_export(&SessionStore::new(state_dir), &session),
    }
}

fn cmd_sessions(store: &SessionStore) -> Result<()> {
    let sessions = store.list_sessions()?;
    if sessions.is_empty() {
        println!("No sessions under {}", store.base_path().display());
        return Ok(());
    }

    for session_id in sessions {
        match store.load_snapshot(&session_id) {
            Ok(state) => println!(
                "{}  {}/{} subjects",
                session_id,
                state.subjects_done,
                state.roster.len()
            ),
            Err(e) => {
                warn!(%session_id, "unreadable snapshot: {e}");
                println!("{}  (unreadable snapshot)", session_id);
            }
        }
    }
    Ok(())
}

fn cmd_status(store: &SessionStore, session_id: &str) -> Result<()> {
    let state = store.load_snapshot(session_id)?;

    println!("Session: {}", state.session_id);
    println!("  Created: {}", state.created_at.format("%Y-%m-%d %H:%M UTC"));
    println!(
        "  Progress: {}/{} subjects graded",
        state.subjects_done,
        state.roster.len()
    );
    println!("  Questions: {}", state.config.num_questions());
    println!("  Sub-items per question: {:?}", state.config.sub_items);
    println!("  Max score: {}", state.config.max_score);
    println!("  Roster from: {}", state.names_file);
    println!("  Export prefix: {}", state.output_prefix);
    Ok(())
}

fn cmd_export(store: &SessionStore, session_id: &str) -> Result<()> {
    let state = store.load_snapshot(session_id)?;
    let report = render_report(&state);
    let path = store.write_export(&state, &report)?;
    println!("Scores saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_models::{SessionConfig, SessionState};
    use tempfile::tempdir;

    fn saved_state(store: &SessionStore, id: &str) -> SessionState {
        let state = SessionState::new(
            id,
            vec!["Alice".into(), "Bob".into()],
            SessionConfig::new(vec![2], 10),
            "names.csv",
            "scores",
        );
        store.save_snapshot(&state).unwrap();
        state
    }

    #[test]
    fn test_cmd_sessions_handles_empty_dir() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(cmd_sessions(&store).is_ok());
    }

    #[test]
    fn test_cmd_status_missing_session_fails() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(cmd_status(&store, "nope").is_err());
    }

    #[test]
    fn test_cmd_export_writes_report() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        saved_state(&store, "hw3");

        cmd_export(&store, "hw3").unwrap();

        let exports: Vec<_> = std::fs::read_dir(store.session_dir("hw3"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "csv"))
            .collect();
        assert_eq!(exports.len(), 1);
        let report = std::fs::read_to_string(exports[0].path()).unwrap();
        assert!(report.starts_with("Subject,Final Score,Points Lost,Comments"));
    }

    #[test]
    fn test_cmd_sessions_lists_saved() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        saved_state(&store, "hw3");
        assert!(cmd_sessions(&store).is_ok());
    }
}
