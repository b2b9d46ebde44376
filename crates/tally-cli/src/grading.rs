//! Interactive grading loop.
//!
//! Walks the roster subject by subject, question by question, reading
//! comment selections at a rustyline prompt. After every fully graded
//! subject the session checkpoints: an atomic snapshot overwrite plus
//! a fresh timestamped export. Ctrl-C surfaces as
//! `ReadlineError::Interrupted` at whichever prompt is blocking and
//! funnels into the same checkpoint-and-exit path; SIGTERM/SIGHUP set
//! a flag that is honored at the next subject boundary.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::debug;

use tally_core::engine;
use tally_core::export::render_report;
use tally_core::roster::parse_roster;
use tally_core::select::{self, Token};
use tally_core::solutions::Solutions;
use tally_models::{DeductionEntry, QuestionKey, SessionConfig, SessionState};
use tally_persistence::SessionStore;

use crate::commands::Result;

type Readline = Editor<(), DefaultHistory>;

/// Arguments for the grade command.
pub struct GradeArgs {
    /// Operator-supplied session identifier.
    pub session: String,
    /// Roster file path.
    pub names: PathBuf,
    /// Optional solutions file path, re-read on every startup.
    pub solutions: Option<PathBuf>,
    /// Export filename prefix.
    pub output: String,
    /// Maximum score; prompted for when absent.
    pub max_score: Option<i64>,
}

/// Runs the grading flow: resume or create, then grade until the
/// roster is exhausted or the operator interrupts.
pub fn run_grading(args: GradeArgs, state_dir: &Path) -> Result<()> {
    let store = SessionStore::new(state_dir);
    let mut editor = Readline::new()?;

    // The solutions file is consumed at every startup, including
    // resume, so reference-answer corrections take effect.
    let solutions = match &args.solutions {
        Some(path) => {
            println!("Reading solutions from {}...", path.display());
            let text = fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            Solutions::parse(&text)
        }
        None => Solutions::default(),
    };

    let state = if store.exists(&args.session) {
        println!("{} exists. Loading saved state...", args.session);
        let mut state = store.load_snapshot(&args.session)?;
        if !solutions.is_empty() {
            engine::verify_config(&state, &solutions.sub_items())?;
        }
        engine::reset_incomplete(&mut state);
        print_resume_banner(&state);
        state
    } else {
        println!("Creating new session: {}", args.session);
        match create_session(&args, &solutions, &mut editor) {
            Ok(state) => state,
            Err(e) if is_interrupt(e.as_ref()) => {
                println!("\nInterrupted. No subjects graded. No state to save.");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown))?;
    signal_hook::flag::register(signal_hook::consts::SIGHUP, Arc::clone(&shutdown))?;

    GradingLoop {
        editor,
        store,
        state,
        solutions,
        shutdown,
        last_export: None,
    }
    .run()
}

/// Builds a fresh session from the roster file and configuration.
fn create_session(
    args: &GradeArgs,
    solutions: &Solutions,
    editor: &mut Readline,
) -> Result<SessionState> {
    println!("Reading subject names from {}...", args.names.display());
    let text = fs::read_to_string(&args.names)
        .map_err(|e| format!("failed to read {}: {e}", args.names.display()))?;
    let roster = parse_roster(&text)?;

    let sub_items = if solutions.is_empty() {
        prompt_shape(editor)?
    } else {
        solutions.sub_items()
    };

    let max_score = match args.max_score {
        Some(max) => max,
        None => prompt_number(editor, "Enter the max score: ")?,
    };

    Ok(SessionState::new(
        &args.session,
        roster,
        SessionConfig::new(sub_items, max_score),
        args.names.to_string_lossy(),
        &args.output,
    ))
}

struct GradingLoop {
    editor: Readline,
    store: SessionStore,
    state: SessionState,
    solutions: Solutions,
    shutdown: Arc<AtomicBool>,
    last_export: Option<PathBuf>,
}

impl GradingLoop {
    fn run(mut self) -> Result<()> {
        let total = self.state.roster.len();

        for subject in self.state.subjects_done..total {
            if self.shutdown.load(Ordering::Relaxed) {
                return self.interrupt();
            }

            println!(
                "\n\n -------------- Scoring {} ({}/{}) -------------- ",
                self.state.roster[subject],
                subject + 1,
                total
            );

            for question in 1..=self.state.config.num_questions() {
                for sub_item in 0..self.state.config.sub_items[question - 1] {
                    let key = QuestionKey::new(question, sub_item);
                    self.print_reference(key);
                    match self.grade_key(key) {
                        Ok(entries) => {
                            engine::record_entries(&mut self.state, subject, key, entries)
                        }
                        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                            return self.interrupt()
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                self.print_question_summary(subject, question);
            }

            let score = engine::subject_score(&self.state, subject);
            println!(
                "Total score for {}: {}/{}",
                self.state.roster[subject], score, self.state.config.max_score
            );
            engine::complete_subject(&mut self.state, subject);
            self.checkpoint()?;
        }

        if let Some(path) = &self.last_export {
            println!("Scores saved to {}", path.display());
        }
        Ok(())
    }

    /// One grading pass over a single sub-item. Loops locally on bad
    /// input; only interrupt/EOF escapes.
    fn grade_key(&mut self, key: QuestionKey) -> std::result::Result<Vec<DeductionEntry>, ReadlineError> {
        loop {
            let options = self.state.library.options(key).to_vec();
            for (index, option) in options.iter().enumerate() {
                println!("{}. {} (-{})", index + 1, option.comment, option.deduction);
            }
            println!("{}. Add new comment", options.len() + 1);

            let line = self.editor.readline("Select options (comma-separated): ")?;
            let tokens = match select::parse_selection(&line, options.len()) {
                Ok(tokens) => tokens,
                Err(e) => {
                    eprintln!("{e}. Please try again.");
                    continue;
                }
            };

            if tokens.is_empty() {
                // Skip: recorded as the sentinel, which never reaches
                // totals or the export.
                return Ok(vec![DeductionEntry::sentinel()]);
            }

            let mut entries = Vec::with_capacity(tokens.len());
            for token in tokens {
                match token {
                    Token::Existing(index) => {
                        entries.push(engine::resolve_option(&self.state, key, index))
                    }
                    Token::New => entries.push(self.new_comment(key)?),
                }
            }
            return Ok(entries);
        }
    }

    /// Prompts for a new `comment, deduction` pair, appends it to the
    /// library, and returns the entry to record.
    fn new_comment(&mut self, key: QuestionKey) -> std::result::Result<DeductionEntry, ReadlineError> {
        loop {
            let raw = self
                .editor
                .readline("Enter new comment and deduction (comment, deduction): ")?;
            match select::parse_new_comment(&raw) {
                Ok((comment, signed)) => {
                    if raw.contains('"') {
                        println!("Removed quotes from comment: {comment}");
                    }
                    if signed < 0 {
                        println!(
                            "Converting negative deduction ({signed}) to positive ({}).",
                            -signed
                        );
                    }
                    let deduction = select::normalize_deduction(signed);
                    let position = self.state.library.add_option(key, comment.clone(), deduction);
                    debug!(%key, position, "added comment option");
                    return Ok(DeductionEntry::new(comment, deduction));
                }
                Err(e) => eprintln!("Invalid input ({e}). Please try again."),
            }
        }
    }

    fn print_reference(&self, key: QuestionKey) {
        match self.solutions.item(key) {
            Some(item) => println!("\n\n{key}: ({}) Answer: {}\n", item.points, item.answer),
            None => println!("\n\n{key}:"),
        }
    }

    fn print_question_summary(&self, subject: usize, question: usize) {
        let record = &self.state.records[subject];
        let mut parts = Vec::new();
        for sub_item in 0..self.state.config.sub_items[question - 1] {
            let key = QuestionKey::new(question, sub_item);
            for entry in record.entries(key) {
                if entry.is_sentinel() {
                    continue;
                }
                parts.push(format!("{key}: {} (-{})", entry.comment, entry.deduction));
            }
        }
        let name = &self.state.roster[subject];
        if parts.is_empty() {
            println!("Q{question} summary for {name}: no deductions");
        } else {
            println!("Q{question} summary for {name}: {}", parts.join("; "));
        }
    }

    fn checkpoint(&mut self) -> Result<()> {
        let report = render_report(&self.state);
        let path = self.store.checkpoint(&self.state, &report)?;
        self.last_export = Some(path);
        Ok(())
    }

    /// Controlled shutdown: checkpoint if any subject finished, then
    /// exit successfully either way.
    fn interrupt(&mut self) -> Result<()> {
        println!("\n\nInterrupted.");
        if self.state.subjects_done == 0 {
            println!("No subjects graded. No state to save.");
            return Ok(());
        }
        println!("Saving state...");
        self.checkpoint()?;
        println!(
            "Saved session '{}'. Subjects graded: {}/{}.",
            self.state.session_id,
            self.state.subjects_done,
            self.state.roster.len()
        );
        println!(
            "Resume by running `tally grade {}` again.",
            self.state.session_id
        );
        Ok(())
    }
}

fn print_resume_banner(state: &SessionState) {
    println!("Loaded state:");
    println!("  session_id: {}", state.session_id);
    println!(
        "  subjects done: {}/{}",
        state.subjects_done,
        state.roster.len()
    );
    println!("  questions: {}", state.config.num_questions());
    println!("  sub-items per question: {:?}", state.config.sub_items);
    println!("  max score: {}", state.config.max_score);
    println!("  roster from: {}", state.names_file);
    println!("  output prefix: {}", state.output_prefix);
}

/// Prompts for question and sub-item counts when no solutions file was
/// given.
fn prompt_shape(editor: &mut Readline) -> std::result::Result<Vec<usize>, ReadlineError> {
    let num_questions = prompt_count(editor, "Enter the number of questions: ")?;
    let mut sub_items = Vec::with_capacity(num_questions);
    for question in 1..=num_questions {
        let prompt = format!("Enter the number of sub-items for question {question}: ");
        sub_items.push(prompt_count(editor, &prompt)?);
    }
    Ok(sub_items)
}

/// Reads a positive count, re-prompting on anything else.
fn prompt_count(editor: &mut Readline, prompt: &str) -> std::result::Result<usize, ReadlineError> {
    loop {
        let line = editor.readline(prompt)?;
        match line.trim().parse::<usize>() {
            Ok(value) if value >= 1 => return Ok(value),
            _ => eprintln!("Expected a positive number, got: {}", line.trim()),
        }
    }
}

/// Reads an integer, re-prompting on anything else.
fn prompt_number(editor: &mut Readline, prompt: &str) -> std::result::Result<i64, ReadlineError> {
    loop {
        let line = editor.readline(prompt)?;
        match line.trim().parse::<i64>() {
            Ok(value) => return Ok(value),
            Err(_) => eprintln!("Not a number: {}", line.trim()),
        }
    }
}

/// True for the readline errors that mean "operator wants out".
fn is_interrupt(err: &(dyn std::error::Error + 'static)) -> bool {
    matches!(
        err.downcast_ref::<ReadlineError>(),
        Some(ReadlineError::Interrupted | ReadlineError::Eof)
    )
}
