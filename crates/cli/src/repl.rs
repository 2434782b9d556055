//! REPL loop with rustyline.
//!
//! Interactive mode: prompt, history, line editing; `quit` or `exit` leaves.
//! Pipe mode: read lines from stdin, execute each.
//!
//! Every non-empty line is one JSON command and prints one response. Lines
//! starting with `#` are comments.

use std::io::{self, BufRead};

use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

use ceiling_executor::Executor;

use crate::format::{format_response, OutputMode};

const PROMPT: &str = "ceiling> ";

/// What to do with one input line
#[derive(Debug, PartialEq, Eq)]
enum LineAction<'a> {
    Skip,
    Quit,
    Execute(&'a str),
}

fn classify(line: &str, interactive: bool) -> LineAction<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        LineAction::Skip
    } else if interactive && (trimmed == "quit" || trimmed == "exit") {
        LineAction::Quit
    } else {
        LineAction::Execute(trimmed)
    }
}

/// Run the interactive REPL.
pub fn run_repl(executor: &Executor, mode: OutputMode) -> i32 {
    let config = Config::builder().history_ignore_space(true).build();
    let mut rl = match DefaultEditor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("(error) could not start line editor: {}", e);
            return 1;
        }
    };

    let history_path = history_file();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => match classify(&line, true) {
                LineAction::Skip => continue,
                LineAction::Quit => break,
                LineAction::Execute(command) => {
                    let _ = rl.add_history_entry(command);
                    let response = executor.respond_json(command);
                    println!("{}", format_response(&response, mode));
                }
            },
            // Ctrl-C: fresh prompt
            Err(ReadlineError::Interrupted) => continue,
            // Ctrl-D
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("(error) {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }
    0
}

/// Run commands from stdin until EOF.
///
/// Returns the process exit code: 1 if any command failed, 0 otherwise.
pub fn run_pipe(executor: &Executor, mode: OutputMode) -> i32 {
    let stdin = io::stdin();
    let mut exit_code = 0;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("(error) failed to read stdin: {}", e);
                return 1;
            }
        };

        let LineAction::Execute(command) = classify(&line, false) else {
            continue;
        };
        let response = executor.respond_json(command);
        if !response.is_success() {
            exit_code = 1;
        }
        println!("{}", format_response(&response, mode));
    }
    exit_code
}

fn history_file() -> Option<String> {
    std::env::var("HOME")
        .ok()
        .map(|h| format!("{}/.ceiling_history", h))
}
