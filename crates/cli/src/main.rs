//! Ceiling CLI: JSON commands in, JSON responses out.
//!
//! Three modes:
//! - **Shell mode**: `ceiling --command '<json>'`: single command, exit
//! - **REPL mode**: `ceiling`: interactive prompt on a terminal
//! - **Pipe mode**: `ceiling < commands.jsonl`: one command per line from stdin

mod commands;
mod format;
mod repl;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ceiling_executor::{CeilingConfig, Executor, CONFIG_FILE_NAME};

use commands::build_cli;
use format::{format_response, OutputMode};

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("ceiling: error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let matches = build_cli().get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    if matches.get_flag("init-config") {
        CeilingConfig::write_default_if_missing(&config_path)
            .with_context(|| format!("Could not write {}", config_path.display()))?;
        println!("{}", config_path.display());
        return Ok(0);
    }

    let explicit = matches.contains_id("config");
    let mut config = load_config(&config_path, explicit)?;
    if let Some(namespace) = matches.get_one::<String>("namespace") {
        config.namespace = namespace.clone();
        config.validate().context("Invalid --namespace")?;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        target: "ceiling::store",
        namespace = %config.namespace,
        mode = ?config.increment_mode,
        "Opening counter service"
    );
    let executor = Executor::open(config).context("Could not open counter service")?;

    let mode = if matches.get_flag("human") {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    if let Some(command) = matches.get_one::<String>("command") {
        let response = executor.respond_json(command);
        println!("{}", format_response(&response, mode));
        return Ok(if response.is_success() { 0 } else { 1 });
    }

    if std::io::stdin().is_terminal() {
        Ok(repl::run_repl(&executor, mode))
    } else {
        Ok(repl::run_pipe(&executor, mode))
    }
}

/// Config from `path`; a missing default file means defaults, a missing
/// explicit file is an error.
fn load_config(path: &Path, explicit: bool) -> Result<CeilingConfig> {
    if !explicit && !path.exists() {
        return Ok(CeilingConfig::default());
    }
    CeilingConfig::from_file(path).with_context(|| format!("Could not load {}", path.display()))
}
