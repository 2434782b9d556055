//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("ceiling")
        .about("Bounded per-record counters, driven by JSON commands")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("Config file (default: ./ceiling.toml if present)"),
        )
        .arg(
            Arg::new("namespace")
                .long("namespace")
                .value_name("NAME")
                .help("Value-store namespace, overriding the config file"),
        )
        .arg(
            Arg::new("command")
                .long("command")
                .value_name("JSON")
                .help("Execute one JSON command and exit"),
        )
        .arg(
            Arg::new("human")
                .long("human")
                .help("Human-readable output instead of one JSON object per line")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("init-config")
                .long("init-config")
                .help("Write a default config file if none exists, then exit")
                .action(ArgAction::SetTrue),
        )
}
