// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Besides the usual long/short flags, the classic slash switches
//! (`/A`, `/E`, `/I`, `/T`, `/W`, `/?`) are accepted and rewritten to their
//! long equivalents before clap sees them.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum};

/// Command-line arguments for `apprelay`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "apprelay",
    version,
    about = "Launch a program, wait until it is really done, then launch the next one.",
    long_about = None
)]
pub struct CliArgs {
    /// Primary command line (path plus arguments, path may be quoted).
    #[arg(short = 'a', long, value_name = "CMD", allow_hyphen_values = true)]
    pub primary: Option<String>,

    /// Follow-up command line, launched once the primary is done.
    #[arg(short = 'e', long, value_name = "CMD", allow_hyphen_values = true)]
    pub followup: Option<String>,

    /// Icon shown by the status surface (.ico file, or any file whose
    /// associated icon should be used).
    #[arg(short = 'i', long, value_name = "PATH")]
    pub icon: Option<PathBuf>,

    /// Title shown in the status text.
    #[arg(short = 't', long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Treat the primary as done once its windows appeared and then all
    /// disappeared, in addition to watching its exit.
    #[arg(short = 'w', long)]
    pub windowed: bool,

    /// Optional TOML config file with a `[relay]` section. Flags given on the
    /// command line win over values from the file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Status refresh / window poll period in milliseconds.
    #[arg(long, value_name = "MS")]
    pub tick_ms: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `APPRELAY_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse_from()` over the process
/// arguments, with legacy switches normalised.
pub fn parse() -> CliArgs {
    CliArgs::parse_from(normalize_legacy_args(std::env::args_os()))
}

/// Rewrite slash switches to long flags. Matching is case-insensitive and only
/// applies to whole tokens, so `/A` becomes `--primary` but `/Applications`
/// is left alone.
pub fn normalize_legacy_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.to_str().and_then(legacy_switch) {
            Some(long) => OsString::from(long),
            None => arg,
        })
        .collect()
}

fn legacy_switch(token: &str) -> Option<&'static str> {
    match token.to_ascii_uppercase().as_str() {
        "/A" => Some("--primary"),
        "/E" => Some("--followup"),
        "/I" => Some("--icon"),
        "/T" => Some("--title"),
        "/W" => Some("--windowed"),
        "/?" => Some("--help"),
        _ => None,
    }
}

/// Print the long help text (used when no primary command was supplied).
pub fn print_help() -> std::io::Result<()> {
    CliArgs::command().print_long_help()
}
