//! cli
//!
//! Command-line interface layer for containerkit.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers load the scene snapshot and the merged
//! configuration, call into [`crate::core`], print results, and save the
//! snapshot back when the command mutated it.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, ConfigAction, NamespaceArgs};

use anyhow::Result;
use std::path::PathBuf;

/// Execution context shared by all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Scene snapshot to operate on
    pub scene_path: PathBuf,
    /// Debug logging enabled
    pub verbose: bool,
    /// Logging suppressed
    pub quiet: bool,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    let ctx = Context {
        scene_path: cli.scene_path(),
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install the stderr log subscriber.
///
/// `--quiet` turns logging off, `--verbose` honours `RUST_LOG` and falls
/// back to `debug`; otherwise only warnings are shown.
fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
