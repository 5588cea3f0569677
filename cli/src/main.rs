//! # Lintfix Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the lintfix CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading configuration and resolving the environment once per run
//! - Routing execution to appropriate command handlers
//!
//! ## Architecture
//!
//! - Each top-level command (`fix`, `path`, `env`, `exec`) is a variant in the `Commands` enum
//! - Commands are mapped to handler functions in their respective modules
//! - Every handler receives the same `Session`, built before dispatch
//! - All errors are propagated to this level for consistent handling
//!
//! ## Examples
//!
//! ```bash
//! # Fix a file with the project's eslint
//! lintfix fix src/index.js
//!
//! # See which PATH the linter gets, and how it was found
//! lintfix -vv path --list
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Load configuration and build the `Session`
//! 4. Route to the command handler
//! 5. Format and display any errors that occur
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Subcommand logic (fix, path, env, exec)
mod common; // Shared utilities (process spawning, environment, ui)
mod core; // Core infrastructure (errors, config)

use crate::commands::Session;

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "lintfix",
    about = "Run your project's linter auto-fix with your login shell's PATH",
    long_about = "Runs a project-local linter (eslint by default) in fix mode against a file.\n\
                  Tools are found using the PATH your login shell would set up, even when\n\
                  lintfix itself was started from a GUI or service with a minimal environment.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Use this user configuration file instead of the default location.
    #[arg(long, global = true, env = "LINTFIX_CONFIG")]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Run the linter's auto-fix against a file.
    #[command(alias = "f")]
    Fix(commands::fix::FixArgs),
    /// Print the resolved PATH.
    Path(commands::path::PathArgs),
    /// Print the resolved environment.
    #[command(name = "env")]
    Env(commands::environment::EnvArgs),
    /// Run a command with the resolved environment.
    Exec(commands::exec::ExecArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let config = match core::config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    // Shell discovery blocks for up to `environment.shell_timeout_secs`.
    let session = match tokio::task::spawn_blocking(move || Session::initialize(config)).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Environment resolution task failed: {:?}", e);
            eprintln!("Error: environment resolution failed: {}", e);
            std::process::exit(1);
        }
    };

    let command_result = match cli.command {
        Commands::Fix(args) => commands::fix::handle_fix(args, &session).await,
        Commands::Path(args) => commands::path::handle_path(args, &session).await,
        Commands::Env(args) => commands::environment::handle_env(args, &session).await,
        Commands::Exec(args) => commands::exec::handle_exec(args, &session).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
