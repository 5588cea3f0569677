//! # Lintfix Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the subcommands of the lintfix CLI and the
//! `Session` they all run in.
//!
//! ## Architecture
//!
//! - `fix`: run the project-local linter's auto-fix against one file
//! - `path`: print the resolved PATH
//! - `environment`: print the resolved environment (`lintfix env`)
//! - `exec`: run any command with the resolved environment
//!
//! Each subcommand defines its own arguments struct and an async handler
//! taking those arguments and a `&Session`.
//!
//! The `Session` is built once in `main`, before dispatch. Building it runs
//! login-shell PATH discovery; afterwards the environment is only read.
//!
use crate::common::system::environment::Environment;
use crate::common::system::resolver::EnvironmentResolver;
use crate::common::ui::ConsoleNotifier;
use crate::core::config::Config;

/// `lintfix env`: prints the resolved environment.
pub mod environment;
/// `lintfix exec`: runs an arbitrary command with the resolved environment.
pub mod exec;
/// `lintfix fix`: runs the linter's auto-fix against a file.
pub mod fix;
/// `lintfix path`: prints the resolved PATH.
pub mod path;

/// State shared by every command for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    /// Environment every spawned tool runs with.
    pub environment: Environment,
}

impl Session {
    /// Resolves the environment from the inherited one. Never fails.
    pub fn initialize(config: Config) -> Self {
        let inherited = Environment::inherited();
        let environment =
            EnvironmentResolver::new(&config.environment, &ConsoleNotifier).resolve(&inherited);
        Self {
            config,
            environment,
        }
    }
}
