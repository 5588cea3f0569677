//! # Lintfix Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout lintfix. The failures
//! the environment and process layers can produce are modelled explicitly so
//! callers are forced to decide how to absorb each one:
//!
//! - `Spawn`: a child process could not be created (bad path, permissions).
//! - `Timeout`: a child did not finish within its bound and was killed.
//! - `PathParse`: the login shell's output did not contain the PATH sentinels.
//! - `UnsupportedShell`: the user's shell is not one we know how to query.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `LintfixError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! Low-level functions that sit on the "never crash the host" boundary return
//! `std::result::Result<T, LintfixError>` so the failure kind can be matched on;
//! command handlers use the `anyhow`-based alias and add context.
//!
//! ## Examples
//!
//! ```rust
//! match process::popen(request) {
//!     Ok(handle) => { /* interact with the child */ }
//!     Err(e @ LintfixError::Spawn { .. }) => tracing::error!("{}", e),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
use std::time::Duration;
use thiserror::Error;

/// Custom error type for lintfix.
#[derive(Error, Debug)]
pub enum LintfixError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to spawn '{cmd}': {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{cmd}' timed out after {} seconds", .timeout.as_secs())]
    Timeout { cmd: String, timeout: Duration },

    #[error("Could not parse shell PATH output:\n{output}")]
    PathParse { output: String },

    #[error("Using an unsupported shell: {shell}")]
    UnsupportedShell { shell: String },

    #[error("External command failed: {cmd}, Status: {status}")]
    ExternalCommand { cmd: String, status: String },

    #[error("I/O error while talking to '{cmd}': {source}")]
    Io {
        cmd: String,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
