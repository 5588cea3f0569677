//! # Lintfix Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities used by the command handlers, kept apart from the
//! command-specific logic (`commands::`) and the core infrastructure
//! (`core::`).
//!
//! - **`process`**: spawning external programs with an explicit environment,
//!   stream redirection policy and bounded waits.
//! - **`system`**: the environment snapshot and login-shell PATH discovery.
//! - **`ui`**: user-visible error messages.
//!
//! ```rust
//! use crate::common::process::{popen, SpawnRequest};
//! use crate::common::system::environment::Environment;
//! ```
//!

/// Spawning and supervising external processes.
pub mod process;
/// Environment snapshot and login-shell PATH discovery.
pub mod system;
/// User-facing error messages.
pub mod ui;
