//! # Lintfix System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Host-environment inspection: what environment spawned tools should run
//! with, and in particular which `PATH` the user's login shell would give
//! them.
//!
//! - **`environment`**: the `Environment` and `PathString` value types.
//! - **`shell`**: the sentinel protocol and `ShellPathExtractor`, which runs
//!   bash, zsh or fish in login mode and parses the PATH they print.
//! - **`resolver`**: `EnvironmentResolver`, which picks the shell, falls
//!   back to a heuristic PATH when needed and produces the snapshot used by
//!   every spawn for the rest of the run.
//!
//! ```rust,ignore
//! use crate::common::system::{environment::Environment, resolver::EnvironmentResolver};
//!
//! let inherited = Environment::inherited();
//! let environment = EnvironmentResolver::new(&cfg.environment, &ConsoleNotifier).resolve(&inherited);
//! ```
//!
pub mod environment;
pub mod resolver;
pub mod shell;
