//! # Synchronous Command Runner
//!
//! File: cli/src/common/process/runner.rs
//!
//! Runs a command to completion with a time limit and returns what it wrote
//! to stdout. Used for login-shell PATH discovery, so callers hand it the
//! environment this process inherited rather than the resolved one.
//!
use super::{popen, CapturedOutput, SpawnRequest};
use crate::common::system::environment::Environment;
use crate::core::error::LintfixError;
use std::ffi::OsString;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs `argv` and waits at most `timeout` for it, capturing both streams.
pub fn run_captured<I, S>(
    argv: I,
    env: &Environment,
    timeout: Duration,
) -> Result<CapturedOutput, LintfixError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    popen(SpawnRequest::new(argv, env))?.communicate(None, Some(timeout))
}

/// Runs `argv` and returns its stdout.
///
/// Every failure (spawn error, timeout, I/O error) is logged and yields an
/// empty buffer. The exit status is not inspected.
pub fn run_shell_cmd<I, S>(argv: I, env: &Environment, timeout: Duration) -> Vec<u8>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    match run_captured(argv, env, timeout) {
        Ok(output) => {
            if !output.status.success() {
                debug!("Shell command exited with {}", output.status);
            }
            output.stdout
        }
        Err(LintfixError::Timeout { cmd, timeout }) => {
            warn!(
                "shell timed out after {} seconds, executing {}",
                timeout.as_secs(),
                cmd
            );
            Vec::new()
        }
        Err(e) => {
            warn!("Shell command failed: {}", e);
            Vec::new()
        }
    }
}
