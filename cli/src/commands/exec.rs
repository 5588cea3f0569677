//! # Lintfix Exec Command
//!
//! File: cli/src/commands/exec.rs
//!
//! ## Overview
//!
//! `lintfix exec` runs an arbitrary command with the resolved environment,
//! which is the quickest way to check whether a tool is found the same way
//! `lintfix fix` would find it.
//!
//! ```bash
//! # Which node would the linter get?
//! lintfix exec -- node --version
//!
//! # Only keep stderr, give up after 5 seconds
//! lintfix exec --stream stderr --timeout 5 -- npx eslint --print-config a.js
//! ```
//!
//! Captured streams are relayed to this process's stdout/stderr once the
//! command finishes. A non-zero exit status is reported as an error.
//!
use crate::commands::Session;
use crate::common::process::{popen, StreamPolicy, SpawnRequest};
use crate::core::error::{LintfixError, Result};
use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info};

/// Arguments for the 'exec' subcommand.
#[derive(Parser, Debug)]
pub struct ExecArgs {
    /// Output streams to capture; the other one is discarded.
    #[arg(long, value_enum, default_value_t = StreamPolicy::Both)]
    stream: StreamPolicy,

    /// Kill the command if it runs longer than this many seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Text written to the command's stdin before it is closed.
    #[arg(long)]
    input: Option<String>,

    /// The command and its arguments.
    #[arg(required = true, last = true)]
    command: Vec<String>,
}

pub async fn handle_exec(args: ExecArgs, session: &Session) -> Result<()> {
    info!("Handling exec command...");
    debug!("Exec args: {:?}", args);

    let request = SpawnRequest::new(&args.command, &session.environment).stream(args.stream);
    let cmd = request.display();
    let handle = popen(request).with_context(|| format!("Could not start '{}'", cmd))?;

    let input = args.input.map(String::into_bytes);
    let timeout = args.timeout.map(Duration::from_secs);
    let output = tokio::task::spawn_blocking(move || handle.communicate(input.as_deref(), timeout))
        .await
        .context("Command supervision task failed")?
        .with_context(|| format!("'{}' did not complete", cmd))?;

    io::stdout()
        .write_all(&output.stdout)
        .context("Failed to relay stdout")?;
    io::stderr()
        .write_all(&output.stderr)
        .context("Failed to relay stderr")?;

    if !output.status.success() {
        anyhow::bail!(LintfixError::ExternalCommand {
            cmd,
            status: output.status.to_string(),
        });
    }
    Ok(())
}
