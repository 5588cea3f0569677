//! # Lintfix Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process/mod.rs
//!
//! ## Overview
//!
//! This module spawns external programs with an explicit environment and a
//! chosen output redirection, and returns a handle to the running child
//! without blocking.
//!
//! ## Architecture
//!
//! - **`StreamPolicy`**: which of the child's output streams are captured
//!   through a pipe. The other stream is sent to the null device, so a child
//!   writing to it never blocks on a full pipe.
//! - **`SpawnRequest`**: command line, base `Environment`, optional overlay
//!   environment, optional explicit stdout/stderr sinks and working directory.
//! - **`popen`**: turns a request into a running `ProcessHandle`. Stdin is
//!   always a pipe. The child sees exactly the merged environment, nothing
//!   inherited implicitly. Creation failures come back as
//!   `LintfixError::Spawn` after being logged.
//! - **`ProcessHandle`**: owns the child and its pipes. `communicate` feeds
//!   stdin, drains both pipes on reader threads and waits (optionally with a
//!   timeout, killing and reaping the child when it expires).
//! - **`runner`**: the synchronous `run_shell_cmd` built on top.
//! - **`platform`**: per-OS spawn flags (`CREATE_NO_WINDOW` on Windows).
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process::{popen, SpawnRequest, StreamPolicy};
//!
//! let handle = popen(
//!     SpawnRequest::new(["eslint", "--fix", "src/a.js"], &environment)
//!         .stream(StreamPolicy::StdoutOnly),
//! )?;
//! let output = handle.communicate(None, Some(Duration::from_secs(60)))?;
//! ```
//!
use crate::common::system::environment::Environment;
use crate::core::error::LintfixError;
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use wait_timeout::ChildExt;

mod platform;
mod runner;

pub use platform::{NativePlatform, SpawnPlatform};
pub use runner::{run_captured, run_shell_cmd};

/// Which output streams of a child are captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StreamPolicy {
    /// Capture stdout, discard stderr.
    #[value(name = "stdout")]
    StdoutOnly,
    /// Capture stderr, discard stdout.
    #[value(name = "stderr")]
    StderrOnly,
    /// Capture both streams.
    #[default]
    Both,
}

impl StreamPolicy {
    pub fn captures_stdout(self) -> bool {
        !matches!(self, StreamPolicy::StderrOnly)
    }

    pub fn captures_stderr(self) -> bool {
        !matches!(self, StreamPolicy::StdoutOnly)
    }
}

/// Everything needed to start one child process.
#[derive(Debug)]
pub struct SpawnRequest<'a> {
    argv: Vec<OsString>,
    stdout: Option<Stdio>,
    stderr: Option<Stdio>,
    stream: StreamPolicy,
    env: &'a Environment,
    extra_env: Option<&'a Environment>,
    current_dir: Option<PathBuf>,
}

impl<'a> SpawnRequest<'a> {
    /// `argv[0]` is the program, either a path or a name looked up in the
    /// `PATH` of `env`.
    pub fn new<I, S>(argv: I, env: &'a Environment) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            stdout: None,
            stderr: None,
            stream: StreamPolicy::default(),
            env,
            extra_env: None,
            current_dir: None,
        }
    }

    pub fn stream(mut self, policy: StreamPolicy) -> Self {
        self.stream = policy;
        self
    }

    /// Replaces the stdout pipe. Ignored under `StreamPolicy::StderrOnly`.
    pub fn stdout(mut self, sink: Stdio) -> Self {
        self.stdout = Some(sink);
        self
    }

    /// Replaces the stderr pipe. Ignored under `StreamPolicy::StdoutOnly`.
    pub fn stderr(mut self, sink: Stdio) -> Self {
        self.stderr = Some(sink);
        self
    }

    /// Variables applied over the base environment; they win on collision.
    pub fn extra_env(mut self, extra: &'a Environment) -> Self {
        self.extra_env = Some(extra);
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Space-joined command line, for log and error messages.
    pub fn display(&self) -> String {
        self.argv
            .iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn take_sinks(&mut self) -> (Stdio, Stdio) {
        match self.stream {
            StreamPolicy::Both => (
                self.stdout.take().unwrap_or_else(Stdio::piped),
                self.stderr.take().unwrap_or_else(Stdio::piped),
            ),
            StreamPolicy::StdoutOnly => (
                self.stdout.take().unwrap_or_else(Stdio::piped),
                Stdio::null(),
            ),
            StreamPolicy::StderrOnly => (
                Stdio::null(),
                self.stderr.take().unwrap_or_else(Stdio::piped),
            ),
        }
    }
}

/// Spawns a child process without waiting for it.
pub fn popen(request: SpawnRequest<'_>) -> Result<ProcessHandle, LintfixError> {
    popen_on(&NativePlatform::default(), request)
}

/// `popen` with an explicit platform strategy.
pub fn popen_on(
    platform: &dyn SpawnPlatform,
    mut request: SpawnRequest<'_>,
) -> Result<ProcessHandle, LintfixError> {
    let cmd = request.display();
    let (stdout, stderr) = request.take_sinks();

    let Some((program, args)) = request.argv.split_first() else {
        error!("Refusing to spawn an empty command line");
        return Err(LintfixError::Spawn {
            cmd,
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty command line"),
        });
    };

    let env = match request.extra_env {
        Some(extra) => request.env.overlay(extra),
        None => request.env.clone(),
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::piped())
        .stdout(stdout)
        .stderr(stderr)
        .env_clear()
        .envs(env.iter());
    if let Some(dir) = &request.current_dir {
        command.current_dir(dir);
    }
    platform.configure(&mut command);

    debug!("Spawning '{}' (streams: {:?})", cmd, request.stream);
    match command.spawn() {
        Ok(child) => {
            debug!("Spawned '{}' as pid {}", cmd, child.id());
            Ok(ProcessHandle { child, cmd })
        }
        Err(source) => {
            error!("Failed to spawn '{}': {}", cmd, source);
            Err(LintfixError::Spawn { cmd, source })
        }
    }
}

/// Exit status and captured bytes of a finished child.
#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// A running (or exited, not yet reaped) child process.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    cmd: String,
}

impl ProcessHandle {
    #[allow(dead_code)] // Only exercised by tests so far.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    #[allow(dead_code)] // For callers feeding the child incrementally.
    pub fn stdin(&mut self) -> Option<&mut ChildStdin> {
        self.child.stdin.as_mut()
    }

    /// `None` when stdout is not captured.
    #[allow(dead_code)] // For callers reading the child incrementally.
    pub fn stdout(&mut self) -> Option<&mut ChildStdout> {
        self.child.stdout.as_mut()
    }

    /// `None` when stderr is not captured.
    #[allow(dead_code)] // For callers reading the child incrementally.
    pub fn stderr(&mut self) -> Option<&mut ChildStderr> {
        self.child.stderr.as_mut()
    }

    #[allow(dead_code)] // For callers polling the child themselves.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>, LintfixError> {
        self.child.try_wait().map_err(|source| self.io_error(source))
    }

    /// Kills the child and reaps it.
    pub fn kill(&mut self) -> Result<(), LintfixError> {
        match self.child.kill() {
            Ok(()) => {}
            // Already exited.
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => {}
            Err(source) => return Err(self.io_error(source)),
        }
        self.child
            .wait()
            .map(|_| ())
            .map_err(|source| self.io_error(source))
    }

    /// Writes `input` to stdin, closes it and collects all output.
    ///
    /// `timeout` bounds the whole exchange, including draining the pipes
    /// after the child has exited: a background process started by the
    /// child can keep them open long after the child itself is gone. When
    /// the deadline passes the child is killed and reaped, and
    /// `LintfixError::Timeout` is returned. Output read so far is dropped;
    /// reader threads are left to finish on their own.
    pub fn communicate(
        mut self,
        input: Option<&[u8]>,
        timeout: Option<Duration>,
    ) -> Result<CapturedOutput, LintfixError> {
        let deadline = timeout.map(|limit| (Instant::now() + limit, limit));
        let stdout_reader = spawn_reader(self.child.stdout.take());
        let stderr_reader = spawn_reader(self.child.stderr.take());

        if let Some(mut stdin) = self.child.stdin.take() {
            if let Some(input) = input {
                if let Err(source) = stdin.write_all(input) {
                    // The child may legitimately exit without reading its input.
                    if source.kind() != io::ErrorKind::BrokenPipe {
                        self.terminate();
                        return Err(self.io_error(source));
                    }
                }
            }
        }

        let status = match deadline {
            Some((at, limit)) => {
                let remaining = at.saturating_duration_since(Instant::now());
                match self.child.wait_timeout(remaining) {
                    Ok(Some(status)) => status,
                    Ok(None) => {
                        self.terminate();
                        return Err(self.timeout_error(limit));
                    }
                    Err(source) => {
                        self.terminate();
                        return Err(self.io_error(source));
                    }
                }
            }
            None => self.child.wait().map_err(|source| self.io_error(source))?,
        };
        debug!("'{}' exited with {}", self.cmd, status);

        let stdout = self.collect(stdout_reader, deadline)?;
        let stderr = self.collect(stderr_reader, deadline)?;
        Ok(CapturedOutput {
            status,
            stdout,
            stderr,
        })
    }

    /// Lets the child run on without supervision and returns its pid.
    /// Stdin is closed and any captured pipes are dropped.
    pub fn detach(self) -> u32 {
        let pid = self.child.id();
        debug!("Detached from '{}' (pid {})", self.cmd, pid);
        pid
    }

    fn terminate(&mut self) {
        if let Err(e) = self.kill() {
            warn!("Failed to terminate '{}': {}", self.cmd, e);
        }
    }

    fn io_error(&self, source: io::Error) -> LintfixError {
        LintfixError::Io {
            cmd: self.cmd.clone(),
            source,
        }
    }

    fn timeout_error(&self, limit: Duration) -> LintfixError {
        LintfixError::Timeout {
            cmd: self.cmd.clone(),
            timeout: limit,
        }
    }

    /// Waits for a reader to hit end-of-file, no later than `deadline`.
    fn collect(
        &self,
        reader: Option<Reader>,
        deadline: Option<(Instant, Duration)>,
    ) -> Result<Vec<u8>, LintfixError> {
        let Some(reader) = reader else {
            return Ok(Vec::new());
        };
        let received = match deadline {
            Some((at, limit)) => {
                match reader.recv_timeout(at.saturating_duration_since(Instant::now())) {
                    Ok(result) => result,
                    Err(RecvTimeoutError::Timeout) => {
                        warn!(
                            "'{}' exited but its output is still held open; giving up",
                            self.cmd
                        );
                        return Err(self.timeout_error(limit));
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        Err(io::Error::other("pipe reader panicked"))
                    }
                }
            }
            None => reader
                .recv()
                .unwrap_or_else(|_| Err(io::Error::other("pipe reader panicked"))),
        };
        received.map_err(|source| self.io_error(source))
    }
}

type Reader = Receiver<io::Result<Vec<u8>>>;

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Reader> {
    pipe.map(|mut reader| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let result = reader.read_to_end(&mut buf).map(|_| buf);
            // The receiver is gone once the deadline has passed.
            let _ = tx.send(result);
        });
        rx
    })
}
