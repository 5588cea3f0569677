//! # Lintfix CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and is compiled as its own test crate running the
//! `lintfix` binary.
//!
//! Every command built by `lintfix_cmd` is isolated from the machine it runs
//! on: `$SHELL` is removed so no real login shell is started, and
//! `LINTFIX_CONFIG` points at an empty file so no user configuration is read.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// Prints a banner, evaluates its `-c` script with a known PATH, prints a footer.
pub const FAKE_BASH: &str = "#!/bin/sh\n\
    PATH=/fake/one:/fake/two\n\
    echo 'Last login: Mon Oct 12 09:00:00 on ttys001'\n\
    eval \"$3\"\n\
    echo 'You have new mail.'\n";

/// A login shell whose output never contains the sentinels.
pub const BROKEN_BASH: &str = "#!/bin/sh\necho 'compinit: insecure directories'\n";

/// A test sandbox: a working directory plus an empty user config file.
pub struct Sandbox {
    pub dir: TempDir,
    config_home: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create sandbox dir");
        let config_home = tempfile::tempdir().expect("Failed to create config dir");
        std::fs::write(config_home.path().join("config.toml"), "")
            .expect("Failed to write user config");
        Self { dir, config_home }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn user_config(&self) -> std::path::PathBuf {
        self.config_home.path().join("config.toml")
    }

    /// Writes `.lintfix.toml` at the sandbox root.
    pub fn project_config(&self, toml: &str) {
        std::fs::write(self.path().join(".lintfix.toml"), toml)
            .expect("Failed to write project config");
    }

    /// A `lintfix` command running inside the sandbox.
    pub fn cmd(&self) -> Command {
        let mut cmd = lintfix_cmd();
        cmd.current_dir(self.path())
            .env("LINTFIX_CONFIG", self.user_config())
            .env_remove("SHELL")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// Helper creating an `assert_cmd::Command` for the compiled `lintfix` binary.
pub fn lintfix_cmd() -> Command {
    Command::cargo_bin("lintfix").expect("Failed to find lintfix binary for testing")
}

/// Writes an executable script called `name` into `dir` and returns its path.
///
/// A child `sh` writes the file so this (multi-threaded) test process never
/// holds a writable descriptor to something it later executes (ETXTBSY).
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, script: &str) -> String {
    let path = dir.join(name);
    let status = std::process::Command::new("/bin/sh")
        .arg("-c")
        .arg("printf '%s' \"$1\" > \"$2\" && chmod 755 \"$2\"")
        .arg("sh")
        .arg(script)
        .arg(&path)
        .status()
        .expect("Failed to write script");
    assert!(status.success());
    path.to_string_lossy().into_owned()
}
