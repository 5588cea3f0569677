//! # Lintfix Fix Integration Tests
//!
//! File: cli/tests/fix.rs
//!
//! Runs `lintfix fix` against a sandbox project with a fake
//! `node_modules/.bin/eslint` that reports how it was invoked.
//!
#![cfg(unix)]

mod common;

use common::{write_script, Sandbox};
use predicates::prelude::*;

const FAKE_ESLINT: &str = "#!/bin/sh\n\
    echo \"args: $*\"\n\
    echo \"cwd: $(pwd)\"\n\
    echo \"mode: ${LINTFIX_MODE:-unset}\"\n";

fn project_with_linter(script: &str) -> Sandbox {
    let sandbox = Sandbox::new();
    let bin_dir = sandbox.path().join("node_modules/.bin");
    std::fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");
    write_script(&bin_dir, "eslint", script);
    std::fs::create_dir_all(sandbox.path().join("src")).expect("Failed to create src");
    std::fs::write(sandbox.path().join("src/a.js"), "var a = 1\n").expect("Failed to write a.js");
    sandbox
}

#[test]
fn test_fix_runs_project_eslint() {
    let sandbox = project_with_linter(FAKE_ESLINT);
    sandbox
        .cmd()
        .args(["fix", "src/a.js"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("args: --fix ")
                .and(predicate::str::contains("/src/a.js"))
                .and(predicate::str::contains("mode: unset")),
        );
}

#[test]
fn test_fix_applies_linter_env() {
    let sandbox = project_with_linter(FAKE_ESLINT);
    sandbox.project_config("[linter.env]\nLINTFIX_MODE = \"ci\"\n");
    sandbox
        .cmd()
        .env("LINTFIX_MODE", "inherited")
        .args(["fix", "src/a.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode: ci"));
}

#[test]
fn test_fix_with_root_from_elsewhere() {
    let sandbox = project_with_linter(FAKE_ESLINT);
    let elsewhere = tempfile::tempdir().unwrap();
    let mut cmd = sandbox.cmd();
    cmd.current_dir(elsewhere.path())
        .arg("fix")
        .arg("--root")
        .arg(sandbox.path())
        .arg(sandbox.path().join("src/a.js"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cwd: ").and(predicate::str::contains("args: --fix")));
}

#[test]
fn test_fix_custom_args() {
    let sandbox = project_with_linter(FAKE_ESLINT);
    sandbox.project_config("[linter]\nfix_args = [\"--fix\", \"--quiet\"]\n");
    sandbox
        .cmd()
        .args(["fix", "src/a.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("args: --fix --quiet "));
}

#[test]
fn test_fix_remaining_problems_are_a_warning() {
    let sandbox = project_with_linter("#!/bin/sh\necho '1 problem' >&2\nexit 1\n");
    sandbox
        .cmd()
        .args(["fix", "src/a.js"])
        .assert()
        .success()
        .stderr(
            predicate::str::contains("1 problem")
                .and(predicate::str::contains("remaining problems")),
        );
}

#[test]
fn test_fix_without_linter_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["fix", "a.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not start eslint"));
}

#[test]
fn test_fix_timeout() {
    let sandbox = project_with_linter("#!/bin/sh\nexec sleep 30\n");
    sandbox.project_config("[linter]\ntimeout_secs = 1\n");
    sandbox
        .cmd()
        .args(["fix", "src/a.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("eslint did not finish"));
}

#[test]
fn test_fix_detach() {
    let sandbox = project_with_linter("#!/bin/sh\ntouch \"$(pwd)/ran\"\n");
    sandbox
        .cmd()
        .args(["fix", "--detach", "src/a.js"])
        .assert()
        .success();
    let marker = sandbox.path().join("ran");
    for _ in 0..50 {
        if marker.exists() {
            return;
        }
        std::thread::sleep(std::time::Duration::from_millis(100));
    }
    panic!("detached linter never ran");
}
