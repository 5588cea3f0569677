//! # Lintfix Fix Command
//!
//! File: cli/src/commands/fix.rs
//!
//! ## Overview
//!
//! This module implements `lintfix fix`, which runs the project-local
//! linter in auto-fix mode against a single file:
//!
//! ```text
//! <root>/<linter.bin_dir>/<linter.tool> <linter.fix_args...> <file>
//! ```
//!
//! With the default configuration that is
//! `<root>/node_modules/.bin/eslint --fix <file>`.
//!
//! The linter runs with the session's resolved environment, with
//! `[linter.env]` from the configuration layered on top, and with the
//! project root as its working directory.
//!
//! ## Usage
//!
//! ```bash
//! # Fix a file in the project rooted at the current directory
//! lintfix fix src/a.js
//!
//! # Fix a file in another project
//! lintfix fix --root ~/code/app ~/code/app/src/a.js
//!
//! # Start the linter and return immediately
//! lintfix fix --detach src/a.js
//! ```
//!
//! By default the command waits for the linter (at most
//! `linter.timeout_secs`) and relays what it printed. A non-zero exit from
//! the linter only means problems remain that it could not fix, so it is
//! reported as a warning. `--detach` does not look at output or exit status.
//!
use crate::commands::Session;
use crate::common::process::{popen, SpawnRequest};
use crate::common::system::environment::Environment;
use crate::core::config::LinterConfig;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, info, warn};

/// Arguments for the 'fix' subcommand.
#[derive(Parser, Debug)]
pub struct FixArgs {
    /// The file to fix.
    file: PathBuf,

    /// Project root containing the linter. Defaults to the current directory.
    #[arg(long, short)]
    root: Option<PathBuf>,

    /// Return right after starting the linter, ignoring its output and exit status.
    #[arg(long)]
    detach: bool,
}

/// Handler function for the 'fix' subcommand.
pub async fn handle_fix(args: FixArgs, session: &Session) -> Result<()> {
    info!("Handling fix command...");
    debug!("Fix args: {:?}", args);

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let root = args
        .root
        .map(|root| absolutize(&cwd, root))
        .unwrap_or_else(|| cwd.clone());
    let file = absolutize(&cwd, args.file);

    let linter = &session.config.linter;
    let argv = fix_command(linter, &root, &file);
    let extra_env: Environment = linter.env.iter().collect();

    let mut request = SpawnRequest::new(argv, &session.environment)
        .extra_env(&extra_env)
        .current_dir(&root);
    if args.detach {
        request = request.stdout(Stdio::null()).stderr(Stdio::null());
    }
    let command_line = request.display();

    let handle = popen(request).with_context(|| {
        format!(
            "Could not start {} for project '{}'",
            linter.tool,
            root.display()
        )
    })?;

    if args.detach {
        let pid = handle.detach();
        info!("Started '{}' (pid {})", command_line, pid);
        return Ok(());
    }

    let timeout = linter.timeout();
    let output = tokio::task::spawn_blocking(move || handle.communicate(None, Some(timeout)))
        .await
        .context("Linter supervision task failed")?
        .with_context(|| format!("{} did not finish", linter.tool))?;

    io::stdout()
        .write_all(&output.stdout)
        .context("Failed to relay linter output")?;
    io::stderr()
        .write_all(&output.stderr)
        .context("Failed to relay linter output")?;

    if output.status.success() {
        info!("'{}' completed", command_line);
    } else {
        warn!(
            "'{}' exited with {}; remaining problems are listed above.",
            command_line, output.status
        );
    }
    Ok(())
}

/// The linter's command line for `file` in the project at `root`.
fn fix_command(linter: &LinterConfig, root: &Path, file: &Path) -> Vec<OsString> {
    let tool = root.join(&linter.bin_dir).join(&linter.tool);
    let mut argv = vec![tool.into_os_string()];
    argv.extend(linter.fix_args.iter().map(OsString::from));
    argv.push(file.as_os_str().to_owned());
    argv
}

fn absolutize(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;

    #[test]
    fn test_fix_args_parsing() {
        let args = FixArgs::try_parse_from(["fix", "src/a.js"]).unwrap();
        assert_eq!(args.file, PathBuf::from("src/a.js"));
        assert!(args.root.is_none());
        assert!(!args.detach);

        let args = FixArgs::try_parse_from(["fix", "--root", "/proj", "--detach", "a.js"]).unwrap();
        assert_eq!(args.root, Some(PathBuf::from("/proj")));
        assert!(args.detach);

        assert!(FixArgs::try_parse_from(["fix"]).is_err());
    }

    #[test]
    fn test_fix_command_default_eslint() {
        let argv = fix_command(
            &LinterConfig::default(),
            Path::new("/proj"),
            Path::new("/proj/src/a.js"),
        );
        assert_eq!(
            argv,
            vec![
                OsString::from("/proj/node_modules/.bin/eslint"),
                OsString::from("--fix"),
                OsString::from("/proj/src/a.js"),
            ]
        );
    }

    #[test]
    fn test_fix_command_custom_tool() {
        let linter = LinterConfig {
            tool: "prettier".into(),
            fix_args: vec!["--write".into(), "--log-level=warn".into()],
            ..Default::default()
        };
        let argv = fix_command(&linter, Path::new("/p"), Path::new("/p/x.ts"));
        assert_eq!(argv[0], OsString::from("/p/node_modules/.bin/prettier"));
        assert_eq!(argv[1..], [OsString::from("--write"), "--log-level=warn".into(), "/p/x.ts".into()]);
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(
            absolutize(Path::new("/proj"), PathBuf::from("src/a.js")),
            PathBuf::from("/proj/src/a.js")
        );
        assert_eq!(
            absolutize(Path::new("/proj"), PathBuf::from("/other/a.js")),
            PathBuf::from("/other/a.js")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_handle_fix_runs_project_linter() {
        use crate::common::system::test_support::write_script;

        let project = tempfile::tempdir().unwrap();
        let bin_dir = project.path().join("node_modules/.bin");
        std::fs::create_dir_all(&bin_dir).unwrap();
        write_script(&bin_dir, "eslint", "#!/bin/sh\nexit 1\n");

        let session = Session {
            config: Config::default(),
            environment: Environment::new(),
        };
        let args = FixArgs {
            file: project.path().join("src/a.js"),
            root: Some(project.path().to_path_buf()),
            detach: false,
        };
        // Remaining lint problems are not a failure of the command.
        assert!(handle_fix(args, &session).await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_handle_fix_missing_linter_is_an_error() {
        let project = tempfile::tempdir().unwrap();
        let session = Session {
            config: Config::default(),
            environment: Environment::new(),
        };
        let args = FixArgs {
            file: project.path().join("a.js"),
            root: Some(project.path().to_path_buf()),
            detach: true,
        };
        let err = handle_fix(args, &session).await.unwrap_err();
        assert!(err.to_string().contains("Could not start eslint"));
    }
}
