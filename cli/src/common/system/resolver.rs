//! # Environment Resolution
//!
//! File: cli/src/common/system/resolver.rs
//!
//! ## Overview
//!
//! Produces the single `Environment` every spawned tool runs with. It is the
//! inherited environment with `PATH` replaced by the best PATH we can find:
//!
//! 1. Take the shell from `environment.shell` in the configuration, else
//!    from `$SHELL`. Without one, go to step 3.
//! 2. For bash, zsh and fish, ask the login shell for its PATH (see
//!    `shell`). Other shells are logged as unsupported.
//! 3. Otherwise guess: the inherited PATH with each configured fallback
//!    directory appended when missing.
//!
//! When the login shell answers but its output cannot be parsed the user is
//! shown an error message, since no linter is likely to be found. The
//! heuristic PATH is then used unless `fallback_on_parse_failure` is off, in
//! which case PATH is left empty.
//!
//! Resolution never fails. `main` runs it once and passes the result down.
//!
use super::environment::{Environment, PathString, PATH_DELIMITER, PATH_KEY};
use super::shell::{ShellFamily, ShellPathExtractor};
use crate::common::ui::Notifier;
use crate::core::config::EnvironmentConfig;
use crate::core::error::LintfixError;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Variable naming the user's login shell.
pub const SHELL_VAR: &str = "SHELL";

const PATH_PARSE_MESSAGE: &str = "lintfix could not determine your shell PATH. \
    It is unlikely that any linters will work.\n\n\
    Run `lintfix -vv path` to see the raw shell output, and check that your \
    shell profile does not fail or wait for input when started with `-l -c`.";

pub struct EnvironmentResolver<'a> {
    config: &'a EnvironmentConfig,
    notifier: &'a dyn Notifier,
}

impl<'a> EnvironmentResolver<'a> {
    pub fn new(config: &'a EnvironmentConfig, notifier: &'a dyn Notifier) -> Self {
        Self { config, notifier }
    }

    /// `inherited` with `PATH` set to the resolved value.
    pub fn resolve(&self, inherited: &Environment) -> Environment {
        let path = self.resolve_path(inherited);
        info!("Resolved PATH: {}", path);
        let mut environment = inherited.clone();
        environment.set(PATH_KEY, path.to_string());
        environment
    }

    pub fn resolve_path(&self, inherited: &Environment) -> PathString {
        if cfg!(windows) {
            debug!("Login shell PATH discovery is not used on Windows.");
            return self.fallback_path(inherited);
        }

        let Some(shell_path) = self.shell_path(inherited) else {
            debug!("No login shell configured and ${} is unset; guessing PATH.", SHELL_VAR);
            return self.fallback_path(inherited);
        };

        match self.query_shell(&shell_path, inherited) {
            Ok(path) => path,
            Err(e @ LintfixError::UnsupportedShell { .. }) => {
                info!("{}", e);
                self.fallback_path(inherited)
            }
            Err(e @ LintfixError::PathParse { .. }) => {
                error!("{}", e);
                self.notifier.error_message(PATH_PARSE_MESSAGE);
                if self.config.fallback_on_parse_failure {
                    self.fallback_path(inherited)
                } else {
                    PathString::default()
                }
            }
            Err(e) => {
                warn!("Login shell query failed: {}", e);
                self.fallback_path(inherited)
            }
        }
    }

    /// The inherited PATH with missing fallback directories appended.
    pub fn fallback_path(&self, inherited: &Environment) -> PathString {
        let mut path = PathString::split(inherited.path().unwrap_or_default(), PATH_DELIMITER);
        path.append_missing(&self.config.fallback_paths);
        path
    }

    fn shell_path(&self, inherited: &Environment) -> Option<String> {
        self.config
            .shell
            .clone()
            .or_else(|| inherited.get(SHELL_VAR).map(str::to_string))
            .filter(|shell| !shell.trim().is_empty())
    }

    fn query_shell(
        &self,
        shell_path: &str,
        inherited: &Environment,
    ) -> Result<PathString, LintfixError> {
        let name = Path::new(shell_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let family = ShellFamily::from_shell_name(&name)
            .ok_or(LintfixError::UnsupportedShell { shell: name })?;
        ShellPathExtractor::new(inherited, self.config.shell_timeout()).extract(shell_path, family)
    }
}
