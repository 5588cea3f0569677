//! # Lintfix Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements loading, merging, validation, and access to the
//! lintfix configuration. Two concerns are configurable:
//!
//! - `[linter]`: which project-local tool to run and how (`eslint --fix` by default).
//! - `[environment]`: how the login-shell PATH is discovered and what the
//!   heuristic fallback appends when discovery is impossible.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.lintfix.toml` in current directory or ancestors
//! 2. User-specific `config.toml` in the platform config dir
//!    (e.g. `~/.config/lintfix/config.toml`), or the file named by
//!    `--config` / `LINTFIX_CONFIG`
//! 3. Default values defined in the code
//!
//! Paths in `environment.fallback_paths` and `environment.shell` support `~`.
//!
//! ## Examples
//!
//! ```toml
//! [linter]
//! tool = "eslint"
//! bin_dir = "node_modules/.bin"
//! fix_args = ["--fix"]
//!
//! [linter.env]
//! NODE_OPTIONS = "--max-old-space-size=4096"
//!
//! [environment]
//! shell_timeout_secs = 10
//! fallback_paths = ["/usr/bin", "/usr/local/bin", "/opt/homebrew/bin"]
//! ```
//!
//! The configuration is loaded once per process in `main` and passed to the
//! modules that need it.
//!
use crate::core::error::{LintfixError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub linter: LinterConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

/// Settings for the project-local tool run by `lintfix fix`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LinterConfig {
    /// Executable name, looked up in `bin_dir` under the project root.
    #[serde(default = "default_tool")]
    pub tool: String,
    /// Directory holding the tool, relative to the project root.
    #[serde(default = "default_bin_dir")]
    pub bin_dir: String,
    /// Arguments placed before the file path.
    #[serde(default = "default_fix_args")]
    pub fix_args: Vec<String>,
    /// Upper bound on how long `lintfix fix` waits for the tool.
    #[serde(default = "default_linter_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra variables layered over the resolved environment for the tool.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// Settings for login-shell PATH discovery.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Shell to query instead of `$SHELL`.
    pub shell: Option<String>,
    #[serde(default = "default_shell_timeout_secs")]
    pub shell_timeout_secs: u64,
    /// Directories appended to the inherited PATH when discovery is skipped.
    #[serde(default = "default_fallback_paths")]
    pub fallback_paths: Vec<String>,
    /// Use the heuristic PATH when the shell output cannot be parsed.
    #[serde(default = "default_true")]
    pub fallback_on_parse_failure: bool,
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            bin_dir: default_bin_dir(),
            fix_args: default_fix_args(),
            timeout_secs: default_linter_timeout_secs(),
            env: HashMap::new(),
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            shell: None,
            shell_timeout_secs: default_shell_timeout_secs(),
            fallback_paths: default_fallback_paths(),
            fallback_on_parse_failure: true,
        }
    }
}

impl LinterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl EnvironmentConfig {
    pub fn shell_timeout(&self) -> Duration {
        Duration::from_secs(self.shell_timeout_secs)
    }
}

fn default_tool() -> String {
    "eslint".to_string()
}
fn default_bin_dir() -> String {
    "node_modules/.bin".to_string()
}
fn default_fix_args() -> Vec<String> {
    vec!["--fix".to_string()]
}
fn default_linter_timeout_secs() -> u64 {
    60
}
fn default_shell_timeout_secs() -> u64 {
    10
}
fn default_fallback_paths() -> Vec<String> {
    if cfg!(windows) {
        Vec::new()
    } else {
        vec!["/usr/bin".to_string(), "/usr/local/bin".to_string()]
    }
}
fn default_true() -> bool {
    true
}

const PROJECT_CONFIG_FILENAME: &str = ".lintfix.toml";

/// Loads, merges, expands and validates the configuration.
///
/// `user_config_override` replaces the platform user config file when set.
pub fn load_config(user_config_override: Option<&Path>) -> Result<Config> {
    let user_config = match user_config_override {
        Some(path) => {
            info!("Loading user configuration from override: {}", path.display());
            Some(load_config_from_path(path)?)
        }
        None => load_user_config()?,
    };
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let project_config = match find_project_config_path(&current_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            Some(load_config_from_path(&path)?)
        }
        None => {
            debug!("No project configuration file (.lintfix.toml) found in current directory or ancestors.");
            None
        }
    };
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    let Some(proj_dirs) = ProjectDirs::from("org", "lintfix", "lintfix") else {
        debug!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

/// Walks from `start` towards the filesystem root looking for `.lintfix.toml`,
/// giving up at the first directory that contains `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let project_config = dir.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if dir.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                dir.display()
            );
            return None;
        }
    }
    None
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();
    merged.linter.tool = if project_cfg.linter.tool != default_tool() {
        project_cfg.linter.tool
    } else {
        user.linter.tool
    };
    merged.linter.bin_dir = if project_cfg.linter.bin_dir != default_bin_dir() {
        project_cfg.linter.bin_dir
    } else {
        user.linter.bin_dir
    };
    merged.linter.fix_args = if project_cfg.linter.fix_args != default_fix_args() {
        project_cfg.linter.fix_args
    } else {
        user.linter.fix_args
    };
    merged.linter.timeout_secs =
        if project_cfg.linter.timeout_secs != default_linter_timeout_secs() {
            project_cfg.linter.timeout_secs
        } else {
            user.linter.timeout_secs
        };
    // Variables combine; the project wins on collision.
    merged.linter.env = user.linter.env;
    merged.linter.env.extend(project_cfg.linter.env);

    merged.environment.shell = project_cfg.environment.shell.or(user.environment.shell);
    merged.environment.shell_timeout_secs =
        if project_cfg.environment.shell_timeout_secs != default_shell_timeout_secs() {
            project_cfg.environment.shell_timeout_secs
        } else {
            user.environment.shell_timeout_secs
        };
    merged.environment.fallback_paths =
        if project_cfg.environment.fallback_paths != default_fallback_paths() {
            project_cfg.environment.fallback_paths
        } else {
            user.environment.fallback_paths
        };
    merged.environment.fallback_on_parse_failure = project_cfg
        .environment
        .fallback_on_parse_failure
        && user.environment.fallback_on_parse_failure;
    merged
}

fn expand_config_paths(config: &mut Config) {
    debug!("Expanding paths in configuration...");
    if let Some(shell) = config.environment.shell.as_mut() {
        *shell = shellexpand::tilde(shell).into_owned();
    }
    for dir in &mut config.environment.fallback_paths {
        *dir = shellexpand::tilde(dir).into_owned();
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if config.linter.tool.trim().is_empty() {
        return Err(anyhow!(LintfixError::Config(
            "linter.tool cannot be empty.".to_string()
        )));
    }
    if Path::new(&config.linter.bin_dir).is_absolute() {
        return Err(anyhow!(LintfixError::Config(format!(
            "linter.bin_dir '{}' must be relative to the project root.",
            config.linter.bin_dir
        ))));
    }
    if config.linter.timeout_secs == 0 || config.environment.shell_timeout_secs == 0 {
        return Err(anyhow!(LintfixError::Config(
            "Timeouts must be at least one second.".to_string()
        )));
    }
    if let Some(shell) = &config.environment.shell {
        if shell.trim().is_empty() {
            return Err(anyhow!(LintfixError::Config(
                "environment.shell cannot be an empty string.".to_string()
            )));
        }
    }
    Ok(())
}
