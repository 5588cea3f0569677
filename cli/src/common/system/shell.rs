//! # Login Shell PATH Extraction
//!
//! File: cli/src/common/system/shell.rs
//!
//! ## Overview
//!
//! A process started from a desktop launcher inherits a minimal environment,
//! so tools installed through the user's profile files are not on its `PATH`.
//! This module recovers the `PATH` the user's login shell would use by
//! running the shell in login mode and asking it to print the variable.
//!
//! ## Sentinel Protocol
//!
//! Shells may print banners, MOTD text or update notices while starting, so
//! the payload is wrapped in a sentinel token and the output is parsed with
//! the grammar
//!
//! ```text
//! PREFIX_NOISE SENTINEL PAYLOAD SENTINEL SUFFIX_NOISE
//! ```
//!
//! - bash/zsh print `${PATH}` as-is (already colon-delimited).
//! - fish keeps `PATH` as a list, so each entry is printed on its own line.
//!
//! Either way the result is a `PathString` in search order.
//!
use super::environment::{Environment, PathString};
use crate::common::process::run_shell_cmd;
use crate::core::error::LintfixError;
use std::time::Duration;
use tracing::debug;

/// Marker surrounding the PATH payload in shell output.
pub const SENTINEL: &str = "__LINTFIX_PATH_5f2c9e__";

/// Shell syntaxes we know how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFamily {
    /// bash and zsh.
    Posix,
    Fish,
}

impl ShellFamily {
    /// Maps a shell executable's base name to its family.
    pub fn from_shell_name(name: &str) -> Option<Self> {
        match name {
            "bash" | "zsh" => Some(ShellFamily::Posix),
            "fish" => Some(ShellFamily::Fish),
            _ => None,
        }
    }

    /// The `-c` script printing the sentinel-wrapped PATH.
    pub fn script(self) -> String {
        match self {
            ShellFamily::Posix => format!("echo \"{SENTINEL}${{PATH}}{SENTINEL}\""),
            ShellFamily::Fish => format!(
                "echo \"{SENTINEL}\"; for p in $PATH; echo $p; end; echo \"{SENTINEL}\""
            ),
        }
    }

    /// Full command line launching `shell_path` as a login shell.
    pub fn command(self, shell_path: &str) -> Vec<String> {
        vec![
            shell_path.to_string(),
            "-l".to_string(),
            "-c".to_string(),
            self.script(),
        ]
    }
}

/// Extracts the PATH payload from raw shell output.
///
/// Two sentinel occurrences are required. Whitespace around the payload is
/// trimmed; an empty payload is an empty PATH.
pub fn parse_path_output(raw: &[u8], family: ShellFamily) -> Result<PathString, LintfixError> {
    let text = String::from_utf8_lossy(raw);
    let mut parts = text.splitn(3, SENTINEL);
    let _prefix_noise = parts.next();

    match (parts.next(), parts.next()) {
        (Some(payload), Some(_suffix_noise)) => {
            let payload = payload.trim();
            Ok(match family {
                ShellFamily::Posix => PathString::split(payload, ':'),
                ShellFamily::Fish => payload.lines().collect(),
            })
        }
        _ => Err(LintfixError::PathParse {
            output: if text.is_empty() {
                "<empty>".to_string()
            } else {
                text.to_string()
            },
        }),
    }
}

/// Runs a login shell and parses its PATH.
#[derive(Debug, Clone, Copy)]
pub struct ShellPathExtractor<'a> {
    inherited: &'a Environment,
    timeout: Duration,
}

impl<'a> ShellPathExtractor<'a> {
    /// `inherited` is the environment the shell is started with. It must not
    /// be the resolved one, which is what this extraction produces.
    pub fn new(inherited: &'a Environment, timeout: Duration) -> Self {
        Self { inherited, timeout }
    }

    pub fn extract(&self, shell_path: &str, family: ShellFamily) -> Result<PathString, LintfixError> {
        let argv = family.command(shell_path);
        debug!("Querying login shell PATH with {:?}", argv);
        let output = run_shell_cmd(argv, self.inherited, self.timeout);
        let path = parse_path_output(&output, family)?;
        debug!("Login shell reported {} PATH entries", path.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(payload: &str) -> String {
        format!("{SENTINEL}{payload}{SENTINEL}")
    }

    #[test]
    fn test_family_from_name() {
        assert_eq!(ShellFamily::from_shell_name("bash"), Some(ShellFamily::Posix));
        assert_eq!(ShellFamily::from_shell_name("zsh"), Some(ShellFamily::Posix));
        assert_eq!(ShellFamily::from_shell_name("fish"), Some(ShellFamily::Fish));
        assert_eq!(ShellFamily::from_shell_name("tcsh"), None);
        assert_eq!(ShellFamily::from_shell_name("sh"), None);
    }

    #[test]
    fn test_scripts() {
        assert_eq!(
            ShellFamily::Posix.script(),
            format!("echo \"{SENTINEL}${{PATH}}{SENTINEL}\"")
        );
        let fish = ShellFamily::Fish.script();
        assert!(fish.contains("for p in $PATH; echo $p; end"));
        assert_eq!(fish.matches(SENTINEL).count(), 2);

        let argv = ShellFamily::Posix.command("/bin/zsh");
        assert_eq!(&argv[..3], ["/bin/zsh", "-l", "-c"]);
    }

    #[test]
    fn test_posix_entries_in_order() {
        for dirs in [
            vec![],
            vec!["/usr/bin"],
            vec!["/opt/homebrew/bin", "/usr/bin", "/bin"],
            vec!["/a", "/b", "/a", "/c"],
        ] {
            let raw = wrap(&dirs.join(":"));
            let path = parse_path_output(raw.as_bytes(), ShellFamily::Posix).unwrap();
            assert_eq!(path.entries(), dirs.as_slice());
            let rejoined = path.join(':');
            let resplit: Vec<&str> = if rejoined.is_empty() {
                Vec::new()
            } else {
                rejoined.split(':').collect()
            };
            assert_eq!(resplit, dirs);
        }
    }

    #[test]
    fn test_fish_entries_in_order() {
        for dirs in [vec![], vec!["/usr/bin"], vec!["/home/u/.cargo/bin", "/usr/bin"]] {
            let mut payload = String::from("\n");
            for dir in &dirs {
                payload.push_str(dir);
                payload.push('\n');
            }
            let raw = wrap(&payload);
            let path = parse_path_output(raw.as_bytes(), ShellFamily::Fish).unwrap();
            assert_eq!(path.entries(), dirs.as_slice());
        }
    }

    #[test]
    fn test_fish_crlf_lines() {
        let raw = wrap("\r\n/a\r\n/b\r\n");
        let path = parse_path_output(raw.as_bytes(), ShellFamily::Fish).unwrap();
        assert_eq!(path.join(':'), "/a:/b");
    }

    #[test]
    fn test_noise_is_ignored() {
        let raw = format!(
            "Last login: Mon Oct 12 09:00:00 on ttys001\nOh My Zsh update available\n{}\nYou have mail.\n",
            wrap("/usr/local/bin:/usr/bin")
        );
        let path = parse_path_output(raw.as_bytes(), ShellFamily::Posix).unwrap();
        assert_eq!(path.join(':'), "/usr/local/bin:/usr/bin");
    }

    #[test]
    fn test_missing_sentinels_fail() {
        let err = parse_path_output(b"", ShellFamily::Posix).unwrap_err();
        match err {
            LintfixError::PathParse { output } => assert_eq!(output, "<empty>"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse_path_output(b"zsh: segmentation fault", ShellFamily::Posix).unwrap_err();
        assert!(err.to_string().contains("zsh: segmentation fault"));

        let single = format!("banner {SENTINEL}/usr/bin");
        assert!(parse_path_output(single.as_bytes(), ShellFamily::Posix).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let mut raw = b"\xff\xfe banner ".to_vec();
        raw.extend_from_slice(wrap("/usr/bin").as_bytes());
        let path = parse_path_output(&raw, ShellFamily::Posix).unwrap();
        assert_eq!(path.entries(), ["/usr/bin"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_runs_login_shell() {
        use crate::common::system::test_support::{write_script, NOISY_POSIX_SHELL};

        let dir = tempfile::tempdir().unwrap();
        let shell = write_script(dir.path(), "bash", NOISY_POSIX_SHELL);
        let inherited = Environment::new();
        let path = ShellPathExtractor::new(&inherited, Duration::from_secs(10))
            .extract(&shell, ShellFamily::Posix)
            .unwrap();
        assert_eq!(path.entries(), ["/fake/one", "/fake/two"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_times_out() {
        use crate::common::system::test_support::{write_script, HANGING_SHELL};

        let dir = tempfile::tempdir().unwrap();
        let shell = write_script(dir.path(), "zsh", HANGING_SHELL);
        let inherited = Environment::new();
        let err = ShellPathExtractor::new(&inherited, Duration::from_secs(1))
            .extract(&shell, ShellFamily::Posix)
            .unwrap_err();
        assert!(matches!(err, LintfixError::PathParse { .. }));
    }
}
