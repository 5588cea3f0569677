//! # Lintfix Environment Types
//!
//! File: cli/src/common/system/environment.rs
//!
//! ## Overview
//!
//! Value types describing the environment handed to spawned processes:
//!
//! - **`Environment`**: an ordered `name -> value` mapping. Keys are
//!   case-sensitive on POSIX. On Windows, where variable names are
//!   case-insensitive, keys are upper-cased on insert and lookup so that
//!   `Path` and `PATH` address the same entry.
//! - **`PathString`**: the ordered list of directories making up a `PATH`.
//!   Order is search precedence; duplicates are kept as-is.
//!
//! An `Environment` is built once at start-up by the resolver and is never
//! mutated afterwards. Per-spawn additions go through `Environment::overlay`,
//! which returns a new value.
//!
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Name of the executable search path variable.
pub const PATH_KEY: &str = "PATH";

/// Separator between directories in `PATH` on this platform.
#[cfg(windows)]
pub const PATH_DELIMITER: char = ';';
/// Separator between directories in `PATH` on this platform.
#[cfg(not(windows))]
pub const PATH_DELIMITER: char = ':';

fn normalize_key(key: &str) -> String {
    if cfg!(windows) {
        key.to_uppercase()
    } else {
        key.to_string()
    }
}

/// An ordered mapping of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the environment this process was started with.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn inherited() -> Self {
        let mut env = Self::new();
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => env.set(key, value),
                (key, _) => debug!("Skipping non-Unicode environment variable {:?}", key),
            }
        }
        env
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.vars.insert(normalize_key(key.as_ref()), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(&normalize_key(key))
    }

    /// The `PATH` value, if set.
    pub fn path(&self) -> Option<&str> {
        self.get(PATH_KEY)
    }

    /// Returns a copy of `self` with every entry of `extra` applied on top.
    /// Entries from `extra` win on key collision.
    pub fn overlay(&self, extra: &Environment) -> Environment {
        let mut merged = self.clone();
        merged.extend(extra.iter());
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> Extend<(K, V)> for Environment {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Environment::new();
        env.extend(iter);
        env
    }
}

/// An ordered sequence of directories, as found in `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathString {
    entries: Vec<String>,
}

impl PathString {
    /// Splits a delimited value. An empty value yields no entries.
    pub fn split(value: &str, delimiter: char) -> Self {
        if value.is_empty() {
            return Self::default();
        }
        Self {
            entries: value.split(delimiter).map(str::to_string).collect(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, dir: &str) -> bool {
        self.entries.iter().any(|entry| entry == dir)
    }

    pub fn push(&mut self, dir: impl Into<String>) {
        self.entries.push(dir.into());
    }

    /// Appends each candidate not already present, keeping existing order.
    pub fn append_missing<S: AsRef<str>>(&mut self, candidates: &[S]) {
        for candidate in candidates {
            let candidate = candidate.as_ref();
            if !self.contains(candidate) {
                self.push(candidate);
            }
        }
    }

    pub fn join(&self, delimiter: char) -> String {
        let mut out = String::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(delimiter);
            }
            out.push_str(entry);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PathString {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for PathString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(PATH_DELIMITER))
    }
}
