//! # Lintfix UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Most failures are only logged. A few are important enough that the user
//! must see them even with logging turned down, for example when the login
//! shell's PATH could not be determined and no linter is likely to be found.
//! Those go through a `Notifier`.
//!
//! - **`Notifier`**: the seam used by the environment code to raise a
//!   user-visible error message.
//! - **`ConsoleNotifier`**: prints the message framed on stderr.
//!

/// Presents an error message to the end user.
pub trait Notifier {
    fn error_message(&self, message: &str);
}

/// Writes messages to stderr between horizontal rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn error_message(&self, message: &str) {
        eprintln!("{}", frame(message));
    }
}

const RULE_WIDTH: usize = 72;

fn frame(message: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\nlintfix error\n\n{}\n{rule}", message.trim_end())
}
