//! # Lintfix Path Command
//!
//! File: cli/src/commands/path.rs
//!
//! Prints the PATH that spawned tools will see, after login-shell discovery
//! or the fallback heuristic. Run with `-vv` to see how it was obtained.
//!
//! ```bash
//! lintfix path
//! lintfix path --list
//! ```
//!
use crate::commands::Session;
use crate::common::system::environment::{PathString, PATH_DELIMITER};
use crate::core::error::Result;
use clap::Parser;

/// Arguments for the 'path' subcommand.
#[derive(Parser, Debug)]
pub struct PathArgs {
    /// Print one directory per line.
    #[arg(long, short)]
    list: bool,
}

pub async fn handle_path(args: PathArgs, session: &Session) -> Result<()> {
    let path = session.environment.path().unwrap_or_default();
    print!("{}", render(path, args.list));
    Ok(())
}

fn render(path: &str, list: bool) -> String {
    if !list {
        return format!("{path}\n");
    }
    PathString::split(path, PATH_DELIMITER)
        .entries()
        .iter()
        .map(|dir| format!("{dir}\n"))
        .collect()
}
