//! # Lintfix Env Command
//!
//! File: cli/src/commands/environment.rs
//!
//! `lintfix env` prints the resolved environment as `KEY=VALUE` lines, sorted
//! by name. Given variable names, it prints only those that are set.
//!
use crate::commands::Session;
use crate::common::system::environment::Environment;
use crate::core::error::Result;
use clap::Parser;
use tracing::warn;

/// Arguments for the 'env' subcommand.
#[derive(Parser, Debug)]
pub struct EnvArgs {
    /// Only print these variables.
    names: Vec<String>,
}

pub async fn handle_env(args: EnvArgs, session: &Session) -> Result<()> {
    print!("{}", render(&session.environment, &args.names));
    Ok(())
}

fn render(environment: &Environment, names: &[String]) -> String {
    let mut out = String::new();
    if names.is_empty() {
        for (key, value) in environment.iter() {
            out.push_str(&format!("{key}={value}\n"));
        }
        return out;
    }
    for name in names {
        match environment.get(name) {
            Some(value) => out.push_str(&format!("{name}={value}\n")),
            None => warn!("{} is not set", name),
        }
    }
    out
}
