//! cli
//!
//! Command-line interface layer.
//!
//! The CLI layer is thin: it parses arguments via clap, folds in the
//! environment presets, and dispatches to a command handler. All
//! repository work happens in the [`crate::engine`] operations.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use anyhow::Result;

use crate::engine::Context;
use crate::ui::output::Verbosity;

/// Run the CLI application; the entry point called from `main`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let verbosity = Verbosity::from_flags(
        cli.quiet || env_flag("GIT_SUBREPO_QUIET"),
        cli.verbose || env_flag("GIT_SUBREPO_VERBOSE"),
        cli.debug || env_flag("GIT_SUBREPO_DEBUG"),
    );

    let ctx = Context {
        cwd: cli.cwd.clone(),
        verbosity,
        command_line: invocation_line(),
    };

    commands::dispatch(cli.command, &ctx)
}

/// Whether an environment preset is enabled (set, nonempty, not "0").
fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| !v.is_empty() && v != "0")
}

/// Reconstruct the invocation for squash-commit messages, in the
/// `git subrepo <command> <args>` spelling regardless of how the binary
/// was launched.
fn invocation_line() -> String {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        "git subrepo".to_string()
    } else {
        format!("git subrepo {}", args.join(" "))
    }
}
