//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! Each handler opens the Git driver, runs preflight for its requirement
//! set, delegates to the engine operation, and formats the outcome.
//! Handlers do not manipulate the repository themselves.
//!
//! With `--all`, the discovery walk provides the targets and each
//! subrepo is processed independently: a failure is reported and
//! processing continues, with a per-subrepo summary at the end.

mod branch;
mod clean;
mod clone;
mod commit;
mod fetch;
mod pull;
mod push;
mod status;

use anyhow::Result;

use crate::cli::args::Command;
use crate::core::types::Subdir;
use crate::engine::ops::status::discover;
use crate::engine::{Context, EngineError};
use crate::git::Git;
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Clone {
            url,
            subdir,
            branch,
            force,
        } => clone::clone(ctx, &url, subdir.as_deref(), branch.as_deref(), force),
        Command::Pull {
            subdir,
            all,
            branch,
            remote,
            update,
        } => pull::pull(
            ctx,
            subdir.as_deref(),
            all,
            branch.as_deref(),
            remote.as_deref(),
            update,
        ),
        Command::Push {
            subdir,
            branch_name,
            all,
            branch,
            force,
            remote,
            update,
        } => push::push(
            ctx,
            subdir.as_deref(),
            branch_name.as_deref(),
            all,
            branch.as_deref(),
            remote.as_deref(),
            update,
            force,
        ),
        Command::Fetch {
            subdir,
            all,
            branch,
            remote,
        } => fetch::fetch(ctx, subdir.as_deref(), all, branch.as_deref(), remote.as_deref()),
        Command::Branch {
            subdir,
            all,
            fetch,
            force,
        } => branch::branch(ctx, subdir.as_deref(), all, fetch, force),
        Command::Commit {
            subdir,
            commit_ref,
            fetch,
            force,
            message,
        } => commit::commit(ctx, &subdir, commit_ref.as_deref(), fetch, force, message),
        Command::Status { subdirs, fetch } => status::status(ctx, &subdirs, fetch),
        Command::Clean { subdir, all, force } => clean::clean(ctx, subdir.as_deref(), all, force),
        Command::Version => {
            println!("git-subrepo version {}", crate::core::message::CMDVER);
            Ok(())
        }
    }
}

/// Open the Git driver from the context's working directory.
pub(crate) fn open_git(ctx: &Context) -> Result<Git, EngineError> {
    Ok(Git::open(&ctx.cwd())?)
}

/// Resolve the subrepos a command operates on: the explicit subdir, or
/// every discovered subrepo under `--all`.
pub(crate) fn resolve_targets(
    git: &Git,
    subdir: Option<&str>,
    all: bool,
) -> Result<Vec<Subdir>, EngineError> {
    match (subdir, all) {
        (Some(subdir), _) => Ok(vec![Subdir::new(subdir)?]),
        (None, true) => Ok(discover(git.workdir()?)),
        (None, false) => Err(EngineError::Argument(
            "a subdir argument is required (or pass --all)".into(),
        )),
    }
}

/// Run `f` for each target, continuing past failures; errors are
/// reported per subrepo and folded into one final error.
pub(crate) fn for_each_subrepo<F>(ctx: &Context, targets: &[Subdir], mut f: F) -> Result<()>
where
    F: FnMut(&Subdir) -> Result<(), EngineError>,
{
    let mut failed = 0usize;
    for subdir in targets {
        if let Err(err) = f(subdir) {
            eprintln!("git-subrepo: {subdir}: {err}");
            failed += 1;
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} subrepos failed", targets.len());
    }
    if targets.is_empty() {
        output::say("no subrepos found", ctx.verbosity);
    }
    Ok(())
}
