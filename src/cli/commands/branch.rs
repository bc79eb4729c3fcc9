//! cli::commands::branch

use anyhow::Result;

use crate::engine::ops::branch::{branch as branch_op, BranchOutcome, BranchTarget};
use crate::engine::{preflight, Context};
use crate::git::BaseHandling;
use crate::ui::output;

use super::{for_each_subrepo, open_git, resolve_targets};

/// Run the branch command.
pub fn branch(
    ctx: &Context,
    subdir: Option<&str>,
    all: bool,
    fetch: bool,
    force: bool,
) -> Result<()> {
    let git = open_git(ctx)?;
    preflight::check(&git, &ctx.cwd(), &preflight::MUTATING)?;
    let targets = resolve_targets(&git, subdir, all)?;

    for_each_subrepo(ctx, &targets, |subdir| {
        match branch_op(
            &git,
            ctx,
            subdir,
            BranchTarget::Worktree,
            BaseHandling::Excise,
            force,
            fetch,
        )? {
            BranchOutcome::AlreadyExists(name) => {
                output::say(
                    format!("branch '{name}' already exists; use --force to recreate it"),
                    ctx.verbosity,
                );
            }
            BranchOutcome::NoNewCommits => {
                output::say(
                    format!("subrepo '{subdir}' has no new commits"),
                    ctx.verbosity,
                );
            }
            BranchOutcome::Created {
                branch,
                tip,
                commits,
                ..
            } => {
                output::say(
                    format!(
                        "created branch '{branch}' ({commits} commits) at {}",
                        git.short_oid(&tip)?
                    ),
                    ctx.verbosity,
                );
            }
        }
        Ok(())
    })
}
