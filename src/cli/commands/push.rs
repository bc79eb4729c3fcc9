//! cli::commands::push

use anyhow::Result;

use crate::core::types::BranchName;
use crate::engine::ops::push::{push as push_op, PushOutcome, PushParams};
use crate::engine::{preflight, Context, EngineError};
use crate::ui::output;

use super::{for_each_subrepo, open_git, resolve_targets};

/// Run the push command.
#[allow(clippy::too_many_arguments)]
pub fn push(
    ctx: &Context,
    subdir: Option<&str>,
    branch_name: Option<&str>,
    all: bool,
    branch: Option<&str>,
    remote: Option<&str>,
    update: bool,
    force: bool,
) -> Result<()> {
    if update && branch.is_none() && remote.is_none() {
        return Err(EngineError::Argument(
            "--update requires --branch and/or --remote".into(),
        )
        .into());
    }
    if all && branch_name.is_some() {
        return Err(EngineError::Argument(
            "an explicit branch to push cannot be combined with --all".into(),
        )
        .into());
    }

    let git = open_git(ctx)?;
    preflight::check(&git, &ctx.cwd(), &preflight::MUTATING)?;
    let targets = resolve_targets(&git, subdir, all)?;

    let params = PushParams {
        branch_name: branch_name.map(BranchName::new).transpose()?,
        remote: remote.map(str::to_string),
        branch: branch.map(BranchName::new).transpose()?,
        update,
        force,
    };

    for_each_subrepo(ctx, &targets, |subdir| {
        match push_op(&git, ctx, subdir, &params)? {
            PushOutcome::NoNewCommits => {
                output::say(
                    format!("subrepo '{subdir}' has no new commits to push"),
                    ctx.verbosity,
                );
            }
            PushOutcome::Pushed {
                subdir,
                remote,
                upstream_branch,
                tip,
            } => {
                output::say(
                    format!(
                        "subrepo '{subdir}' pushed {} to '{remote}' ({upstream_branch})",
                        git.short_oid(&tip)?
                    ),
                    ctx.verbosity,
                );
            }
        }
        Ok(())
    })
}
