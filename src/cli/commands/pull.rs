//! cli::commands::pull

use anyhow::Result;

use crate::core::types::BranchName;
use crate::engine::ops::pull::{pull as pull_op, PullOutcome, PullParams};
use crate::engine::{preflight, Context, EngineError};
use crate::ui::output;

use super::{for_each_subrepo, open_git, resolve_targets};

/// Run the pull command.
pub fn pull(
    ctx: &Context,
    subdir: Option<&str>,
    all: bool,
    branch: Option<&str>,
    remote: Option<&str>,
    update: bool,
) -> Result<()> {
    if update && branch.is_none() && remote.is_none() {
        return Err(EngineError::Argument(
            "--update requires --branch and/or --remote".into(),
        )
        .into());
    }

    let git = open_git(ctx)?;
    preflight::check(&git, &ctx.cwd(), &preflight::MUTATING)?;
    let targets = resolve_targets(&git, subdir, all)?;

    let params = PullParams {
        remote: remote.map(str::to_string),
        branch: branch.map(BranchName::new).transpose()?,
        update,
    };

    for_each_subrepo(ctx, &targets, |subdir| {
        match pull_op(&git, ctx, subdir, &params)? {
            PullOutcome::UpToDate(subdir) => {
                output::say(format!("subrepo '{subdir}' is up to date"), ctx.verbosity);
            }
            PullOutcome::Pulled {
                subdir,
                upstream_head,
                ..
            } => {
                output::say(
                    format!(
                        "subrepo '{subdir}' pulled to {}",
                        git.short_oid(&upstream_head)?
                    ),
                    ctx.verbosity,
                );
            }
        }
        Ok(())
    })
}
