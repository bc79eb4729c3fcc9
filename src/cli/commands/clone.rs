//! cli::commands::clone

use anyhow::Result;

use crate::core::types::{BranchName, Subdir};
use crate::engine::ops::clone::{clone as clone_op, CloneOutcome, CloneParams};
use crate::engine::{preflight, Context};
use crate::ui::output;

use super::open_git;

/// Run the clone command.
pub fn clone(
    ctx: &Context,
    url: &str,
    subdir: Option<&str>,
    branch: Option<&str>,
    force: bool,
) -> Result<()> {
    let git = open_git(ctx)?;
    preflight::check(&git, &ctx.cwd(), &preflight::CLONE)?;

    let params = CloneParams {
        url: url.to_string(),
        subdir: subdir.map(Subdir::new).transpose()?,
        branch: branch.map(BranchName::new).transpose()?,
        force,
    };

    match clone_op(&git, ctx, &params)? {
        CloneOutcome::UpToDate(subdir) => {
            output::say(format!("subrepo '{subdir}' is up to date"), ctx.verbosity);
        }
        CloneOutcome::Cloned {
            subdir,
            upstream_head,
            ..
        } => {
            output::say(
                format!(
                    "subrepo '{subdir}' cloned from '{url}' at {}",
                    git.short_oid(&upstream_head)?
                ),
                ctx.verbosity,
            );
        }
    }
    Ok(())
}
