//! cli::commands::fetch

use anyhow::Result;

use crate::core::types::BranchName;
use crate::engine::ops::fetch::fetch as fetch_op;
use crate::engine::{preflight, Context};
use crate::ui::output;

use super::{for_each_subrepo, open_git, resolve_targets};

/// Run the fetch command.
pub fn fetch(
    ctx: &Context,
    subdir: Option<&str>,
    all: bool,
    branch: Option<&str>,
    remote: Option<&str>,
) -> Result<()> {
    let git = open_git(ctx)?;
    preflight::check(&git, &ctx.cwd(), &preflight::READ_ONLY)?;
    let targets = resolve_targets(&git, subdir, all)?;
    let branch = branch.map(BranchName::new).transpose()?;

    for_each_subrepo(ctx, &targets, |subdir| {
        let outcome = fetch_op(&git, ctx, subdir, remote, branch.as_ref())?;
        output::say(
            format!(
                "fetched '{subdir}' from '{}' at {}",
                outcome.remote,
                git.short_oid(&outcome.upstream_head)?
            ),
            ctx.verbosity,
        );
        Ok(())
    })
}
