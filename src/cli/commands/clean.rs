//! cli::commands::clean

use anyhow::Result;

use crate::core::refs::SUBREPO_REF_PREFIX;
use crate::engine::ops::clean::clean as clean_op;
use crate::engine::{preflight, Context};
use crate::ui::output;

use super::{for_each_subrepo, open_git, resolve_targets};

/// Run the clean command.
pub fn clean(ctx: &Context, subdir: Option<&str>, all: bool, force: bool) -> Result<()> {
    let git = open_git(ctx)?;
    preflight::check(&git, &ctx.cwd(), &preflight::READ_ONLY)?;
    let targets = resolve_targets(&git, subdir, all)?;

    for_each_subrepo(ctx, &targets, |subdir| {
        let outcome = clean_op(&git, ctx, subdir, force)?;
        if outcome.removed.is_empty() {
            output::say(format!("nothing to clean for '{subdir}'"), ctx.verbosity);
        }
        for item in outcome.removed {
            output::say(format!("removed {item}"), ctx.verbosity);
        }
        Ok(())
    })?;

    // `clean --all --force` sweeps the whole namespace, catching refs of
    // subrepos whose worktree directories are already gone.
    if all && force {
        for entry in git.list_refs_by_prefix(SUBREPO_REF_PREFIX)? {
            git.delete_ref(&entry.name)?;
            output::say(format!("removed ref '{}'", entry.name), ctx.verbosity);
        }
    }

    Ok(())
}
