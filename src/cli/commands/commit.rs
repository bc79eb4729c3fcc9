//! cli::commands::commit

use anyhow::Result;

use crate::core::types::Subdir;
use crate::engine::ops::commit::{commit as commit_op, CommitParams};
use crate::engine::{preflight, Context};
use crate::ui::output;

use super::open_git;

/// Run the commit command.
pub fn commit(
    ctx: &Context,
    subdir: &str,
    commit_ref: Option<&str>,
    fetch: bool,
    force: bool,
    message: Option<String>,
) -> Result<()> {
    let git = open_git(ctx)?;
    preflight::check(&git, &ctx.cwd(), &preflight::MUTATING)?;
    let subdir = Subdir::new(subdir)?;

    let outcome = commit_op(
        &git,
        ctx,
        &subdir,
        &CommitParams {
            source: commit_ref.map(str::to_string),
            subject: message,
            force,
            fetch,
            ..CommitParams::default()
        },
    )?;

    output::say(
        format!(
            "subrepo '{subdir}' committed {} as {}",
            git.short_oid(&outcome.squashed)?,
            git.short_oid(&outcome.commit)?
        ),
        ctx.verbosity,
    );
    Ok(())
}
