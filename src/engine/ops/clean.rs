//! engine::ops::clean
//!
//! Remove the synthesised entities of a subrepo.
//!
//! Branches, the named remote, and (with `--force`) the whole
//! `refs/subrepo/<subdir>/` subtree are all recreatable, so clean never
//! touches the mainline's record of history.

use crate::core::refs::RefSpace;
use crate::core::types::Subdir;
use crate::engine::{Context, EngineError};
use crate::git::Git;

/// What clean removed.
#[derive(Debug, Clone, Default)]
pub struct CleanOutcome {
    /// Human-readable descriptions of everything removed.
    pub removed: Vec<String>,
}

/// Remove `subrepo/<subdir>` and `subrepo-push/<subdir>` branches and
/// the named remote; with `force`, also the ref subtree.
pub fn clean(
    git: &Git,
    _ctx: &Context,
    subdir: &Subdir,
    force: bool,
) -> Result<CleanOutcome, EngineError> {
    let refs = RefSpace::new(subdir.clone());
    let mut outcome = CleanOutcome::default();

    for branch in [refs.worktree_branch(), refs.push_branch()] {
        if git.branch_exists(&branch) {
            git.delete_branch(&branch)?;
            outcome.removed.push(format!("branch '{branch}'"));
        }
    }

    let remote = refs.remote_name();
    if git.remote_url(&remote)?.is_some() {
        git.remove_remote(&remote)?;
        outcome.removed.push(format!("remote '{remote}'"));
    }

    if force {
        for entry in git.list_refs_by_prefix(&refs.prefix())? {
            git.delete_ref(&entry.name)?;
            outcome.removed.push(format!("ref '{}'", entry.name));
        }
    }

    Ok(outcome)
}
