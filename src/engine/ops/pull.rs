//! engine::ops::pull
//!
//! Integrate new upstream commits into the mainline subdir.
//!
//! Pull composes both rewrite directions around a rebase: synthesise the
//! local subrepo branch, rebase it onto the fetched upstream tip, then
//! squash the rebased result back into the mainline. A rebase conflict
//! leaves the repository mid-rebase for the user and reports the CODE=1
//! recovery script.

use crate::core::gitrepo::GitRepo;
use crate::core::refs::RefSpace;
use crate::core::types::{BranchName, Oid, Subdir};
use crate::engine::{Context, EngineError};
use crate::git::{BaseHandling, Git, Head};

use super::branch::{self, BranchOutcome, BranchTarget};
use super::commit::{self, CommitParams};
use super::fetch;

/// Inputs for a pull.
#[derive(Debug, Clone, Default)]
pub struct PullParams {
    /// Upstream URL override.
    pub remote: Option<String>,
    /// Upstream branch override.
    pub branch: Option<BranchName>,
    /// Persist the overrides into `.gitrepo`.
    pub update: bool,
}

/// Result of a pull.
#[derive(Debug, Clone)]
pub enum PullOutcome {
    /// The recorded commit already matches the upstream tip.
    UpToDate(Subdir),
    /// New upstream content was squashed in.
    Pulled {
        /// The subrepo pulled.
        subdir: Subdir,
        /// The upstream tip now recorded in `.gitrepo`.
        upstream_head: Oid,
        /// The new mainline commit.
        commit: Oid,
    },
}

/// Pull `<subdir>` from its upstream.
pub fn pull(
    git: &Git,
    ctx: &Context,
    subdir: &Subdir,
    params: &PullParams,
) -> Result<PullOutcome, EngineError> {
    let refs = RefSpace::new(subdir.clone());
    let original = current_branch(git)?;

    let dir = git.workdir()?.join(subdir.as_path());
    if !GitRepo::exists(&dir) {
        return Err(EngineError::NotASubrepo(subdir.clone()));
    }
    let record = GitRepo::load(&dir)?;

    let fetched = fetch::fetch(
        git,
        ctx,
        subdir,
        params.remote.as_deref(),
        params.branch.as_ref(),
    )?;
    if record.commit.as_ref() == Some(&fetched.upstream_head) {
        return Ok(PullOutcome::UpToDate(subdir.clone()));
    }

    // A stale synthesised branch from an earlier run would shadow the
    // fresh rewrite; force replaces it. The pull base stays in the
    // rewritten history so the rebase replays local changes three-way.
    let sub_branch = refs.worktree_branch();
    match branch::branch(
        git,
        ctx,
        subdir,
        BranchTarget::Worktree,
        BaseHandling::Keep,
        true,
        false,
    )? {
        BranchOutcome::Created {
            branch: name,
            rebase_base,
            ..
        } => {
            let bound = rebase_base
                .map(|oid| oid.to_string())
                .unwrap_or_else(|| refs.fetch_ref());
            let rebase = git.rebase_onto(&name, &refs.fetch_ref(), &bound)?;
            if !rebase.success {
                return Err(EngineError::RebaseConflict {
                    code: 1,
                    message: pull_conflict_script(subdir, &original, &rebase.combined()),
                });
            }
            git.checkout(&original)?;
        }
        BranchOutcome::NoNewCommits => {
            // Nothing local to rebase: the subrepo branch is exactly the
            // fetched tip.
            git.create_branch(&sub_branch, &fetched.upstream_head, true)?;
            git.update_ref(&refs.branch_ref(), &fetched.upstream_head, "git-subrepo: pull")?;
        }
        // Unreachable: the forced branch run replaces any existing one.
        BranchOutcome::AlreadyExists(name) => {
            return Err(EngineError::Git(crate::git::GitError::Internal {
                message: format!("stale branch '{name}' survived a forced rewrite"),
            }));
        }
    }

    let outcome = commit::commit(
        git,
        ctx,
        subdir,
        &CommitParams {
            remote: params.update.then(|| params.remote.clone()).flatten(),
            branch: params.update.then(|| params.branch.clone()).flatten(),
            ..CommitParams::default()
        },
    )?;

    let tip = git.resolve_ref(&format!("refs/heads/{sub_branch}"))?;
    git.update_ref(&refs.pull_ref(), &tip, "git-subrepo: pull")?;

    Ok(PullOutcome::Pulled {
        subdir: subdir.clone(),
        upstream_head: fetched.upstream_head,
        commit: outcome.commit,
    })
}

/// The branch HEAD is on; pull cannot run detached or unborn.
pub(super) fn current_branch(git: &Git) -> Result<BranchName, EngineError> {
    match git.head()? {
        Head::Branch { name, .. } => Ok(name),
        Head::Detached { .. } => Err(EngineError::DetachedHead),
        Head::Unborn { .. } => Err(EngineError::UnbornHead),
    }
}

/// The CODE=1 recovery script shown on a pull rebase conflict.
fn pull_conflict_script(subdir: &Subdir, original: &BranchName, output: &str) -> String {
    format!(
        "\
pull of '{subdir}' hit a rebase conflict; the rebase is left in progress.

Resolve the conflicts, then finish the pull with:

    git rebase --continue
    git checkout {original}
    git subrepo commit {subdir}

Or abort and restore the starting state with:

    git rebase --abort
    git checkout {original}
    git subrepo clean {subdir}

Rebase output:
{output}"
    )
}
