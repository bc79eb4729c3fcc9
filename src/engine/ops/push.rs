//! engine::ops::push
//!
//! Push local subrepo changes back upstream.
//!
//! The default path synthesises a temporary `subrepo-push/<subdir>`
//! branch, rebases it onto the fetched upstream tip, and pushes the
//! result. A user-supplied branch is pushed as-is. Either way the push
//! candidate must contain the fetched upstream head unless `--force`.

use crate::core::gitrepo::GitRepo;
use crate::core::refs::RefSpace;
use crate::core::types::{BranchName, Oid, Subdir};
use crate::engine::{Context, EngineError};
use crate::git::{BaseHandling, Git};

use super::branch::{self, BranchOutcome, BranchTarget};
use super::fetch;
use super::pull::current_branch;

/// Inputs for a push.
#[derive(Debug, Clone, Default)]
pub struct PushParams {
    /// Existing branch to push as-is, skipping synthesis.
    pub branch_name: Option<BranchName>,
    /// Upstream URL override.
    pub remote: Option<String>,
    /// Upstream branch override.
    pub branch: Option<BranchName>,
    /// Persist the overrides into `.gitrepo` after a successful push.
    pub update: bool,
    /// Force-push and skip the upstream-containment check.
    pub force: bool,
}

/// Result of a push.
#[derive(Debug, Clone)]
pub enum PushOutcome {
    /// Nothing local to push.
    NoNewCommits,
    /// The upstream branch was updated.
    Pushed {
        /// The subrepo pushed.
        subdir: Subdir,
        /// The remote pushed to.
        remote: String,
        /// The upstream branch updated.
        upstream_branch: BranchName,
        /// The tip that was pushed.
        tip: Oid,
    },
}

/// Push `<subdir>`'s local changes to its upstream branch.
pub fn push(
    git: &Git,
    ctx: &Context,
    subdir: &Subdir,
    params: &PushParams,
) -> Result<PushOutcome, EngineError> {
    let refs = RefSpace::new(subdir.clone());
    let original = current_branch(git)?;

    let dir = git.workdir()?.join(subdir.as_path());
    if !GitRepo::exists(&dir) {
        return Err(EngineError::NotASubrepo(subdir.clone()));
    }
    let record = GitRepo::load(&dir)?;
    let remote = params.remote.clone().unwrap_or_else(|| record.remote.clone());
    let upstream_branch = params.branch.clone().unwrap_or_else(|| record.branch.clone());

    let (candidate, temporary) = match &params.branch_name {
        Some(name) => {
            // An explicit branch is pushed as-is; it must exist even
            // under --force.
            if !git.branch_exists(name) {
                return Err(EngineError::NoSuchBranch(name.clone()));
            }
            (name.clone(), false)
        }
        None => {
            fetch::fetch(git, ctx, subdir, params.remote.as_deref(), params.branch.as_ref())?;
            let push_branch = refs.push_branch();
            if git.branch_exists(&push_branch) {
                return Err(EngineError::StalePushBranch(push_branch, subdir.clone()));
            }
            match branch::branch(
                git,
                ctx,
                subdir,
                BranchTarget::Push,
                BaseHandling::Keep,
                false,
                false,
            )? {
                BranchOutcome::NoNewCommits => return Ok(PushOutcome::NoNewCommits),
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
                            code: 2,
                            message: push_conflict_script(subdir, &original, &rebase.combined()),
                        });
                    }
                    git.checkout(&original)?;
                    (name, true)
                }
                BranchOutcome::AlreadyExists(name) => {
                    return Err(EngineError::StalePushBranch(name, subdir.clone()));
                }
            }
        }
    };

    let tip = git.rev_parse(candidate.as_str())?;

    // A synthesised candidate that rebased to exactly the fetched tip
    // holds nothing upstream lacks (e.g. a repeated push).
    if temporary {
        if let Some(upstream_head) = git.try_resolve_ref(&refs.fetch_ref())? {
            if upstream_head == tip {
                git.delete_branch(&candidate)?;
                return Ok(PushOutcome::NoNewCommits);
            }
        }
    }

    if !params.force {
        let upstream_head = git
            .try_resolve_ref(&refs.fetch_ref())?
            .ok_or_else(|| EngineError::NoFetchRef(subdir.clone()))?;
        if !git.is_ancestor(&upstream_head, &tip)? {
            return Err(EngineError::UpstreamNotContained {
                commit: git.short_oid(&tip)?,
                upstream: git.short_oid(&upstream_head)?,
            });
        }
    }

    let result = git.push(&remote, candidate.as_str(), &upstream_branch, params.force)?;
    if !result.success {
        return Err(EngineError::PushRejected {
            remote,
            output: result.combined(),
        });
    }

    git.update_ref(&refs.push_ref(), &tip, "git-subrepo: push")?;
    if temporary {
        git.delete_branch(&candidate)?;
    }

    // --update persists the overridden remote/branch as a dedicated
    // mainline commit touching only .gitrepo.
    if params.update && (params.remote.is_some() || params.branch.is_some()) {
        let mut updated = record;
        updated.remote = remote.clone();
        updated.branch = upstream_branch.clone();
        let head = git.try_head_oid()?.ok_or(EngineError::UnbornHead)?;
        let tree = git.update_gitrepo_tree(&head, subdir, &updated.render())?;
        let commit = git.create_commit(&tree, &[head], &ctx.command_line)?;
        git.advance_head(&commit, "git-subrepo: push --update")?;
    }

    Ok(PushOutcome::Pushed {
        subdir: subdir.clone(),
        remote,
        upstream_branch,
        tip,
    })
}

/// The CODE=2 recovery script shown on a push rebase conflict.
fn push_conflict_script(subdir: &Subdir, original: &BranchName, output: &str) -> String {
    format!(
        "\
push of '{subdir}' hit a rebase conflict; the rebase is left in progress.

Resolve the conflicts, then finish the push with:

    git rebase --continue
    git checkout {original}
    git subrepo push {subdir} subrepo-push/{subdir}

Or abort and restore the starting state with:

    git rebase --abort
    git checkout {original}
    git subrepo clean {subdir}

Rebase output:
{output}"
    )
}
