//! engine::ops::branch
//!
//! Synthesise the upstream-equivalent branch for a subrepo.
//!
//! The branch's history is the mainline history since the last
//! clone/pull, restricted to `<subdir>` with `.gitrepo` stripped; see
//! [`crate::git`]'s filter for the rewrite itself. The standalone
//! `branch` command publishes the excised shape (root = first real
//! subrepo change); `pull` and `push` ask for the pull base to be kept
//! so the follow-up rebase can replay local changes three-way.

use crate::core::gitrepo::GitRepo;
use crate::core::refs::RefSpace;
use crate::core::types::{BranchName, Oid, Subdir};
use crate::engine::{Context, EngineError};
use crate::git::{BaseHandling, FilterOutcome, Git};

use super::fetch;

/// Which branch name the rewrite lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchTarget {
    /// `subrepo/<subdir>` - the standing synthesised branch.
    Worktree,
    /// `subrepo-push/<subdir>` - temporary rebase target during push.
    Push,
}

/// Result of the branch operation.
#[derive(Debug, Clone)]
pub enum BranchOutcome {
    /// The target branch already exists; nothing was done.
    AlreadyExists(BranchName),
    /// The range since the pull base holds no subrepo change.
    NoNewCommits,
    /// The branch was created.
    Created {
        /// The branch name.
        branch: BranchName,
        /// Its tip.
        tip: Oid,
        /// The rewritten pull base, present when the caller asked for
        /// [`BaseHandling::Keep`]; the bound to rebase `--onto` past.
        rebase_base: Option<Oid>,
        /// Commits in the rewritten history.
        commits: usize,
    },
}

/// Create the synthesised branch for `<subdir>`.
///
/// With `force`, an existing target branch is deleted first; without it,
/// an existing branch short-circuits to [`BranchOutcome::AlreadyExists`].
pub fn branch(
    git: &Git,
    ctx: &Context,
    subdir: &Subdir,
    target: BranchTarget,
    base_handling: BaseHandling,
    force: bool,
    do_fetch: bool,
) -> Result<BranchOutcome, EngineError> {
    let refs = RefSpace::new(subdir.clone());
    let name = match target {
        BranchTarget::Worktree => refs.worktree_branch(),
        BranchTarget::Push => refs.push_branch(),
    };

    if do_fetch {
        fetch::fetch(git, ctx, subdir, None, None)?;
    }

    if git.branch_exists(&name) {
        if force {
            git.delete_branch(&name)?;
        } else {
            return Ok(BranchOutcome::AlreadyExists(name));
        }
    }

    let dir = git.workdir()?.join(subdir.as_path());
    if !GitRepo::exists(&dir) {
        return Err(EngineError::NotASubrepo(subdir.clone()));
    }
    let record = GitRepo::load(&dir)?;
    let base = record.pull_base().cloned();

    let head = git.try_head_oid()?.ok_or(EngineError::UnbornHead)?;

    // The range must hold the pull-base squash plus at least one real
    // commit; a lone squash means there is nothing to synthesise.
    if git.commit_count(base.as_ref(), &head)? < 2 {
        return Ok(BranchOutcome::NoNewCommits);
    }

    match git.filter_subrepo_history(base.as_ref(), &head, subdir, base_handling)? {
        FilterOutcome::NoNewCommits => Ok(BranchOutcome::NoNewCommits),
        FilterOutcome::Rewritten { tip, base, commits } => {
            git.create_branch(&name, &tip, true)?;
            git.update_ref(&refs.branch_ref(), &tip, "git-subrepo: branch")?;
            Ok(BranchOutcome::Created {
                branch: name,
                tip,
                rebase_base: base,
                commits,
            })
        }
    }
}
