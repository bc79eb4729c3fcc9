//! engine::ops::commit
//!
//! Squash a source tree into `<subdir>/` as one mainline commit.
//!
//! This is the shared tail of `clone` and `pull`, and the standalone
//! `commit` command. The squash is built at the object level: the new
//! root tree is the current HEAD tree with its `<subdir>` entry replaced
//! by the source tree plus a fresh `.gitrepo` blob. The checked-out
//! branch ref is then advanced and the worktree hard-synced; preflight
//! guarantees a clean worktree, so the sync is lossless.

use crate::core::gitrepo::GitRepo;
use crate::core::message::{CommitMessage, CMDVER};
use crate::core::refs::RefSpace;
use crate::core::types::{BranchName, Oid, Subdir};
use crate::engine::{Context, EngineError};
use crate::git::Git;

use super::fetch;

/// Inputs for one squash.
#[derive(Debug, Clone, Default)]
pub struct CommitParams {
    /// Commit-ref to squash; defaults to branch `subrepo/<subdir>`.
    pub source: Option<String>,
    /// Upstream URL override (`clone`, or `pull --update --remote`).
    pub remote: Option<String>,
    /// Upstream branch override (`clone`, or `pull --update --branch`).
    pub branch: Option<BranchName>,
    /// User-supplied subject replacing the generated first line.
    pub subject: Option<String>,
    /// Skip the upstream-containment check.
    pub force: bool,
    /// Fetch the upstream branch before committing.
    pub fetch: bool,
}

/// Result of a squash.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    /// The new mainline commit.
    pub commit: Oid,
    /// The source commit that was squashed.
    pub squashed: Oid,
    /// The upstream head recorded in `.gitrepo`.
    pub recorded: Oid,
}

/// Squash `params.source` into `<subdir>/` on the current branch.
pub fn commit(
    git: &Git,
    ctx: &Context,
    subdir: &Subdir,
    params: &CommitParams,
) -> Result<CommitOutcome, EngineError> {
    let refs = RefSpace::new(subdir.clone());

    if params.fetch {
        fetch::fetch(git, ctx, subdir, None, None)?;
    }

    // Existing record, if any; clone supplies remote/branch explicitly
    // before the first record exists.
    let target = git.workdir()?.join(subdir.as_path());
    let existing = if GitRepo::exists(&target) {
        Some(GitRepo::load(&target)?)
    } else {
        None
    };
    let remote = match (&params.remote, &existing) {
        (Some(remote), _) => remote.clone(),
        (None, Some(record)) => record.remote.clone(),
        (None, None) => return Err(EngineError::NotASubrepo(subdir.clone())),
    };
    let branch = match (&params.branch, &existing) {
        (Some(branch), _) => branch.clone(),
        (None, Some(record)) => record.branch.clone(),
        (None, None) => return Err(EngineError::NotASubrepo(subdir.clone())),
    };

    let default_source = refs.worktree_branch();
    let source_spec = params.source.as_deref().unwrap_or(default_source.as_str());
    let source = git.rev_parse(source_spec)?;

    // The recorded upstream head is the fetched tip; the squash must
    // contain it unless forced. A forced squash with nothing fetched
    // records the source itself.
    let recorded = match git.try_resolve_ref(&refs.fetch_ref())? {
        Some(upstream_head) => {
            if !params.force && !git.is_ancestor(&upstream_head, &source)? {
                return Err(EngineError::UpstreamNotContained {
                    commit: git.short_oid(&source)?,
                    upstream: git.short_oid(&upstream_head)?,
                });
            }
            upstream_head
        }
        None if params.force => source.clone(),
        None => return Err(EngineError::NoFetchRef(subdir.clone())),
    };

    let original_head = git.try_head_oid()?;

    let mut record = GitRepo::new(remote, branch);
    record.commit = Some(recorded.clone());
    record.parent = original_head.clone();
    record.cmdver = Some(CMDVER.to_string());

    let tree = git.squash_tree(original_head.as_ref(), subdir, &source, &record.render())?;
    let message = CommitMessage {
        command_line: &ctx.command_line,
        subject: params.subject.as_deref(),
        subdir,
        merged: &source,
        remote: &record.remote,
        branch: &record.branch,
        upstream_commit: record.commit.as_ref(),
    }
    .render();

    let parents: Vec<Oid> = original_head.into_iter().collect();
    let new_commit = git.create_commit(&tree, &parents, &message)?;
    git.advance_head(&new_commit, "git-subrepo: commit")?;
    git.update_ref(&refs.commit_ref(), &source, "git-subrepo: commit")?;

    Ok(CommitOutcome {
        commit: new_commit,
        squashed: source,
        recorded,
    })
}
