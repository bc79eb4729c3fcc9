//! engine::ops::fetch
//!
//! Fetch the upstream branch of a subrepo and record the tip.

use crate::core::gitrepo::GitRepo;
use crate::core::refs::RefSpace;
use crate::core::types::{BranchName, Oid, Subdir};
use crate::engine::{Context, EngineError};
use crate::git::Git;

/// Result of a fetch.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The fetched upstream tip, now at `refs/subrepo/<subdir>/fetch`.
    pub upstream_head: Oid,
    /// The URL fetched from.
    pub remote: String,
    /// The upstream branch fetched.
    pub branch: BranchName,
}

/// Fetch `<subdir>`'s upstream branch into the fetch ref and make sure
/// the named remote `subrepo/<subdir>` matches the URL.
///
/// `remote`/`branch` override the `.gitrepo` values for this fetch only.
pub fn fetch(
    git: &Git,
    _ctx: &Context,
    subdir: &Subdir,
    remote: Option<&str>,
    branch: Option<&BranchName>,
) -> Result<FetchOutcome, EngineError> {
    let refs = RefSpace::new(subdir.clone());
    let target = git.workdir()?.join(subdir.as_path());
    if !GitRepo::exists(&target) {
        return Err(EngineError::NotASubrepo(subdir.clone()));
    }
    let record = GitRepo::load(&target)?;

    let remote = remote.map(str::to_string).unwrap_or(record.remote);
    let branch = branch.cloned().unwrap_or(record.branch);

    let upstream_head = git.fetch(&remote, &branch)?;
    git.update_ref(&refs.fetch_ref(), &upstream_head, "git-subrepo: fetch")?;
    git.ensure_remote(&refs.remote_name(), &remote)?;

    Ok(FetchOutcome {
        upstream_head,
        remote,
        branch,
    })
}
