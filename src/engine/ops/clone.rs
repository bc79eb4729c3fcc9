//! engine::ops::clone
//!
//! Import an upstream repository as a new subrepo.

use std::fs;

use crate::core::gitrepo::GitRepo;
use crate::core::refs::RefSpace;
use crate::core::types::{BranchName, Oid, Subdir};
use crate::engine::{Context, EngineError};
use crate::git::Git;

use super::commit::{self, CommitParams};

/// Inputs for a clone.
#[derive(Debug, Clone)]
pub struct CloneParams {
    /// The upstream URL.
    pub url: String,
    /// Target subdir; derived from the URL when omitted.
    pub subdir: Option<Subdir>,
    /// Upstream branch; discovered from the remote HEAD when omitted.
    pub branch: Option<BranchName>,
    /// Allow re-cloning over an existing subrepo.
    pub force: bool,
}

/// Result of a clone.
#[derive(Debug, Clone)]
pub enum CloneOutcome {
    /// Forced re-clone found the recorded commit already at the
    /// upstream tip; nothing was done.
    UpToDate(Subdir),
    /// The subrepo was created (or re-created).
    Cloned {
        /// Where the subrepo now lives.
        subdir: Subdir,
        /// The upstream tip that was squashed in.
        upstream_head: Oid,
        /// The new mainline commit.
        commit: Oid,
    },
}

/// Clone `params.url` into a subdirectory of the mainline.
pub fn clone(git: &Git, ctx: &Context, params: &CloneParams) -> Result<CloneOutcome, EngineError> {
    let subdir = match &params.subdir {
        Some(subdir) => subdir.clone(),
        None => Subdir::derive_from_url(&params.url)?,
    };
    let refs = RefSpace::new(subdir.clone());
    let target = git.workdir()?.join(subdir.as_path());

    // The target must be absent or empty, except for a forced re-clone
    // of an existing subrepo.
    let previous = match (dir_is_occupied(&target)?, params.force) {
        (false, _) => None,
        (true, true) if GitRepo::exists(&target) => Some(GitRepo::load(&target)?),
        (true, _) => return Err(EngineError::TargetNotEmpty(subdir)),
    };

    let branch = match &params.branch {
        Some(branch) => branch.clone(),
        None => discover_default_branch(git, &params.url)?,
    };

    let upstream_head = git.fetch(&params.url, &branch)?;
    git.update_ref(&refs.fetch_ref(), &upstream_head, "git-subrepo: clone")?;
    git.ensure_remote(&refs.remote_name(), &params.url)?;

    if let Some(previous) = previous {
        if previous.commit.as_ref() == Some(&upstream_head) {
            return Ok(CloneOutcome::UpToDate(subdir));
        }
    }

    let outcome = commit::commit(
        git,
        ctx,
        &subdir,
        &CommitParams {
            source: Some(upstream_head.to_string()),
            remote: Some(params.url.clone()),
            branch: Some(branch),
            ..CommitParams::default()
        },
    )?;

    Ok(CloneOutcome::Cloned {
        subdir,
        upstream_head,
        commit: outcome.commit,
    })
}

/// Whether `dir` exists and has any entry.
fn dir_is_occupied(dir: &std::path::Path) -> Result<bool, EngineError> {
    if !dir.exists() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(dir)?;
    Ok(entries.next().is_some())
}

/// Find the remote's default branch: the `refs/heads/*` entry pointing
/// at the same commit as the advertised `HEAD`.
fn discover_default_branch(git: &Git, url: &str) -> Result<BranchName, EngineError> {
    let entries = git.ls_remote(url)?;
    let head = entries
        .iter()
        .find(|(_, name)| name == "HEAD")
        .map(|(oid, _)| oid.clone())
        .ok_or_else(|| EngineError::NoDefaultBranch(url.to_string()))?;
    for (oid, name) in &entries {
        if *oid == head {
            if let Some(short) = name.strip_prefix("refs/heads/") {
                return Ok(BranchName::new(short)?);
            }
        }
    }
    Err(EngineError::NoDefaultBranch(url.to_string()))
}
