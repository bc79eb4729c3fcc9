//! engine::preflight
//!
//! Repo-is-ready checks run before any operation.
//!
//! Each command declares a [`Requirements`] set; [`check`] verifies it
//! against the repository and returns a [`Workspace`] snapshot on
//! success. There is no global "repo is valid" boolean: read-only
//! commands run with fewer requirements than mutating ones, and `clone`
//! alone tolerates an unborn HEAD (cloning into an empty repository).

use std::path::Path;

use crate::engine::EngineError;
use crate::git::{Git, Head};

/// Minimum supported git version (detected from the version banner).
const MIN_GIT_VERSION: (u32, u32) = (1, 7);

/// What a command requires of the repository before it may run.
#[derive(Debug, Clone, Copy)]
pub struct Requirements {
    /// Human-readable name for this requirement set.
    pub name: &'static str,
    /// Index and worktree must have no uncommitted changes.
    pub clean_worktree: bool,
    /// HEAD must be attached to a branch outside the `subrepo/`
    /// namespaces.
    pub branch_head: bool,
    /// An unborn HEAD is acceptable (empty repository).
    pub allow_unborn: bool,
}

/// Requirements for read-only commands (`status`, `fetch`, `clean`).
pub const READ_ONLY: Requirements = Requirements {
    name: "read-only",
    clean_worktree: false,
    branch_head: false,
    allow_unborn: true,
};

/// Requirements for mutating commands (`pull`, `push`, `commit`,
/// `branch`).
pub const MUTATING: Requirements = Requirements {
    name: "mutating",
    clean_worktree: true,
    branch_head: true,
    allow_unborn: false,
};

/// Requirements for `clone`: mutating, but an empty repository is fine.
pub const CLONE: Requirements = Requirements {
    name: "clone",
    clean_worktree: true,
    branch_head: true,
    allow_unborn: true,
};

/// Validated repository snapshot handed to the operations.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Where HEAD pointed when the command started.
    pub head: Head,
}

/// Check `reqs` against the repository, running from `cwd`.
///
/// # Errors
///
/// One of the environment or state variants of [`EngineError`]; the
/// first violated requirement wins.
pub fn check(git: &Git, cwd: &Path, reqs: &Requirements) -> Result<Workspace, EngineError> {
    let (major, minor) = Git::version().map_err(|e| EngineError::GitUnavailable(e.to_string()))?;
    if (major, minor) < MIN_GIT_VERSION {
        return Err(EngineError::GitTooOld { major, minor });
    }

    // The tool only runs from the top level so that subdir arguments and
    // the discovery walk resolve against one fixed root.
    let top = git.workdir()?;
    let canonical_top = top.canonicalize().unwrap_or_else(|_| top.to_path_buf());
    let canonical_cwd = cwd.canonicalize().unwrap_or_else(|_| cwd.to_path_buf());
    if canonical_top != canonical_cwd {
        return Err(EngineError::NotTopLevel(top.display().to_string()));
    }

    let head = git.head()?;
    match &head {
        Head::Branch { name, .. } => {
            if reqs.branch_head && name.is_subrepo_branch() {
                return Err(EngineError::OnSubrepoBranch(name.clone()));
            }
        }
        Head::Detached { .. } => {
            if reqs.branch_head {
                return Err(EngineError::DetachedHead);
            }
        }
        Head::Unborn { .. } => {
            if !reqs.allow_unborn {
                return Err(EngineError::UnbornHead);
            }
        }
    }

    if reqs.clean_worktree && !git.is_worktree_clean()? {
        return Err(EngineError::DirtyWorktree);
    }

    Ok(Workspace { head })
}
