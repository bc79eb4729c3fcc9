//! engine
//!
//! Preflight gating and the subrepo operations.
//!
//! # Architecture
//!
//! The engine owns the algorithms behind the eight commands. Each
//! operation in [`ops`] is a plain function over the Git driver, the
//! `.gitrepo` store, and the ref namespace; the CLI layer only parses
//! arguments, runs [`preflight`], invokes the operation, and formats its
//! outcome. No-op results ("up to date", "no new commits") are modelled
//! as successful outcomes, never as errors.
//!
//! # Error taxonomy
//!
//! [`EngineError`] mirrors the failure classes the user can hit:
//! environment problems, repository-state problems (with remediation
//! hints), argument problems, upstream-ancestry violations (overridable
//! with `--force`), and rebase conflicts that are handed back to the
//! user with a recovery script.

pub mod ops;
pub mod preflight;

use std::path::PathBuf;

use thiserror::Error;

use crate::core::gitrepo::GitRepoError;
use crate::core::types::{BranchName, Subdir, TypeError};
use crate::git::GitError;
use crate::ui::output::Verbosity;

/// Per-invocation context shared by every operation.
#[derive(Debug, Clone)]
pub struct Context {
    /// Run as if started in this directory.
    pub cwd: Option<PathBuf>,
    /// Output verbosity, including environment presets.
    pub verbosity: Verbosity,
    /// The full invocation (`git subrepo pull foo ...`), recorded in
    /// squash-commit messages.
    pub command_line: String,
}

impl Context {
    /// The directory the command runs from.
    pub fn cwd(&self) -> PathBuf {
        self.cwd
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

/// Errors from subrepo operations.
#[derive(Debug, Error)]
pub enum EngineError {
    // ----- environment -----
    /// The git binary is missing or unusable.
    #[error("git is required but could not be run: {0}")]
    GitUnavailable(String),

    /// Installed git predates the supported baseline.
    #[error("git version {major}.{minor} is too old; 1.7 or newer is required")]
    GitTooOld {
        /// Detected major version
        major: u32,
        /// Detected minor version
        minor: u32,
    },

    /// The command was not run from the top level of the working tree.
    #[error("run this command from the top level of the working tree: {0}")]
    NotTopLevel(String),

    /// HEAD does not point at a branch.
    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    /// HEAD has no commits and the command needs one.
    #[error("the repository has no commits yet")]
    UnbornHead,

    /// The current branch is one of the tool's own synthesised branches.
    #[error("refusing to run from synthesised branch '{0}'; check out your working branch first")]
    OnSubrepoBranch(BranchName),

    // ----- state -----
    /// Index or worktree has uncommitted changes.
    #[error("index or working tree has uncommitted changes; commit or stash them first")]
    DirtyWorktree,

    /// Clone target exists with content and is not a forced re-clone.
    #[error("target directory '{0}' exists and is not empty; use --force to re-clone an existing subrepo")]
    TargetNotEmpty(Subdir),

    /// The directory carries no `.gitrepo` file.
    #[error("'{0}' is not a subrepo; run 'git subrepo status' to list subrepos")]
    NotASubrepo(Subdir),

    /// A leftover `subrepo-push/<subdir>` branch from an aborted push.
    #[error("branch '{0}' is left over from a previous push; push it with 'git subrepo push {1} {0}' or remove it with 'git subrepo clean {1}'")]
    StalePushBranch(BranchName, Subdir),

    /// No upstream head has been fetched yet.
    #[error("no upstream has been fetched for '{0}'; run 'git subrepo fetch {0}' first")]
    NoFetchRef(Subdir),

    /// An explicitly named branch to push does not exist.
    #[error("branch '{0}' does not exist")]
    NoSuchBranch(BranchName),

    /// The upstream default branch could not be determined.
    #[error("cannot determine the default branch of '{0}'; pass one with --branch")]
    NoDefaultBranch(String),

    // ----- arguments -----
    /// Option combination rejected after clap parsing.
    #[error("{0}")]
    Argument(String),

    // ----- upstream ancestry -----
    /// The commit being recorded or pushed does not contain the fetched
    /// upstream head.
    #[error("commit {commit} does not contain the fetched upstream head {upstream}; use --force to override")]
    UpstreamNotContained {
        /// Short id of the candidate commit
        commit: String,
        /// Short id of the fetched upstream head
        upstream: String,
    },

    // ----- conflicts and remote rejections -----
    /// A rebase stopped on conflicts; the repository is left mid-rebase
    /// and `message` carries the recovery script.
    #[error("{message}")]
    RebaseConflict {
        /// Internal code: 1 for pull, 2 for push
        code: i32,
        /// Rendered recovery instructions
        message: String,
    },

    /// The remote rejected a push.
    #[error("push to '{remote}' was rejected:\n{output}")]
    PushRejected {
        /// The remote pushed to
        remote: String,
        /// Captured git output
        output: String,
    },

    // ----- passthrough -----
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    GitRepo(#[from] GitRepoError),

    #[error(transparent)]
    Type(#[from] TypeError),
}
