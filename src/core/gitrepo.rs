//! core::gitrepo
//!
//! The per-subrepo state file `<subdir>/.gitrepo`.
//!
//! # Format
//!
//! Git-config INI with a single `[subrepo]` section, so the file stays
//! readable with `git config --file=<f> subrepo.<key>`:
//!
//! ```text
//! ; DO NOT EDIT (unless you know what you are doing)
//! ;
//! ; This subdirectory is a git "subrepo", and this file is maintained by
//! ; the git-subrepo command.
//! ;
//! [subrepo]
//!         remote = https://example.com/foo.git
//!         branch = master
//!         commit = <upstream head at last clone/pull>
//!         parent = <mainline commit before the last squash>
//!         cmdver = 0.1.0
//! ```
//!
//! # Legacy
//!
//! Old files may carry `former` instead of `parent`. It is accepted on
//! read and surfaced for display only; writing always emits `parent`.
//!
//! # Strictness
//!
//! Parsing is strict about values (`commit`/`parent` must be object ids,
//! `branch` must be a valid branch name) but tolerant of unknown keys,
//! which are preserved nowhere - the file is regenerated wholesale on
//! every squash.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::core::types::{BranchName, Oid, TypeError};

/// Header written at the top of every generated `.gitrepo` file.
const HEADER: &str = "\
; DO NOT EDIT (unless you know what you are doing)
;
; This subdirectory is a git \"subrepo\", and this file is maintained by
; the git-subrepo command.
;
";

/// Errors from reading or writing a `.gitrepo` file.
#[derive(Debug, Error)]
pub enum GitRepoError {
    /// The file does not exist: the directory is not a subrepo.
    #[error("'{0}' is not a subrepo ({1} not found)")]
    NotASubrepo(String, &'static str),

    /// Filesystem failure while reading or writing.
    #[error("failed to access .gitrepo file: {0}")]
    Io(#[from] io::Error),

    /// Structural problem in the file.
    #[error(".gitrepo line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// A required key is absent.
    #[error(".gitrepo is missing required key 'subrepo.{0}'")]
    MissingKey(&'static str),

    /// A value failed domain validation.
    #[error(".gitrepo key 'subrepo.{key}': {source}")]
    InvalidValue {
        key: &'static str,
        source: TypeError,
    },
}

/// Parsed contents of a `.gitrepo` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRepo {
    /// Upstream URL (required).
    pub remote: String,
    /// Upstream branch tracked (required).
    pub branch: BranchName,
    /// Upstream commit last merged into mainline.
    pub commit: Option<Oid>,
    /// Mainline commit immediately before the last clone/pull squash.
    pub parent: Option<Oid>,
    /// Version of the tool that wrote the file.
    pub cmdver: Option<String>,
    /// Deprecated alias for `parent`, read-only.
    pub former: Option<Oid>,
}

impl GitRepo {
    /// Create a fresh record as written by `clone`/`commit`.
    pub fn new(remote: impl Into<String>, branch: BranchName) -> Self {
        Self {
            remote: remote.into(),
            branch,
            commit: None,
            parent: None,
            cmdver: None,
            former: None,
        }
    }

    /// The pull base: `parent`, falling back to the legacy `former` key.
    pub fn pull_base(&self) -> Option<&Oid> {
        self.parent.as_ref().or(self.former.as_ref())
    }

    /// Parse a `.gitrepo` file body.
    ///
    /// # Errors
    ///
    /// - [`GitRepoError::Malformed`] for lines that are neither comments,
    ///   section headers, nor `key = value`
    /// - [`GitRepoError::MissingKey`] when `remote` or `branch` is absent
    /// - [`GitRepoError::InvalidValue`] when a value fails validation
    pub fn parse(content: &str) -> Result<Self, GitRepoError> {
        let mut in_subrepo = false;
        let mut remote = None;
        let mut branch = None;
        let mut commit = None;
        let mut parent = None;
        let mut cmdver = None;
        let mut former = None;

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(section) = line.strip_prefix('[') {
                let section = section.strip_suffix(']').ok_or(GitRepoError::Malformed {
                    line: idx + 1,
                    message: "unterminated section header".into(),
                })?;
                in_subrepo = section.trim() == "subrepo";
                continue;
            }
            let (key, value) = line.split_once('=').ok_or(GitRepoError::Malformed {
                line: idx + 1,
                message: format!("expected 'key = value', got '{line}'"),
            })?;
            if !in_subrepo {
                continue;
            }
            let key = key.trim();
            let value = value.trim().to_string();
            match key {
                "remote" => remote = Some(value),
                "branch" => {
                    branch = Some(BranchName::new(value).map_err(|source| {
                        GitRepoError::InvalidValue {
                            key: "branch",
                            source,
                        }
                    })?)
                }
                "commit" => {
                    commit = Some(Oid::new(value).map_err(|source| GitRepoError::InvalidValue {
                        key: "commit",
                        source,
                    })?)
                }
                "parent" => {
                    parent = Some(Oid::new(value).map_err(|source| GitRepoError::InvalidValue {
                        key: "parent",
                        source,
                    })?)
                }
                "former" => {
                    former = Some(Oid::new(value).map_err(|source| GitRepoError::InvalidValue {
                        key: "former",
                        source,
                    })?)
                }
                "cmdver" => cmdver = Some(value),
                _ => {} // Unknown keys are ignored
            }
        }

        Ok(Self {
            remote: remote.ok_or(GitRepoError::MissingKey("remote"))?,
            branch: branch.ok_or(GitRepoError::MissingKey("branch"))?,
            commit,
            parent,
            cmdver,
            former,
        })
    }

    /// Render the file body, including the do-not-edit header.
    ///
    /// The legacy `former` key is never written back.
    pub fn render(&self) -> String {
        let mut out = String::from(HEADER);
        out.push_str("[subrepo]\n");
        let mut kv = |key: &str, value: &str| {
            out.push_str(&format!("\t{key} = {value}\n"));
        };
        kv("remote", &self.remote);
        kv("branch", self.branch.as_str());
        if let Some(commit) = &self.commit {
            kv("commit", commit.as_str());
        }
        if let Some(parent) = &self.parent {
            kv("parent", parent.as_str());
        }
        if let Some(cmdver) = &self.cmdver {
            kv("cmdver", cmdver);
        }
        out
    }

    /// Load the record for the subrepo rooted at `dir` (a worktree path).
    ///
    /// # Errors
    ///
    /// - [`GitRepoError::NotASubrepo`] when `dir` has no `.gitrepo` file
    pub fn load(dir: &Path) -> Result<Self, GitRepoError> {
        let path = dir.join(crate::core::types::GITREPO_FILE);
        if !path.is_file() {
            return Err(GitRepoError::NotASubrepo(
                dir.display().to_string(),
                crate::core::types::GITREPO_FILE,
            ));
        }
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Whether `dir` contains a `.gitrepo` file.
    pub fn exists(dir: &Path) -> bool {
        dir.join(crate::core::types::GITREPO_FILE).is_file()
    }
}
