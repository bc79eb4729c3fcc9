//! core::types
//!
//! Strong types for core domain concepts.
//!
//! - [`Oid`] - Git object identifier (SHA)
//! - [`BranchName`] - Validated Git branch name
//! - [`Subdir`] - Validated subrepo directory path, relative to the
//!   mainline top level
//!
//! These types enforce validity at construction time, so invalid values
//! cannot flow into ref names or worktree paths.
//!
//! # Examples
//!
//! ```
//! use git_subrepo::core::types::{BranchName, Oid, Subdir};
//!
//! let branch = BranchName::new("release/1.x").unwrap();
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! let subdir = Subdir::new("vendor/libfoo").unwrap();
//!
//! assert_eq!(oid.short(7), "abc123d");
//! assert_eq!(subdir.as_str(), "vendor/libfoo");
//! assert!(Subdir::new("../escape").is_err());
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid subrepo directory: {0}")]
    InvalidSubdir(String),
}

/// A Git object identifier (SHA-1 or SHA-256), normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` unless the string is 40 or 64 hex
    /// characters.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(Self(oid))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get an abbreviated form: the first `len` characters (or the whole
    /// id when shorter).
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Git branch name.
///
/// Enforces the `git check-ref-format` rules the tool can hit in practice:
/// no empty names, no leading `.` or `-`, no trailing `/` or `.lock`, no
/// `..`, `@{`, `//`, control characters, or ` ~^:\?*[`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's
    /// refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let fail = |why: &str| Err(TypeError::InvalidBranchName(why.to_string()));

        if name.is_empty() {
            return fail("branch name cannot be empty");
        }
        if name == "@" {
            return fail("branch name cannot be '@'");
        }
        if name.starts_with('.') || name.starts_with('-') {
            return fail("branch name cannot start with '.' or '-'");
        }
        if name.ends_with('/') || name.ends_with(".lock") {
            return fail("branch name cannot end with '/' or '.lock'");
        }
        for bad in ["..", "@{", "//"] {
            if name.contains(bad) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{bad}'"
                )));
            }
        }
        for c in name.chars() {
            if c.is_ascii_control() || " ~^:\\?*[".contains(c) {
                return fail("branch name contains a forbidden character");
            }
        }
        for component in name.split('/') {
            if component.starts_with('.') || component.ends_with(".lock") {
                return fail("branch name component cannot start with '.' or end with '.lock'");
            }
        }
        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this branch lives in a synthesised-branch namespace
    /// (`subrepo/` or `subrepo-push/`).
    pub fn is_subrepo_branch(&self) -> bool {
        self.0.starts_with("subrepo/") || self.0.starts_with("subrepo-push/")
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subrepo directory, as a normalized path relative to the mainline
/// top level.
///
/// Trailing slashes are stripped. The path must be relative, must not
/// contain `.`, `..`, or `.git` components, and must not be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subdir(String);

impl Subdir {
    /// Create a new validated subdir.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSubdir` for absolute paths, traversal
    /// components, `.git` components, or empty input.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let mut path = path.into().replace('\\', "/");
        while path.ends_with('/') {
            path.pop();
        }
        if path.is_empty() {
            return Err(TypeError::InvalidSubdir("subdir cannot be empty".into()));
        }
        if path.starts_with('/') || path.contains(':') {
            return Err(TypeError::InvalidSubdir(format!(
                "subdir must be relative: {path}"
            )));
        }
        for component in path.split('/') {
            match component {
                "" => {
                    return Err(TypeError::InvalidSubdir(format!(
                        "subdir contains an empty component: {path}"
                    )))
                }
                "." | ".." => {
                    return Err(TypeError::InvalidSubdir(format!(
                        "subdir cannot traverse: {path}"
                    )))
                }
                ".git" => {
                    return Err(TypeError::InvalidSubdir(format!(
                        "subdir cannot contain a .git component: {path}"
                    )))
                }
                _ => {}
            }
        }
        Ok(Self(path))
    }

    /// Derive a subdir from a clone URL: the final path component with any
    /// trailing `/` and `.git` stripped.
    ///
    /// The derived name must match `[A-Za-z0-9-]+`; anything else is
    /// rejected so the user has to name the target explicitly.
    ///
    /// # Example
    ///
    /// ```
    /// use git_subrepo::core::types::Subdir;
    ///
    /// let s = Subdir::derive_from_url("https://example.com/path/foo.git").unwrap();
    /// assert_eq!(s.as_str(), "foo");
    /// assert!(Subdir::derive_from_url("https://example.com/we_ird.git").is_err());
    /// ```
    pub fn derive_from_url(url: &str) -> Result<Self, TypeError> {
        let trimmed = url.trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        let last = trimmed
            .rsplit(['/', ':'])
            .next()
            .unwrap_or_default()
            .to_string();
        if last.is_empty() || !last.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(TypeError::InvalidSubdir(format!(
                "cannot derive a subdir name from '{url}'; pass one explicitly"
            )));
        }
        Self::new(last)
    }

    /// Get the subdir as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the subdir as a relative `Path`.
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// The worktree path of this subrepo's `.gitrepo` file, relative to
    /// the mainline top level.
    pub fn gitrepo_path(&self) -> PathBuf {
        self.as_path().join(GITREPO_FILE)
    }

    /// The path components, in order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Check whether `other` is nested inside this subdir.
    pub fn contains(&self, other: &Subdir) -> bool {
        other.0.len() > self.0.len()
            && other.0.starts_with(&self.0)
            && other.0.as_bytes()[self.0.len()] == b'/'
    }
}

/// File name of the per-subrepo state file.
pub const GITREPO_FILE: &str = ".gitrepo";

impl TryFrom<String> for Subdir {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Subdir> for String {
    fn from(subdir: Subdir) -> Self {
        subdir.0
    }
}

impl AsRef<str> for Subdir {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Subdir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
