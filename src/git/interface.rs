//! git::interface
//!
//! The single doorway to Git.
//!
//! All repository reads and writes flow through the [`Git`] struct. No
//! module outside `git` may import `git2` or spawn a `git` process. The
//! driver is deliberately hybrid:
//!
//! - **git2** for everything that happens inside the object database:
//!   discovery, ref resolution and mutation, ancestry queries, tree and
//!   commit construction, remote configuration.
//! - **subprocess `git`** for operations where the CLI is the contract:
//!   `fetch`, `ls-remote`, `push`, `rebase`, `checkout`, `reset`, and the
//!   version banner. Each returns a [`GitCommandResult`] with captured
//!   output, and the engine consults exit status directly.
//!
//! # Error Handling
//!
//! Git failures are normalized into typed [`GitError`] variants so the
//! engine can react distinctly (missing ref vs. failed subprocess vs.
//! unusable repository).

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::core::types::{BranchName, Oid, Subdir, TypeError, GITREPO_FILE};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository has no working tree.
    #[error("bare repository not supported")]
    BareRepo,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// A revision expression did not resolve to a commit.
    #[error("revision not found: {spec}")]
    RevisionNotFound {
        /// The revision expression
        spec: String,
    },

    /// A `git` subprocess exited nonzero where success was required.
    #[error("git {command} failed: {output}")]
    CommandFailed {
        /// The subcommand that failed
        command: String,
        /// Trimmed combined output
        output: String,
    },

    /// The `git` binary could not be spawned.
    #[error("failed to run git {command}: {message}")]
    SpawnFailed {
        /// The subcommand being run
        command: String,
        /// The OS error
        message: String,
    },

    /// Invalid object id or ref name at the boundary.
    #[error(transparent)]
    InvalidType(#[from] TypeError),

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

fn internal(err: git2::Error) -> GitError {
    GitError::Internal {
        message: err.message().to_string(),
    }
}

/// Result of one `git` subprocess invocation.
///
/// The engine inspects `success`/`exit_code` directly; there is no
/// sticky error state anywhere in the driver.
#[derive(Debug, Clone)]
pub struct GitCommandResult {
    /// Whether the command exited with status 0.
    pub success: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Exit code (-1 when terminated by signal).
    pub exit_code: i32,
}

impl GitCommandResult {
    /// Stdout and stderr joined, trimmed, for error reporting.
    pub fn combined(&self) -> String {
        let mut out = String::new();
        if !self.stdout.trim().is_empty() {
            out.push_str(self.stdout.trim());
        }
        if !self.stderr.trim().is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(self.stderr.trim());
        }
        out
    }
}

/// A ref with its name and target id.
#[derive(Debug, Clone)]
pub struct RefEntry {
    /// The full ref name
    pub name: String,
    /// The id the ref points to
    pub oid: Oid,
}

/// Where HEAD points.
///
/// Preflight needs to distinguish an unborn HEAD (permitted for `clone`
/// into an empty repository) from a detached one (never permitted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// HEAD is on a born branch.
    Branch {
        /// The branch name
        name: BranchName,
        /// The branch tip
        oid: Oid,
    },
    /// HEAD points at a branch that has no commits yet.
    Unborn {
        /// The target branch name
        name: BranchName,
    },
    /// HEAD points directly at a commit.
    Detached {
        /// The commit id
        oid: Oid,
    },
}

/// The Git driver.
///
/// Opened once per command at the mainline top level; every operation in
/// the engine goes through one of these methods.
pub struct Git {
    pub(crate) repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git").field("path", &self.repo.path()).finish()
    }
}

impl Git {
    // =========================================================================
    // Opening and repository info
    // =========================================================================

    /// Open the repository containing `path`.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working tree
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }
        Ok(Self { repo })
    }

    /// The working-tree root.
    pub fn workdir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or(GitError::BareRepo)
    }

    /// Where HEAD points; see [`Head`].
    pub fn head(&self) -> Result<Head, GitError> {
        let head_ref = self.repo.find_reference("HEAD").map_err(internal)?;
        match self.repo.head() {
            Ok(head) => {
                let oid = head.peel_to_commit().map_err(internal)?.id();
                let oid = Oid::new(oid.to_string())?;
                match head.shorthand() {
                    Some(name) if head.is_branch() => Ok(Head::Branch {
                        name: BranchName::new(name)?,
                        oid,
                    }),
                    _ => Ok(Head::Detached { oid }),
                }
            }
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                let target = head_ref
                    .symbolic_target()
                    .and_then(|t| t.strip_prefix("refs/heads/"))
                    .ok_or_else(|| GitError::Internal {
                        message: "unborn HEAD has no branch target".into(),
                    })?;
                Ok(Head::Unborn {
                    name: BranchName::new(target)?,
                })
            }
            Err(e) => Err(internal(e)),
        }
    }

    /// HEAD commit id, if HEAD is born.
    pub fn try_head_oid(&self) -> Result<Option<Oid>, GitError> {
        match self.head()? {
            Head::Branch { oid, .. } | Head::Detached { oid } => Ok(Some(oid)),
            Head::Unborn { .. } => Ok(None),
        }
    }

    /// Whether index and worktree are clean. Untracked files are not
    /// counted.
    pub fn is_worktree_clean(&self) -> Result<bool, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut opts)).map_err(internal)?;
        Ok(statuses.iter().all(|entry| {
            let s = entry.status();
            !(s.is_index_new()
                || s.is_index_modified()
                || s.is_index_deleted()
                || s.is_index_renamed()
                || s.is_index_typechange()
                || s.is_wt_modified()
                || s.is_wt_deleted()
                || s.is_wt_renamed()
                || s.is_wt_typechange()
                || s.is_conflicted())
        }))
    }

    // =========================================================================
    // Ref resolution and mutation
    // =========================================================================

    /// Resolve a full ref name to a commit id, or `None` if absent.
    pub fn try_resolve_ref(&self, refname: &str) -> Result<Option<Oid>, GitError> {
        match self.repo.find_reference(refname) {
            Ok(reference) => {
                let oid = reference.peel_to_commit().map_err(internal)?.id();
                Ok(Some(Oid::new(oid.to_string())?))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(internal(e)),
        }
    }

    /// Resolve a full ref name to a commit id.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if the ref doesn't exist
    pub fn resolve_ref(&self, refname: &str) -> Result<Oid, GitError> {
        self.try_resolve_ref(refname)?.ok_or(GitError::RefNotFound {
            refname: refname.to_string(),
        })
    }

    /// Check if a ref exists.
    pub fn ref_exists(&self, refname: &str) -> bool {
        self.repo.find_reference(refname).is_ok()
    }

    /// Resolve an arbitrary revision expression (`HEAD~2`, a branch name,
    /// an abbreviated id, a full ref) to a commit id.
    ///
    /// # Errors
    ///
    /// - [`GitError::RevisionNotFound`] if the expression doesn't resolve
    pub fn rev_parse(&self, spec: &str) -> Result<Oid, GitError> {
        let object = self
            .repo
            .revparse_single(spec)
            .map_err(|_| GitError::RevisionNotFound {
                spec: spec.to_string(),
            })?;
        let commit = object
            .peel(git2::ObjectType::Commit)
            .map_err(|_| GitError::RevisionNotFound {
                spec: spec.to_string(),
            })?;
        Ok(Oid::new(commit.id().to_string())?)
    }

    /// Abbreviate an id the way `git rev-parse --short` would.
    pub fn short_oid(&self, oid: &Oid) -> Result<String, GitError> {
        let object = self
            .repo
            .find_object(to_git2(oid)?, None)
            .map_err(internal)?;
        let short = object.short_id().map_err(internal)?;
        Ok(String::from_utf8_lossy(&short).to_string())
    }

    /// Create or move a ref.
    pub fn update_ref(&self, refname: &str, oid: &Oid, log: &str) -> Result<(), GitError> {
        self.repo
            .reference(refname, to_git2(oid)?, true, log)
            .map_err(internal)?;
        Ok(())
    }

    /// Delete a ref. Deleting an absent ref is not an error.
    pub fn delete_ref(&self, refname: &str) -> Result<(), GitError> {
        match self.repo.find_reference(refname) {
            Ok(mut reference) => reference.delete().map_err(internal),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(()),
            Err(e) => Err(internal(e)),
        }
    }

    /// List all refs whose full name starts with `prefix`.
    pub fn list_refs_by_prefix(&self, prefix: &str) -> Result<Vec<RefEntry>, GitError> {
        let pattern = format!("{prefix}*");
        let refs = self.repo.references_glob(&pattern).map_err(internal)?;
        let mut entries = Vec::new();
        for reference in refs {
            let reference = reference.map_err(internal)?;
            let Some(name) = reference.name().map(String::from) else {
                continue;
            };
            let Ok(commit) = reference.peel_to_commit() else {
                continue;
            };
            entries.push(RefEntry {
                name,
                oid: Oid::new(commit.id().to_string())?,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    // =========================================================================
    // Branches
    // =========================================================================

    /// Check if a local branch exists.
    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.repo
            .find_branch(name.as_str(), git2::BranchType::Local)
            .is_ok()
    }

    /// Create a local branch at `oid`, replacing an existing one when
    /// `force` is set.
    pub fn create_branch(&self, name: &BranchName, oid: &Oid, force: bool) -> Result<(), GitError> {
        let commit = self.repo.find_commit(to_git2(oid)?).map_err(internal)?;
        self.repo
            .branch(name.as_str(), &commit, force)
            .map_err(internal)?;
        Ok(())
    }

    /// Delete a local branch. Deleting an absent branch is not an error.
    pub fn delete_branch(&self, name: &BranchName) -> Result<(), GitError> {
        match self.repo.find_branch(name.as_str(), git2::BranchType::Local) {
            Ok(mut branch) => branch.delete().map_err(internal),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(()),
            Err(e) => Err(internal(e)),
        }
    }

    // =========================================================================
    // Ancestry
    // =========================================================================

    /// Check if `ancestor` is an ancestor of (or equal to) `descendant`.
    pub fn is_ancestor(&self, ancestor: &Oid, descendant: &Oid) -> Result<bool, GitError> {
        if ancestor == descendant {
            return Ok(true);
        }
        self.repo
            .graph_descendant_of(to_git2(descendant)?, to_git2(ancestor)?)
            .map_err(internal)
    }

    /// Count commits reachable from `tip` but not from `base`.
    /// With no `base`, counts the whole history behind `tip`.
    pub fn commit_count(&self, base: Option<&Oid>, tip: &Oid) -> Result<usize, GitError> {
        let mut revwalk = self.repo.revwalk().map_err(internal)?;
        revwalk.push(to_git2(tip)?).map_err(internal)?;
        if let Some(base) = base {
            revwalk.hide(to_git2(base)?).map_err(internal)?;
        }
        Ok(revwalk.count())
    }

    // =========================================================================
    // Tree and commit construction (squash support)
    // =========================================================================

    /// Build the squash tree: the root tree of `base` (or an empty tree)
    /// with its `<subdir>` entry replaced by the root tree of `source`
    /// plus a `.gitrepo` blob with `gitrepo_body`.
    ///
    /// Returns the new root tree id. Purely an object-database operation;
    /// index and worktree are untouched.
    pub fn squash_tree(
        &self,
        base: Option<&Oid>,
        subdir: &Subdir,
        source: &Oid,
        gitrepo_body: &str,
    ) -> Result<Oid, GitError> {
        let source_tree = self
            .repo
            .find_commit(to_git2(source)?)
            .map_err(internal)?
            .tree()
            .map_err(internal)?;

        // Subdir tree = source root tree + .gitrepo blob.
        let blob = self.repo.blob(gitrepo_body.as_bytes()).map_err(internal)?;
        let mut builder = self
            .repo
            .treebuilder(Some(&source_tree))
            .map_err(internal)?;
        builder
            .insert(GITREPO_FILE, blob, 0o100644)
            .map_err(internal)?;
        let subdir_tree = builder.write().map_err(internal)?;

        let base_tree = match base {
            Some(oid) => Some(
                self.repo
                    .find_commit(to_git2(oid)?)
                    .map_err(internal)?
                    .tree()
                    .map_err(internal)?,
            ),
            None => None,
        };

        let components: Vec<&str> = subdir.components().collect();
        let root = self.graft_tree(base_tree.as_ref(), &components, subdir_tree)?;
        Ok(Oid::new(root.to_string())?)
    }

    /// Rebuild `base` so that the entry at `components` points at
    /// `replacement`, creating intermediate trees as needed.
    fn graft_tree(
        &self,
        base: Option<&git2::Tree<'_>>,
        components: &[&str],
        replacement: git2::Oid,
    ) -> Result<git2::Oid, GitError> {
        let (first, rest) = components
            .split_first()
            .unwrap_or_else(|| unreachable!("subdir has at least one component"));

        let child = if rest.is_empty() {
            replacement
        } else {
            let existing = base
                .and_then(|tree| tree.get_name(first))
                .filter(|entry| entry.kind() == Some(git2::ObjectType::Tree))
                .and_then(|entry| self.repo.find_tree(entry.id()).ok());
            self.graft_tree(existing.as_ref(), rest, replacement)?
        };

        let mut builder = self.repo.treebuilder(base).map_err(internal)?;
        builder.insert(*first, child, 0o040000).map_err(internal)?;
        Ok(builder.write().map_err(internal)?)
    }

    /// Rewrite only `<subdir>/.gitrepo` on top of `base`, returning the
    /// new root tree id. Used by `push --update` to persist a changed
    /// remote or branch without re-squashing content.
    pub fn update_gitrepo_tree(
        &self,
        base: &Oid,
        subdir: &Subdir,
        gitrepo_body: &str,
    ) -> Result<Oid, GitError> {
        let base_tree = self
            .repo
            .find_commit(to_git2(base)?)
            .map_err(internal)?
            .tree()
            .map_err(internal)?;
        let entry = base_tree
            .get_path(subdir.as_path())
            .map_err(|_| GitError::Internal {
                message: format!("'{subdir}' is not present in the base tree"),
            })?;
        let subdir_tree = self.repo.find_tree(entry.id()).map_err(internal)?;

        let blob = self.repo.blob(gitrepo_body.as_bytes()).map_err(internal)?;
        let mut builder = self
            .repo
            .treebuilder(Some(&subdir_tree))
            .map_err(internal)?;
        builder
            .insert(GITREPO_FILE, blob, 0o100644)
            .map_err(internal)?;
        let new_subdir_tree = builder.write().map_err(internal)?;

        let components: Vec<&str> = subdir.components().collect();
        let root = self.graft_tree(Some(&base_tree), &components, new_subdir_tree)?;
        Ok(Oid::new(root.to_string())?)
    }

    /// Create a commit from a tree with the committer identity from the
    /// repository configuration. Returns the commit id; no ref is moved.
    pub fn create_commit(
        &self,
        tree: &Oid,
        parents: &[Oid],
        message: &str,
    ) -> Result<Oid, GitError> {
        let tree = self.repo.find_tree(to_git2(tree)?).map_err(internal)?;
        let mut parent_commits = Vec::with_capacity(parents.len());
        for oid in parents {
            parent_commits.push(self.repo.find_commit(to_git2(oid)?).map_err(internal)?);
        }
        let parent_refs: Vec<&git2::Commit<'_>> = parent_commits.iter().collect();
        let signature = self.repo.signature().map_err(internal)?;
        let oid = self
            .repo
            .commit(None, &signature, &signature, message, &tree, &parent_refs)
            .map_err(internal)?;
        Ok(Oid::new(oid.to_string())?)
    }

    /// Move the checked-out (or unborn) branch ref to `oid` and hard-sync
    /// index and worktree to match. Requires a clean worktree on entry.
    pub fn advance_head(&self, oid: &Oid, log: &str) -> Result<(), GitError> {
        let target = match self.head()? {
            Head::Branch { name, .. } | Head::Unborn { name } => {
                format!("refs/heads/{name}")
            }
            Head::Detached { .. } => {
                return Err(GitError::Internal {
                    message: "cannot advance a detached HEAD".into(),
                })
            }
        };
        self.update_ref(&target, oid, log)?;
        self.reset_hard(oid.as_str())
    }

    // =========================================================================
    // Remote configuration
    // =========================================================================

    /// URL of a configured remote, or `None` if absent.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(internal(e)),
        }
    }

    /// Create the named remote, or repoint it when the URL changed.
    pub fn ensure_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        match self.remote_url(name)? {
            Some(existing) if existing == url => Ok(()),
            Some(_) => self.repo.remote_set_url(name, url).map_err(internal),
            None => self.repo.remote(name, url).map(|_| ()).map_err(internal),
        }
    }

    /// Remove a named remote. Removing an absent remote is not an error.
    pub fn remove_remote(&self, name: &str) -> Result<(), GitError> {
        match self.repo.remote_delete(name) {
            Ok(()) => Ok(()),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(()),
            Err(e) => Err(internal(e)),
        }
    }

    // =========================================================================
    // Subprocess operations
    // =========================================================================

    /// Run `git <args>` at the worktree root with captured output.
    ///
    /// The call itself only fails when the process cannot be spawned;
    /// command failure is reported through [`GitCommandResult`].
    pub fn run_command(&self, args: &[&str]) -> Result<GitCommandResult, GitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.workdir()?)
            .output()
            .map_err(|e| GitError::SpawnFailed {
                command: args.first().unwrap_or(&"").to_string(),
                message: e.to_string(),
            })?;

        Ok(GitCommandResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Run `git <args>`, mapping nonzero exit to [`GitError::CommandFailed`].
    fn run_checked(&self, args: &[&str]) -> Result<GitCommandResult, GitError> {
        let result = self.run_command(args)?;
        if !result.success {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                output: result.combined(),
            });
        }
        Ok(result)
    }

    /// Fetch one branch from a remote (URL or configured name), returning
    /// the fetched tip from `FETCH_HEAD`.
    pub fn fetch(&self, remote: &str, branch: &BranchName) -> Result<Oid, GitError> {
        self.run_checked(&["fetch", "--no-tags", remote, branch.as_str()])?;
        self.read_fetch_head()
    }

    /// List a remote's refs as `(target id, ref name)` pairs, the way
    /// `git ls-remote` prints them.
    pub fn ls_remote(&self, remote: &str) -> Result<Vec<(Oid, String)>, GitError> {
        let result = self.run_checked(&["ls-remote", remote])?;
        let mut entries = Vec::new();
        for line in result.stdout.lines() {
            if let Some((oid, name)) = line.split_once('\t') {
                if let Ok(oid) = Oid::new(oid.trim()) {
                    entries.push((oid, name.trim().to_string()));
                }
            }
        }
        Ok(entries)
    }

    /// Push a local committish to `refs/heads/<branch>` on the remote.
    /// Returns the raw result; the caller decides how to report failure.
    pub fn push(
        &self,
        remote: &str,
        local: &str,
        branch: &BranchName,
        force: bool,
    ) -> Result<GitCommandResult, GitError> {
        let refspec = format!("{}:refs/heads/{}", local, branch);
        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.push(remote);
        args.push(&refspec);
        self.run_command(&args)
    }

    /// Rebase `branch` onto `onto`, replaying only the commits after
    /// `upstream` (`git rebase --onto <onto> <upstream> <branch>`).
    /// Returns the raw result; on failure the repository is left
    /// mid-rebase for the user to resolve.
    pub fn rebase_onto(
        &self,
        branch: &BranchName,
        onto: &str,
        upstream: &str,
    ) -> Result<GitCommandResult, GitError> {
        self.run_command(&["rebase", "--quiet", "--onto", onto, upstream, branch.as_str()])
    }

    /// Check out a branch.
    pub fn checkout(&self, branch: &BranchName) -> Result<(), GitError> {
        self.run_checked(&["checkout", "--quiet", branch.as_str()])?;
        Ok(())
    }

    /// Hard-reset HEAD, index, and worktree to a committish.
    pub fn reset_hard(&self, committish: &str) -> Result<(), GitError> {
        self.run_checked(&["reset", "--quiet", "--hard", committish])?;
        Ok(())
    }

    /// Read the first id recorded in `FETCH_HEAD`.
    fn read_fetch_head(&self) -> Result<Oid, GitError> {
        let path = self.repo.path().join("FETCH_HEAD");
        let content = std::fs::read_to_string(&path).map_err(|e| GitError::Internal {
            message: format!("failed to read FETCH_HEAD: {e}"),
        })?;
        let oid = content
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().next())
            .ok_or_else(|| GitError::Internal {
                message: "FETCH_HEAD is empty or malformed".into(),
            })?;
        Ok(Oid::new(oid)?)
    }

    /// The installed git version as `(major, minor)`, parsed from the
    /// `git version` banner.
    pub fn version() -> Result<(u32, u32), GitError> {
        let output = Command::new("git")
            .arg("version")
            .output()
            .map_err(|e| GitError::SpawnFailed {
                command: "version".into(),
                message: e.to_string(),
            })?;
        let banner = String::from_utf8_lossy(&output.stdout).to_string();
        parse_version_banner(&banner).ok_or(GitError::Internal {
            message: format!("unrecognized git version banner: {}", banner.trim()),
        })
    }
}

/// Parse `git version 2.39.5 (Apple Git-154)` into `(2, 39)`.
fn parse_version_banner(banner: &str) -> Option<(u32, u32)> {
    let rest = banner.trim().strip_prefix("git version ")?;
    let mut parts = rest.split(['.', ' ']);
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

fn to_git2(oid: &Oid) -> Result<git2::Oid, GitError> {
    git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::Internal {
        message: e.message().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    mod version_banner {
        use super::*;

        #[test]
        fn plain_banner() {
            assert_eq!(parse_version_banner("git version 2.39.5\n"), Some((2, 39)));
        }

        #[test]
        fn vendored_banner() {
            assert_eq!(
                parse_version_banner("git version 2.24.3 (Apple Git-128)\n"),
                Some((2, 24))
            );
        }

        #[test]
        fn two_part_version() {
            assert_eq!(parse_version_banner("git version 1.7 \n"), Some((1, 7)));
        }

        #[test]
        fn garbage_rejected() {
            assert_eq!(parse_version_banner("not git"), None);
            assert_eq!(parse_version_banner("git version x.y"), None);
        }
    }

    mod command_result {
        use super::*;

        #[test]
        fn combined_joins_streams() {
            let result = GitCommandResult {
                success: false,
                stdout: "out\n".into(),
                stderr: "err\n".into(),
                exit_code: 1,
            };
            assert_eq!(result.combined(), "out\nerr");
        }

        #[test]
        fn combined_skips_empty_streams() {
            let result = GitCommandResult {
                success: true,
                stdout: String::new(),
                stderr: "only err".into(),
                exit_code: 0,
            };
            assert_eq!(result.combined(), "only err");
        }
    }
}
