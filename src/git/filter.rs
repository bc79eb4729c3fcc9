//! git::filter
//!
//! History rewrite for synthesising the upstream-equivalent subrepo
//! branch.
//!
//! The rewrite converts the mainline range `base..head` into a branch
//! whose tree history is rooted at `<subdir>`. It collapses three
//! conceptual filters into one topological walk:
//!
//! 1. **Parent drop**: parents equal to the pull base are removed,
//!    detaching the range from earlier mainline history. The oldest
//!    commit to end up rootless is the former pull-base squash.
//! 2. **Subdirectory re-root** with `.gitrepo` removal: each commit's
//!    tree becomes its `<subdir>` tree minus the state file; commits
//!    whose rewritten tree equals their single rewritten parent's tree
//!    collapse away.
//! 3. **Pull-base handling**, by [`BaseHandling`]:
//!    - `Excise` drops the former pull-base squash entirely, so the
//!      branch root is the first real subrepo change (the shape the
//!      `branch` command publishes);
//!    - `Keep` leaves it in place as the root. Its tree equals the
//!      last-pulled upstream tree, which is exactly the merge base a
//!      later `rebase --onto` needs to replay the local changes
//!      three-way. `pull` and `push` use this shape.
//!
//! New commits are emitted through tree/commit construction with an
//! old-to-new id map. The walk never touches the index or worktree, so
//! failure needs no recovery reset.

use std::collections::HashMap;

use crate::core::types::{Oid, Subdir, GITREPO_FILE};
use crate::git::interface::{Git, GitError};

/// What to do with the rewritten pull-base squash commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseHandling {
    /// Drop it; its children become roots.
    Excise,
    /// Keep it as the root of the rewritten history.
    Keep,
}

/// Result of the history rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Every commit in the range collapsed away: there is no local
    /// subrepo change since the last clone/pull.
    NoNewCommits,
    /// The rewritten branch.
    Rewritten {
        /// Tip of the rewritten history.
        tip: Oid,
        /// The rewritten pull base, when [`BaseHandling::Keep`] was
        /// asked for and a base existed in the range.
        base: Option<Oid>,
        /// Number of commits emitted.
        commits: usize,
    },
}

impl Git {
    /// Rewrite `base..head` into subrepo-branch history for `subdir`.
    ///
    /// With `base == None` (subrepo cloned into an empty repository) the
    /// whole history behind `head` is rewritten.
    ///
    /// # Errors
    ///
    /// Fails only on object-database errors; an empty result is the
    /// [`FilterOutcome::NoNewCommits`] value, not an error.
    pub fn filter_subrepo_history(
        &self,
        base: Option<&Oid>,
        head: &Oid,
        subdir: &Subdir,
        base_handling: BaseHandling,
    ) -> Result<FilterOutcome, GitError> {
        let head_id = git2::Oid::from_str(head.as_str()).map_err(GitError::from)?;

        let mut revwalk = self.repo.revwalk().map_err(GitError::from)?;
        revwalk
            .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE)
            .map_err(GitError::from)?;
        revwalk.push(head_id).map_err(GitError::from)?;
        let base_id = match base {
            Some(oid) => {
                let id = git2::Oid::from_str(oid.as_str()).map_err(GitError::from)?;
                revwalk.hide(id).map_err(GitError::from)?;
                Some(id)
            }
            None => None,
        };

        // old commit id -> rewritten commit id (None once excised or
        // collapsed into an excised commit)
        let mut map: HashMap<git2::Oid, Option<git2::Oid>> = HashMap::new();
        // old commit id -> rewritten tree id
        let mut trees: HashMap<git2::Oid, git2::Oid> = HashMap::new();
        let mut rewritten_base: Option<git2::Oid> = None;
        let mut base_seen = false;
        let mut emitted = 0usize;

        for old_id in revwalk {
            let old_id = old_id.map_err(GitError::from)?;
            let commit = self.repo.find_commit(old_id).map_err(GitError::from)?;

            // Parent drop: the pull base and any lineage outside the
            // range detach; surviving parents are peers inside the range.
            let old_parents: Vec<git2::Oid> = commit
                .parent_ids()
                .filter(|id| Some(*id) != base_id && map.contains_key(id))
                .collect();

            let new_tree = self.subdir_tree_without_gitrepo(&commit, subdir)?;
            trees.insert(old_id, new_tree);

            // The oldest commit to end up rootless is the former pull
            // base squash; upstream already has its content.
            if old_parents.is_empty() && !base_seen {
                base_seen = true;
                match base_handling {
                    BaseHandling::Excise => {
                        map.insert(old_id, None);
                    }
                    BaseHandling::Keep => {
                        let new_id = self.emit_commit(&commit, new_tree, &[])?;
                        rewritten_base = Some(new_id);
                        map.insert(old_id, Some(new_id));
                        emitted += 1;
                    }
                }
                continue;
            }

            // Collapse commits that leave the subdir untouched.
            if let [only] = old_parents.as_slice() {
                if trees[only] == new_tree {
                    let inherited = map[only];
                    map.insert(old_id, inherited);
                    continue;
                }
            }

            let mut new_parents: Vec<git2::Oid> = Vec::new();
            for old_parent in &old_parents {
                if let Some(mapped) = map[old_parent] {
                    if !new_parents.contains(&mapped) {
                        new_parents.push(mapped);
                    }
                }
            }

            let new_id = self.emit_commit(&commit, new_tree, &new_parents)?;
            map.insert(old_id, Some(new_id));
            emitted += 1;
        }

        let tip = map.get(&head_id).copied().flatten();
        match tip {
            // Nothing survived, or only the kept base did.
            None => Ok(FilterOutcome::NoNewCommits),
            Some(tip) if Some(tip) == rewritten_base => Ok(FilterOutcome::NoNewCommits),
            Some(tip) => Ok(FilterOutcome::Rewritten {
                tip: Oid::new(tip.to_string())?,
                base: match rewritten_base {
                    Some(id) => Some(Oid::new(id.to_string())?),
                    None => None,
                },
                commits: emitted,
            }),
        }
    }

    /// The tree of `commit` at `subdir` with `.gitrepo` removed; the
    /// empty tree when the subdir does not exist in that commit.
    fn subdir_tree_without_gitrepo(
        &self,
        commit: &git2::Commit<'_>,
        subdir: &Subdir,
    ) -> Result<git2::Oid, GitError> {
        let root = commit.tree().map_err(GitError::from)?;
        let entry = match root.get_path(subdir.as_path()) {
            Ok(entry) if entry.kind() == Some(git2::ObjectType::Tree) => entry,
            _ => return self.empty_tree(),
        };
        let tree = self.repo.find_tree(entry.id()).map_err(GitError::from)?;
        if tree.get_name(GITREPO_FILE).is_none() {
            return Ok(tree.id());
        }
        let mut builder = self.repo.treebuilder(Some(&tree)).map_err(GitError::from)?;
        builder.remove(GITREPO_FILE).map_err(GitError::from)?;
        builder.write().map_err(GitError::from)
    }

    fn empty_tree(&self) -> Result<git2::Oid, GitError> {
        self.repo
            .treebuilder(None)
            .map_err(GitError::from)?
            .write()
            .map_err(GitError::from)
    }

    /// Emit a rewritten commit preserving author, committer, and message.
    fn emit_commit(
        &self,
        original: &git2::Commit<'_>,
        tree: git2::Oid,
        parents: &[git2::Oid],
    ) -> Result<git2::Oid, GitError> {
        let tree = self.repo.find_tree(tree).map_err(GitError::from)?;
        let mut parent_commits = Vec::with_capacity(parents.len());
        for id in parents {
            parent_commits.push(self.repo.find_commit(*id).map_err(GitError::from)?);
        }
        let parent_refs: Vec<&git2::Commit<'_>> = parent_commits.iter().collect();
        let message = original.message_raw().unwrap_or("");
        self.repo
            .commit(
                None,
                &original.author(),
                &original.committer(),
                message,
                &tree,
                &parent_refs,
            )
            .map_err(GitError::from)
    }
}
