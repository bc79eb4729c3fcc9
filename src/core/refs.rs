//! core::refs
//!
//! Centralized name routing for the subrepo ref namespace.
//!
//! All refs, synthesised branches, and named remotes belonging to a
//! subrepo derive from its subdir through [`RefSpace`]. No code outside
//! this module may assemble a `refs/subrepo/...` string by hand.
//!
//! # Namespace
//!
//! For a subrepo at `<subdir>`:
//!
//! - `refs/subrepo/<subdir>/fetch` - latest upstream fetch tip
//! - `refs/subrepo/<subdir>/branch` - tip of the last synthesised branch
//! - `refs/subrepo/<subdir>/commit` - the commit that was squashed in
//! - `refs/subrepo/<subdir>/pull` - tip recorded by the last pull
//! - `refs/subrepo/<subdir>/push` - tip recorded by the last push
//! - branch `subrepo/<subdir>` - the upstream-equivalent branch
//! - branch `subrepo-push/<subdir>` - temporary rebase target for push
//! - remote `subrepo/<subdir>` - named remote pointing at the upstream URL

use crate::core::types::{BranchName, Subdir};

/// Prefix shared by every subrepo ref.
pub const SUBREPO_REF_PREFIX: &str = "refs/subrepo/";

/// The ref and branch namespace of one subrepo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSpace {
    subdir: Subdir,
}

impl RefSpace {
    /// Create the namespace for a subdir.
    pub fn new(subdir: Subdir) -> Self {
        Self { subdir }
    }

    /// The subdir this namespace belongs to.
    pub fn subdir(&self) -> &Subdir {
        &self.subdir
    }

    /// `refs/subrepo/<subdir>/` - prefix of every ref of this subrepo.
    pub fn prefix(&self) -> String {
        format!("{}{}/", SUBREPO_REF_PREFIX, self.subdir)
    }

    /// `refs/subrepo/<subdir>/fetch`
    pub fn fetch_ref(&self) -> String {
        format!("{}fetch", self.prefix())
    }

    /// `refs/subrepo/<subdir>/branch`
    pub fn branch_ref(&self) -> String {
        format!("{}branch", self.prefix())
    }

    /// `refs/subrepo/<subdir>/commit`
    pub fn commit_ref(&self) -> String {
        format!("{}commit", self.prefix())
    }

    /// `refs/subrepo/<subdir>/pull`
    pub fn pull_ref(&self) -> String {
        format!("{}pull", self.prefix())
    }

    /// `refs/subrepo/<subdir>/push`
    pub fn push_ref(&self) -> String {
        format!("{}push", self.prefix())
    }

    /// The five well-known refs, paired with their short display labels.
    pub fn known_refs(&self) -> [(&'static str, String); 5] {
        [
            ("branch", self.branch_ref()),
            ("commit", self.commit_ref()),
            ("fetch", self.fetch_ref()),
            ("pull", self.pull_ref()),
            ("push", self.push_ref()),
        ]
    }

    /// Branch `subrepo/<subdir>`: the synthesised upstream-equivalent
    /// branch.
    pub fn worktree_branch(&self) -> BranchName {
        BranchName::new(format!("subrepo/{}", self.subdir))
            .unwrap_or_else(|_| unreachable!("subdir validated at construction"))
    }

    /// Branch `subrepo-push/<subdir>`: temporary rebase target during
    /// push.
    pub fn push_branch(&self) -> BranchName {
        BranchName::new(format!("subrepo-push/{}", self.subdir))
            .unwrap_or_else(|_| unreachable!("subdir validated at construction"))
    }

    /// Named remote `subrepo/<subdir>` pointing at the upstream URL.
    pub fn remote_name(&self) -> String {
        format!("subrepo/{}", self.subdir)
    }
}
