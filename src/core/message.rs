//! core::message
//!
//! Builder for the canonical squash-commit message.
//!
//! Every mainline commit created by `clone`/`pull`/`commit` carries a
//! deterministic, machine-parseable message:
//!
//! ```text
//! git subrepo clone https://example.com/foo.git foo
//!
//! subrepo:
//!   subdir:   "foo"
//!   merged:   "1234567"
//! upstream:
//!   origin:   "https://example.com/foo.git"
//!   branch:   "master"
//!   commit:   "89abcde"
//! git-subrepo:
//!   version:  "0.1.0"
//! ```
//!
//! The tool's own provenance lines (`origin`/`commit` under
//! `git-subrepo:`) are emitted only when derivable, i.e. baked in at
//! build time.

use crate::core::types::{BranchName, Oid, Subdir};

/// Abbreviation width for object ids in commit messages.
const SHORT: usize = 7;

/// Tool version recorded in messages and in `.gitrepo` `cmdver`.
pub const CMDVER: &str = env!("CARGO_PKG_VERSION");

/// Repository the tool itself was built from, when baked in.
const TOOL_ORIGIN: Option<&str> = option_env!("GIT_SUBREPO_BUILD_ORIGIN");

/// Commit the tool itself was built from, when baked in.
const TOOL_COMMIT: Option<&str> = option_env!("GIT_SUBREPO_BUILD_COMMIT");

/// Inputs for one squash-commit message.
#[derive(Debug, Clone)]
pub struct CommitMessage<'a> {
    /// The full invocation, e.g. `git subrepo pull foo`.
    pub command_line: &'a str,
    /// Optional user-supplied subject replacing the invocation line.
    pub subject: Option<&'a str>,
    pub subdir: &'a Subdir,
    /// The source commit squashed into the mainline.
    pub merged: &'a Oid,
    pub remote: &'a str,
    pub branch: &'a BranchName,
    /// Upstream head recorded in `.gitrepo`, when one was fetched.
    pub upstream_commit: Option<&'a Oid>,
}

impl CommitMessage<'_> {
    /// Render the full commit message.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(self.subject.unwrap_or(self.command_line).trim_end());
        out.push_str("\n\n");

        out.push_str("subrepo:\n");
        push_kv(&mut out, "subdir", self.subdir.as_str());
        push_kv(&mut out, "merged", self.merged.short(SHORT));

        out.push_str("upstream:\n");
        push_kv(&mut out, "origin", self.remote);
        push_kv(&mut out, "branch", self.branch.as_str());
        if let Some(commit) = self.upstream_commit {
            push_kv(&mut out, "commit", commit.short(SHORT));
        }

        out.push_str("git-subrepo:\n");
        push_kv(&mut out, "version", CMDVER);
        if let Some(origin) = TOOL_ORIGIN {
            push_kv(&mut out, "origin", origin);
        }
        if let Some(commit) = TOOL_COMMIT {
            push_kv(&mut out, "commit", commit);
        }
        out
    }
}

fn push_kv(out: &mut String, key: &str, value: &str) {
    // Two-space indent, nine-character key column.
    out.push_str(&format!("  {:<9} \"{}\"\n", format!("{key}:"), value));
}
