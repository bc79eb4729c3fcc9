//! git
//!
//! Single interface for all Git operations.
//!
//! This module is the only doorway to Git. All repository reads and
//! writes flow through [`Git`]; no other module imports `git2` or spawns
//! a `git` process. In-repository object and ref work uses `git2`;
//! network transfer, rebase, checkout, and reset go through the `git`
//! CLI with captured output (see [`interface`]).
//!
//! [`filter`] holds the history rewrite behind the `branch` operation.

mod filter;
mod interface;

pub use filter::{BaseHandling, FilterOutcome};
pub use interface::{Git, GitCommandResult, GitError, Head, RefEntry};
