//! git-subrepo - embed upstream Git repositories as plain subdirectories
//!
//! A subrepo is an upstream project whose content lives as ordinary tracked
//! files under a subdirectory of a host ("mainline") repository. Unlike
//! submodules, consumers of the mainline need no special setup; unlike
//! subtree merges, provenance is recorded in a single `.gitrepo` file per
//! subrepo plus local refs, never in the mainline's merge history.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Preflight gating and the subrepo operations
//! - [`core`] - Domain types, the `.gitrepo` store, the ref namespace,
//!   the commit-message builder
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - Output and paging utilities
//!
//! # Correctness Invariants
//!
//! 1. Commits created by the tool touch only `<subdir>/` paths
//! 2. The tree under `<subdir>/` at mainline HEAD equals the squashed
//!    source tree plus `.gitrepo`
//! 3. Synthesised subrepo branches never contain a `.gitrepo` file
//! 4. All ref and branch names derive from one namespace type

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod ui;
