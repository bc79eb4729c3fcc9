//! engine::ops
//!
//! The eight subrepo operations, one module each. Every operation is a
//! plain function over the Git driver, the `.gitrepo` store, and the
//! ref namespace; preflight runs in the CLI layer before any of them.

pub mod branch;
pub mod clean;
pub mod clone;
pub mod commit;
pub mod fetch;
pub mod pull;
pub mod push;
pub mod status;

pub use branch::{BranchOutcome, BranchTarget};
pub use clean::CleanOutcome;
pub use clone::{CloneOutcome, CloneParams};
pub use commit::{CommitOutcome, CommitParams};
pub use fetch::FetchOutcome;
pub use pull::{PullOutcome, PullParams};
pub use push::{PushOutcome, PushParams};
pub use status::{StatusEntry, StatusReport};
