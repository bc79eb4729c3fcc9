//! core
//!
//! Domain types, the `.gitrepo` store, the subrepo ref namespace, and the
//! commit-message builder. Everything here is pure: no module under
//! `core` touches the repository.

pub mod gitrepo;
pub mod message;
pub mod refs;
pub mod types;
