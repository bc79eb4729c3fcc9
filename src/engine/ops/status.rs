//! engine::ops::status
//!
//! Discover subrepos and report their recorded state.
//!
//! Discovery walks the worktree for files named `.gitrepo`, skipping
//! anything under a `.git` directory, and collapses nested subrepos to
//! the outermost. The same walk backs `--all` on the other commands.

use std::path::Path;

use walkdir::WalkDir;

use crate::core::gitrepo::GitRepo;
use crate::core::refs::RefSpace;
use crate::core::types::{Oid, Subdir, GITREPO_FILE};
use crate::engine::{Context, EngineError};
use crate::git::Git;

use super::fetch;

/// Status of one subrepo.
#[derive(Debug, Clone)]
pub struct StatusEntry {
    /// The subrepo's subdir.
    pub subdir: Subdir,
    /// The parsed record, or the parse failure rendered as text.
    pub record: Result<GitRepo, String>,
    /// The well-known refs that exist, as `(label, id)` pairs in the
    /// fixed branch/commit/fetch/pull/push order.
    pub refs: Vec<(&'static str, Oid)>,
}

/// Full status report.
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// One entry per subrepo, lexicographically ordered.
    pub entries: Vec<StatusEntry>,
}

/// Report the state of `subdirs`, or of every discovered subrepo when
/// empty. With `do_fetch`, each subrepo is fetched first.
pub fn status(
    git: &Git,
    ctx: &Context,
    subdirs: &[Subdir],
    do_fetch: bool,
) -> Result<StatusReport, EngineError> {
    let subdirs = if subdirs.is_empty() {
        discover(git.workdir()?)
    } else {
        subdirs.to_vec()
    };

    let mut entries = Vec::with_capacity(subdirs.len());
    for subdir in subdirs {
        if do_fetch {
            fetch::fetch(git, ctx, &subdir, None, None)?;
        }
        let record = GitRepo::load(&git.workdir()?.join(subdir.as_path()))
            .map_err(|e| e.to_string());

        let refspace = RefSpace::new(subdir.clone());
        let mut refs = Vec::new();
        for (label, refname) in refspace.known_refs() {
            if let Some(oid) = git.try_resolve_ref(&refname)? {
                refs.push((label, oid));
            }
        }
        entries.push(StatusEntry {
            subdir,
            record,
            refs,
        });
    }

    Ok(StatusReport { entries })
}

/// Walk `root` for subrepos: directories holding a `.gitrepo` file,
/// outside `.git`, canonicalised relative to `root`, sorted, with
/// nested subrepos collapsed to the outermost.
pub fn discover(root: &Path) -> Vec<Subdir> {
    let mut found: Vec<Subdir> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == GITREPO_FILE)
        .filter_map(|entry| {
            let dir = entry.path().parent()?;
            let relative = dir.strip_prefix(root).ok()?;
            Subdir::new(relative.to_string_lossy()).ok()
        })
        .collect();
    found.sort();

    let mut outermost: Vec<Subdir> = Vec::new();
    for subdir in found {
        if !outermost.iter().any(|outer| outer.contains(&subdir)) {
            outermost.push(subdir);
        }
    }
    outermost
}
