//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! Each subcommand variant carries exactly the options that command
//! allows, so the per-command option whitelist is enforced by
//! construction. Combination rules clap cannot express (`--update`
//! needing `--branch` or `--remote`, a subdir argument being required
//! unless `--all`) are validated in the handlers.
//!
//! # Global Flags
//!
//! - `--cwd <path>`: run as if started in that directory
//! - `--quiet` / `-q`: minimal output
//! - `--verbose` / `-v`: extra detail
//! - `--debug`: internal steps to stderr
//!
//! The environment variables `GIT_SUBREPO_QUIET`, `GIT_SUBREPO_VERBOSE`,
//! and `GIT_SUBREPO_DEBUG` preset the corresponding flags.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// git-subrepo - embed upstream repositories as plain subdirectories
#[derive(Parser, Debug)]
#[command(name = "git-subrepo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if git-subrepo was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Extra detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import an upstream repository as a new subrepo
    #[command(name = "clone")]
    Clone {
        /// Upstream repository URL
        url: String,

        /// Target subdirectory (derived from the URL when omitted)
        subdir: Option<String>,

        /// Upstream branch to track (remote default when omitted)
        #[arg(short, long)]
        branch: Option<String>,

        /// Re-clone over an existing subrepo
        #[arg(short, long)]
        force: bool,
    },

    /// Pull new upstream commits into a subrepo
    #[command(name = "pull")]
    Pull {
        /// Subrepo to pull
        #[arg(conflicts_with = "all")]
        subdir: Option<String>,

        /// Pull every subrepo
        #[arg(long)]
        all: bool,

        /// Upstream branch override
        #[arg(short, long)]
        branch: Option<String>,

        /// Upstream URL override
        #[arg(short, long)]
        remote: Option<String>,

        /// Persist --branch/--remote into .gitrepo
        #[arg(short, long)]
        update: bool,
    },

    /// Push local subrepo changes back upstream
    #[command(name = "push")]
    Push {
        /// Subrepo to push
        #[arg(conflicts_with = "all")]
        subdir: Option<String>,

        /// Existing branch to push as-is (skips synthesis)
        branch_name: Option<String>,

        /// Push every subrepo
        #[arg(long)]
        all: bool,

        /// Upstream branch override
        #[arg(short, long)]
        branch: Option<String>,

        /// Force-push and skip the upstream-containment check
        #[arg(short, long)]
        force: bool,

        /// Upstream URL override
        #[arg(short, long)]
        remote: Option<String>,

        /// Persist --branch/--remote into .gitrepo
        #[arg(short, long)]
        update: bool,
    },

    /// Fetch the upstream branch of a subrepo
    #[command(name = "fetch")]
    Fetch {
        /// Subrepo to fetch
        #[arg(conflicts_with = "all")]
        subdir: Option<String>,

        /// Fetch every subrepo
        #[arg(long)]
        all: bool,

        /// Upstream branch override
        #[arg(short, long)]
        branch: Option<String>,

        /// Upstream URL override
        #[arg(short, long)]
        remote: Option<String>,
    },

    /// Synthesise the upstream-equivalent branch of a subrepo
    #[command(name = "branch")]
    Branch {
        /// Subrepo to branch
        #[arg(conflicts_with = "all")]
        subdir: Option<String>,

        /// Branch every subrepo
        #[arg(long)]
        all: bool,

        /// Fetch before branching
        #[arg(short = 'F', long)]
        fetch: bool,

        /// Replace an existing subrepo branch
        #[arg(short, long)]
        force: bool,
    },

    /// Squash a commit's tree into the subrepo's subdir
    #[command(name = "commit")]
    Commit {
        /// Subrepo to commit into
        subdir: String,

        /// Commit to squash (defaults to branch subrepo/<subdir>)
        commit_ref: Option<String>,

        /// Fetch before committing
        #[arg(short = 'F', long)]
        fetch: bool,

        /// Skip the upstream-containment check
        #[arg(short, long)]
        force: bool,

        /// Replace the generated commit subject
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show the state of subrepos
    #[command(name = "status")]
    Status {
        /// Subrepos to report (all discovered when omitted)
        subdirs: Vec<String>,

        /// Fetch each subrepo before reporting
        #[arg(short = 'F', long)]
        fetch: bool,
    },

    /// Remove synthesised branches, remotes, and refs of a subrepo
    #[command(name = "clean")]
    Clean {
        /// Subrepo to clean
        #[arg(conflicts_with = "all")]
        subdir: Option<String>,

        /// Clean every subrepo
        #[arg(long)]
        all: bool,

        /// Also delete the refs/subrepo/<subdir>/ subtree
        #[arg(short, long)]
        force: bool,
    },

    /// Print the tool version
    #[command(name = "version")]
    Version,
}
