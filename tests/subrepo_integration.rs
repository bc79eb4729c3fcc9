//! End-to-end tests for the subrepo operations.
//!
//! Each test drives the engine against real temporary repositories: a
//! bare upstream (with a working clone to author commits) and a mainline
//! repository the operations run in.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use git_subrepo::core::gitrepo::GitRepo;
use git_subrepo::core::types::{BranchName, Oid, Subdir};
use git_subrepo::engine::ops::branch::{branch as branch_op, BranchOutcome, BranchTarget};
use git_subrepo::engine::ops::clean::clean as clean_op;
use git_subrepo::engine::ops::clone::{clone as clone_op, CloneOutcome, CloneParams};
use git_subrepo::engine::ops::commit::{commit as commit_op, CommitParams};
use git_subrepo::engine::ops::fetch::fetch as fetch_op;
use git_subrepo::engine::ops::pull::{pull as pull_op, PullOutcome, PullParams};
use git_subrepo::engine::ops::push::{push as push_op, PushOutcome, PushParams};
use git_subrepo::engine::ops::status::status as status_op;
use git_subrepo::engine::{preflight, Context, EngineError};
use git_subrepo::git::{BaseHandling, Git};
use git_subrepo::ui::output::Verbosity;

// =============================================================================
// Fixtures
// =============================================================================

/// Run a git command, panicking on failure.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Run a git command and return trimmed stdout.
fn run_git_out(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn configure_user(dir: &Path) {
    run_git(dir, &["config", "user.email", "test@example.com"]);
    run_git(dir, &["config", "user.name", "Test User"]);
}

/// A bare upstream repository plus a working clone to author commits.
struct Upstream {
    _root: TempDir,
    bare: PathBuf,
    work: PathBuf,
}

impl Upstream {
    /// Create an upstream named `<name>.git` with one README commit.
    fn new(name: &str) -> Self {
        let root = TempDir::new().unwrap();
        let bare = root.path().join(format!("{name}.git"));
        let work = root.path().join("work");
        run_git(root.path(), &["init", "--bare", "-b", "master", bare.to_str().unwrap()]);
        run_git(root.path(), &["init", "-b", "master", work.to_str().unwrap()]);
        configure_user(&work);
        run_git(&work, &["remote", "add", "origin", bare.to_str().unwrap()]);

        let upstream = Self {
            _root: root,
            bare,
            work,
        };
        upstream.commit_file("README.md", "# Upstream\n", "upstream initial commit");
        upstream
    }

    fn url(&self) -> String {
        self.bare.display().to_string()
    }

    /// Author and publish a commit, returning the new upstream tip.
    fn commit_file(&self, path: &str, content: &str, message: &str) -> Oid {
        let full = self.work.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
        run_git(&self.work, &["add", path]);
        run_git(&self.work, &["commit", "-m", message]);
        run_git(&self.work, &["push", "origin", "master"]);
        self.tip()
    }

    /// Current tip of the published master branch.
    fn tip(&self) -> Oid {
        Oid::new(run_git_out(&self.bare, &["rev-parse", "master"])).unwrap()
    }

    /// File content at the published tip.
    fn file_at_tip(&self, path: &str) -> String {
        run_git_out(&self.bare, &["show", &format!("master:{path}")])
    }

    /// Sorted file list of the published tip's tree.
    fn files_at_tip(&self) -> Vec<String> {
        let mut files: Vec<String> = run_git_out(&self.bare, &["ls-tree", "-r", "--name-only", "master"])
            .lines()
            .map(String::from)
            .collect();
        files.sort();
        files
    }
}

/// The host repository the operations run in.
struct Mainline {
    dir: TempDir,
}

impl Mainline {
    /// A mainline with one initial commit.
    fn new() -> Self {
        let mainline = Self::empty();
        std::fs::write(mainline.path().join("mainline.txt"), "mainline\n").unwrap();
        run_git(mainline.path(), &["add", "mainline.txt"]);
        run_git(mainline.path(), &["commit", "-m", "mainline initial commit"]);
        mainline
    }

    /// A mainline with no commits.
    fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        run_git(dir.path(), &["init", "-b", "master"]);
        configure_user(dir.path());
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn git(&self) -> Git {
        Git::open(self.path()).unwrap()
    }

    fn ctx(&self) -> Context {
        Context {
            cwd: Some(self.path().to_path_buf()),
            verbosity: Verbosity::Quiet,
            command_line: "git subrepo test".to_string(),
        }
    }

    fn head_oid(&self) -> Oid {
        Oid::new(run_git_out(self.path(), &["rev-parse", "HEAD"])).unwrap()
    }

    fn commit_count(&self) -> usize {
        run_git_out(self.path(), &["rev-list", "--count", "HEAD"])
            .parse()
            .unwrap()
    }

    /// Author a local commit in the mainline.
    fn commit_file(&self, path: &str, content: &str, message: &str) -> Oid {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
        run_git(self.path(), &["add", path]);
        run_git(self.path(), &["commit", "-m", message]);
        self.head_oid()
    }

    /// Clone `upstream` into `subdir` and return the outcome.
    fn clone_subrepo(&self, upstream: &Upstream, subdir: &str) -> CloneOutcome {
        clone_op(
            &self.git(),
            &self.ctx(),
            &CloneParams {
                url: upstream.url(),
                subdir: Some(Subdir::new(subdir).unwrap()),
                branch: None,
                force: false,
            },
        )
        .unwrap()
    }

    fn gitrepo(&self, subdir: &str) -> GitRepo {
        GitRepo::load(&self.path().join(subdir)).unwrap()
    }
}

fn subdir(s: &str) -> Subdir {
    Subdir::new(s).unwrap()
}

// =============================================================================
// Fresh clone
// =============================================================================

#[test]
fn fresh_clone_into_empty_mainline() {
    let upstream = Upstream::new("foo");
    let upstream_tip = upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::empty();
    let git = mainline.git();
    let ctx = mainline.ctx();

    // Subdir and branch both derived.
    let outcome = clone_op(
        &git,
        &ctx,
        &CloneParams {
            url: upstream.url(),
            subdir: None,
            branch: None,
            force: false,
        },
    )
    .unwrap();

    let cloned_subdir = match outcome {
        CloneOutcome::Cloned {
            subdir,
            upstream_head,
            ..
        } => {
            assert_eq!(upstream_head, upstream_tip);
            subdir
        }
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(cloned_subdir.as_str(), "foo");

    // Exactly one mainline commit; content materialised.
    assert_eq!(mainline.commit_count(), 1);
    assert_eq!(
        std::fs::read_to_string(mainline.path().join("foo/bar.txt")).unwrap(),
        "hello\n"
    );

    // The record tracks the upstream.
    let record = mainline.gitrepo("foo");
    assert_eq!(record.remote, upstream.url());
    assert_eq!(record.branch.as_str(), "master");
    assert_eq!(record.commit, Some(upstream_tip.clone()));
    assert_eq!(record.parent, None);

    // Namespace refs point at the upstream head and the squash source.
    assert_eq!(
        git.resolve_ref("refs/subrepo/foo/fetch").unwrap(),
        upstream_tip
    );
    assert_eq!(
        git.resolve_ref("refs/subrepo/foo/commit").unwrap(),
        upstream_tip
    );

    // Invariant: the subdir tree is the squashed tree plus .gitrepo.
    let mut upstream_files = upstream.files_at_tip();
    upstream_files.push(".gitrepo".to_string());
    upstream_files.sort();
    let mut subdir_files: Vec<String> =
        run_git_out(mainline.path(), &["ls-tree", "-r", "--name-only", "HEAD:foo"])
            .lines()
            .map(String::from)
            .collect();
    subdir_files.sort();
    assert_eq!(subdir_files, upstream_files);

    // The named remote exists.
    assert_eq!(
        git.remote_url("subrepo/foo").unwrap(),
        Some(upstream.url())
    );
}

#[test]
fn clone_into_nonempty_mainline_records_parent() {
    let upstream = Upstream::new("foo");
    let mainline = Mainline::new();
    let before = mainline.head_oid();

    mainline.clone_subrepo(&upstream, "foo");

    let record = mainline.gitrepo("foo");
    assert_eq!(record.parent, Some(before.clone()));
    // The squash's first parent is the recorded parent.
    let parent = run_git_out(mainline.path(), &["rev-parse", "HEAD^"]);
    assert_eq!(parent, before.as_str());
    // Only foo/ paths were touched.
    let changed = run_git_out(
        mainline.path(),
        &["diff-tree", "--no-commit-id", "--name-only", "-r", "HEAD"],
    );
    for path in changed.lines() {
        assert!(path.starts_with("foo/"), "unexpected path {path}");
    }
}

#[test]
fn clone_rejects_occupied_directory() {
    let upstream = Upstream::new("foo");
    let mainline = Mainline::new();
    mainline.commit_file("foo/existing.txt", "occupied\n", "occupy foo");

    let err = clone_op(
        &mainline.git(),
        &mainline.ctx(),
        &CloneParams {
            url: upstream.url(),
            subdir: Some(subdir("foo")),
            branch: None,
            force: false,
        },
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::TargetNotEmpty(_)));
}

// =============================================================================
// Pull with fast-forward
// =============================================================================

#[test]
fn pull_fast_forward() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");
    let head_before_pull = mainline.head_oid();

    let new_tip = upstream.commit_file("lib.txt", "lib\n", "add lib");

    let outcome = pull_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &PullParams::default(),
    )
    .unwrap();
    match outcome {
        PullOutcome::Pulled { upstream_head, .. } => assert_eq!(upstream_head, new_tip),
        other => panic!("unexpected outcome: {other:?}"),
    }

    // Tree updated, one new mainline commit, record advanced.
    assert_eq!(
        std::fs::read_to_string(mainline.path().join("foo/lib.txt")).unwrap(),
        "lib\n"
    );
    assert_eq!(mainline.commit_count(), 3);
    let record = mainline.gitrepo("foo");
    assert_eq!(record.commit, Some(new_tip));
    assert_eq!(record.parent, Some(head_before_pull));
    assert!(mainline.git().ref_exists("refs/subrepo/foo/pull"));
}

#[test]
fn second_pull_is_up_to_date() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");

    let outcome = pull_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &PullParams::default(),
    )
    .unwrap();
    assert!(matches!(outcome, PullOutcome::UpToDate(_)));
    assert_eq!(mainline.commit_count(), 2);
}

#[test]
fn pull_integrates_local_and_upstream_changes() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");

    // Local and upstream edits on different files.
    mainline.commit_file("foo/local.txt", "local\n", "local change");
    upstream.commit_file("upstream.txt", "upstream\n", "upstream change");

    let outcome = pull_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &PullParams::default(),
    )
    .unwrap();
    assert!(matches!(outcome, PullOutcome::Pulled { .. }));

    // Both edits present after the pull.
    assert_eq!(
        std::fs::read_to_string(mainline.path().join("foo/local.txt")).unwrap(),
        "local\n"
    );
    assert_eq!(
        std::fs::read_to_string(mainline.path().join("foo/upstream.txt")).unwrap(),
        "upstream\n"
    );
    // HEAD is back on master.
    assert_eq!(
        run_git_out(mainline.path(), &["rev-parse", "--abbrev-ref", "HEAD"]),
        "master"
    );
}

// =============================================================================
// Push of local edits
// =============================================================================

#[test]
fn push_local_edits_round_trip() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");

    mainline.commit_file("foo/bar.txt", "hello world\n", "local edit to bar");

    let outcome = push_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &PushParams::default(),
    )
    .unwrap();
    match outcome {
        PushOutcome::Pushed { upstream_branch, .. } => {
            assert_eq!(upstream_branch.as_str(), "master");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // Round trip: the upstream tip tree equals foo/ minus .gitrepo.
    assert_eq!(upstream.file_at_tip("bar.txt"), "hello world");
    assert!(!upstream.files_at_tip().contains(&".gitrepo".to_string()));

    // The temporary branch is gone and the push ref recorded.
    let git = mainline.git();
    assert!(!git.branch_exists(&BranchName::new("subrepo-push/foo").unwrap()));
    assert!(git.ref_exists("refs/subrepo/foo/push"));
    // The pushed commit kept the local author and message.
    let subject = run_git_out(&upstream.bare, &["log", "-1", "--format=%s", "master"]);
    assert_eq!(subject, "local edit to bar");
}

#[test]
fn second_push_has_no_new_commits() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");
    mainline.commit_file("foo/bar.txt", "hello world\n", "local edit to bar");

    let first = push_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &PushParams::default(),
    )
    .unwrap();
    assert!(matches!(first, PushOutcome::Pushed { .. }));

    let second = push_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &PushParams::default(),
    )
    .unwrap();
    assert!(matches!(second, PushOutcome::NoNewCommits));
}

#[test]
fn push_with_nothing_local_has_no_new_commits() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");

    let outcome = push_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &PushParams::default(),
    )
    .unwrap();
    assert!(matches!(outcome, PushOutcome::NoNewCommits));
}

#[test]
fn push_explicit_branch_must_exist() {
    let upstream = Upstream::new("foo");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");

    let err = push_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &PushParams {
            branch_name: Some(BranchName::new("no-such-branch").unwrap()),
            force: true,
            ..PushParams::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::NoSuchBranch(_)));
}

#[test]
fn push_update_persists_new_remote() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");

    // A second remote holding the same history.
    let fork_root = TempDir::new().unwrap();
    let fork = fork_root.path().join("fork.git");
    run_git(
        fork_root.path(),
        &["clone", "--bare", &upstream.url(), fork.to_str().unwrap()],
    );
    let fork_url = fork.display().to_string();

    mainline.commit_file("foo/bar.txt", "hello fork\n", "edit for fork");

    let outcome = push_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &PushParams {
            remote: Some(fork_url.clone()),
            update: true,
            ..PushParams::default()
        },
    )
    .unwrap();
    match outcome {
        PushOutcome::Pushed { remote, .. } => assert_eq!(remote, fork_url),
        other => panic!("unexpected outcome: {other:?}"),
    }

    // The fork received the edit; the original upstream did not.
    assert_eq!(
        run_git_out(&fork, &["show", "master:bar.txt"]),
        "hello fork"
    );
    assert_eq!(upstream.file_at_tip("bar.txt"), "hello");

    // --update recorded the new remote in .gitrepo via a mainline commit.
    assert_eq!(mainline.gitrepo("foo").remote, fork_url);
    assert!(mainline.git().is_worktree_clean().unwrap());
}

// =============================================================================
// Pull with conflict
// =============================================================================

#[test]
fn pull_conflict_reports_code_1_and_recovers() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");
    let recorded = mainline.gitrepo("foo").commit.clone();

    mainline.commit_file("foo/bar.txt", "local change\n", "local edit");
    let mainline_head = mainline.head_oid();
    upstream.commit_file("bar.txt", "upstream change\n", "upstream edit");

    let err = pull_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &PullParams::default(),
    )
    .unwrap_err();
    match &err {
        EngineError::RebaseConflict { code, message } => {
            assert_eq!(*code, 1);
            assert!(message.contains("foo"), "{message}");
            assert!(message.contains("master"), "{message}");
            assert!(message.contains("git rebase --abort"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }

    // Abort, return to the original branch, and clean up.
    run_git(mainline.path(), &["rebase", "--abort"]);
    run_git(mainline.path(), &["checkout", "master"]);
    clean_op(&mainline.git(), &mainline.ctx(), &subdir("foo"), false).unwrap();

    // The starting state is restored.
    assert_eq!(mainline.head_oid(), mainline_head);
    assert_eq!(
        std::fs::read_to_string(mainline.path().join("foo/bar.txt")).unwrap(),
        "local change\n"
    );
    assert_eq!(mainline.gitrepo("foo").commit, recorded);
    assert!(!mainline
        .git()
        .branch_exists(&BranchName::new("subrepo/foo").unwrap()));
}

// =============================================================================
// Status across many subrepos
// =============================================================================

#[test]
fn status_lists_subrepos_in_order_and_collapses_nested() {
    let upstream_a = Upstream::new("a");
    let upstream_b = Upstream::new("b");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream_b, "b");
    mainline.clone_subrepo(&upstream_a, "a");

    // A nested record under a/ must not be reported separately.
    mainline.commit_file(
        "a/vendor/c/.gitrepo",
        "[subrepo]\n\tremote = u\n\tbranch = x\n",
        "nested record",
    );

    let report = status_op(&mainline.git(), &mainline.ctx(), &[], false).unwrap();
    let names: Vec<&str> = report.entries.iter().map(|e| e.subdir.as_str()).collect();
    assert_eq!(names, ["a", "b"]);

    for entry in &report.entries {
        let record = entry.record.as_ref().expect("record parses");
        assert_eq!(record.branch.as_str(), "master");
        let labels: Vec<&str> = entry.refs.iter().map(|(l, _)| *l).collect();
        assert!(labels.contains(&"fetch"));
        assert!(labels.contains(&"commit"));
    }
}

// =============================================================================
// Forced re-clone
// =============================================================================

#[test]
fn forced_reclone_up_to_date_is_a_noop() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");
    let commits_before = mainline.commit_count();

    let outcome = clone_op(
        &mainline.git(),
        &mainline.ctx(),
        &CloneParams {
            url: upstream.url(),
            subdir: Some(subdir("foo")),
            branch: None,
            force: true,
        },
    )
    .unwrap();
    assert!(matches!(outcome, CloneOutcome::UpToDate(_)));
    assert_eq!(mainline.commit_count(), commits_before);
}

#[test]
fn forced_reclone_after_upstream_advance_resquashes() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");
    let new_tip = upstream.commit_file("bar.txt", "rewritten\n", "upstream rewrite");

    let outcome = clone_op(
        &mainline.git(),
        &mainline.ctx(),
        &CloneParams {
            url: upstream.url(),
            subdir: Some(subdir("foo")),
            branch: None,
            force: true,
        },
    )
    .unwrap();
    assert!(matches!(outcome, CloneOutcome::Cloned { .. }));
    assert_eq!(mainline.gitrepo("foo").commit, Some(new_tip));
    assert_eq!(
        std::fs::read_to_string(mainline.path().join("foo/bar.txt")).unwrap(),
        "rewritten\n"
    );
}

// =============================================================================
// branch / commit / fetch / clean
// =============================================================================

#[test]
fn branch_command_produces_clean_history() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");
    mainline.commit_file("foo/bar.txt", "hello world\n", "local edit");

    let outcome = branch_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        BranchTarget::Worktree,
        BaseHandling::Excise,
        false,
        false,
    )
    .unwrap();
    match outcome {
        BranchOutcome::Created { branch, tip, .. } => {
            assert_eq!(branch.as_str(), "subrepo/foo");
            // No .gitrepo in any commit of the synthesised branch.
            let revs = run_git_out(mainline.path(), &["rev-list", tip.as_str()]);
            for rev in revs.lines() {
                let files = run_git_out(mainline.path(), &["ls-tree", "-r", "--name-only", rev]);
                assert!(!files.contains(".gitrepo"), "{rev}: {files}");
            }
            assert!(mainline.git().ref_exists("refs/subrepo/foo/branch"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    // A second run without --force is a no-op.
    let again = branch_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        BranchTarget::Worktree,
        BaseHandling::Excise,
        false,
        false,
    )
    .unwrap();
    assert!(matches!(again, BranchOutcome::AlreadyExists(_)));
}

#[test]
fn commit_rejects_source_not_containing_upstream_head() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");

    // A stray branch unrelated to the fetched upstream head.
    run_git(mainline.path(), &["branch", "stray", "HEAD"]);

    let err = commit_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &CommitParams {
            source: Some("stray".to_string()),
            ..CommitParams::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::UpstreamNotContained { .. }));
}

#[test]
fn fetch_records_tip_and_remote() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");

    let new_tip = upstream.commit_file("bar.txt", "more\n", "more");
    let outcome = fetch_op(&mainline.git(), &mainline.ctx(), &subdir("foo"), None, None).unwrap();
    assert_eq!(outcome.upstream_head, new_tip);
    assert_eq!(
        mainline.git().resolve_ref("refs/subrepo/foo/fetch").unwrap(),
        new_tip
    );
}

#[test]
fn clean_removes_synthesised_state() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");
    mainline.commit_file("foo/bar.txt", "x\n", "edit");

    branch_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        BranchTarget::Worktree,
        BaseHandling::Excise,
        false,
        false,
    )
    .unwrap();

    let git = mainline.git();
    assert!(git.branch_exists(&BranchName::new("subrepo/foo").unwrap()));

    // Without --force the refs stay; branches and remote go.
    let outcome = clean_op(&git, &mainline.ctx(), &subdir("foo"), false).unwrap();
    assert!(!outcome.removed.is_empty());
    assert!(!git.branch_exists(&BranchName::new("subrepo/foo").unwrap()));
    assert_eq!(git.remote_url("subrepo/foo").unwrap(), None);
    assert!(git.ref_exists("refs/subrepo/foo/fetch"));

    // With --force the ref subtree goes too.
    clean_op(&git, &mainline.ctx(), &subdir("foo"), true).unwrap();
    assert!(!git.ref_exists("refs/subrepo/foo/fetch"));
    assert!(git.list_refs_by_prefix("refs/subrepo/foo/").unwrap().is_empty());
}

// =============================================================================
// Preflight
// =============================================================================

#[test]
fn preflight_rejects_dirty_worktree_for_mutating_ops() {
    let mainline = Mainline::new();
    std::fs::write(mainline.path().join("mainline.txt"), "dirty\n").unwrap();
    let err = preflight::check(&mainline.git(), mainline.path(), &preflight::MUTATING).unwrap_err();
    assert!(matches!(err, EngineError::DirtyWorktree));
    // Read-only commands still run.
    preflight::check(&mainline.git(), mainline.path(), &preflight::READ_ONLY).unwrap();
}

#[test]
fn preflight_rejects_subdirectory_invocation() {
    let mainline = Mainline::new();
    let nested = mainline.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    let err = preflight::check(&mainline.git(), &nested, &preflight::READ_ONLY).unwrap_err();
    assert!(matches!(err, EngineError::NotTopLevel(_)));
}

#[test]
fn preflight_rejects_detached_head_for_mutating_ops() {
    let mainline = Mainline::new();
    run_git(mainline.path(), &["checkout", "--detach", "HEAD"]);
    let err = preflight::check(&mainline.git(), mainline.path(), &preflight::MUTATING).unwrap_err();
    assert!(matches!(err, EngineError::DetachedHead));
}

#[test]
fn preflight_rejects_subrepo_branch_checkout() {
    let mainline = Mainline::new();
    run_git(mainline.path(), &["checkout", "-b", "subrepo/foo"]);
    let err = preflight::check(&mainline.git(), mainline.path(), &preflight::MUTATING).unwrap_err();
    assert!(matches!(err, EngineError::OnSubrepoBranch(_)));
}

#[test]
fn preflight_unborn_head_only_allowed_for_clone() {
    let mainline = Mainline::empty();
    let err = preflight::check(&mainline.git(), mainline.path(), &preflight::MUTATING).unwrap_err();
    assert!(matches!(err, EngineError::UnbornHead));
    preflight::check(&mainline.git(), mainline.path(), &preflight::CLONE).unwrap();
}

// =============================================================================
// Stale push branch
// =============================================================================

#[test]
fn push_rejects_stale_push_branch() {
    let upstream = Upstream::new("foo");
    upstream.commit_file("bar.txt", "hello\n", "add bar");
    let mainline = Mainline::new();
    mainline.clone_subrepo(&upstream, "foo");
    mainline.commit_file("foo/bar.txt", "x\n", "edit");

    run_git(mainline.path(), &["branch", "subrepo-push/foo", "HEAD"]);

    let err = push_op(
        &mainline.git(),
        &mainline.ctx(),
        &subdir("foo"),
        &PushParams::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::StalePushBranch(..)));
}
