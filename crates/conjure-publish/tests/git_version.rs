//! Version detection against real git repositories created with the git CLI.

use std::fs;
use std::path::Path;
use std::process::Command;

use conjure_core::VersionProvider;
use conjure_publish::{GitVersionSource, PublishError};

fn run_git(repo: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn init_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir should create");
    run_git(dir.path(), &["init", "--initial-branch=main"]);
    run_git(dir.path(), &["config", "user.email", "test@conjure.dev"]);
    run_git(dir.path(), &["config", "user.name", "Conjure Test"]);
    run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
    dir
}

fn commit(repo: &Path, file: &str, content: &str) {
    fs::write(repo.join(file), content).expect("write file");
    run_git(repo, &["add", file]);
    run_git(repo, &["commit", "-m", &format!("update {file}")]);
}

#[test]
fn tagged_commit_strips_leading_v() {
    let repo = init_repo();
    commit(repo.path(), "README.md", "# api\n");
    run_git(repo.path(), &["tag", "v1.2.3"]);

    let source = GitVersionSource::new(repo.path());
    assert_eq!(source.version().expect("version"), "1.2.3");
    assert_eq!(source.project_version().expect("version"), "1.2.3");
}

#[test]
fn commits_after_tag_use_describe_suffix() {
    let repo = init_repo();
    commit(repo.path(), "README.md", "# api\n");
    run_git(repo.path(), &["tag", "1.0.0"]);
    commit(repo.path(), "api.yml", "types: {}\n");

    let version = GitVersionSource::new(repo.path())
        .version()
        .expect("version");
    assert!(version.starts_with("1.0.0-1-g"), "{version}");
    assert!(!version.ends_with(".dirty"), "{version}");
}

#[test]
fn uncommitted_changes_mark_version_dirty() {
    let repo = init_repo();
    commit(repo.path(), "README.md", "# api\n");
    run_git(repo.path(), &["tag", "v0.4.0"]);
    fs::write(repo.path().join("README.md"), "# changed\n").expect("write file");

    let version = GitVersionSource::new(repo.path())
        .version()
        .expect("version");
    assert_eq!(version, "0.4.0.dirty");
}

#[test]
fn repository_without_tags_is_a_git_error() {
    let repo = init_repo();
    commit(repo.path(), "README.md", "# api\n");

    let err = GitVersionSource::new(repo.path()).version().unwrap_err();
    assert!(matches!(err, PublishError::Git(_)), "{err}");
}

#[test]
fn subdirectory_of_checkout_is_discovered() {
    let repo = init_repo();
    commit(repo.path(), "README.md", "# api\n");
    run_git(repo.path(), &["tag", "v3.0.0"]);
    let nested = repo.path().join("services/api");
    fs::create_dir_all(&nested).expect("mkdir");

    let version = GitVersionSource::new(&nested).version().expect("version");
    assert_eq!(version, "3.0.0");
}
