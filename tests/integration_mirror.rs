// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for mirroring and archiving with real git and tar.
//!
//! Upstreams are local repositories, so no network access is needed.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;

use hoard::archiver::Archiver;
use hoard::forge::RepositoryDescriptor;
use hoard::git::query::{is_bare_repository, list_refs};
use hoard::mirror::MirrorManager;
use tempfile::TempDir;

fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn upstream(temp: &TempDir) -> std::path::PathBuf {
    let path = temp.path().join("upstream");
    std::fs::create_dir_all(&path).unwrap();
    git(&["init", "--quiet", "--initial-branch=main"], &path);
    git(&["config", "user.email", "test@example.com"], &path);
    git(&["config", "user.name", "Test"], &path);
    std::fs::write(path.join("README"), "hello\n").unwrap();
    git(&["add", "README"], &path);
    git(&["commit", "-m", "initial", "--quiet"], &path);
    git(&["tag", "v1"], &path);
    path
}

fn descriptor(name: &str, clone_url: &Path) -> RepositoryDescriptor {
    RepositoryDescriptor {
        owner: "acme".to_string(),
        name: name.to_string(),
        description: None,
        license: Some("MIT".to_string()),
        topics: BTreeSet::from(["infra".to_string()]),
        default_branch: Some("main".to_string()),
        clone_url: clone_url.display().to_string(),
        html_url: format!("https://github.com/acme/{name}"),
        fork: false,
        archived: false,
        private: false,
    }
}

#[tokio::test]
async fn test_mirror_then_archive_round_trip() {
    let temp = tempfile::tempdir().unwrap();
    let upstream = upstream(&temp);
    let root = temp.path().join("backups");
    let repo = descriptor("a", &upstream);

    let mirror = MirrorManager::new()
        .ensure_mirror(&repo, &root)
        .await
        .unwrap();
    assert!(is_bare_repository(&mirror.path));
    let refs = list_refs(&mirror.path).unwrap();
    assert!(refs.contains_key("refs/heads/main"));
    assert!(refs.contains_key("refs/tags/v1"));

    let artifact = Archiver::new().compress(&mirror).await.unwrap();
    assert_eq!(artifact.file_name(), "a.git.tar.gz");

    let extract = temp.path().join("extract");
    std::fs::create_dir_all(&extract).unwrap();
    let status = Command::new("tar")
        .arg("-xzf")
        .arg(&artifact.path)
        .arg("-C")
        .arg(&extract)
        .status()
        .unwrap();
    assert!(status.success());

    let restored = extract.join("a.git");
    assert!(is_bare_repository(&restored));
    assert_eq!(list_refs(&restored).unwrap(), refs);
    assert_eq!(
        git(&["cat-file", "-p", "main:README"], &restored),
        "hello"
    );
}

#[tokio::test]
async fn test_refs_only_grow_across_runs() {
    let temp = tempfile::tempdir().unwrap();
    let upstream = upstream(&temp);
    let root = temp.path().join("backups");
    let repo = descriptor("a", &upstream);
    let manager = MirrorManager::new();

    git(&["branch", "topic"], &upstream);
    let mirror = manager.ensure_mirror(&repo, &root).await.unwrap();
    let first = list_refs(&mirror.path).unwrap();

    git(&["branch", "-D", "topic"], &upstream);
    git(&["tag", "-d", "v1"], &upstream);
    git(&["commit", "--allow-empty", "-m", "second", "--quiet"], &upstream);
    manager.ensure_mirror(&repo, &root).await.unwrap();
    let second = list_refs(&mirror.path).unwrap();

    let first_names: BTreeSet<_> = first.keys().collect();
    let second_names: BTreeSet<_> = second.keys().collect();
    assert!(first_names.is_subset(&second_names));
    assert_ne!(first["refs/heads/main"], second["refs/heads/main"]);
}

#[tokio::test]
async fn test_token_never_lands_in_mirror_config() {
    let temp = tempfile::tempdir().unwrap();
    let upstream = upstream(&temp);
    let root = temp.path().join("backups");

    let mirror = MirrorManager::new()
        .with_token("ghp_secret_value")
        .ensure_mirror(&descriptor("a", &upstream), &root)
        .await
        .unwrap();

    let config = std::fs::read_to_string(mirror.path.join("config")).unwrap();
    assert!(!config.contains("ghp_secret_value"));
    assert!(!config.contains("credential"));
}

#[tokio::test]
async fn test_relative_output_root() {
    let temp = tempfile::tempdir().unwrap();
    let upstream = upstream(&temp);
    let repo = descriptor("a", &upstream);
    let manager = MirrorManager::new();
    std::env::set_current_dir(temp.path()).unwrap();

    let mirror = manager
        .ensure_mirror(&repo, Path::new("./backups"))
        .await
        .unwrap();
    assert!(mirror.path.is_absolute());
    assert!(is_bare_repository(&temp.path().join("backups").join("a.git")));
    assert!(!temp.path().join("backups").join("backups").exists());

    // The second run takes the update path on the same mirror.
    manager
        .ensure_mirror(&repo, Path::new("./backups"))
        .await
        .unwrap();
    let artifact = Archiver::new().compress(&mirror).await.unwrap();
    assert!(artifact.path.ends_with("backups/a.git.tar.gz"));
    assert!(temp.path().join("backups").join("a.git.tar.gz").is_file());
}
