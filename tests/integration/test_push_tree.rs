use treesync::{adapter::memory::MemoryServer, SyncError};

use crate::common::{syncer, syncer_with_ignore, write};

fn site() -> tempfile::TempDir {
    let local = tempfile::tempdir().unwrap();
    write(local.path(), "index.html", "<html>");
    write(local.path(), "css/site.css", "body {}");
    write(local.path(), "img/icons/logo.svg", "<svg/>");
    local
}

#[test]
fn test_push_tree_mirrors_local_tree() {
    let local = site();
    let server = MemoryServer::new();
    server.add_dir("/www");

    syncer(&server).push_tree(local.path(), "/www").unwrap();

    assert_eq!(server.file("/www/index.html").unwrap(), b"<html>");
    assert_eq!(server.file("/www/css/site.css").unwrap(), b"body {}");
    assert_eq!(server.file("/www/img/icons/logo.svg").unwrap(), b"<svg/>");
    assert_eq!(server.mkdirs(), ["/www/css", "/www/img", "/www/img/icons"]);
}

#[test]
fn test_push_tree_twice_tolerates_existing_directories() {
    let local = site();
    let server = MemoryServer::new();
    server.add_dir("/www");
    let syncer = syncer(&server);

    syncer.push_tree(local.path(), "/www").unwrap();
    server.clear_ops();
    syncer.push_tree(local.path(), "/www").unwrap();

    // Same mkdirs again, all of them answered with "exists"
    assert_eq!(server.mkdirs(), ["/www/css", "/www/img", "/www/img/icons"]);
    assert_eq!(server.puts().len(), 3);
}

#[test]
fn test_push_tree_transfer_failure_aborts_traversal() {
    let local = tempfile::tempdir().unwrap();
    write(local.path(), "a.txt", "a");
    write(local.path(), "b.txt", "b");
    write(local.path(), "c.txt", "c");
    let server = MemoryServer::new();
    server.add_dir("/www");
    server.fail_put("/www/b.txt");

    let err = syncer(&server).push_tree(local.path(), "/www").unwrap_err();

    assert!(matches!(err, SyncError::Transfer { ref remote, .. } if remote == "/www/b.txt"));
    assert_eq!(server.puts(), ["/www/a.txt", "/www/b.txt"]);
    assert!(server.file("/www/c.txt").is_none());
}

#[test]
fn test_push_tree_mkdir_permission_error_is_fatal() {
    let local = site();
    let server = MemoryServer::new();
    server.add_dir("/www");
    server.deny_mkdir("/www/css");

    let err = syncer(&server).push_tree(local.path(), "/www").unwrap_err();

    assert!(matches!(err, SyncError::Permission { .. }));
    assert!(server.puts().is_empty());
}

#[test]
fn test_push_tree_skips_git_metadata_by_default() {
    let local = site();
    write(local.path(), ".git/HEAD", "ref: refs/heads/main");
    write(local.path(), "vendor/lib/.git/config", "[core]");
    let server = MemoryServer::new();
    server.add_dir("/www");

    syncer(&server).push_tree(local.path(), "/www").unwrap();

    assert!(server.mkdirs().iter().all(|dir| !dir.contains(".git")));
    assert!(server.puts().iter().all(|file| !file.contains(".git")));
    assert!(server.is_dir("/www/vendor/lib"));
}

#[test]
fn test_push_tree_applies_configured_ignore_patterns() {
    let local = site();
    write(local.path(), "target/debug/app", "bin");
    write(local.path(), "logs/today.log", "...");
    write(local.path(), "logs/keep.txt", "k");
    let server = MemoryServer::new();
    server.add_dir("/www");

    syncer_with_ignore(&server, Some("target/\n*.log\n"))
        .push_tree(local.path(), "/www")
        .unwrap();

    assert!(!server.is_dir("/www/target"));
    assert!(server.file("/www/logs/today.log").is_none());
    assert_eq!(server.file("/www/logs/keep.txt").unwrap(), b"k");
}

#[test]
fn test_push_tree_missing_local_root_is_local_error() {
    let parent = tempfile::tempdir().unwrap();
    let server = MemoryServer::new();
    server.add_dir("/www");

    let err = syncer(&server)
        .push_tree(parent.path().join("missing"), "/www")
        .unwrap_err();

    assert!(matches!(err, SyncError::LocalIo { .. }));
}
