use treesync::{
    adapter::memory::{MemoryServer, Op},
    SyncError,
};

use crate::common::{read, snapshot, syncer, write};

fn nested_server() -> MemoryServer {
    let server = MemoryServer::new();
    server.add_dir("/remote/a");
    server.add_file("/remote/a/f1", "one");
    server.add_dir("/remote/a/b");
    server.add_file("/remote/a/b/f2", "two");
    server
}

#[test]
fn test_pull_tree_materializes_nested_tree() {
    let server = nested_server();
    let local = tempfile::tempdir().unwrap();

    syncer(&server).pull_tree(local.path(), "/remote").unwrap();

    assert_eq!(read(local.path(), "a/f1"), "one");
    assert_eq!(read(local.path(), "a/b/f2"), "two");
    assert_eq!(snapshot(local.path()), ["a/", "a/b/", "a/b/f2=two", "a/f1=one"]);
}

#[test]
fn test_pull_tree_fetches_files_before_descending() {
    let server = MemoryServer::new();
    server.add_dir("/remote/z_dir");
    server.add_file("/remote/z_dir/inner.txt", "i");
    server.add_file("/remote/b.txt", "b");
    server.add_dir("/remote/a_dir");
    server.add_file("/remote/a.txt", "a");
    let local = tempfile::tempdir().unwrap();

    syncer(&server).pull_tree(local.path(), "/remote").unwrap();

    assert_eq!(
        server.ops(),
        [
            Op::Connect,
            Op::List("/remote".into()),
            Op::Get("/remote/b.txt".into()),
            Op::Get("/remote/a.txt".into()),
            Op::List("/remote/z_dir".into()),
            Op::Get("/remote/z_dir/inner.txt".into()),
            Op::List("/remote/a_dir".into()),
            Op::Close,
        ]
    );
    assert!(local.path().join("a_dir").is_dir());
}

#[test]
fn test_pull_tree_twice_is_idempotent() {
    let server = nested_server();
    let local = tempfile::tempdir().unwrap();
    let syncer = syncer(&server);

    syncer.pull_tree(local.path(), "/remote").unwrap();
    let first = snapshot(local.path());
    syncer.pull_tree(local.path(), "/remote").unwrap();

    assert_eq!(snapshot(local.path()), first);
    assert_eq!(server.count(&Op::Connect), 2);
    assert_eq!(server.count(&Op::Close), 2);
}

#[test]
fn test_pull_tree_skips_unrecognized_entries() {
    let server = MemoryServer::new();
    server.add_other("/remote/current");
    server.add_file("/remote/real.txt", "r");
    let local = tempfile::tempdir().unwrap();

    syncer(&server).pull_tree(local.path(), "/remote").unwrap();

    assert_eq!(snapshot(local.path()), ["real.txt=r"]);
    assert_eq!(server.gets(), ["/remote/real.txt"]);
}

#[test]
fn test_pull_tree_never_prunes_local_entries() {
    let server = nested_server();
    let local = tempfile::tempdir().unwrap();
    write(local.path(), "local-only/notes.md", "keep me");

    syncer(&server).pull_tree(local.path(), "/remote").unwrap();

    assert_eq!(read(local.path(), "local-only/notes.md"), "keep me");
    assert_eq!(read(local.path(), "a/b/f2"), "two");
}

#[test]
fn test_pull_tree_creates_missing_local_root() {
    let server = nested_server();
    let parent = tempfile::tempdir().unwrap();
    let local = parent.path().join("mirror");

    syncer(&server).pull_tree(&local, "/remote").unwrap();

    assert_eq!(read(&local, "a/f1"), "one");
}

#[test]
fn test_pull_tree_listing_failure_propagates() {
    let server = nested_server();
    server.fail_list("/remote/a/b");
    let local = tempfile::tempdir().unwrap();

    let err = syncer(&server).pull_tree(local.path(), "/remote").unwrap_err();

    assert!(matches!(err, SyncError::RemoteIo { ref path, .. } if path == "/remote/a/b"));
    // Everything before the failing branch was already written
    assert_eq!(read(local.path(), "a/f1"), "one");
    assert_eq!(server.count(&Op::Close), 1);
}

#[test]
fn test_pull_tree_transfer_failure_stops_remaining_fetches() {
    let server = MemoryServer::new();
    server.add_file("/remote/1.txt", "1");
    server.add_file("/remote/2.txt", "2");
    server.add_file("/remote/3.txt", "3");
    server.fail_get("/remote/2.txt");
    let local = tempfile::tempdir().unwrap();

    let err = syncer(&server).pull_tree(local.path(), "/remote").unwrap_err();

    assert!(matches!(err, SyncError::Transfer { .. }));
    assert_eq!(server.gets(), ["/remote/1.txt", "/remote/2.txt"]);
    assert!(!local.path().join("3.txt").exists());
}
