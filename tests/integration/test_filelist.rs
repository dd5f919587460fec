use treesync::{
    adapter::memory::{MemoryServer, Op},
    SyncError,
};

use crate::common::{read, syncer, write};

#[test]
fn test_push_files_materializes_every_prefix_first() {
    let local = tempfile::tempdir().unwrap();
    write(local.path(), "x/y/z/file.txt", "deep");
    let server = MemoryServer::new();
    server.add_dir("/base");

    syncer(&server)
        .push_files(local.path(), "/base", &["x/y/z/file.txt"])
        .unwrap();

    assert_eq!(
        server.ops(),
        [
            Op::Connect,
            Op::Mkdir("/base/x".into()),
            Op::Mkdir("/base/x/y".into()),
            Op::Mkdir("/base/x/y/z".into()),
            Op::Put("/base/x/y/z/file.txt".into()),
            Op::Close,
        ]
    );
    assert_eq!(server.file("/base/x/y/z/file.txt").unwrap(), b"deep");
}

#[test]
fn test_push_files_creates_all_directories_before_any_store() {
    let local = tempfile::tempdir().unwrap();
    write(local.path(), "a/one.txt", "1");
    write(local.path(), "top.txt", "t");
    write(local.path(), "b/c/two.txt", "2");
    write(local.path(), "a/three.txt", "3");
    let server = MemoryServer::new();
    server.add_dir("/base");

    let files = ["a/one.txt", "top.txt", "b/c/two.txt", "a/three.txt"];
    syncer(&server).push_files(local.path(), "/base", &files).unwrap();

    let ops = server.ops();
    let last_mkdir = ops.iter().rposition(|op| matches!(op, Op::Mkdir(_))).unwrap();
    let first_put = ops.iter().position(|op| matches!(op, Op::Put(_))).unwrap();
    assert!(last_mkdir < first_put);

    assert_eq!(server.mkdirs(), ["/base/a", "/base/b", "/base/b/c"]);
    assert_eq!(
        server.puts(),
        ["/base/a/one.txt", "/base/top.txt", "/base/b/c/two.txt", "/base/a/three.txt"]
    );
}

#[test]
fn test_pull_files_creates_local_parents_per_file() {
    let server = MemoryServer::new();
    server.add_file("/srv/docs/guide/intro.md", "intro");
    server.add_file("/srv/readme.md", "readme");
    server.add_file("/srv/unlisted.md", "nope");
    let local = tempfile::tempdir().unwrap();

    syncer(&server)
        .pull_files(local.path(), "/srv", &["docs/guide/intro.md", "readme.md"])
        .unwrap();

    assert_eq!(read(local.path(), "docs/guide/intro.md"), "intro");
    assert_eq!(read(local.path(), "readme.md"), "readme");
    assert!(!local.path().join("unlisted.md").exists());
    assert_eq!(server.gets(), ["/srv/docs/guide/intro.md", "/srv/readme.md"]);
}

#[test]
fn test_filelist_ignores_push_filters() {
    let local = tempfile::tempdir().unwrap();
    write(local.path(), ".git/HEAD", "ref");
    let server = MemoryServer::new();
    server.add_dir("/base");

    syncer(&server)
        .push_files(local.path(), "/base", &[".git/HEAD"])
        .unwrap();

    assert_eq!(server.file("/base/.git/HEAD").unwrap(), b"ref");
}

#[test]
fn test_pull_files_missing_remote_file_is_fatal() {
    let server = MemoryServer::new();
    server.add_file("/srv/a.txt", "a");
    let local = tempfile::tempdir().unwrap();

    let err = syncer(&server)
        .pull_files(local.path(), "/srv", &["gone.txt", "a.txt"])
        .unwrap_err();

    assert!(matches!(err, SyncError::Transfer { .. }));
    assert_eq!(server.gets(), ["/srv/gone.txt"]);
}
