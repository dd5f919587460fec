//! Shared helpers for the integration tests.

use std::{fs, path::Path};

use treesync::{
    adapter::memory::{MemoryConnector, MemoryServer},
    SyncConfig, Syncer,
};

pub const USER: &str = "deploy";
pub const PASSWORD: &str = "secret";

pub fn syncer(server: &MemoryServer) -> Syncer<MemoryConnector> {
    syncer_with_ignore(server, None)
}

pub fn syncer_with_ignore(server: &MemoryServer, ignore: Option<&str>) -> Syncer<MemoryConnector> {
    let config = SyncConfig::new("files.example.org", USER, PASSWORD, ignore);
    Syncer::new(config, MemoryConnector::new(server, USER, PASSWORD))
}

/// Writes `content` to `root/relative`, creating parents.
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

/// Every file below `root` as sorted `relative=content` lines.
pub fn snapshot(root: &Path) -> Vec<String> {
    let mut lines: Vec<_> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(Result::unwrap)
        .map(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap().display().to_string();
            if entry.file_type().is_dir() {
                format!("{relative}/")
            } else {
                format!("{relative}={}", fs::read_to_string(entry.path()).unwrap())
            }
        })
        .collect();
    lines.sort();
    lines
}
