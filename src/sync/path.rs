use std::path::{Component, Path, PathBuf};

/// Where one entry lives on each side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathPair {
    pub local: PathBuf,
    pub remote: String,
}

impl PathPair {
    pub fn new(local_root: &Path, remote_root: &str, name: &str) -> Self {
        Self {
            local: local_path(local_root, name),
            remote: remote_path(remote_root, name),
        }
    }
}

pub fn local_path(local_root: &Path, relative: &str) -> PathBuf {
    if local_root.as_os_str().is_empty() {
        return PathBuf::from(relative);
    }
    local_root.join(relative)
}

/// Joins with `/` whatever the host separator is.
pub fn remote_path(remote_root: &str, relative: &str) -> String {
    if remote_root.is_empty() {
        return relative.to_string();
    }
    format!("{}/{}", remote_root.trim_end_matches('/'), relative)
}

/// Turns a local relative path into `/`-separated form. `.` components are
/// dropped.
pub fn to_remote_relative(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Parent of a `/`-separated relative path, `None` for top level entries.
pub fn remote_parent(relative: &str) -> Option<&str> {
    let trimmed = relative.trim_end_matches('/');
    let (parent, _) = trimmed.rsplit_once('/')?;
    match parent {
        "" | "." => None,
        parent => Some(parent),
    }
}
