use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{
    error::{Result, SyncError},
    sync::{
        filter::IgnoreFilter,
        path::{remote_path, to_remote_relative},
    },
};

/// Local tree to be pushed below `remote_dest_origin`.
pub struct LocalTree<'f> {
    local_source_origin: PathBuf,
    remote_dest_origin: String,
    filter: Option<&'f IgnoreFilter>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryType {
    File,
    Dir,
    Other,
}

#[derive(Clone, Debug)]
pub struct Entry {
    pub kind: EntryType,
    pub local_source: PathBuf,
    pub remote_dest: String,
    pub path_name: String,
}

impl<'f> LocalTree<'f> {
    pub fn new(local_source_origin: &Path, remote_dest_origin: &str) -> Self {
        Self {
            local_source_origin: local_source_origin.to_path_buf(),
            remote_dest_origin: remote_dest_origin.to_string(),
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: &'f IgnoreFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Every entry below the origin, depth-first pre-order with siblings
    /// sorted by name. The origin itself is not yielded. Ignored directories
    /// are pruned along with their contents.
    pub fn traverse(&self) -> impl Iterator<Item = Result<Entry>> + '_ {
        let origin = &self.local_source_origin;

        WalkDir::new(origin)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                let Some(filter) = self.filter.filter(|_| entry.depth() > 0) else {
                    return true;
                };
                let relative = entry.path().strip_prefix(origin).unwrap_or(entry.path());
                !filter.is_ignored(relative, entry.file_type().is_dir())
            })
            .map(move |entry| {
                let entry = entry.map_err(|err| {
                    let path = err.path().unwrap_or(origin).to_path_buf();
                    SyncError::local_io(path, err.into())
                })?;

                let file_type = entry.file_type();
                let kind = if file_type.is_dir() {
                    EntryType::Dir
                } else if file_type.is_file() {
                    EntryType::File
                } else {
                    EntryType::Other
                };

                let relative = entry.path().strip_prefix(origin).unwrap_or(entry.path());
                let path_name = to_remote_relative(relative);

                Ok(Entry {
                    kind,
                    local_source: entry.path().to_path_buf(),
                    remote_dest: remote_path(&self.remote_dest_origin, &path_name),
                    path_name,
                })
            })
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} -> {})",
            self.path_name,
            self.local_source.display(),
            self.remote_dest
        )
    }
}

/// Creates `dir` and its missing parents unless it is already there.
/// Returns whether anything was created.
pub fn ensure_local_dir(dir: &Path) -> Result<bool> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(false);
    }

    fs::create_dir_all(dir).map_err(|err| SyncError::local_io(dir, err))?;
    Ok(true)
}
