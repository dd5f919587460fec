use std::path::Path;

use crate::{config::SyncConfig, error::Result};

/// Kind of a remote listing entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, devices, sockets. Never transferred.
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl RemoteEntry {
    pub fn new(name: impl ToString, kind: EntryKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

/// Result of a successful remote `mkdir`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MkdirOutcome {
    Created,
    Exists,
}

/// An authenticated channel to the remote file tree.
///
/// Remote paths are always `/`-separated strings. Every call blocks until the
/// server answers.
pub trait RemoteSession: Send {
    fn list(&mut self, remote: &str) -> Result<Vec<RemoteEntry>>;

    fn get(&mut self, remote: &str, local: &Path) -> Result<()>;

    fn put(&mut self, local: &Path, remote: &str) -> Result<()>;

    /// Creates a single directory. The parent must exist.
    fn mkdir(&mut self, remote: &str) -> Result<MkdirOutcome>;

    fn close(self: Box<Self>) -> Result<()>;
}

/// Opens and authenticates sessions for a [`Syncer`](crate::sync::Syncer).
pub trait Connector {
    fn connect(&self, config: &SyncConfig) -> Result<Box<dyn RemoteSession>>;
}
