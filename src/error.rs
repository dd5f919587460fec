use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = SyncError> = std::result::Result<T, E>;

/// Everything that can abort a sync operation.
///
/// A remote directory that already exists is not in here: `mkdir` reports it
/// as [`MkdirOutcome::Exists`](crate::adapter::session::MkdirOutcome).
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Could not connect to {server}: {reason}")]
    Connection { server: String, reason: String },

    #[error("Authentication failed for {user}@{server}: {reason}")]
    Auth {
        server: String,
        user: String,
        reason: String,
    },

    #[error("Could not read remote path {path}: {reason}")]
    RemoteIo { path: String, reason: String },

    #[error("Transfer failed ({local} <-> {remote}): {reason}")]
    Transfer {
        local: PathBuf,
        remote: String,
        reason: String,
    },

    #[error("Permission denied on remote path {path}")]
    Permission { path: String },

    #[error("Local I/O error on {path}: {source}")]
    LocalIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    pub(crate) fn local_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn transfer(local: impl Into<PathBuf>, remote: &str, reason: impl ToString) -> Self {
        Self::Transfer {
            local: local.into(),
            remote: remote.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn remote_io(path: &str, reason: impl ToString) -> Self {
        Self::RemoteIo {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}
