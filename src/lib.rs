//! Mirror directory trees between the local filesystem and a remote server
//! over one stateful session per operation.

pub mod adapter;
pub mod config;
pub mod error;
pub mod progress;
pub mod services;
pub mod sync;
pub mod util;

pub use adapter::session::{Connector, EntryKind, MkdirOutcome, RemoteEntry, RemoteSession};
pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use sync::Syncer;
