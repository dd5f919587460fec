//! Pull and push of whole trees or explicit file lists over one session.
//!
//! Every public operation opens its own session on entry and closes it
//! exactly once before returning, also when the operation failed. Errors are
//! never swallowed except for remote directories that already exist.

use std::path::Path;

use tracing::info_span;

use crate::{
    adapter::{
        fs::ensure_local_dir,
        session::{Connector, RemoteSession},
    },
    config::SyncConfig,
    error::Result,
    progress::StepLog,
};

use self::filter::IgnoreFilter;

pub mod filter;
pub mod materialize;
pub mod path;
mod pull;
mod push;

pub struct Syncer<C: Connector> {
    config: SyncConfig,
    connector: C,
    log: StepLog,
}

impl<C: Connector> Syncer<C> {
    pub fn new(config: SyncConfig, connector: C) -> Self {
        let log = StepLog::new(config.verbose());
        Self {
            config,
            connector,
            log,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn verbose(&self) -> bool {
        self.log.is_verbose()
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.log = StepLog::new(verbose);
    }

    /// Mirrors the remote tree below `remote_root` into `local_root`.
    /// Nothing is deleted locally.
    pub fn pull_tree(&self, local_root: impl AsRef<Path>, remote_root: &str) -> Result<()> {
        let local_root = local_root.as_ref();
        let _span = info_span!("pull_tree", local = %local_root.display(), remote = remote_root)
            .entered();

        self.with_session(|session| {
            ensure_local_dir(local_root)?;
            pull::pull_dir(session, local_root, remote_root, 0, &self.log)
        })
    }

    /// Recreates the local tree below `remote_root`, skipping paths matched
    /// by the configured ignore patterns.
    pub fn push_tree(&self, local_root: impl AsRef<Path>, remote_root: &str) -> Result<()> {
        let local_root = local_root.as_ref();
        let _span = info_span!("push_tree", local = %local_root.display(), remote = remote_root)
            .entered();

        let filter = IgnoreFilter::new(local_root, self.config.ignore())?;
        self.with_session(|session| {
            push::push_dir(session, local_root, remote_root, &filter, &self.log)
        })
    }

    /// Fetches the listed files, relative to both roots, in order.
    pub fn pull_files<S: AsRef<str>>(
        &self,
        local_root: impl AsRef<Path>,
        remote_root: &str,
        files: &[S],
    ) -> Result<()> {
        let local_root = local_root.as_ref();
        let _span = info_span!("pull_files", local = %local_root.display(), remote = remote_root, count = files.len())
            .entered();

        self.with_session(|session| {
            pull::pull_list(session, local_root, remote_root, files, &self.log)
        })
    }

    /// Stores the listed files, relative to both roots, in order.
    pub fn push_files<S: AsRef<str>>(
        &self,
        local_root: impl AsRef<Path>,
        remote_root: &str,
        files: &[S],
    ) -> Result<()> {
        let local_root = local_root.as_ref();
        let _span = info_span!("push_files", local = %local_root.display(), remote = remote_root, count = files.len())
            .entered();

        self.with_session(|session| {
            push::push_list(session, local_root, remote_root, files, &self.log)
        })
    }

    fn with_session<T>(
        &self,
        operation: impl FnOnce(&mut dyn RemoteSession) -> Result<T>,
    ) -> Result<T> {
        let mut session = self.connect()?;

        match operation(session.as_mut()) {
            Ok(value) => {
                self.close(session)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(close_err) = self.close(session) {
                    tracing::debug!(error = %close_err, "could not close session after failure");
                }
                Err(err)
            }
        }
    }

    fn connect(&self) -> Result<Box<dyn RemoteSession>> {
        let session = self.connector.connect(&self.config)?;
        tracing::info!(server = self.config.server(), "session opened");
        self.log
            .step(format!("Opened connection to {}", self.config.server()));

        Ok(session)
    }

    fn close(&self, session: Box<dyn RemoteSession>) -> Result<()> {
        session.close()?;
        tracing::info!(server = self.config.server(), "session closed");
        self.log
            .step(format!("Closed connection to {}", self.config.server()));

        Ok(())
    }
}
