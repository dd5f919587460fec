use std::collections::HashSet;

use crate::{
    adapter::session::{MkdirOutcome, RemoteSession},
    error::Result,
    progress::StepLog,
};

use super::path::remote_path;

/// Creates every directory in `dirs` below `base`, including each
/// intermediate prefix, since remote `mkdir` is not recursive.
///
/// Directories that already exist are fine. Anything else `mkdir` reports
/// aborts the whole call.
pub fn ensure_remote_dirs<'a>(
    session: &mut dyn RemoteSession,
    base: &str,
    dirs: impl IntoIterator<Item = &'a str>,
    log: &StepLog,
) -> Result<()> {
    let mut seen = HashSet::new();

    for dir in dirs {
        if !seen.insert(dir) {
            continue;
        }

        let mut parent = base.to_string();
        for segment in dir.split('/').filter(|s| !s.is_empty() && *s != ".") {
            parent = remote_path(&parent, segment);

            let outcome = session.mkdir(&parent)?;
            tracing::debug!(path = %parent, ?outcome, "remote mkdir");
            log.step(format!("Creating remote directory {parent}"));
        }
    }

    Ok(())
}

/// `mkdir` for a single directory, `true` if it had to be created.
pub fn mkdir_tolerant(session: &mut dyn RemoteSession, remote: &str) -> Result<bool> {
    match session.mkdir(remote)? {
        MkdirOutcome::Created => Ok(true),
        MkdirOutcome::Exists => Ok(false),
    }
}
