use std::path::Path;

use crate::{
    adapter::{
        fs::ensure_local_dir,
        session::{EntryKind, RemoteSession},
    },
    error::Result,
    progress::StepLog,
};

use super::path::{local_path, remote_path, PathPair};

/// Mirrors `remote` into `local`. Every file of a directory is fetched
/// before any of its subdirectories is entered. The session is borrowed for
/// the whole recursion and never closed here.
pub(super) fn pull_dir(
    session: &mut dyn RemoteSession,
    local: &Path,
    remote: &str,
    depth: usize,
    log: &StepLog,
) -> Result<()> {
    let mut to_copy = Vec::new();
    let mut recurse = Vec::new();

    for entry in session.list(remote)? {
        let pair = PathPair::new(local, remote, &entry.name);
        match entry.kind {
            EntryKind::File => to_copy.push(pair),
            EntryKind::Dir => recurse.push(pair),
            EntryKind::Other => {
                tracing::debug!(remote = %pair.remote, "skipping entry that is neither file nor directory")
            }
        }
    }

    for pair in to_copy {
        session.get(&pair.remote, &pair.local)?;
        log.step(format!("Pulled file {}", pair.remote));
    }

    for pair in recurse {
        if ensure_local_dir(&pair.local)? {
            log.step(format!("Created local directory {}", pair.local.display()));
        }
        tracing::trace!(depth = depth + 1, remote = %pair.remote, "descending");
        pull_dir(session, &pair.local, &pair.remote, depth + 1, log)?;
    }

    Ok(())
}

/// Fetches each listed file, creating its local parent right before.
pub(super) fn pull_list<S: AsRef<str>>(
    session: &mut dyn RemoteSession,
    local_root: &Path,
    remote_root: &str,
    files: &[S],
    log: &StepLog,
) -> Result<()> {
    for file in files {
        let file = file.as_ref();
        let local = local_path(local_root, file);
        let remote = remote_path(remote_root, file);

        if let Some(dir) = local.parent() {
            ensure_local_dir(dir)?;
        }

        session.get(&remote, &local)?;
        log.step(format!("Pulled file {remote}"));
    }

    Ok(())
}
