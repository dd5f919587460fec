use std::path::Path;

use crate::{
    adapter::{
        fs::{EntryType, LocalTree},
        session::RemoteSession,
    },
    error::Result,
    progress::StepLog,
};

use super::{
    filter::IgnoreFilter,
    materialize::{ensure_remote_dirs, mkdir_tolerant},
    path::{local_path, remote_parent, remote_path},
};

/// Walks `local_root` parent-first and recreates it below `remote_root`.
/// The first failing transfer stops the walk.
pub(super) fn push_dir(
    session: &mut dyn RemoteSession,
    local_root: &Path,
    remote_root: &str,
    filter: &IgnoreFilter,
    log: &StepLog,
) -> Result<()> {
    let tree = LocalTree::new(local_root, remote_root).with_filter(filter);

    for entry in tree.traverse() {
        let entry = entry?;

        match entry.kind {
            EntryType::Dir => {
                let created = mkdir_tolerant(session, &entry.remote_dest)?;
                log.step_with(
                    format!("Created remote directory {}", entry.remote_dest),
                    if created { "new" } else { "already present" },
                );
            }
            EntryType::File => {
                session.put(&entry.local_source, &entry.remote_dest)?;
                log.step(format!("Pushed file {}", entry.remote_dest));
            }
            EntryType::Other => {
                tracing::debug!(entry = %entry, "skipping entry that is neither file nor directory")
            }
        }
    }

    Ok(())
}

/// Stores each listed file after materializing all of their remote parents
/// in one batch.
pub(super) fn push_list<S: AsRef<str>>(
    session: &mut dyn RemoteSession,
    local_root: &Path,
    remote_root: &str,
    files: &[S],
    log: &StepLog,
) -> Result<()> {
    let parents = files.iter().filter_map(|file| remote_parent(file.as_ref()));
    ensure_remote_dirs(session, remote_root, parents, log)?;

    for file in files {
        let file = file.as_ref();
        let remote = remote_path(remote_root, file);

        session.put(&local_path(local_root, file), &remote)?;
        log.step(format!("Pushed file {remote}"));
    }

    Ok(())
}
