use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{Result, SyncError};

/// Excludes paths from a push traversal.
///
/// Patterns are gitignore lines, evaluated against paths relative to the
/// push root. A path is excluded when it or any of its parents matches, so
/// `.git/` drops the whole repository metadata directory.
pub struct IgnoreFilter {
    gitignore: Gitignore,
}

impl IgnoreFilter {
    pub fn new(root: &Path, patterns: &str) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);

        for line in patterns.lines() {
            builder
                .add_line(None, line)
                .map_err(|err| SyncError::Config(format!("ignore pattern {line:?}: {err}")))?;
        }

        let gitignore = builder
            .build()
            .map_err(|err| SyncError::Config(format!("ignore patterns: {err}")))?;

        Ok(Self { gitignore })
    }

    pub fn is_ignored(&self, relative: &Path, is_dir: bool) -> bool {
        self.gitignore
            .matched_path_or_any_parents(relative, is_dir)
            .is_ignore()
    }
}
