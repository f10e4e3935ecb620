//! Recursive discovery of locale files.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{LocalizorError, Result};

/// Enumerates every file under a directory whose name contains the locale
/// file name.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    file_name: String,
    excluded: Vec<PathBuf>,
}

impl TreeWalker {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            excluded: Vec::new(),
        }
    }

    /// Skip a path (and everything below it) during the walk.
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    /// Whether a file name marks a locale file.
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().contains(&self.file_name))
    }

    /// Walk `dir` depth-first. Entries within a directory are visited in
    /// file name order, so the result is stable across platforms.
    pub fn walk(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.exists() {
            return Err(LocalizorError::RootNotFound(dir.to_path_buf()));
        }

        let walker = WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.excluded.iter().any(|p| p == entry.path()));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                LocalizorError::read(path, source)
            })?;

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        debug!("Found {} locale files under {}", files.len(), dir.display());
        Ok(files)
    }
}
