//! Recursive change notifications for the working directory.

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::{LocalizorError, Result};
use crate::event::{FileEvent, FileEventKind};

/// Forwards file system events under a directory into a channel.
///
/// Events stop when the watcher is dropped.
pub struct LocaleWatcher {
    watcher: RecommendedWatcher,
    path: PathBuf,
}

impl LocaleWatcher {
    /// Start watching `path` recursively.
    pub fn start(path: &Path, event_tx: mpsc::Sender<FileEvent>) -> Result<Self> {
        if !path.is_dir() {
            return Err(LocalizorError::Config(format!(
                "cannot watch {}: not a directory",
                path.display()
            )));
        }

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    let kind = FileEventKind::from(event.kind);
                    for path in event.paths {
                        if event_tx.blocking_send(FileEvent::new(kind, path)).is_err() {
                            debug!("Event receiver closed, dropping file event");
                            return;
                        }
                    }
                }
                Err(e) => {
                    error!("Watch error: {e}");
                }
            },
        )?;

        watcher.watch(path, RecursiveMode::Recursive)?;
        info!("Watching {} for changes", path.display());

        Ok(Self {
            watcher,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop watching.
    pub fn stop(mut self) {
        if let Err(e) = self.watcher.unwatch(&self.path) {
            debug!("Failed to unwatch {}: {e}", self.path.display());
        }
        info!("Stopped watching {}", self.path.display());
    }
}
