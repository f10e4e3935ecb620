//! Rebuild orchestration and watch loop.
//!
//! A rebuild always rescans the whole tree: walk, index, assemble, wrap
//! under the default locale, render in memory, then write the target file
//! in a single call. A failed rebuild never touches the target file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::config::LocalizorConfig;
use crate::document::DocumentAssembler;
use crate::error::{LocalizorError, Result};
use crate::event::{FileEvent, WatchFilter};
use crate::format::Format;
use crate::index::StructureIndex;
use crate::keys::PathKeyer;
use crate::walker::TreeWalker;
use crate::watcher::LocaleWatcher;

const EVENT_BUFFER: usize = 1000;

/// Outcome of a successful rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildReport {
    /// Number of locale files assembled.
    pub files: usize,

    /// File that was written.
    pub target: PathBuf,

    /// Size of the written output.
    pub bytes: usize,
}

/// Owns the target file and keeps it in sync with the locale tree.
#[derive(Debug, Clone)]
pub struct SyncController {
    config: LocalizorConfig,
    format: Format,
    base_dir: PathBuf,
    root: PathBuf,
    target: PathBuf,
}

impl SyncController {
    /// `base_dir` is the working directory the root and target resolve against.
    pub fn new(config: LocalizorConfig, base_dir: impl Into<PathBuf>) -> Result<Self> {
        config.validate()?;
        let base_dir = base_dir.into();

        Ok(Self {
            format: config.format()?,
            root: base_dir.join(&config.root),
            target: base_dir.join(config.target_file_name()),
            base_dir,
            config,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Run a full rebuild, propagating any failure.
    pub fn rebuild(&self) -> Result<RebuildReport> {
        let locale_file_name = self.config.locale_file_name();

        let files = TreeWalker::new(&locale_file_name)
            .exclude(&self.target)
            .walk(&self.root)?;
        let keyer = PathKeyer::new(&self.root, &locale_file_name);
        let index = StructureIndex::build(&keyer, files)?;

        let document = DocumentAssembler::new(self.format)
            .strict(self.config.strict)
            .assemble(&index)?;
        let rendered = self
            .format
            .render(&document.into_output(&self.config.default_locale))?;

        std::fs::write(&self.target, &rendered)
            .map_err(|e| LocalizorError::write(&self.target, e))?;
        info!("translations updated");

        Ok(RebuildReport {
            files: index.len(),
            target: self.target.clone(),
            bytes: rendered.len(),
        })
    }

    /// Run a full rebuild, logging instead of returning failures.
    pub fn rebuild_once(&self) -> Option<RebuildReport> {
        match self.rebuild() {
            Ok(report) => {
                debug!(
                    "Assembled {} locale files into {} ({} bytes)",
                    report.files,
                    report.target.display(),
                    report.bytes
                );
                Some(report)
            }
            Err(e) => {
                error!("Failed to update translations: {e}");
                None
            }
        }
    }

    /// Filter for events under `base_dir`.
    pub fn watch_filter(&self, base_dir: &Path) -> Result<WatchFilter> {
        Ok(WatchFilter::new(
            base_dir,
            base_dir.join(self.config.target_file_name()),
            self.config.locale_file_name(),
            self.config.ignore_pattern()?,
        ))
    }

    /// Rebuild once per qualifying event until the channel closes.
    ///
    /// Returns the number of rebuilds attempted.
    pub async fn drive(
        &self,
        mut events: mpsc::Receiver<FileEvent>,
        filter: &WatchFilter,
    ) -> usize {
        let window = Duration::from_millis(self.config.debounce_ms);
        let mut rebuilds = 0;

        while let Some(event) = events.recv().await {
            if !filter.qualifies(&event) {
                debug!("Ignoring {:?} on {}", event.kind, event.path.display());
                continue;
            }

            debug!("{:?} on {}, rebuilding", event.kind, event.path.display());
            if !window.is_zero() {
                let coalesced = coalesce(&mut events, window).await;
                if coalesced > 0 {
                    debug!("Coalesced {coalesced} further events");
                }
            }

            self.rebuild_once();
            rebuilds += 1;
        }

        rebuilds
    }

    /// Rebuild once, then keep rebuilding on changes when watch mode is on.
    ///
    /// In one-shot mode a failed rebuild is returned as an error. In watch
    /// mode the watcher is started before the first rebuild, and this only
    /// returns once the event stream ends.
    pub async fn run(&self) -> Result<()> {
        if !self.config.watch {
            self.rebuild()?;
            return Ok(());
        }

        let base_dir = std::fs::canonicalize(&self.base_dir)
            .map_err(|e| LocalizorError::read(&self.base_dir, e))?;
        let filter = self.watch_filter(&base_dir)?;

        // Subscribe before the first rebuild so no change slips in between.
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let watcher = LocaleWatcher::start(&base_dir, event_tx)?;
        self.rebuild_once();

        let rebuilds = self.drive(event_rx, &filter).await;
        watcher.stop();
        info!("Watch loop finished after {rebuilds} rebuilds");

        Ok(())
    }
}

/// Drain events until none arrives within `window`.
async fn coalesce(events: &mut mpsc::Receiver<FileEvent>, window: Duration) -> usize {
    let mut absorbed = 0;
    while let Ok(Some(_)) = tokio::time::timeout(window, events.recv()).await {
        absorbed += 1;
    }
    absorbed
}
