//! # Localizor
//!
//! This crate aggregates small per-directory locale files into one
//! translation document keyed by the directories that hold them, and keeps
//! that document in sync with the source tree.
//!
//! ## Features
//!
//! - **Directory Keying**: `src/a/b/.locale.yml` lands under `en.a.b`
//! - **Array Slots**: a `name[]` segment appends instead of assigning
//! - **Watch Mode**: full rebuild on every change or removal
//! - **Migration**: split an assembled document back into locale files
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Sync Controller                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  TreeWalker ──► StructureIndex ──► DocumentAssembler ──► Format │
//! │       │               │                    │               │    │
//! │       ▼               ▼                    ▼               ▼    │
//! │  locale files     PathKeyer         NestedDocument    target    │
//! │                                                                 │
//! │  LocaleWatcher ──► WatchFilter ──► rebuild                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod format;
pub mod index;
pub mod keys;
pub mod migrate;
pub mod sync;
pub mod validate;
pub mod walker;
pub mod watcher;

pub use config::LocalizorConfig;
pub use document::{ContentLoader, DocumentAssembler, NestedDocument};
pub use error::{LocalizorError, Result};
pub use event::{FileEvent, FileEventKind, WatchFilter};
pub use format::Format;
pub use index::StructureIndex;
pub use keys::{KeySequence, PathKeyer};
pub use migrate::{MigrationReport, migrate};
pub use sync::{RebuildReport, SyncController};
pub use validate::{InvalidFile, check_directory};
pub use walker::TreeWalker;
pub use watcher::LocaleWatcher;
