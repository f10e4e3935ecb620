//! File events from directory watching.

use std::path::{Path, PathBuf};

use regex_lite::Regex;

/// A file system event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    /// The kind of event.
    pub kind: FileEventKind,

    /// Path to the affected file or directory.
    pub path: PathBuf,
}

impl FileEvent {
    pub fn new(kind: FileEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::new(FileEventKind::Modified, path)
    }

    pub fn deleted(path: impl Into<PathBuf>) -> Self {
        Self::new(FileEventKind::Deleted, path)
    }
}

/// Kind of file event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    /// File was created.
    Created,

    /// File content or metadata was modified.
    Modified,

    /// File was deleted.
    Deleted,

    /// File was renamed (old path).
    RenamedFrom,

    /// File was renamed (new path).
    RenamedTo,

    /// Access or unknown event.
    Other,
}

impl FileEventKind {
    /// Change and remove notifications trigger a rebuild.
    pub fn triggers_rebuild(self) -> bool {
        matches!(self, Self::Modified | Self::Deleted | Self::RenamedFrom)
    }
}

impl From<notify::EventKind> for FileEventKind {
    fn from(kind: notify::EventKind) -> Self {
        match kind {
            notify::EventKind::Create(_) => Self::Created,
            notify::EventKind::Modify(modify_kind) => match modify_kind {
                notify::event::ModifyKind::Name(rename) => match rename {
                    notify::event::RenameMode::From => Self::RenamedFrom,
                    notify::event::RenameMode::To => Self::RenamedTo,
                    _ => Self::Modified,
                },
                _ => Self::Modified,
            },
            notify::EventKind::Remove(_) => Self::Deleted,
            _ => Self::Other,
        }
    }
}

/// Decides which events should trigger a rebuild.
///
/// The target file never qualifies, so writing it cannot retrigger a
/// rebuild. Locale files always qualify. Any other path is dropped when its
/// path relative to the watched directory matches the ignore pattern.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    base_dir: PathBuf,
    target: PathBuf,
    locale_file_name: String,
    ignore: Regex,
}

impl WatchFilter {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        locale_file_name: impl Into<String>,
        ignore: Regex,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            target: target.into(),
            locale_file_name: locale_file_name.into(),
            ignore,
        }
    }

    pub fn qualifies(&self, event: &FileEvent) -> bool {
        event.kind.triggers_rebuild() && self.accepts_path(&event.path)
    }

    pub fn accepts_path(&self, path: &Path) -> bool {
        if path == self.target {
            return false;
        }

        let is_locale_file = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().contains(&self.locale_file_name));
        if is_locale_file {
            return true;
        }

        let relative = path.strip_prefix(&self.base_dir).unwrap_or(path);
        !self.ignore.is_match(&relative.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_IGNORE_PATTERN;

    fn filter() -> WatchFilter {
        WatchFilter::new(
            "/work",
            "/work/translations.yml",
            ".locale.yml",
            Regex::new(DEFAULT_IGNORE_PATTERN).unwrap(),
        )
    }

    #[test]
    fn test_target_never_qualifies() {
        assert!(!filter().qualifies(&FileEvent::modified("/work/translations.yml")));
    }

    #[test]
    fn test_locale_files_qualify_despite_dot_prefix() {
        assert!(filter().qualifies(&FileEvent::modified("/work/src/a/.locale.yml")));
        assert!(filter().qualifies(&FileEvent::deleted("/work/src/a/.locale.yml")));
    }

    #[test]
    fn test_ignored_paths_are_relative_to_base() {
        let filter = WatchFilter::new(
            "/home/.user/work",
            "/home/.user/work/translations.yml",
            ".locale.yml",
            Regex::new(DEFAULT_IGNORE_PATTERN).unwrap(),
        );

        assert!(filter.qualifies(&FileEvent::modified("/home/.user/work/src/a/index.ts")));
        assert!(!filter.qualifies(&FileEvent::modified("/home/.user/work/.git/index")));
    }

    #[test]
    fn test_creation_does_not_qualify() {
        let event = FileEvent::new(FileEventKind::Created, "/work/src/a/.locale.yml");
        assert!(!filter().qualifies(&event));
    }

    #[test]
    fn test_notify_kind_conversion() {
        use notify::event::{ModifyKind, RemoveKind, RenameMode};

        assert_eq!(
            FileEventKind::from(notify::EventKind::Remove(RemoveKind::File)),
            FileEventKind::Deleted
        );
        assert_eq!(
            FileEventKind::from(notify::EventKind::Modify(ModifyKind::Name(RenameMode::From))),
            FileEventKind::RenamedFrom
        );
    }
}
