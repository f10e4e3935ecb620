//! Mapping of locale file paths to key sequences.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{LocalizorError, Result};

/// Suffix marking a segment whose slot collects values in an array.
pub const ARRAY_MARKER: &str = "[]";

/// Ordered key segments locating a file's content in the document, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeySequence(Vec<String>);

impl KeySequence {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the final segment appends to an array instead of assigning.
    pub fn is_array(&self) -> bool {
        self.0.last().is_some_and(|s| is_array_segment(s))
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

pub(crate) fn is_array_segment(segment: &str) -> bool {
    segment.ends_with(ARRAY_MARKER)
}

/// Splits a segment into its key and whether it carries the array marker.
pub(crate) fn split_segment(segment: &str) -> (&str, bool) {
    match segment.strip_suffix(ARRAY_MARKER) {
        Some(key) => (key, true),
        None => (segment, false),
    }
}

/// Derives key sequences from paths relative to a fixed root.
#[derive(Debug, Clone)]
pub struct PathKeyer {
    root: PathBuf,
    marker: String,
}

impl PathKeyer {
    /// `marker` is the locale file name stripped from each file's own name.
    pub fn new(root: impl Into<PathBuf>, marker: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            marker: marker.into(),
        }
    }

    /// Directory names between the root and the file, then the file's own
    /// name with the marker removed. A file named exactly like the marker
    /// contributes no segment of its own.
    pub fn keys_for(&self, path: &Path) -> Result<KeySequence> {
        let invalid = || LocalizorError::InvalidPath {
            path: path.to_path_buf(),
            root: self.root.clone(),
        };

        let relative = path.strip_prefix(&self.root).map_err(|_| invalid())?;

        let mut names = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => names.push(name.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return Err(invalid()),
            }
        }

        let Some(file_name) = names.pop() else {
            return Ok(KeySequence::default());
        };

        let own = file_name.replacen(&self.marker, "", 1);
        if !own.is_empty() {
            names.push(own);
        }

        Ok(KeySequence(names))
    }
}
