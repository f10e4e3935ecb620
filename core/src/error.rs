//! Error types for locale aggregation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for localizor operations.
pub type Result<T> = std::result::Result<T, LocalizorError>;

/// Errors that can occur while assembling or synchronizing translations.
#[derive(Error, Debug)]
pub enum LocalizorError {
    /// Configured root directory does not exist.
    #[error("root \"{0}\" does not exist")]
    RootNotFound(PathBuf),

    /// Reading a file or directory failed.
    #[error("failed to read {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a file failed.
    #[error("failed to write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A locale file holds malformed content.
    #[error("failed to parse {path}: {message}")]
    ParseFailure { path: PathBuf, message: String },

    /// Content would be inserted at an empty key path.
    #[error("empty key path for {0}")]
    DegenerateKey(String),

    /// A path does not lie under the root it is keyed against.
    #[error("{path} is not under root {root}")]
    InvalidPath { path: PathBuf, root: PathBuf },

    /// Two files resolve to the same key in strict mode.
    #[error("duplicate key \"{key}\" from {path}")]
    DuplicateKey { key: String, path: PathBuf },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Ignore pattern failed to compile.
    #[error("invalid ignore pattern: {0}")]
    InvalidPattern(String),

    /// Serializing the output document failed.
    #[error("failed to render output: {0}")]
    Render(String),

    /// Notify error.
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),
}

impl LocalizorError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailure {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }
}
