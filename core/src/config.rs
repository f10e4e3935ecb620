//! Run configuration.
//!
//! Configuration is read once at startup from an optional `.localizorrc`
//! JSON file in the working directory and then passed by reference to every
//! component. Fields missing from the file keep their defaults.

use std::path::{Path, PathBuf};

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LocalizorError, Result};
use crate::format::Format;

/// Name of the run-control file looked up in the working directory.
pub const RUN_CONTROL_FILE: &str = ".localizorrc";

/// Ignore pattern matching any dot-prefixed path component.
pub const DEFAULT_IGNORE_PATTERN: &str = r"(^|[/\\])\.";

/// Configuration for aggregating locale files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LocalizorConfig {
    /// Directory to scan, relative to the working directory.
    pub root: PathBuf,

    /// Marker fragment of per-directory locale files.
    pub locale_file: String,

    /// Serialization format of both locale files and the output file.
    pub extension: String,

    /// Top-level key wrapping the assembled document.
    pub default_locale: String,

    /// Base name of the output file.
    pub target_file: String,

    /// Whether to stay resident and rebuild on changes.
    pub watch: bool,

    /// Regex excluding paths from triggering rebuilds.
    pub ignore_files: String,

    /// Fail on non-array key collisions instead of overwriting.
    pub strict: bool,

    /// Coalescing window for change events, in milliseconds (0 = none).
    pub debounce_ms: u64,
}

impl Default for LocalizorConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("src"),
            locale_file: "locale".to_string(),
            extension: "yml".to_string(),
            default_locale: "en".to_string(),
            target_file: "translations".to_string(),
            watch: true,
            ignore_files: DEFAULT_IGNORE_PATTERN.to_string(),
            strict: false,
            debounce_ms: 0,
        }
    }
}

impl LocalizorConfig {
    /// Load `.localizorrc` from `base_dir`, falling back to defaults.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(RUN_CONTROL_FILE);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            debug!("No {RUN_CONTROL_FILE} in {}, using defaults", base_dir.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| LocalizorError::read(path, e))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| LocalizorError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check derived values without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.locale_file.is_empty() {
            return Err(LocalizorError::Config("localeFile must not be empty".to_string()));
        }
        if self.default_locale.is_empty() {
            return Err(LocalizorError::Config(
                "defaultLocale must not be empty".to_string(),
            ));
        }
        self.format()?;
        self.ignore_pattern()?;
        Ok(())
    }

    /// Set the root directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the output format extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Enable or disable watch mode.
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    /// Enable strict duplicate-key detection.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// The file name every locale file contains, e.g. `.locale.yml`.
    pub fn locale_file_name(&self) -> String {
        format!(".{}.{}", self.locale_file, self.extension)
    }

    /// The output file name, e.g. `translations.yml`.
    pub fn target_file_name(&self) -> String {
        format!("{}.{}", self.target_file, self.extension)
    }

    pub fn format(&self) -> Result<Format> {
        Format::from_extension(&self.extension)
    }

    pub fn ignore_pattern(&self) -> Result<Regex> {
        Regex::new(&self.ignore_files)
            .map_err(|e| LocalizorError::InvalidPattern(format!("{}: {e}", self.ignore_files)))
    }
}
