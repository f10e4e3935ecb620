//! Splitting an assembled translation document back into locale files.
//!
//! This is the inverse of a rebuild: every existing locale file under the
//! root receives the sub-tree found at its key sequence. Files without a
//! matching sub-tree, and files keyed into arrays, are left untouched.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::config::LocalizorConfig;
use crate::document::lookup;
use crate::error::{LocalizorError, Result};
use crate::index::StructureIndex;
use crate::keys::{PathKeyer, is_array_segment};
use crate::walker::TreeWalker;

/// Files touched by a migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Default location of a previously assembled document for `locale`.
pub fn default_source(config: &LocalizorConfig, base_dir: &Path, locale: &str) -> PathBuf {
    base_dir
        .join(&config.root)
        .join("locales")
        .join(format!("translation.{locale}.{}", config.extension))
}

/// Write the `from_locale` section of `source` back into the locale files.
pub fn migrate(
    config: &LocalizorConfig,
    base_dir: &Path,
    from_locale: &str,
    source: Option<&Path>,
) -> Result<MigrationReport> {
    let format = config.format()?;
    let root = base_dir.join(&config.root);
    let source = source.map_or_else(
        || default_source(config, base_dir, from_locale),
        Path::to_path_buf,
    );

    let document = format.load(&source)?;
    let translations = document
        .get(from_locale)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            LocalizorError::Config(format!(
                "{} has no \"{from_locale}\" section",
                source.display()
            ))
        })?;

    let locale_file_name = config.locale_file_name();
    let files = TreeWalker::new(&locale_file_name).walk(&root)?;
    let index = StructureIndex::build(&PathKeyer::new(&root, &locale_file_name), files)?;

    let mut report = MigrationReport::default();
    for (path, keys) in index.iter() {
        if keys.is_empty() || keys.segments().iter().any(|s| is_array_segment(s)) {
            debug!("Skipping {}: no addressable key", path.display());
            report.skipped.push(path.clone());
            continue;
        }

        match lookup(translations, keys) {
            None | Some(Value::Null) => {
                debug!("Skipping {}: nothing at {keys}", path.display());
                report.skipped.push(path.clone());
            }
            Some(content) => {
                let rendered = format.render(content)?;
                std::fs::write(path, rendered).map_err(|e| LocalizorError::write(path, e))?;
                report.written.push(path.clone());
            }
        }
    }

    info!(
        "Migrated {} locale files from {} ({} skipped)",
        report.written.len(),
        source.display(),
        report.skipped.len()
    );
    Ok(report)
}
