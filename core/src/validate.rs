//! YAML syntax check over a directory tree.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{LocalizorError, Result};

/// Directories never descended into.
pub const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", ".next", "dist", "build"];

/// A YAML file that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFile {
    pub path: PathBuf,
    pub error: String,
    /// One-based position of the error, when known.
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl InvalidFile {
    fn new(path: &Path, error: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            error: error.into(),
            line: None,
            column: None,
        }
    }
}

/// Collect every `.yml`/`.yaml` file under `dir` that is empty or unparsable.
pub fn check_directory(dir: &Path) -> Result<Vec<InvalidFile>> {
    if !dir.exists() {
        return Err(LocalizorError::RootNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(LocalizorError::Config(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(entry.file_type().is_dir()
                    && SKIPPED_DIRS.iter().any(|name| entry.file_name() == *name))
        });

    let mut invalid = Vec::new();
    let mut checked = 0;
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to scan {}: {e}", dir.display());
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_yaml(entry.path()) {
            continue;
        }

        checked += 1;
        if let Some(problem) = check_file(entry.path()) {
            invalid.push(problem);
        }
    }

    debug!("Checked {checked} YAML files, {} invalid", invalid.len());
    Ok(invalid)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yml") || e.eq_ignore_ascii_case("yaml"))
}

fn check_file(path: &Path) -> Option<InvalidFile> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return Some(InvalidFile::new(path, e.to_string())),
    };

    if content.trim().is_empty() {
        return Some(InvalidFile::new(path, "empty file"));
    }

    let err = serde_yaml::from_str::<serde_yaml::Value>(&content).err()?;
    let location = err.location();
    Some(InvalidFile {
        line: location.as_ref().map(serde_yaml::Location::line),
        column: location.as_ref().map(serde_yaml::Location::column),
        ..InvalidFile::new(path, err.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_reports_empty_and_broken_files() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "ok/.locale.yml", "title: Hello\n");
        write(temp_dir.path(), "empty/.locale.yml", "  \n");
        write(temp_dir.path(), "broken/.locale.yaml", "a: 1\nb: [\n");
        write(temp_dir.path(), "notes.txt", "a: [\n");

        let invalid = check_directory(temp_dir.path()).unwrap();
        let paths: Vec<_> = invalid.iter().map(|f| f.path.clone()).collect();

        assert_eq!(
            paths,
            vec![
                temp_dir.path().join("broken/.locale.yaml"),
                temp_dir.path().join("empty/.locale.yml"),
            ]
        );
        assert_eq!(invalid[1].error, "empty file");
        assert!(invalid[0].line.is_some());
    }

    #[test]
    fn test_skips_dependency_directories() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "node_modules/pkg/config.yml", "a: [\n");
        write(temp_dir.path(), "dist/out.yml", "");

        assert!(check_directory(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let err = check_directory(Path::new("/nonexistent/path/12345")).unwrap_err();
        assert!(matches!(err, LocalizorError::RootNotFound(_)));
    }
}
