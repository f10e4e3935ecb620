//! Structure index: discovered files mapped to their key sequences.

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::error::Result;
use crate::keys::{KeySequence, PathKeyer};

/// Key sequences of every discovered file, in walk order.
#[derive(Debug, Clone, Default)]
pub struct StructureIndex {
    entries: IndexMap<PathBuf, KeySequence>,
}

impl StructureIndex {
    /// Key every file with `keyer`. No deduplication happens here.
    pub fn build(keyer: &PathKeyer, files: impl IntoIterator<Item = PathBuf>) -> Result<Self> {
        let mut entries = IndexMap::new();
        for file in files {
            let keys = keyer.keys_for(&file)?;
            entries.insert(file, keys);
        }
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &KeySequence)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(PathBuf, KeySequence)> for StructureIndex {
    fn from_iter<T: IntoIterator<Item = (PathBuf, KeySequence)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
