//! Nested document assembly.
//!
//! Every entry of a [`StructureIndex`] contributes exactly one insertion,
//! in index order. A key segment ending in `[]` addresses an array: as the
//! final segment it appends the content, as an intermediate segment it
//! descends into the array's last object (creating one when needed). Any
//! other final segment assigns.
//!
//! When parent and child files overlap, the deeper key owns its sub-tree:
//! a parent's content fills in around it and a child's content overrides
//! what a parent put there, whichever is inserted first. Assigning the same
//! key a second time replaces the earlier content.

use std::collections::HashSet;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{LocalizorError, Result};
use crate::format::Format;
use crate::index::StructureIndex;
use crate::keys::{KeySequence, split_segment};

/// Loads the parsed content of one locale file.
pub trait ContentLoader {
    fn load(&self, path: &Path) -> Result<Value>;
}

impl ContentLoader for Format {
    fn load(&self, path: &Path) -> Result<Value> {
        Format::load(*self, path)
    }
}

impl<F> ContentLoader for F
where
    F: Fn(&Path) -> Result<Value>,
{
    fn load(&self, path: &Path) -> Result<Value> {
        self(path)
    }
}

/// A tree of keyed containers and arrays, rooted at an empty container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedDocument {
    root: Map<String, Value>,
    assigned: HashSet<KeySequence>,
    /// Key paths with array markers stripped, one per insertion.
    owners: HashSet<Vec<String>>,
}

impl NestedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` at `keys`, creating intermediate containers as needed.
    pub fn insert_at(&mut self, keys: &KeySequence, value: Value) -> Result<()> {
        let Some((last, parents)) = keys.segments().split_last() else {
            return Err(LocalizorError::DegenerateKey("document root".to_string()));
        };

        let (key, is_array) = split_segment(last);
        let repeated = !is_array && !self.assigned.insert(keys.clone());

        let mut path: Vec<String> = keys
            .segments()
            .iter()
            .map(|s| split_segment(s).0.to_string())
            .collect();
        self.owners.insert(path.clone());

        let owners = &self.owners;
        let mut current = &mut self.root;
        for segment in parents {
            current = descend(current, segment);
        }

        if is_array {
            let slot = current.entry(key).or_insert(Value::Null);
            ensure_array(slot).push(value);
            return Ok(());
        }

        let value = match current.remove(key) {
            Some(existing) => combine(owners, &mut path, existing, value, repeated),
            None => value,
        };
        current.insert(key.to_string(), value);

        Ok(())
    }

    /// Look up the value stored at `keys`, ignoring array markers.
    pub fn get(&self, keys: &KeySequence) -> Option<&Value> {
        lookup(&self.root, keys)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Wrap the document under a single top-level locale key.
    pub fn into_output(self, locale: &str) -> Value {
        let mut output = Map::new();
        output.insert(locale.to_string(), Value::Object(self.root));
        Value::Object(output)
    }
}

/// Look up a non-array key path inside a plain map.
pub(crate) fn lookup<'a>(root: &'a Map<String, Value>, keys: &KeySequence) -> Option<&'a Value> {
    let (first, rest) = keys.segments().split_first()?;
    let mut current = root.get(split_segment(first).0)?;
    for segment in rest {
        current = current.as_object()?.get(split_segment(segment).0)?;
    }
    Some(current)
}

/// Combine `incoming`, assigned at `path`, with the value already there.
///
/// Sub-trees owned by deeper insertions keep their values and only take
/// missing keys from `incoming`. Everything else takes `incoming`. With
/// `replace`, existing keys that no deeper insertion owns are dropped.
fn combine(
    owners: &HashSet<Vec<String>>,
    path: &mut Vec<String>,
    existing: Value,
    incoming: Value,
    replace: bool,
) -> Value {
    match (existing, incoming) {
        (Value::Object(mut old), Value::Object(new)) => {
            let mut merged = Map::new();
            for (key, value) in new {
                path.push(key.clone());
                let value = match old.remove(&key) {
                    None => value,
                    Some(mut previous) if owners.contains(path.as_slice()) => {
                        merge_under(&mut previous, value);
                        previous
                    }
                    Some(previous) => combine(owners, path, previous, value, replace),
                };
                path.pop();
                merged.insert(key, value);
            }

            for (key, previous) in old {
                path.push(key.clone());
                let keep = !replace
                    || owners.contains(path.as_slice())
                    || owns_below(owners, path);
                path.pop();
                if keep {
                    merged.insert(key, previous);
                }
            }

            Value::Object(merged)
        }
        (existing, _) if owns_below(owners, path) => existing,
        (_, incoming) => incoming,
    }
}

/// Whether some insertion landed strictly beneath `path`.
fn owns_below(owners: &HashSet<Vec<String>>, path: &[String]) -> bool {
    owners
        .iter()
        .any(|owner| owner.len() > path.len() && owner.starts_with(path))
}

/// Deep-merge `incoming` beneath `existing`; values already present win.
fn merge_under(existing: &mut Value, incoming: Value) {
    let (Value::Object(target), Value::Object(source)) = (existing, incoming) else {
        return;
    };
    for (key, value) in source {
        match target.get_mut(&key) {
            Some(current) => merge_under(current, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

fn descend<'a>(map: &'a mut Map<String, Value>, segment: &str) -> &'a mut Map<String, Value> {
    let (key, is_array) = split_segment(segment);
    let slot = map.entry(key).or_insert(Value::Null);

    if is_array {
        let items = ensure_array(slot);
        if !items.last().is_some_and(Value::is_object) {
            items.push(Value::Object(Map::new()));
        }
        let last = items.len() - 1;
        ensure_object(&mut items[last])
    } else {
        ensure_object(slot)
    }
}

fn ensure_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just replaced with an object"),
    }
}

fn ensure_array(slot: &mut Value) -> &mut Vec<Value> {
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => items,
        _ => unreachable!("slot was just replaced with an array"),
    }
}

/// Builds a [`NestedDocument`] from indexed locale files.
pub struct DocumentAssembler<L> {
    loader: L,
    strict: bool,
}

impl<L: ContentLoader> DocumentAssembler<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            strict: false,
        }
    }

    /// Fail with `DuplicateKey` instead of overwriting on collisions.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn assemble(&self, index: &StructureIndex) -> Result<NestedDocument> {
        let mut document = NestedDocument::new();
        let mut assigned: HashSet<&KeySequence> = HashSet::new();

        for (path, keys) in index.iter() {
            if keys.is_empty() {
                return Err(LocalizorError::DegenerateKey(path.display().to_string()));
            }

            if !keys.is_array() && !assigned.insert(keys) {
                if self.strict {
                    return Err(LocalizorError::DuplicateKey {
                        key: keys.to_string(),
                        path: path.clone(),
                    });
                }
                debug!("{} overwrites existing key {keys}", path.display());
            }

            let content = self.loader.load(path)?;
            document.insert_at(keys, content)?;
            debug!("Inserted {} at {keys}", path.display());
        }

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Entries are `(path, dotted keys)`; an empty string means no keys.
    fn index(entries: &[(&str, &str)]) -> StructureIndex {
        entries
            .iter()
            .map(|(path, keys)| {
                let segments = keys.split('.').filter(|s| !s.is_empty());
                (PathBuf::from(path), KeySequence::new(segments))
            })
            .collect()
    }

    fn loader(contents: HashMap<&'static str, Value>) -> impl Fn(&Path) -> Result<Value> {
        move |path: &Path| {
            let key = path.to_str().unwrap_or_default();
            Ok(contents.get(key).cloned().unwrap_or(Value::Null))
        }
    }

    #[test]
    fn test_insert_creates_intermediate_containers() {
        let mut document = NestedDocument::new();
        document
            .insert_at(&KeySequence::new(["a", "b", "c"]), json!("leaf"))
            .unwrap();
        document
            .insert_at(&KeySequence::new(["a", "x"]), json!(1))
            .unwrap();

        assert_eq!(
            document.into_output("en"),
            json!({"en": {"a": {"b": {"c": "leaf"}, "x": 1}}})
        );
    }

    #[test]
    fn test_insert_rejects_empty_keys() {
        let mut document = NestedDocument::new();
        let err = document
            .insert_at(&KeySequence::default(), json!({"x": 1}))
            .unwrap_err();
        assert!(matches!(err, LocalizorError::DegenerateKey(_)));
        assert!(document.as_map().is_empty());
    }

    #[test]
    fn test_array_segment_appends() {
        let mut document = NestedDocument::new();
        let keys = KeySequence::new(["list[]"]);
        document.insert_at(&keys, json!({"a": 1})).unwrap();
        document.insert_at(&keys, json!({"b": 2})).unwrap();

        assert_eq!(
            document.get(&keys),
            Some(&json!([{"a": 1}, {"b": 2}]))
        );
    }

    #[test]
    fn test_array_segment_coerces_scalar() {
        let mut document = NestedDocument::new();
        document
            .insert_at(&KeySequence::new(["list"]), json!("scalar"))
            .unwrap();
        document
            .insert_at(&KeySequence::new(["list[]"]), json!(1))
            .unwrap();

        assert_eq!(document.get(&KeySequence::new(["list"])), Some(&json!([1])));
    }

    #[test]
    fn test_intermediate_array_segment_descends_into_last_object() {
        let mut document = NestedDocument::new();
        document
            .insert_at(&KeySequence::new(["items[]", "title"]), json!("T"))
            .unwrap();
        document
            .insert_at(&KeySequence::new(["items[]", "body"]), json!("B"))
            .unwrap();

        assert_eq!(
            document.into_output("en"),
            json!({"en": {"items": [{"title": "T", "body": "B"}]}})
        );
    }

    #[test]
    fn test_assemble_nested_structure() {
        let index = index(&[("/s/a/b/.l", "a.b"), ("/s/a/.l", "a")]);
        let mut contents = HashMap::new();
        contents.insert("/s/a/.l", json!({"x": 1}));
        contents.insert("/s/a/b/.l", json!({"y": 2}));

        let child_first = DocumentAssembler::new(loader(contents.clone()))
            .assemble(&index)
            .unwrap();

        let index = self::index(&[("/s/a/.l", "a"), ("/s/a/b/.l", "a.b")]);
        let parent_first = DocumentAssembler::new(loader(contents))
            .assemble(&index)
            .unwrap();

        assert_eq!(child_first, parent_first);
        assert_eq!(
            parent_first.into_output("en"),
            json!({"en": {"a": {"x": 1, "b": {"y": 2}}}})
        );
    }

    #[test]
    fn test_parent_merge_keeps_deeper_values() {
        let mut document = NestedDocument::new();
        document
            .insert_at(&KeySequence::new(["a", "b"]), json!({"y": 2}))
            .unwrap();
        document
            .insert_at(
                &KeySequence::new(["a"]),
                json!({"x": 1, "b": {"y": 0, "z": 3}}),
            )
            .unwrap();

        assert_eq!(
            document.into_output("en"),
            json!({"en": {"a": {"x": 1, "b": {"y": 2, "z": 3}}}})
        );
    }

    #[test]
    fn test_child_overrides_parent_in_either_order() {
        let parent = (KeySequence::new(["a"]), json!({"x": 1, "b": {"y": 0, "z": 3}}));
        let child = (KeySequence::new(["a", "b"]), json!({"y": 2}));

        let mut parent_first = NestedDocument::new();
        for (keys, value) in [parent.clone(), child.clone()] {
            parent_first.insert_at(&keys, value).unwrap();
        }
        let mut child_first = NestedDocument::new();
        for (keys, value) in [child, parent] {
            child_first.insert_at(&keys, value).unwrap();
        }

        let expected = json!({"en": {"a": {"x": 1, "b": {"y": 2, "z": 3}}}});
        assert_eq!(parent_first.into_output("en"), expected);
        assert_eq!(child_first.into_output("en"), expected);
    }

    #[test]
    fn test_three_levels_combine_in_any_order() {
        let entries = [
            (KeySequence::new(["a"]), json!({"b": {"c": {"v": 0}, "w": 0}})),
            (KeySequence::new(["a", "b"]), json!({"c": {"v": 1}, "w": 1})),
            (KeySequence::new(["a", "b", "c"]), json!({"v": 2})),
        ];
        let orders = [[0, 1, 2], [2, 1, 0], [1, 0, 2], [2, 0, 1], [0, 2, 1], [1, 2, 0]];

        for order in orders {
            let mut document = NestedDocument::new();
            for i in order {
                let (keys, value) = entries[i].clone();
                document.insert_at(&keys, value).unwrap();
            }
            assert_eq!(
                document.into_output("en"),
                json!({"en": {"a": {"b": {"c": {"v": 2}, "w": 1}}}}),
                "insertion order {order:?}"
            );
        }
    }

    #[test]
    fn test_parent_scalar_does_not_replace_child_container() {
        let mut document = NestedDocument::new();
        document
            .insert_at(&KeySequence::new(["a", "b"]), json!({"y": 2}))
            .unwrap();
        document
            .insert_at(&KeySequence::new(["a"]), json!({"b": "text"}))
            .unwrap();

        assert_eq!(
            document.into_output("en"),
            json!({"en": {"a": {"b": {"y": 2}}}})
        );
    }

    #[test]
    fn test_repeated_key_replaces_but_keeps_children() {
        let mut document = NestedDocument::new();
        let a = KeySequence::new(["a"]);
        document.insert_at(&a, json!({"old": 1})).unwrap();
        document
            .insert_at(&KeySequence::new(["a", "b"]), json!({"y": 2}))
            .unwrap();
        document.insert_at(&a, json!({"new": 1})).unwrap();

        assert_eq!(
            document.into_output("en"),
            json!({"en": {"a": {"new": 1, "b": {"y": 2}}}})
        );
    }

    #[test]
    fn test_collision_last_write_wins() {
        let index = index(&[("/s/first", "a"), ("/s/second", "a")]);
        let mut contents = HashMap::new();
        contents.insert("/s/first", json!({"from": "first"}));
        contents.insert("/s/second", json!({"from": "second"}));

        let document = DocumentAssembler::new(loader(contents))
            .assemble(&index)
            .unwrap();

        assert_eq!(
            document.into_output("en"),
            json!({"en": {"a": {"from": "second"}}})
        );
    }

    #[test]
    fn test_strict_mode_rejects_collision() {
        let index = index(&[("/s/first", "a"), ("/s/second", "a")]);

        let err = DocumentAssembler::new(loader(HashMap::new()))
            .strict(true)
            .assemble(&index)
            .unwrap_err();

        match err {
            LocalizorError::DuplicateKey { key, path } => {
                assert_eq!(key, "a");
                assert_eq!(path, PathBuf::from("/s/second"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strict_mode_allows_array_keys() {
        let index = index(&[("/s/one", "list[]"), ("/s/two", "list[]")]);

        let document = DocumentAssembler::new(loader(HashMap::new()))
            .strict(true)
            .assemble(&index)
            .unwrap();

        assert_eq!(
            document.get(&KeySequence::new(["list"])),
            Some(&json!([null, null]))
        );
    }

    #[test]
    fn test_assemble_rejects_degenerate_key() {
        let index = index(&[("/s/.l", "")]);

        let err = DocumentAssembler::new(loader(HashMap::new()))
            .assemble(&index)
            .unwrap_err();
        assert!(matches!(err, LocalizorError::DegenerateKey(_)));
    }

    #[test]
    fn test_loader_error_propagates() {
        let index = index(&[("/s/a", "a")]);
        let failing = |path: &Path| -> Result<Value> {
            Err(LocalizorError::ParseFailure {
                path: path.to_path_buf(),
                message: "bad".to_string(),
            })
        };

        let err = DocumentAssembler::new(failing).assemble(&index).unwrap_err();
        assert!(matches!(err, LocalizorError::ParseFailure { .. }));
    }
}
