//! In-memory [`MetadataStore`] for tests.
//!
//! Mirrors the PlistBuddy adapter's observable semantics: key paths are
//! colon-separated, `set` replaces or appends, `add_if_absent` leaves
//! existing values alone, deleting a missing path reports `false`, and
//! writing below a missing parent is an error.

use crate::bail;
use crate::metadata::{MetadataStore, PlistValue};
use crate::pipeline::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct MemoryStore {
    docs: RefCell<HashMap<PathBuf, PlistValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document, as `osacompile` or a build would.
    pub fn insert_document(&self, doc: &Path) {
        self.docs
            .borrow_mut()
            .insert(doc.to_path_buf(), PlistValue::dict::<String>([]));
    }

    /// Seeds a value, creating the document if needed.
    pub fn insert_value(&self, doc: &Path, key_path: &str, value: PlistValue) {
        if !self.docs.borrow().contains_key(doc) {
            self.insert_document(doc);
        }
        self.set(doc, key_path, &value)
            .unwrap_or_else(|e| panic!("seeding {key_path}: {e}"));
    }

    /// Clone of the value at a key path, for structural assertions.
    pub fn value(&self, doc: &Path, key_path: &str) -> Option<PlistValue> {
        let docs = self.docs.borrow();
        let root = docs.get(doc)?;
        descend(root, &segments(key_path)).cloned()
    }

    /// Whether the document exists at all.
    pub fn has_document(&self, doc: &Path) -> bool {
        self.docs.borrow().contains_key(doc)
    }
}

impl MetadataStore for MemoryStore {
    fn get(&self, doc: &Path, key_path: &str) -> Result<Option<String>> {
        Ok(self.value(doc, key_path).map(|value| text_of(&value)))
    }

    fn set(&self, doc: &Path, key_path: &str, value: &PlistValue) -> Result<()> {
        let mut docs = self.docs.borrow_mut();
        let Some(root) = docs.get_mut(doc) else {
            bail!("no such document: {doc:?}");
        };
        let segs = segments(key_path);
        let Some((last, parents)) = segs.split_last() else {
            *root = value.clone();
            return Ok(());
        };
        let Some(parent) = descend_mut(root, parents) else {
            bail!("{key_path} has no parent in {doc:?}");
        };
        match parent {
            PlistValue::Dict(pairs) => {
                if let Some(entry) = pairs.iter_mut().find(|(k, _)| k == last) {
                    entry.1 = value.clone();
                } else {
                    pairs.push((last.to_string(), value.clone()));
                }
            }
            PlistValue::Array(items) => {
                let Ok(index) = last.parse::<usize>() else {
                    bail!("{last} is not an array index");
                };
                if index < items.len() {
                    items[index] = value.clone();
                } else if index == items.len() {
                    items.push(value.clone());
                } else {
                    bail!("index {index} out of range in {key_path}");
                }
            }
            _ => bail!("{key_path} parent is not a container"),
        }
        Ok(())
    }

    fn add_if_absent(&self, doc: &Path, key_path: &str, value: &PlistValue) -> Result<bool> {
        if self.value(doc, key_path).is_some() {
            return Ok(false);
        }
        self.set(doc, key_path, value)?;
        Ok(true)
    }

    fn delete_if_present(&self, doc: &Path, key_path: &str) -> Result<bool> {
        let mut docs = self.docs.borrow_mut();
        let Some(root) = docs.get_mut(doc) else {
            return Ok(false);
        };
        let segs = segments(key_path);
        let Some((last, parents)) = segs.split_last() else {
            return Ok(false);
        };
        let Some(parent) = descend_mut(root, parents) else {
            return Ok(false);
        };
        match parent {
            PlistValue::Dict(pairs) => {
                let before = pairs.len();
                pairs.retain(|(k, _)| k != last);
                Ok(pairs.len() != before)
            }
            PlistValue::Array(items) => match last.parse::<usize>() {
                Ok(index) if index < items.len() => {
                    items.remove(index);
                    Ok(true)
                }
                _ => Ok(false),
            },
            _ => Ok(false),
        }
    }
}

fn segments(key_path: &str) -> Vec<&str> {
    key_path
        .strip_prefix(':')
        .unwrap_or(key_path)
        .split(':')
        .filter(|s| !s.is_empty())
        .collect()
}

fn descend<'a>(mut node: &'a PlistValue, segments: &[&str]) -> Option<&'a PlistValue> {
    for segment in segments {
        node = match node {
            PlistValue::Dict(pairs) => pairs.iter().find(|(k, _)| k == segment).map(|(_, v)| v)?,
            PlistValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

fn descend_mut<'a>(mut node: &'a mut PlistValue, segments: &[&str]) -> Option<&'a mut PlistValue> {
    for segment in segments {
        node = match node {
            PlistValue::Dict(pairs) => pairs
                .iter_mut()
                .find(|(k, _)| k == segment)
                .map(|(_, v)| v)?,
            PlistValue::Array(items) => items.get_mut(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

fn text_of(value: &PlistValue) -> String {
    match value {
        PlistValue::String(s) => s.clone(),
        PlistValue::Bool(b) => b.to_string(),
        PlistValue::Integer(i) => i.to_string(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> &'static Path {
        Path::new("/bundle/Contents/Info.plist")
    }

    #[test]
    fn set_creates_and_replaces() {
        let store = MemoryStore::new();
        store.insert_document(doc());
        store.set(doc(), ":CFBundleName", &PlistValue::string("A")).unwrap();
        store.set(doc(), ":CFBundleName", &PlistValue::string("B")).unwrap();
        assert_eq!(store.get(doc(), ":CFBundleName").unwrap().as_deref(), Some("B"));
    }

    #[test]
    fn add_if_absent_respects_existing_values() {
        let store = MemoryStore::new();
        store.insert_document(doc());
        assert!(store
            .add_if_absent(doc(), ":CFBundleVersion", &PlistValue::string("1"))
            .unwrap());
        assert!(!store
            .add_if_absent(doc(), ":CFBundleVersion", &PlistValue::string("2"))
            .unwrap());
        assert_eq!(store.get(doc(), ":CFBundleVersion").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn nested_navigation() {
        let store = MemoryStore::new();
        store.insert_document(doc());
        let types = PlistValue::array([PlistValue::dict([(
            "CFBundleTypeName",
            PlistValue::string("Plain text document"),
        )])]);
        store.set(doc(), ":CFBundleDocumentTypes", &types).unwrap();
        assert_eq!(
            store
                .get(doc(), ":CFBundleDocumentTypes:0:CFBundleTypeName")
                .unwrap()
                .as_deref(),
            Some("Plain text document")
        );
    }

    #[test]
    fn delete_reports_presence() {
        let store = MemoryStore::new();
        store.insert_document(doc());
        store.set(doc(), ":CFBundleIconFile", &PlistValue::string("x")).unwrap();
        assert!(store.delete_if_present(doc(), ":CFBundleIconFile").unwrap());
        assert!(!store.delete_if_present(doc(), ":CFBundleIconFile").unwrap());
        assert!(!store.delete_if_present(doc(), ":Nested:Path").unwrap());
    }

    #[test]
    fn missing_parent_is_an_error_for_writes() {
        let store = MemoryStore::new();
        store.insert_document(doc());
        assert!(store
            .set(doc(), ":Missing:Child", &PlistValue::string("x"))
            .is_err());
    }
}
