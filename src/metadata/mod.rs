//! Info.plist editing.
//!
//! All metadata changes are expressed as tables of [`Edit`] rows rather
//! than ad-hoc tool calls, so the full set of property-list mutations for
//! a bundle can be read in one place (see [`edits`]). Every operation is
//! idempotent: re-running a table against an already-edited document
//! changes nothing.
//!
//! Key paths use PlistBuddy syntax, colon-separated from the document
//! root: `:CFBundleIconFile`, `:CFBundleDocumentTypes:0:CFBundleTypeName`.

pub mod edits;
#[cfg(test)]
pub(crate) mod memory;
pub mod plistbuddy;

pub use plistbuddy::PlistBuddy;

use crate::pipeline::error::Result;
use std::path::Path;

/// A property-list value tree.
#[derive(Clone, Debug, PartialEq)]
pub enum PlistValue {
    String(String),
    Bool(bool),
    Integer(i64),
    Array(Vec<PlistValue>),
    /// Key order is preserved; it determines the order keys are created in.
    Dict(Vec<(String, PlistValue)>),
}

impl PlistValue {
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn array(items: impl IntoIterator<Item = PlistValue>) -> Self {
        Self::Array(items.into_iter().collect())
    }

    pub fn dict<K: Into<String>>(pairs: impl IntoIterator<Item = (K, PlistValue)>) -> Self {
        Self::Dict(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// How one [`Edit`] row changes its key path.
#[derive(Clone, Debug, PartialEq)]
pub enum EditOp {
    /// Writes the value, creating or replacing as needed.
    Set(PlistValue),
    /// Writes the value only when the key path does not exist yet.
    AddIfAbsent(PlistValue),
    /// Removes the key path; absence is not an error.
    DeleteIfPresent,
}

/// One row of a metadata edit table.
#[derive(Clone, Debug, PartialEq)]
pub struct Edit {
    pub key_path: String,
    pub op: EditOp,
}

impl Edit {
    pub fn set(key_path: impl Into<String>, value: PlistValue) -> Self {
        Self {
            key_path: key_path.into(),
            op: EditOp::Set(value),
        }
    }

    pub fn add_if_absent(key_path: impl Into<String>, value: PlistValue) -> Self {
        Self {
            key_path: key_path.into(),
            op: EditOp::AddIfAbsent(value),
        }
    }

    pub fn delete_if_present(key_path: impl Into<String>) -> Self {
        Self {
            key_path: key_path.into(),
            op: EditOp::DeleteIfPresent,
        }
    }
}

/// Property-list document access. The system implementation drives
/// PlistBuddy; tests use an in-memory store with the same semantics.
pub trait MetadataStore {
    /// Reads the textual rendering of a scalar value, or `None` when the
    /// key path does not exist (or cannot be known, as in dry-run mode).
    fn get(&self, doc: &Path, key_path: &str) -> Result<Option<String>>;

    /// Writes a value, creating or replacing the key path.
    fn set(&self, doc: &Path, key_path: &str, value: &PlistValue) -> Result<()>;

    /// Writes a value only when the key path is absent. Reports whether
    /// anything was written.
    fn add_if_absent(&self, doc: &Path, key_path: &str, value: &PlistValue) -> Result<bool>;

    /// Removes a key path if present. Reports whether anything was removed.
    fn delete_if_present(&self, doc: &Path, key_path: &str) -> Result<bool>;
}

/// Applies one edit row to a document.
pub fn apply(store: &dyn MetadataStore, doc: &Path, edit: &Edit) -> Result<()> {
    match &edit.op {
        EditOp::Set(value) => store.set(doc, &edit.key_path, value),
        EditOp::AddIfAbsent(value) => {
            if !store.add_if_absent(doc, &edit.key_path, value)? {
                log::debug!("{} already present, leaving it alone", edit.key_path);
            }
            Ok(())
        }
        EditOp::DeleteIfPresent => {
            if store.delete_if_present(doc, &edit.key_path)? {
                log::debug!("Removed {}", edit.key_path);
            }
            Ok(())
        }
    }
}
