//! [`MetadataStore`] backed by `/usr/libexec/PlistBuddy`.
//!
//! Each operation is one or more `-c` directives against the document.
//! PlistBuddy reports routine conditions ("Does Not Exist", "Already
//! Exists") through stderr with a non-zero exit, so those are matched
//! rather than treated as failures. In dry-run mode every directive is
//! still echoed but nothing runs and presence questions are unanswerable;
//! the adapter then behaves as if keys were absent so the transcript
//! shows the complete edit.

use crate::metadata::{MetadataStore, PlistValue};
use crate::pipeline::error::{Error, Result};
use crate::tools::Invoker;
use std::path::Path;
use std::process::Output;

const PLIST_BUDDY: &str = "/usr/libexec/PlistBuddy";

/// Outcome of a `Print` probe.
enum Presence {
    Present,
    Absent,
    /// Dry-run mode; the document was never consulted.
    Unknown,
}

/// The system PlistBuddy tool.
#[derive(Clone, Copy, Debug)]
pub struct PlistBuddy {
    invoker: Invoker,
}

impl PlistBuddy {
    pub fn new(invoker: Invoker) -> Self {
        Self { invoker }
    }

    fn command(&self, doc: &Path, directive: &str) -> Result<Option<Output>> {
        let doc = doc.to_string_lossy();
        self.invoker.capture(PLIST_BUDDY, &["-c", directive, &doc])
    }

    fn probe(&self, doc: &Path, key_path: &str) -> Result<Presence> {
        let directive = format!("Print {key_path}");
        match self.command(doc, &directive)? {
            None => Ok(Presence::Unknown),
            Some(output) if output.status.success() => Ok(Presence::Present),
            Some(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                if stderr.contains("Does Not Exist") {
                    Ok(Presence::Absent)
                } else {
                    Err(directive_error(&directive, &stderr))
                }
            }
        }
    }

    fn run_directive(&self, doc: &Path, directive: &str) -> Result<()> {
        match self.command(doc, directive)? {
            None => Ok(()),
            Some(output) if output.status.success() => Ok(()),
            Some(output) => Err(directive_error(
                directive,
                &String::from_utf8_lossy(&output.stderr),
            )),
        }
    }

    fn add_value(&self, doc: &Path, key_path: &str, value: &PlistValue) -> Result<()> {
        let mut directives = Vec::new();
        add_directives(key_path, value, &mut directives);
        for directive in &directives {
            self.run_directive(doc, directive)?;
        }
        Ok(())
    }
}

impl MetadataStore for PlistBuddy {
    fn get(&self, doc: &Path, key_path: &str) -> Result<Option<String>> {
        let directive = format!("Print {key_path}");
        match self.command(doc, &directive)? {
            None => Ok(None),
            Some(output) if output.status.success() => {
                Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
            }
            Some(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                if stderr.contains("Does Not Exist") {
                    Ok(None)
                } else {
                    Err(directive_error(&directive, &stderr))
                }
            }
        }
    }

    fn set(&self, doc: &Path, key_path: &str, value: &PlistValue) -> Result<()> {
        match scalar_directive(value) {
            Some((type_name, rendered)) => {
                // `Set` fails on a missing key; fall back to `Add` then.
                let directive = format!("Set {key_path} {rendered}");
                match self.command(doc, &directive)? {
                    None => Ok(()),
                    Some(output) if output.status.success() => Ok(()),
                    Some(output) => {
                        let stderr = String::from_utf8_lossy(&output.stderr);
                        if stderr.contains("Does Not Exist") {
                            self.run_directive(
                                doc,
                                &format!("Add {key_path} {type_name} {rendered}"),
                            )
                        } else {
                            Err(directive_error(&directive, &stderr))
                        }
                    }
                }
            }
            // Containers cannot be written with `Set`; recreate them.
            None => {
                self.delete_if_present(doc, key_path)?;
                self.add_value(doc, key_path, value)
            }
        }
    }

    fn add_if_absent(&self, doc: &Path, key_path: &str, value: &PlistValue) -> Result<bool> {
        // `Add` at an array index inserts instead of failing, so presence
        // is checked with `Print` rather than by matching "Already Exists".
        match self.probe(doc, key_path)? {
            Presence::Present => Ok(false),
            Presence::Absent | Presence::Unknown => {
                self.add_value(doc, key_path, value)?;
                Ok(true)
            }
        }
    }

    fn delete_if_present(&self, doc: &Path, key_path: &str) -> Result<bool> {
        let directive = format!("Delete {key_path}");
        match self.command(doc, &directive)? {
            None => Ok(false),
            Some(output) if output.status.success() => Ok(true),
            Some(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                if stderr.contains("Does Not Exist") {
                    Ok(false)
                } else {
                    Err(directive_error(&directive, &stderr))
                }
            }
        }
    }
}

fn directive_error(directive: &str, stderr: &str) -> Error {
    Error::GenericError(format!(
        "PlistBuddy '{directive}' failed: {}",
        stderr.trim()
    ))
}

/// Flattens a value into the `Add` directives that create it, parents
/// before children.
fn add_directives(key_path: &str, value: &PlistValue, out: &mut Vec<String>) {
    match value {
        PlistValue::Array(items) => {
            out.push(format!("Add {key_path} array"));
            for (index, item) in items.iter().enumerate() {
                add_directives(&format!("{key_path}:{index}"), item, out);
            }
        }
        PlistValue::Dict(pairs) => {
            out.push(format!("Add {key_path} dict"));
            for (key, item) in pairs {
                add_directives(&format!("{key_path}:{key}"), item, out);
            }
        }
        scalar => {
            if let Some((type_name, rendered)) = scalar_directive(scalar) {
                out.push(format!("Add {key_path} {type_name} {rendered}"));
            }
        }
    }
}

/// PlistBuddy type name and textual rendering for a scalar, or `None`
/// for containers.
fn scalar_directive(value: &PlistValue) -> Option<(&'static str, String)> {
    match value {
        PlistValue::String(s) => Some(("string", s.clone())),
        PlistValue::Bool(b) => Some(("bool", b.to_string())),
        PlistValue::Integer(i) => Some(("integer", i.to_string())),
        PlistValue::Array(_) | PlistValue::Dict(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_renderings() {
        assert_eq!(
            scalar_directive(&PlistValue::string("Stanza")),
            Some(("string", "Stanza".to_string()))
        );
        assert_eq!(
            scalar_directive(&PlistValue::Bool(true)),
            Some(("bool", "true".to_string()))
        );
        assert_eq!(
            scalar_directive(&PlistValue::Integer(3)),
            Some(("integer", "3".to_string()))
        );
        assert_eq!(scalar_directive(&PlistValue::array([])), None);
    }

    #[test]
    fn nested_value_flattens_to_parent_first_adds() {
        let value = PlistValue::array([PlistValue::dict([
            ("CFBundleTypeName", PlistValue::string("Plain text document")),
            (
                "CFBundleTypeExtensions",
                PlistValue::array([PlistValue::string("txt"), PlistValue::string("md")]),
            ),
        ])]);

        let mut directives = Vec::new();
        add_directives(":CFBundleDocumentTypes", &value, &mut directives);

        assert_eq!(
            directives,
            vec![
                "Add :CFBundleDocumentTypes array",
                "Add :CFBundleDocumentTypes:0 dict",
                "Add :CFBundleDocumentTypes:0:CFBundleTypeName string Plain text document",
                "Add :CFBundleDocumentTypes:0:CFBundleTypeExtensions array",
                "Add :CFBundleDocumentTypes:0:CFBundleTypeExtensions:0 string txt",
                "Add :CFBundleDocumentTypes:0:CFBundleTypeExtensions:1 string md",
            ]
        );
    }

    #[test]
    fn dry_run_answers_without_running_anything() {
        let buddy = PlistBuddy::new(Invoker::new(true));
        let doc = Path::new("/b/Info.plist");
        assert_eq!(buddy.get(doc, ":CFBundleVersion").unwrap(), None);
        buddy
            .set(doc, ":CFBundleIconFile", &PlistValue::string("Stanza.icns"))
            .unwrap();
        assert!(buddy
            .add_if_absent(doc, ":CFBundleURLTypes", &PlistValue::array([]))
            .unwrap());
        assert!(!buddy.delete_if_present(doc, ":CFBundleIconName").unwrap());
    }
}
