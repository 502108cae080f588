//! Quarantine attribute removal through the `xattr` tool.

use crate::pipeline::error::Result;
use crate::tools::invoke::Invoker;
use std::path::Path;
use std::sync::LazyLock;

/// Whether `xattr` is installed. Checked once.
pub static HAS_XATTR: LazyLock<bool> = LazyLock::new(|| {
    let found = which::which("xattr").is_ok();
    if found {
        log::debug!("xattr found in PATH");
    } else {
        log::debug!("xattr not found in PATH, quarantine attributes will be left in place");
    }
    found
});

/// Removes the `com.apple.quarantine` attribute from a bundle tree.
pub trait QuarantineStripper {
    fn strip(&self, path: &Path) -> Result<()>;
}

/// The system `xattr` tool. When the tool is missing this is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct XattrStripper {
    invoker: Invoker,
}

impl XattrStripper {
    pub fn new(invoker: Invoker) -> Self {
        Self { invoker }
    }
}

impl QuarantineStripper for XattrStripper {
    fn strip(&self, path: &Path) -> Result<()> {
        if !*HAS_XATTR {
            return Ok(());
        }
        let path = path.to_string_lossy();
        // xattr exits non-zero when the attribute was never set; that is
        // the common case and not worth a warning.
        if !self
            .invoker
            .run_ok("xattr", &["-r", "-d", "com.apple.quarantine", &path], None)?
        {
            log::debug!("No quarantine attribute removed from {path}");
        }
        Ok(())
    }
}
