//! Icon packing through the macOS `iconutil` tool.

use crate::pipeline::error::Result;
use crate::tools::invoke::Invoker;
use std::path::Path;

/// Packs a `.iconset` directory into a `.icns` file.
pub trait IconPacker {
    fn pack(&self, iconset: &Path, icns: &Path) -> Result<()>;
}

/// The system `iconutil` converter.
#[derive(Clone, Copy, Debug)]
pub struct IconutilPacker {
    invoker: Invoker,
}

impl IconutilPacker {
    pub fn new(invoker: Invoker) -> Self {
        Self { invoker }
    }
}

impl IconPacker for IconutilPacker {
    fn pack(&self, iconset: &Path, icns: &Path) -> Result<()> {
        let icns = icns.to_string_lossy();
        let iconset = iconset.to_string_lossy();
        self.invoker
            .run("iconutil", &["-c", "icns", "-o", &icns, &iconset], None)
    }
}
