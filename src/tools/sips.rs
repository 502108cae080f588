//! Image resizing through the macOS `sips` tool.

use crate::pipeline::error::Result;
use crate::tools::invoke::Invoker;
use std::path::Path;

/// Produces a square rendition of an image at a given pixel size.
pub trait Rasterizer {
    fn resize(&self, src: &Path, dst: &Path, size: u32) -> Result<()>;
}

/// The system `sips` scriptable image processing tool.
#[derive(Clone, Copy, Debug)]
pub struct SipsRasterizer {
    invoker: Invoker,
}

impl SipsRasterizer {
    pub fn new(invoker: Invoker) -> Self {
        Self { invoker }
    }
}

impl Rasterizer for SipsRasterizer {
    fn resize(&self, src: &Path, dst: &Path, size: u32) -> Result<()> {
        let size = size.to_string();
        let src = src.to_string_lossy();
        let dst = dst.to_string_lossy();
        self.invoker.run(
            "sips",
            &["-z", &size, &size, &src, "--out", &dst],
            None,
        )
    }
}
