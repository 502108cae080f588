//! Code signing through the macOS `codesign` tool.

use crate::pipeline::error::Result;
use crate::tools::invoke::Invoker;
use std::path::Path;

/// Signs and verifies Mach-O artifacts and bundles.
pub trait Signer {
    /// Signs one artifact, replacing any existing signature.
    fn sign(&self, path: &Path, identity: &str) -> Result<()>;

    /// Deep-verifies a signed bundle.
    fn verify(&self, path: &Path) -> Result<()>;
}

/// The system `codesign` tool. The identity `"-"` selects ad-hoc signing.
#[derive(Clone, Copy, Debug)]
pub struct CodesignSigner {
    invoker: Invoker,
}

impl CodesignSigner {
    pub fn new(invoker: Invoker) -> Self {
        Self { invoker }
    }
}

impl Signer for CodesignSigner {
    fn sign(&self, path: &Path, identity: &str) -> Result<()> {
        let path = path.to_string_lossy();
        self.invoker
            .run("codesign", &["--force", "--sign", identity, &path], None)
    }

    fn verify(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.invoker
            .run("codesign", &["--verify", "--deep", "--strict", &path], None)
    }
}
