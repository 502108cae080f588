//! External tool adapters.
//!
//! Each capability the pipeline needs from the outside world sits behind a
//! narrow trait with one system-backed implementation here; tests swap in
//! in-memory fakes. [`Toolbox`] carries one of each.

pub mod codesign;
pub mod fetch;
pub mod iconutil;
pub mod invoke;
pub mod osacompile;
pub mod sips;
pub mod toolchain;
pub mod xattr;

#[cfg(test)]
pub(crate) mod testing;

pub use codesign::{CodesignSigner, Signer};
pub use fetch::{Fetcher, HttpFetcher};
pub use iconutil::{IconPacker, IconutilPacker};
pub use invoke::Invoker;
pub use osacompile::{OsacompileCompiler, ScriptCompiler};
pub use sips::{Rasterizer, SipsRasterizer};
pub use toolchain::{AutotoolsToolchain, Toolchain};
pub use xattr::{QuarantineStripper, XattrStripper};

use crate::metadata::MetadataStore;
use crate::util::fs::Fs;

/// Every external capability the pipeline touches, bundled together so
/// stages take one parameter instead of seven.
pub struct Toolbox {
    pub fs: Fs,
    pub toolchain: Box<dyn Toolchain>,
    pub metadata: Box<dyn MetadataStore>,
    pub rasterizer: Box<dyn Rasterizer>,
    pub packer: Box<dyn IconPacker>,
    pub compiler: Box<dyn ScriptCompiler>,
    pub signer: Box<dyn Signer>,
    pub quarantine: Box<dyn QuarantineStripper>,
    pub fetcher: Box<dyn Fetcher>,
}

impl Toolbox {
    /// The real system tools, all honoring the dry-run flag.
    pub fn system(dry_run: bool) -> Self {
        let invoker = Invoker::new(dry_run);
        Self {
            fs: Fs::new(dry_run),
            toolchain: Box::new(AutotoolsToolchain::new(invoker)),
            metadata: Box::new(crate::metadata::PlistBuddy::new(invoker)),
            rasterizer: Box::new(SipsRasterizer::new(invoker)),
            packer: Box::new(IconutilPacker::new(invoker)),
            compiler: Box::new(OsacompileCompiler::new(invoker)),
            signer: Box::new(CodesignSigner::new(invoker)),
            quarantine: Box::new(XattrStripper::new(invoker)),
            fetcher: Box::new(HttpFetcher::new(dry_run)),
        }
    }
}
