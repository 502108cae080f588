//! Autotools build driver: `sh autogen.sh`, `./configure`, `make`,
//! `make install`, all run inside the source checkout.

use crate::pipeline::error::Result;
use crate::tools::invoke::Invoker;
use std::path::Path;

/// Configure options every build gets, in addition to per-arch `CFLAGS`.
const CONFIGURE_OPTIONS: [&str; 3] = [
    "--with-cocoa",
    "--with-modules",
    "--without-compress-install",
];

/// Drives the native build of the editor sources.
pub trait Toolchain {
    /// Regenerates the configure script. Callers treat failure here as
    /// non-fatal, since release tarballs ship without `autogen.sh`.
    fn bootstrap(&self, src: &Path) -> Result<()>;

    /// Runs `./configure` with the fixed option set plus the given
    /// compiler flags.
    fn configure(&self, src: &Path, cflags: &str) -> Result<()>;

    /// Compiles with the requested parallelism.
    fn build(&self, src: &Path, jobs: usize) -> Result<()>;

    /// Installs into the configured prefix.
    fn install(&self, src: &Path) -> Result<()>;
}

/// The real autotools toolchain, spawned through an [`Invoker`].
#[derive(Clone, Copy, Debug)]
pub struct AutotoolsToolchain {
    invoker: Invoker,
}

impl AutotoolsToolchain {
    pub fn new(invoker: Invoker) -> Self {
        Self { invoker }
    }
}

impl Toolchain for AutotoolsToolchain {
    fn bootstrap(&self, src: &Path) -> Result<()> {
        if !self.invoker.is_dry_run() && !src.join("autogen.sh").is_file() {
            log::debug!("No autogen.sh in {src:?}, skipping bootstrap");
            return Ok(());
        }
        self.invoker.run("sh", &["autogen.sh"], Some(src))
    }

    fn configure(&self, src: &Path, cflags: &str) -> Result<()> {
        let args = configure_args(cflags);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.invoker.run("./configure", &args, Some(src))
    }

    fn build(&self, src: &Path, jobs: usize) -> Result<()> {
        let parallelism = format!("-j{jobs}");
        self.invoker.run("make", &[&parallelism], Some(src))
    }

    fn install(&self, src: &Path) -> Result<()> {
        self.invoker.run("make", &["install"], Some(src))
    }
}

fn configure_args(cflags: &str) -> Vec<String> {
    let mut args: Vec<String> = CONFIGURE_OPTIONS.iter().map(ToString::to_string).collect();
    args.push(format!("CFLAGS={cflags}"));
    args
}
