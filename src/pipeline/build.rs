//! Toolchain stage: bootstrap, configure, compile, install.

use crate::config::BuildConfig;
use crate::pipeline::error::Result;
use crate::pipeline::policy::{run_step, Step};
use crate::tools::Toolbox;

pub fn run(config: &BuildConfig, tools: &Toolbox) -> Result<()> {
    log::info!(
        "Building {} ({}, {} jobs)",
        config.profile().app_name,
        config.arch(),
        config.jobs()
    );
    let src = config.src_dir();
    run_step(Step::Bootstrap, || tools.toolchain.bootstrap(src))?;
    run_step(Step::Configure, || {
        tools.toolchain.configure(src, config.arch().cflags())
    })?;
    run_step(Step::Build, || tools.toolchain.build(src, config.jobs()))?;
    run_step(Step::Install, || tools.toolchain.install(src))?;
    log::info!("✓ Built and installed");
    Ok(())
}
