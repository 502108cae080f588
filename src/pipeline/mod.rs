//! The bundling pipeline.
//!
//! Stages run in a fixed order: native build, bundle location and
//! validation, icon installation, metadata edits, the optional companion
//! launcher, and signing. Each fallible step goes through the failure
//! policy in [`policy`], so what aborts the run and what merely warns is
//! decided in one place.

pub mod build;
pub mod error;
pub mod icon;
pub mod launcher;
pub mod policy;
pub mod sign;

pub use error::{Error, Result};

use crate::bundle::AppBundle;
use crate::config::BuildConfig;
use crate::metadata::{self, edits, Edit};
use crate::pipeline::policy::{run_step, Step};
use crate::tools::Toolbox;
use std::path::Path;

/// Runs the full pipeline with the real system tools.
pub fn run(config: &BuildConfig) -> Result<()> {
    let tools = Toolbox::system(config.dry_run());
    run_with(config, &tools)
}

/// Runs the full pipeline against an explicit toolbox.
pub fn run_with(config: &BuildConfig, tools: &Toolbox) -> Result<()> {
    if config.dry_run() {
        log::info!("Dry run: commands are printed, nothing is executed");
    }

    build::run(config, tools)?;

    let Some(bundle) = run_step(Step::LocateBundle, || {
        AppBundle::locate(config, &tools.fs)
    })?
    else {
        return Ok(());
    };
    if !config.dry_run() {
        run_step(Step::ValidateBundle, || bundle.validate(config.profile()))?;
    }

    if config.icon().is_some() || config.assets().is_some() {
        run_step(Step::IconPipeline, || icon::apply(config, tools, &bundle))?;
    }

    apply_edit_table(
        tools,
        &bundle.info_plist(),
        &edits::primary_edits(config.profile()),
    )?;

    let launcher_root = if config.build_client_app() {
        run_step(Step::LauncherBuild, || launcher::run(config, tools, &bundle))?
    } else {
        None
    };

    match config.sign_identity() {
        Some(identity) => {
            sign::run(bundle.root(), identity, tools)?;
            if let Some(launcher_root) = &launcher_root {
                sign::run(launcher_root, identity, tools)?;
            }
        }
        None => log::info!("Skipping code signing (--no-sign)"),
    }

    log::info!(
        "✓ {} is ready at {:?}",
        config.profile().bundle_file_name(),
        bundle.root()
    );
    Ok(())
}

/// Applies an edit table row by row; a failed row warns and the rest of
/// the table still runs.
pub(crate) fn apply_edit_table(tools: &Toolbox, doc: &Path, edits: &[Edit]) -> Result<()> {
    for edit in edits {
        run_step(Step::MetadataEdit, || {
            metadata::apply(tools.metadata.as_ref(), doc, edit)
        })?;
    }
    Ok(())
}
