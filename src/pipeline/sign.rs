//! Signing stage.
//!
//! Signs a bundle from the inside out: libraries first, then standalone
//! executables, then nested bundles deepest-first, and the outer bundle
//! last, so every container seals artifacts that are already signed.
//! Individual signing failures are warnings; the stage never aborts a
//! build that got this far.

use crate::pipeline::error::Result;
use crate::pipeline::policy::{run_step, Step};
use crate::tools::Toolbox;
use crate::util::macho::{self, MachOKind};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Artifacts to sign, grouped and ordered.
#[derive(Debug, Default)]
struct SigningPlan {
    libraries: Vec<PathBuf>,
    executables: Vec<PathBuf>,
    nested_bundles: Vec<PathBuf>,
}

impl SigningPlan {
    /// Walks the bundle and classifies its contents. Mach-O detection
    /// goes by file content, never by permission bits or extension, so
    /// scripts stay unsigned and extensionless helpers do not. A missing
    /// root (dry-run) yields an empty plan.
    fn discover(root: &Path) -> Result<SigningPlan> {
        let mut plan = SigningPlan::default();
        if !root.exists() {
            return Ok(plan);
        }

        for entry in walkdir::WalkDir::new(root) {
            let entry = entry?;
            let path = entry.path();
            if path == root {
                continue;
            }
            if entry.file_type().is_dir() {
                let ext = path.extension().and_then(OsStr::to_str);
                if matches!(ext, Some("app" | "framework")) {
                    plan.nested_bundles.push(path.to_path_buf());
                }
                continue;
            }
            if !entry.file_type().is_file() {
                // Symlinks are signed through their targets.
                continue;
            }
            match macho::classify(path) {
                Ok(Some(MachOKind::Library)) => plan.libraries.push(path.to_path_buf()),
                Ok(Some(MachOKind::Executable)) => plan.executables.push(path.to_path_buf()),
                Ok(None) => {}
                Err(e) => log::warn!("Skipping unreadable {path:?}: {e}"),
            }
        }

        plan.libraries.sort();
        plan.executables.sort();
        // Deepest first, so inner bundles are sealed before the bundles
        // that contain them.
        plan.nested_bundles
            .sort_by(|a, b| depth(b).cmp(&depth(a)).then_with(|| a.cmp(b)));
        Ok(plan)
    }
}

fn depth(path: &Path) -> usize {
    path.components().count()
}

/// Signs one bundle tree, verifies the result, and strips the quarantine
/// attribute.
pub fn run(bundle_root: &Path, identity: &str, tools: &Toolbox) -> Result<()> {
    log::info!("Signing {bundle_root:?} with identity {identity:?}");
    let plan = SigningPlan::discover(bundle_root)?;

    for artifact in plan
        .libraries
        .iter()
        .chain(&plan.executables)
        .chain(&plan.nested_bundles)
    {
        run_step(Step::SignArtifact, || tools.signer.sign(artifact, identity))?;
    }
    run_step(Step::SignArtifact, || tools.signer.sign(bundle_root, identity))?;

    run_step(Step::VerifySignature, || tools.signer.verify(bundle_root))?;
    run_step(Step::StripQuarantine, || tools.quarantine.strip(bundle_root))?;
    log::info!("✓ Signed {bundle_root:?}");
    Ok(())
}
