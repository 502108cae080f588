//! Failure policy per pipeline step.
//!
//! Every fallible step is classified once, here, instead of scattering
//! `match` arms through the stages: toolchain and bundle steps abort the
//! run, cosmetic steps log a warning and carry on, and per-file cleanup
//! steps fail silently at debug level.

use crate::pipeline::error::Result;

/// What a step failure does to the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Policy {
    /// The run cannot continue.
    Fatal,
    /// Log a warning and keep going.
    Warn,
    /// Log at debug level and keep going.
    Silent,
}

/// One classified step of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Bootstrap,
    Configure,
    Build,
    Install,
    LocateBundle,
    ValidateBundle,
    IconPipeline,
    IconDownload,
    IconResize,
    MetadataEdit,
    LauncherBuild,
    SignArtifact,
    VerifySignature,
    StripQuarantine,
}

impl Step {
    fn policy(&self) -> Policy {
        match self {
            // Release tarballs have no autogen.sh; a failed bootstrap is
            // expected there and configure decides for real.
            Step::Bootstrap => Policy::Warn,
            Step::Configure | Step::Build | Step::Install => Policy::Fatal,
            Step::LocateBundle | Step::ValidateBundle => Policy::Fatal,
            Step::IconPipeline | Step::IconDownload => Policy::Warn,
            Step::IconResize => Policy::Silent,
            Step::MetadataEdit => Policy::Warn,
            Step::LauncherBuild => Policy::Fatal,
            Step::SignArtifact | Step::VerifySignature => Policy::Warn,
            Step::StripQuarantine => Policy::Silent,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Step::Bootstrap => "Bootstrap",
            Step::Configure => "configure",
            Step::Build => "make",
            Step::Install => "make install",
            Step::LocateBundle => "Locating the bundle",
            Step::ValidateBundle => "Validating the bundle",
            Step::IconPipeline => "Icon installation",
            Step::IconDownload => "Icon download",
            Step::IconResize => "Icon resize",
            Step::MetadataEdit => "Info.plist edit",
            Step::LauncherBuild => "Launcher build",
            Step::SignArtifact => "Signing",
            Step::VerifySignature => "Signature verification",
            Step::StripQuarantine => "Quarantine removal",
        }
    }
}

/// Runs one step under its policy. A tolerated failure yields `None`.
pub fn run_step<T>(step: Step, op: impl FnOnce() -> Result<T>) -> Result<Option<T>> {
    match op() {
        Ok(value) => Ok(Some(value)),
        Err(e) => match step.policy() {
            Policy::Fatal => Err(e),
            Policy::Warn => {
                log::warn!("{} failed: {e} (continuing)", step.describe());
                Ok(None)
            }
            Policy::Silent => {
                log::debug!("{} failed: {e}", step.describe());
                Ok(None)
            }
        },
    }
}
