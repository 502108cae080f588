//! Build configuration.
//!
//! [`BuildConfig`] is assembled once from the command line via
//! [`BuildConfigBuilder`] and is immutable afterwards; every pipeline stage
//! reads from it and none may change it.

pub mod arch;
pub mod profile;

pub use arch::Arch;
pub use profile::AppProfile;

use crate::error::CliError;
use std::path::{Path, PathBuf};

/// Fully resolved settings for one bundling run.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    src_dir: PathBuf,
    app_dir: PathBuf,
    prefix: Option<PathBuf>,
    icon: Option<String>,
    assets: Option<PathBuf>,
    build_client_app: bool,
    jobs: usize,
    sign_identity: Option<String>,
    dry_run: bool,
    arch: Arch,
    profile: AppProfile,
}

impl BuildConfig {
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::new()
    }

    /// Source checkout that `configure` and `make` run in.
    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// Directory the finished `.app` bundle is expected in.
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// Explicit install prefix for locating the client binary.
    pub fn prefix(&self) -> Option<&Path> {
        self.prefix.as_deref()
    }

    /// Icon source: a local file path or an `http(s)` URL.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Optional compiled asset catalog to install alongside the icon.
    pub fn assets(&self) -> Option<&Path> {
        self.assets.as_deref()
    }

    /// Whether to build the companion launcher bundle.
    pub fn build_client_app(&self) -> bool {
        self.build_client_app
    }

    /// Parallelism passed to `make -j`.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Code-signing identity, or `None` when signing is disabled.
    /// `"-"` selects ad-hoc signing.
    pub fn sign_identity(&self) -> Option<&str> {
        self.sign_identity.as_deref()
    }

    /// When set, commands are printed but never executed.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn profile(&self) -> &AppProfile {
        &self.profile
    }
}

/// Builder for [`BuildConfig`]. Unset fields fall back to sensible
/// defaults when [`build`](Self::build) runs.
#[derive(Default)]
pub struct BuildConfigBuilder {
    src_dir: Option<PathBuf>,
    app_dir: Option<PathBuf>,
    prefix: Option<PathBuf>,
    icon: Option<String>,
    assets: Option<PathBuf>,
    build_client_app: bool,
    jobs: Option<usize>,
    sign_identity: Option<String>,
    no_sign: bool,
    dry_run: bool,
    arch: Option<Arch>,
    profile: Option<AppProfile>,
}

impl BuildConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn src_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.src_dir = Some(path.into());
        self
    }

    pub fn app_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_dir = Some(path.into());
        self
    }

    pub fn prefix(mut self, path: impl Into<PathBuf>) -> Self {
        self.prefix = Some(path.into());
        self
    }

    pub fn icon(mut self, source: impl Into<String>) -> Self {
        self.icon = Some(source.into());
        self
    }

    pub fn assets(mut self, path: impl Into<PathBuf>) -> Self {
        self.assets = Some(path.into());
        self
    }

    pub fn build_client_app(mut self, enabled: bool) -> Self {
        self.build_client_app = enabled;
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn sign_identity(mut self, identity: impl Into<String>) -> Self {
        self.sign_identity = Some(identity.into());
        self
    }

    /// Disables code signing entirely, including the verification and
    /// quarantine-stripping passes.
    pub fn no_sign(mut self) -> Self {
        self.no_sign = true;
        self
    }

    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn arch(mut self, arch: Arch) -> Self {
        self.arch = Some(arch);
        self
    }

    pub fn profile(mut self, profile: AppProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn build(self) -> Result<BuildConfig, CliError> {
        let app_dir = match self.app_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .map(|home| home.join("Applications"))
                .ok_or(CliError::NoHomeDirectory)?,
        };
        let sign_identity = if self.no_sign {
            None
        } else {
            Some(self.sign_identity.unwrap_or_else(|| "-".into()))
        };
        Ok(BuildConfig {
            src_dir: self.src_dir.unwrap_or_else(|| PathBuf::from(".")),
            app_dir,
            prefix: self.prefix,
            icon: self.icon,
            assets: self.assets,
            build_client_app: self.build_client_app,
            jobs: self.jobs.unwrap_or_else(num_cpus::get),
            sign_identity,
            dry_run: self.dry_run,
            arch: self.arch.unwrap_or_else(Arch::host),
            profile: self.profile.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BuildConfig::builder().app_dir("/tmp/apps").build().unwrap();
        assert_eq!(config.src_dir(), Path::new("."));
        assert_eq!(config.app_dir(), Path::new("/tmp/apps"));
        assert_eq!(config.sign_identity(), Some("-"));
        assert!(config.jobs() >= 1);
        assert!(!config.build_client_app());
        assert!(!config.dry_run());
        assert_eq!(config.profile().app_name, "Stanza");
    }

    #[test]
    fn no_sign_clears_identity() {
        let config = BuildConfig::builder()
            .app_dir("/tmp/apps")
            .sign_identity("Developer ID Application: Example")
            .no_sign()
            .build()
            .unwrap();
        assert_eq!(config.sign_identity(), None);
    }

    #[test]
    fn explicit_values_win() {
        let config = BuildConfig::builder()
            .src_dir("/work/stanza")
            .app_dir("/tmp/apps")
            .prefix("/opt/stanza")
            .icon("https://example.org/icon.png")
            .assets("/tmp/Assets.car")
            .build_client_app(true)
            .jobs(7)
            .sign_identity("Developer ID Application: Example")
            .dry_run(true)
            .build()
            .unwrap();
        assert_eq!(config.src_dir(), Path::new("/work/stanza"));
        assert_eq!(config.prefix(), Some(Path::new("/opt/stanza")));
        assert_eq!(config.icon(), Some("https://example.org/icon.png"));
        assert_eq!(config.assets(), Some(Path::new("/tmp/Assets.car")));
        assert!(config.build_client_app());
        assert_eq!(config.jobs(), 7);
        assert_eq!(
            config.sign_identity(),
            Some("Developer ID Application: Example")
        );
        assert!(config.dry_run());
    }
}
