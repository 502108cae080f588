//! The application bundle on disk.
//!
//! [`AppBundle`] knows the fixed layout of a macOS `.app` directory and
//! how to find the one a build produced: the configured application
//! directory is authoritative, with a fallback to the build tree for
//! source layouts whose `make install` leaves the bundle in `macos/`.

use crate::bail;
use crate::config::{AppProfile, BuildConfig};
use crate::pipeline::error::Result;
use crate::util::fs::Fs;
use std::path::{Path, PathBuf};

/// A located `.app` bundle.
#[derive(Clone, Debug)]
pub struct AppBundle {
    root: PathBuf,
}

impl AppBundle {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contents_dir(&self) -> PathBuf {
        self.root.join("Contents")
    }

    pub fn macos_dir(&self) -> PathBuf {
        self.contents_dir().join("MacOS")
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.contents_dir().join("Resources")
    }

    pub fn info_plist(&self) -> PathBuf {
        self.contents_dir().join("Info.plist")
    }

    pub fn executable(&self, profile: &AppProfile) -> PathBuf {
        self.macos_dir().join(&profile.app_name)
    }

    /// Finds the bundle the build produced. When it only exists inside
    /// the source tree it is copied to the application directory first,
    /// so later stages always work on the installed location.
    pub fn locate(config: &BuildConfig, fs: &Fs) -> Result<AppBundle> {
        let expected = config.app_dir().join(config.profile().bundle_file_name());
        if expected.is_dir() {
            log::info!("Found bundle at {expected:?}");
            return Ok(AppBundle::at(expected));
        }

        let fallback = config
            .src_dir()
            .join("macos")
            .join(config.profile().bundle_file_name());
        if fallback.is_dir() {
            log::info!("Relocating bundle from {fallback:?} to {expected:?}");
            fs.copy_dir(&fallback, &expected)?;
            return Ok(AppBundle::at(expected));
        }

        if config.dry_run() {
            log::info!("Assuming bundle at {expected:?}");
            return Ok(AppBundle::at(expected));
        }

        bail!(
            "no application bundle at {expected:?} or {fallback:?}; did `make install` produce one?"
        )
    }

    /// Checks the bundle has the parts every later stage relies on.
    pub fn validate(&self, profile: &AppProfile) -> Result<()> {
        let executable = self.executable(profile);
        if !executable.is_file() {
            bail!("bundle at {:?} has no executable {executable:?}", self.root);
        }
        let info_plist = self.info_plist();
        if !info_plist.is_file() {
            bail!("bundle at {:?} has no Info.plist", self.root);
        }
        log::debug!("✓ Bundle at {:?} is complete", self.root);
        Ok(())
    }
}
