//! Dry-run-aware filesystem operations.
//!
//! Every mutating operation is echoed in shell form before it runs and
//! skipped entirely in dry-run mode. Copies create parent directories and
//! preserve symlinks; removals are idempotent.

use crate::pipeline::error::{Error, Result};
use crate::util::shell::sh_quote;
use std::io;
use std::path::Path;

/// Filesystem mutation handle carrying the dry-run flag.
#[derive(Clone, Copy, Debug)]
pub struct Fs {
    dry_run: bool,
}

impl Fs {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Copies a regular file, creating any parent directories of the
    /// destination as necessary.
    pub fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        echo(&format!("cp {} {}", quoted(from), quoted(to)));
        if self.dry_run {
            return Ok(());
        }
        if !from.is_file() {
            return Err(Error::GenericError(format!("{from:?} is not a file")));
        }
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(from, to)?;
        Ok(())
    }

    /// Recursively copies a directory, creating any parent directories of
    /// the destination as necessary. Symlinks are recreated, not followed.
    pub fn copy_dir(&self, from: &Path, to: &Path) -> Result<()> {
        echo(&format!("cp -R {} {}", quoted(from), quoted(to)));
        if self.dry_run {
            return Ok(());
        }
        if !from.is_dir() {
            return Err(Error::GenericError(format!("{from:?} is not a directory")));
        }
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }

        for entry in walkdir::WalkDir::new(from) {
            let entry = entry?;
            debug_assert!(entry.path().starts_with(from));
            let rel_path = entry.path().strip_prefix(from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())?;
                if entry.path().is_dir() {
                    symlink_dir(&target, &dest_path)?;
                } else {
                    symlink_file(&target, &dest_path)?;
                }
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path)?;
            }
        }

        Ok(())
    }

    /// Removes a directory and its contents if it exists.
    pub fn remove_dir_all(&self, path: &Path) -> Result<()> {
        if self.dry_run {
            echo(&format!("rm -rf {}", quoted(path)));
            return Ok(());
        }
        if !path.exists() {
            return Ok(());
        }
        echo(&format!("rm -rf {}", quoted(path)));
        match std::fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes a file if it exists, reporting whether anything was removed.
    pub fn remove_file_if_present(&self, path: &Path) -> Result<bool> {
        if self.dry_run {
            echo(&format!("rm -f {}", quoted(path)));
            return Ok(false);
        }
        if !path.exists() {
            return Ok(false);
        }
        echo(&format!("rm -f {}", quoted(path)));
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn echo(action: &str) {
    log::info!("$ {}", action);
}

fn quoted(path: &Path) -> String {
    sh_quote(&path.to_string_lossy())
}

#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}
