//! Error handling for the packaging pipeline.
//!
//! Every pipeline stage shares one error type, plus small helpers for
//! attaching operation and path context to IO failures.

use std::path::Path;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by every pipeline stage.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Generic error carrying a fully rendered message.
    #[error("{0}")]
    GenericError(String),

    /// IO error without path context. Prefer [`ErrorExt::fs_context`]
    /// wherever the path is known.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A command could not be spawned at all.
    #[error("failed to run {command}: {error}")]
    CommandFailed {
        /// Rendered command line.
        command: String,
        /// Underlying spawn error.
        error: std::io::Error,
    },

    /// A command ran and exited with a non-zero status.
    #[error("{command} failed: {status}")]
    CommandExit {
        /// Rendered command line.
        command: String,
        /// Exit status reported by the OS.
        status: std::process::ExitStatus,
    },

    /// Directory traversal failed.
    #[error("directory walk failed: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix arithmetic failed during a recursive copy.
    #[error("path prefix error: {0}")]
    PathPrefix(#[from] std::path::StripPrefixError),
}

/// Returns early with an [`Error::GenericError`] built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::pipeline::error::Error::GenericError(format!($($arg)*)))
    };
}

/// Adds a message to errors (and absent options) while converting them into
/// the pipeline error type.
pub trait Context<T> {
    /// Wraps the error with a fixed message.
    fn context<S: Into<String>>(self, msg: S) -> Result<T>;

    /// Wraps the error with a lazily built message.
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<S: Into<String>>(self, msg: S) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.into()))
    }

    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(f().into()))
    }
}

impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context<S: Into<String>>(self, msg: S) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{}: {}", msg.into(), e)))
    }

    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{}: {}", f().into(), e)))
    }
}

/// Context helper for IO results where the affected path is known.
pub trait ErrorExt<T> {
    /// Wraps an IO error with the attempted action and path.
    fn fs_context(self, action: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, action: &str, path: &Path) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{} ({}): {}", action, path.display(), e)))
    }
}
