//! Build-and-package pipeline for the Stanza macOS application.
//!
//! The pipeline builds Stanza from an autotools source checkout, locates
//! the produced Stanza.app bundle, installs the icon and Info.plist
//! metadata, optionally builds the StanzaClient.app launcher applet, and
//! code-signs everything from the inside out.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundle;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod tools;
pub mod util;

// Re-export commonly used types
pub use config::BuildConfig;
pub use error::{BundlerError, CliError, Result};
