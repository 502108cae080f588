//! Command line argument parsing and validation.

use crate::config::BuildConfig;
use crate::error::CliError;
use clap::Parser;
use std::path::PathBuf;

/// Build and package pipeline for Stanza.app
#[derive(Parser, Debug)]
#[command(
    name = "stanza-bundler",
    version,
    about = "Builds, brands, and signs the Stanza.app bundle",
    long_about = "Builds Stanza from source and packages the result as a signed macOS application bundle.

Runs the autotools build, finds (or relocates) Stanza.app, installs the icon and optional asset catalog, registers document types and the stanza:// URL scheme, optionally builds the StanzaClient.app launcher applet, and code-signs everything from the inside out.

Usage:
  stanza-bundler --src ~/src/stanza --icon ./stanza.png
  stanza-bundler --src . --build-client-app --prefix /usr/local
  stanza-bundler --dry-run --icon https://example.org/stanza.png

Exit code 0 = the bundle under --app-dir is complete."
)]
pub struct Args {
    /// Source checkout to build; configure and make run here
    #[arg(short = 's', long, value_name = "DIR", default_value = ".")]
    pub src: PathBuf,

    /// Directory the finished bundle lands in [default: ~/Applications]
    #[arg(long, value_name = "DIR")]
    pub app_dir: Option<PathBuf>,

    /// Install prefix searched for the stanzaclient binary
    #[arg(long, value_name = "DIR")]
    pub prefix: Option<PathBuf>,

    /// Icon to install: a local .png/.jpg/.icns path or an http(s) URL
    #[arg(long, value_name = "PATH_OR_URL")]
    pub icon: Option<String>,

    /// Compiled asset catalog (Assets.car) to install
    #[arg(long, value_name = "FILE")]
    pub assets: Option<PathBuf>,

    /// Also build the StanzaClient.app launcher applet
    #[arg(long)]
    pub build_client_app: bool,

    /// Parallel make jobs [default: number of CPUs]
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Code-signing identity; "-" signs ad-hoc
    #[arg(
        long,
        value_name = "IDENTITY",
        default_value = "-",
        conflicts_with = "no_sign"
    )]
    pub sign_identity: String,

    /// Skip code signing, verification, and quarantine removal
    #[arg(long)]
    pub no_sign: bool,

    /// Print every command without executing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validates the arguments and resolves them into an immutable
    /// [`BuildConfig`].
    pub fn into_config(self) -> Result<BuildConfig, CliError> {
        if self.jobs == Some(0) {
            return Err(CliError::InvalidArguments {
                reason: "--jobs must be at least 1".into(),
            });
        }
        if !self.dry_run && !self.src.is_dir() {
            return Err(CliError::InvalidArguments {
                reason: format!("--src {:?} is not a directory", self.src),
            });
        }

        let mut builder = BuildConfig::builder()
            .src_dir(self.src)
            .build_client_app(self.build_client_app)
            .sign_identity(self.sign_identity)
            .dry_run(self.dry_run);
        if let Some(app_dir) = self.app_dir {
            builder = builder.app_dir(app_dir);
        }
        if let Some(prefix) = self.prefix {
            builder = builder.prefix(prefix);
        }
        if let Some(icon) = self.icon {
            builder = builder.icon(icon);
        }
        if let Some(assets) = self.assets {
            builder = builder.assets(assets);
        }
        if let Some(jobs) = self.jobs {
            builder = builder.jobs(jobs);
        }
        if self.no_sign {
            builder = builder.no_sign();
        }
        builder.build()
    }
}
