//! Command line interface.

mod args;

pub use args::Args;

use crate::error::Result;
use crate::pipeline;

/// Parses arguments, runs the pipeline, and returns the process exit code.
pub fn run() -> Result<i32> {
    let args = Args::parse_args();
    let config = args.into_config()?;
    pipeline::run(&config)?;
    Ok(0)
}
