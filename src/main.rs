//! Stanza bundler - builds and packages the Stanza.app bundle.
//!
//! This binary runs the autotools build, brands the resulting macOS
//! application bundle, and code-signs every artifact inside it.

use std::process;

use env_logger::Env;

fn main() {
    // Default to info so the command echoes are visible
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match stanza_bundler::cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
