//! Icon download over HTTP(S).

use crate::pipeline::error::{Error, ErrorExt, Result};
use std::path::Path;

/// Downloads a remote resource to a local file.
pub trait Fetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Blocking HTTP client. In dry-run mode the download is announced but
/// never performed.
#[derive(Clone, Copy, Debug)]
pub struct HttpFetcher {
    dry_run: bool,
}

impl HttpFetcher {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        log::info!("Downloading {url}");
        if self.dry_run {
            return Ok(());
        }
        let bytes = reqwest::blocking::get(url)
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .map_err(|e| Error::GenericError(format!("Download failed: {e}")))?;
        std::fs::write(dest, &bytes).fs_context("writing download", dest)?;
        log::debug!("✓ Downloaded {} bytes to {dest:?}", bytes.len());
        Ok(())
    }
}
