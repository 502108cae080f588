//! Icon stage: resolve, rasterize, pack, install.
//!
//! The icon source may be a local file or an `http(s)` URL. Raster images
//! go through a sips-built iconset and iconutil packing; a ready-made
//! `.icns` is installed verbatim. An optional compiled asset catalog
//! (`Assets.car`) is installed after the icon and takes precedence over
//! it in the bundle metadata.

use crate::bail;
use crate::bundle::AppBundle;
use crate::config::BuildConfig;
use crate::metadata::edits;
use crate::pipeline::apply_edit_table;
use crate::pipeline::error::Result;
use crate::pipeline::policy::{run_step, Step};
use crate::tools::Toolbox;
use std::path::{Path, PathBuf};

/// Iconset renditions, in points; each also gets an `@2x` variant.
pub const ICON_SIZES: [u32; 6] = [16, 32, 64, 128, 256, 512];

/// A `.icns` file ready to install. Holds the temporaries it may live
/// in, so the staging area outlives the install copy and is cleaned up
/// afterwards no matter how the stage exits.
struct StagedIcon {
    path: PathBuf,
    _download: Option<tempfile::NamedTempFile>,
    _iconset: Option<tempfile::TempDir>,
    _packed: Option<tempfile::NamedTempFile>,
}

/// Installs the configured icon and asset catalog into the bundle and
/// rewrites the icon metadata accordingly.
pub fn apply(config: &BuildConfig, tools: &Toolbox, bundle: &AppBundle) -> Result<()> {
    let profile = config.profile();
    let resources = bundle.resources_dir();
    let info_plist = bundle.info_plist();

    let mut icns_installed = false;
    if let Some(source) = config.icon() {
        if let Some(staged) = prepare_icns(source, tools)? {
            tools
                .fs
                .copy_file(&staged.path, &resources.join(profile.icns_file_name()))?;
            apply_edit_table(tools, &info_plist, &edits::clear_icon_edits())?;
            apply_edit_table(tools, &info_plist, &edits::icon_file_edits(profile))?;
            icns_installed = true;
            log::info!("✓ Installed {}", profile.icns_file_name());
        }
    }

    if let Some(car) = config.assets() {
        if !tools.fs.is_dry_run() && !car.is_file() {
            bail!("asset catalog {car:?} does not exist");
        }
        tools.fs.copy_file(car, &resources.join("Assets.car"))?;
        if !icns_installed {
            apply_edit_table(tools, &info_plist, &edits::clear_icon_edits())?;
        }
        apply_edit_table(tools, &info_plist, &edits::icon_catalog_edits(profile))?;
        log::info!("✓ Installed Assets.car");
    } else if icns_installed {
        // A catalog left over from an earlier build would shadow the
        // freshly installed file-based icon.
        if tools.fs.remove_file_if_present(&resources.join("Assets.car"))? {
            log::info!("Removed stale Assets.car");
        }
    }

    Ok(())
}

/// Resolves the icon source to an installable `.icns` file, downloading
/// and converting as needed. `None` means the download failed and the
/// run should simply go on without an icon.
fn prepare_icns(source: &str, tools: &Toolbox) -> Result<Option<StagedIcon>> {
    let mut download = None;
    let local = if is_url(source) {
        let suffix = url_file_extension(source)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_else(|| ".png".into());
        let file = tempfile::Builder::new()
            .prefix("stanza-icon")
            .suffix(&suffix)
            .tempfile()?;
        if run_step(Step::IconDownload, || tools.fetcher.fetch(source, file.path()))?.is_none() {
            return Ok(None);
        }
        let path = file.path().to_path_buf();
        download = Some(file);
        path
    } else {
        let path = PathBuf::from(source);
        if !tools.fs.is_dry_run() && !path.is_file() {
            bail!("icon {path:?} does not exist");
        }
        path
    };

    let ext = local
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "icns" => Ok(Some(StagedIcon {
            path: local,
            _download: download,
            _iconset: None,
            _packed: None,
        })),
        "png" | "jpg" | "jpeg" => {
            let iconset = tempfile::Builder::new()
                .prefix("stanza-icon")
                .suffix(".iconset")
                .tempdir()?;
            populate_iconset(&local, iconset.path(), tools)?;
            let packed = tempfile::Builder::new()
                .prefix("stanza-icon")
                .suffix(".icns")
                .tempfile()?;
            tools.packer.pack(iconset.path(), packed.path())?;
            Ok(Some(StagedIcon {
                path: packed.path().to_path_buf(),
                _download: download,
                _iconset: Some(iconset),
                _packed: Some(packed),
            }))
        }
        other => bail!("unsupported icon format {other:?} ({local:?})"),
    }
}

fn populate_iconset(source: &Path, iconset: &Path, tools: &Toolbox) -> Result<()> {
    for size in ICON_SIZES {
        rasterize_or_copy(source, &iconset.join(format!("icon_{size}x{size}.png")), size, tools)?;
        rasterize_or_copy(
            source,
            &iconset.join(format!("icon_{size}x{size}@2x.png")),
            size * 2,
            tools,
        )?;
    }
    Ok(())
}

fn rasterize_or_copy(source: &Path, dest: &Path, pixels: u32, tools: &Toolbox) -> Result<()> {
    let resized = run_step(Step::IconResize, || {
        tools.rasterizer.resize(source, dest, pixels)
    })?;
    if resized.is_none() {
        // iconutil rejects iconsets with missing renditions.
        tools.fs.copy_file(source, dest)?;
    }
    Ok(())
}

fn is_url(source: &str) -> bool {
    matches!(url::Url::parse(source), Ok(parsed) if matches!(parsed.scheme(), "http" | "https"))
}

fn url_file_extension(source: &str) -> Option<String> {
    let parsed = url::Url::parse(source).ok()?;
    let file = parsed.path_segments()?.next_back()?;
    let ext = Path::new(file).extension()?;
    Some(ext.to_string_lossy().to_ascii_lowercase())
}
