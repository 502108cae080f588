//! Companion launcher stage.
//!
//! Builds a small AppleScript applet bundle that hands files, URLs, and
//! plain activations to the command-line client, then stamps it with its
//! own identity and the main bundle's version and icon. The applet is the
//! thing Finder and `open` talk to when the real editor should not be
//! launched a second time.

use crate::bail;
use crate::bundle::AppBundle;
use crate::config::BuildConfig;
use crate::metadata::edits;
use crate::pipeline::apply_edit_table;
use crate::pipeline::error::{Context, Result};
use crate::tools::Toolbox;
use crate::util::shell::{applescript_escape, sh_quote};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// AppleScript source for the applet. `{{client}}` is the resolved
/// client path, already quoted for the shell and escaped for AppleScript.
const LAUNCHER_TEMPLATE: &str = r#"on run
    do shell script "{{client}} --no-wait --new-window"
end run

on open dropped_items
    repeat with dropped_item in dropped_items
        do shell script "{{client}} --no-wait " & quoted form of POSIX path of dropped_item
    end repeat
end open

on open location this_url
    do shell script "{{client}} --no-wait " & quoted form of this_url
end open location
"#;

/// Builds the launcher applet next to the main bundle and returns its
/// root path.
pub fn run(config: &BuildConfig, tools: &Toolbox, bundle: &AppBundle) -> Result<PathBuf> {
    let profile = config.profile();
    let client = resolve_client_path(config, bundle)?;
    log::info!(
        "Building {} around {client:?}",
        profile.launcher_file_name()
    );

    let script = render_script(&client)?;
    let staging = tempfile::tempdir()?;
    let script_path = staging.path().join("launcher.applescript");
    std::fs::write(&script_path, script)?;

    let launcher = AppBundle::at(config.app_dir().join(profile.launcher_file_name()));
    // A launcher from an earlier run would make osacompile merge rather
    // than replace.
    tools.fs.remove_dir_all(launcher.root())?;
    tools.compiler.compile(&script_path, launcher.root())?;

    let version = tools
        .metadata
        .get(&bundle.info_plist(), ":CFBundleShortVersionString")?
        .unwrap_or_else(|| profile.fallback_version.clone());

    let primary_icns = bundle.resources_dir().join(profile.icns_file_name());
    let with_icon = primary_icns.is_file();
    if with_icon {
        tools.fs.copy_file(
            &primary_icns,
            &launcher.resources_dir().join(profile.icns_file_name()),
        )?;
    }

    apply_edit_table(
        tools,
        &launcher.info_plist(),
        &edits::launcher_edits(profile, &version, with_icon),
    )?;
    log::info!("✓ Built {}", profile.launcher_file_name());
    Ok(launcher.root().to_path_buf())
}

/// Finds the client binary the applet should call: an explicit prefix is
/// authoritative, then a client shipped inside the bundle, then the
/// system default location.
fn resolve_client_path(config: &BuildConfig, bundle: &AppBundle) -> Result<PathBuf> {
    let profile = config.profile();

    if let Some(prefix) = config.prefix() {
        let candidate = prefix.join("bin").join(&profile.client_binary);
        if candidate.is_file() || config.dry_run() {
            return Ok(candidate);
        }
        bail!("--prefix {prefix:?} has no {} at {candidate:?}", profile.client_binary);
    }

    let colocated = bundle.macos_dir().join("bin").join(&profile.client_binary);
    if colocated.is_file() {
        return Ok(colocated);
    }

    let system = Path::new(&profile.default_client_dir).join(&profile.client_binary);
    if system.is_file() || config.dry_run() {
        return Ok(system);
    }

    bail!(
        "cannot find {}: not at {colocated:?} or {system:?}; pass --prefix",
        profile.client_binary
    )
}

fn render_script(client: &Path) -> Result<String> {
    let mut handlebars = handlebars::Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .register_template_string("launcher", LAUNCHER_TEMPLATE)
        .context("Failed to register launcher template")?;

    let mut data = BTreeMap::new();
    data.insert(
        "client".to_string(),
        applescript_escape(&sh_quote(&client.to_string_lossy())),
    );
    handlebars
        .render("launcher", &data)
        .context("Failed to render launcher script")
}
