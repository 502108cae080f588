//! The edit tables applied to bundle property lists.
//!
//! Identity keys (`CFBundleIdentifier`, names, versions) are only ever
//! written for the companion launcher; the main bundle's identity comes
//! out of the build and is left untouched.

use crate::config::AppProfile;
use crate::metadata::{Edit, PlistValue};

/// Edits applied to the main bundle: document claims, the URL scheme,
/// and privacy usage strings. Everything is add-if-absent so a bundle
/// that already declares these keeps its own declarations.
pub fn primary_edits(profile: &AppProfile) -> Vec<Edit> {
    let mut edits = vec![
        Edit::add_if_absent(":CFBundleDocumentTypes", document_types_value(profile)),
        Edit::add_if_absent(
            ":CFBundleURLTypes",
            url_types_value(&profile.url_name, &profile.url_scheme),
        ),
    ];
    for (key, description) in privacy_usage(profile) {
        edits.push(Edit::add_if_absent(
            format!(":{key}"),
            PlistValue::String(description),
        ));
    }
    edits
}

/// Removes every icon key, legacy and modern, ahead of re-adding the
/// ones the run actually installs.
pub fn clear_icon_edits() -> Vec<Edit> {
    vec![
        Edit::delete_if_present(":CFBundleIconFile"),
        Edit::delete_if_present(":CFBundleIconName"),
        Edit::delete_if_present(":CFBundleIcons"),
    ]
}

/// Points the bundle at an installed `.icns` file.
pub fn icon_file_edits(profile: &AppProfile) -> Vec<Edit> {
    vec![
        Edit::set(
            ":CFBundleIconFile",
            PlistValue::string(profile.icns_file_name()),
        ),
        Edit::add_if_absent(
            ":CFBundleIcons",
            PlistValue::dict([(
                "CFBundlePrimaryIcon",
                PlistValue::dict([("CFBundleIconName", PlistValue::string(&profile.app_name))]),
            )]),
        ),
    ]
}

/// Points the bundle at an installed asset catalog. The name key wins
/// over the file key, so the latter is dropped.
pub fn icon_catalog_edits(profile: &AppProfile) -> Vec<Edit> {
    vec![
        Edit::set(":CFBundleIconName", PlistValue::string(&profile.app_name)),
        Edit::delete_if_present(":CFBundleIconFile"),
    ]
}

/// Edits applied to the freshly compiled launcher applet. `osacompile`
/// writes a generic Info.plist; this stamps the launcher's own identity
/// over it and registers the same document claims as the main bundle.
pub fn launcher_edits(profile: &AppProfile, version: &str, with_icon: bool) -> Vec<Edit> {
    let mut edits = vec![
        Edit::set(
            ":CFBundleIdentifier",
            PlistValue::string(&profile.launcher_identifier),
        ),
        Edit::set(":CFBundleName", PlistValue::string(&profile.launcher_name)),
        Edit::set(
            ":CFBundleDisplayName",
            PlistValue::string(&profile.launcher_name),
        ),
        Edit::set(":CFBundleShortVersionString", PlistValue::string(version)),
        Edit::set(":CFBundleVersion", PlistValue::string(version)),
        // The launcher is a background helper; keep it out of the Dock.
        Edit::set(":LSUIElement", PlistValue::Bool(true)),
        Edit::add_if_absent(
            ":CFBundleURLTypes",
            url_types_value(&profile.launcher_url_name, &profile.launcher_url_scheme),
        ),
        Edit::add_if_absent(":CFBundleDocumentTypes", document_types_value(profile)),
    ];
    if with_icon {
        edits.push(Edit::set(
            ":CFBundleIconFile",
            PlistValue::string(profile.icns_file_name()),
        ));
    }
    edits
}

fn document_types_value(profile: &AppProfile) -> PlistValue {
    PlistValue::array([PlistValue::dict([
        (
            "CFBundleTypeName",
            PlistValue::string("Plain text document"),
        ),
        ("CFBundleTypeRole", PlistValue::string("Editor")),
        (
            "CFBundleTypeExtensions",
            PlistValue::array(
                profile
                    .document_extensions
                    .iter()
                    .map(PlistValue::string),
            ),
        ),
    ])])
}

fn url_types_value(name: &str, scheme: &str) -> PlistValue {
    PlistValue::array([PlistValue::dict([
        ("CFBundleURLName", PlistValue::string(name)),
        (
            "CFBundleURLSchemes",
            PlistValue::array([PlistValue::string(scheme)]),
        ),
    ])])
}

fn privacy_usage(profile: &AppProfile) -> Vec<(&'static str, String)> {
    let app = &profile.app_name;
    vec![
        (
            "NSAppleEventsUsageDescription",
            format!("{app} sends Apple Events to open files and folders you ask for."),
        ),
        (
            "NSDesktopFolderUsageDescription",
            format!("{app} edits documents you open from your Desktop folder."),
        ),
        (
            "NSDocumentsFolderUsageDescription",
            format!("{app} edits documents you open from your Documents folder."),
        ),
        (
            "NSDownloadsFolderUsageDescription",
            format!("{app} edits documents you open from your Downloads folder."),
        ),
    ]
}
