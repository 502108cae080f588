//! Application identity baked into the bundler.
//!
//! All product-specific names (bundle name, identifiers, URL schemes,
//! document extensions) live here so the pipeline code stays generic.

/// Names and identifiers of the application being packaged.
#[derive(Clone, Debug)]
pub struct AppProfile {
    /// Bundle name without the `.app` suffix.
    pub app_name: String,
    /// URL scheme the editor registers for `stanza://` links.
    pub url_scheme: String,
    /// `CFBundleURLName` describing the editor's URL scheme.
    pub url_name: String,
    /// Document extensions the editor claims.
    pub document_extensions: Vec<String>,
    /// File name of the command-line client binary.
    pub client_binary: String,
    /// Bundle name of the companion launcher, without `.app`.
    pub launcher_name: String,
    /// Reverse-DNS identifier of the companion launcher.
    pub launcher_identifier: String,
    /// URL scheme the launcher registers for editor-driven callbacks.
    pub launcher_url_scheme: String,
    /// `CFBundleURLName` describing the launcher's URL scheme.
    pub launcher_url_name: String,
    /// Directory searched for the client binary when no prefix is given
    /// and the bundle does not carry one.
    pub default_client_dir: String,
    /// Version stamped on the launcher when the main bundle carries none.
    pub fallback_version: String,
}

impl Default for AppProfile {
    fn default() -> Self {
        Self {
            app_name: "Stanza".into(),
            url_scheme: "stanza".into(),
            url_name: "Stanza remote command".into(),
            document_extensions: vec![
                "txt".into(),
                "text".into(),
                "md".into(),
                "stz".into(),
            ],
            client_binary: "stanzaclient".into(),
            launcher_name: "StanzaClient".into(),
            launcher_identifier: "org.stanza.StanzaClient".into(),
            launcher_url_scheme: "stanza-edit".into(),
            launcher_url_name: "Stanza edit protocol".into(),
            default_client_dir: "/usr/local/bin".into(),
            fallback_version: "1.0".into(),
        }
    }
}

impl AppProfile {
    /// `Stanza.app`
    pub fn bundle_file_name(&self) -> String {
        format!("{}.app", self.app_name)
    }

    /// `StanzaClient.app`
    pub fn launcher_file_name(&self) -> String {
        format!("{}.app", self.launcher_name)
    }

    /// Installed icon name inside `Contents/Resources`.
    pub fn icns_file_name(&self) -> String {
        format!("{}.icns", self.app_name)
    }
}
