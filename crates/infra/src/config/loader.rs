//! Configuration loader
//!
//! Loads the sign-in configuration from the app manifest and environment
//! variables.
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file into the process environment, if one exists
//! 2. Probes multiple paths for an app manifest (a missing manifest is fine)
//! 3. Supports JSON and TOML formats
//! 4. Environment variables override manifest values field by field
//!
//! ## Environment Variables
//! - `GOOGLE_CLIENT_ID_IOS`: OAuth client id for iOS
//! - `GOOGLE_CLIENT_ID_ANDROID`: OAuth client id for Android
//! - `GOOGLE_CLIENT_ID_WEB`: OAuth client id for the web
//! - `GOOGLE_CLIENT_SECRET`: Client secret sent on the code exchange
//! - `BUTTERFLY_APP_SCHEME`: URL scheme for the native redirect
//!
//! ## Manifest Layout
//! ```json
//! {
//!   "expo": {
//!     "scheme": "butterfly",
//!     "extra": {
//!       "googleClientId": { "ios": "...", "android": "...", "web": "..." },
//!       "googleClientSecret": "..."
//!     }
//!   }
//! }
//! ```
//! The `expo` wrapper is optional; the same fields may sit at the root.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./app.{json,toml}` or `./butterfly.{json,toml}` (current working
//!    directory)
//! 2. The same names in the parent and grandparent directories
//! 3. Relative to executable location

use std::fmt;
use std::path::{Path, PathBuf};

use butterfly_domain::{AuthConfiguration, ButterflyError, ClientIds, Platform, Result};
use serde::{Deserialize, Serialize};

pub const ENV_CLIENT_ID_IOS: &str = "GOOGLE_CLIENT_ID_IOS";
pub const ENV_CLIENT_ID_ANDROID: &str = "GOOGLE_CLIENT_ID_ANDROID";
pub const ENV_CLIENT_ID_WEB: &str = "GOOGLE_CLIENT_ID_WEB";
pub const ENV_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const ENV_APP_SCHEME: &str = "BUTTERFLY_APP_SCHEME";

const MANIFEST_NAMES: [&str; 4] = ["app.json", "app.toml", "butterfly.json", "butterfly.toml"];

/// App manifest as declared by the host application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppManifest {
    /// URL scheme registered for the app
    pub scheme: Option<String>,
    pub extra: ManifestExtra,
}

/// Free-form `extra` section of the manifest
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManifestExtra {
    pub google_client_id: ClientIds,
    pub google_client_secret: Option<String>,
}

impl fmt::Debug for ManifestExtra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestExtra")
            .field("google_client_id", &self.google_client_id)
            .field(
                "google_client_secret",
                &self.google_client_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl AppManifest {
    /// Convert the manifest into the sign-in configuration
    #[must_use]
    pub fn into_configuration(self) -> AuthConfiguration {
        AuthConfiguration {
            client_ids: self.extra.google_client_id,
            client_secret: self.extra.google_client_secret,
            scheme: self.scheme,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestDocument {
    Wrapped { expo: AppManifest },
    Bare(AppManifest),
}

impl From<ManifestDocument> for AppManifest {
    fn from(document: ManifestDocument) -> Self {
        match document {
            ManifestDocument::Wrapped { expo } => expo,
            ManifestDocument::Bare(manifest) => manifest,
        }
    }
}

/// Load configuration with automatic fallback strategy
///
/// Loads `.env`, reads the first app manifest found by
/// [`probe_config_paths`] (if any), then applies environment overrides.
///
/// # Errors
/// Returns `ButterflyError::Config` if a manifest exists but cannot be read
/// or parsed.
pub fn load() -> Result<AuthConfiguration> {
    load_dotenv();

    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No app manifest found, using environment only");
            AuthConfiguration::default()
        }
    };

    let config = apply_env_overrides(base);
    tracing::info!(
        ios = config.client_id(Platform::Ios).is_some(),
        android = config.client_id(Platform::Android).is_some(),
        web = config.client_id(Platform::Web).is_some(),
        "Sign-in configuration loaded"
    );
    Ok(config)
}

/// Load a `.env` file into the process environment
///
/// A missing file is not an error. Returns the path that was loaded.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!(path = %path.display(), "Loaded environment from .env");
            Some(path)
        }
        Err(e) if e.not_found() => {
            tracing::debug!("No .env file found");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load .env file");
            None
        }
    }
}

/// Load configuration from environment variables only
#[must_use]
pub fn load_from_env() -> AuthConfiguration {
    apply_env_overrides(AuthConfiguration::default())
}

/// Overlay set environment variables onto `config`
///
/// Blank variables are ignored so they cannot erase a manifest value.
#[must_use]
pub fn apply_env_overrides(mut config: AuthConfiguration) -> AuthConfiguration {
    for platform in Platform::ALL {
        if let Some(client_id) = env_opt(client_id_var(platform)) {
            config.client_ids.set(platform, client_id);
        }
    }
    if let Some(secret) = env_opt(ENV_CLIENT_SECRET) {
        config.client_secret = Some(secret);
    }
    if let Some(scheme) = env_opt(ENV_APP_SCHEME) {
        config.scheme = Some(scheme);
    }
    config
}

/// Environment variable holding the client id for `platform`
#[must_use]
pub const fn client_id_var(platform: Platform) -> &'static str {
    match platform {
        Platform::Ios => ENV_CLIENT_ID_IOS,
        Platform::Android => ENV_CLIENT_ID_ANDROID,
        Platform::Web => ENV_CLIENT_ID_WEB,
    }
}

/// Load configuration from an app manifest
///
/// If `path` is `None`, probes multiple locations for a manifest.
/// Environment overrides are not applied.
///
/// # Errors
/// Returns `ButterflyError::Config` if:
/// - File not found (when path is specified)
/// - No manifest found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<AuthConfiguration> {
    let manifest_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ButterflyError::Config(format!(
                    "App manifest not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ButterflyError::Config("No app manifest found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %manifest_path.display(), "Loading app manifest");

    let contents = std::fs::read_to_string(&manifest_path)
        .map_err(|e| ButterflyError::Config(format!("Failed to read app manifest: {e}")))?;

    parse_manifest(&contents, &manifest_path).map(AppManifest::into_configuration)
}

/// Parse a manifest from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `ButterflyError::Config` if format is invalid or parsing fails.
pub fn parse_manifest(contents: &str, path: &Path) -> Result<AppManifest> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let document: ManifestDocument = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ButterflyError::Config(format!("Invalid TOML format: {e}")))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| ButterflyError::Config(format!("Invalid JSON format: {e}")))?,
        _ => {
            return Err(ButterflyError::Config(format!("Unsupported manifest format: {extension}")))
        }
    };

    Ok(document.into())
}

/// Probe multiple paths for an app manifest
///
/// Searches the current working directory, its parent directories (up to 2
/// levels), then the executable's directory.
///
/// # Returns
/// The first manifest found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    probe_dirs(&dirs)
}

fn probe_dirs(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| MANIFEST_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Non-blank environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
