//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading the sign-in configuration from
//! manifests and the environment.

use std::io::Write;
use std::sync::Mutex;

use butterfly_domain::{ButterflyError, Platform};
use butterfly_infra::config;
use butterfly_infra::ConfigDiagnostics;
use once_cell::sync::Lazy;
use tempfile::NamedTempFile;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn manifest_file(contents: &str, extension: &str) -> (NamedTempFile, std::path::PathBuf) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    (temp_file, path)
}

#[test]
fn test_env_takes_precedence_over_manifest() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

    let json_content = r#"{
        "expo": {
            "scheme": "butterfly",
            "extra": {
                "googleClientId": {
                    "ios": "file-ios.apps.googleusercontent.com",
                    "web": "file-web.apps.googleusercontent.com"
                },
                "googleClientSecret": "file-secret"
            }
        }
    }"#;
    let (_temp, path) = manifest_file(json_content, "json");

    std::env::set_var("GOOGLE_CLIENT_ID_WEB", "env-web.apps.googleusercontent.com");

    let from_file = config::load_from_file(Some(path.clone())).expect("manifest loads");
    let merged = config::apply_env_overrides(from_file);

    assert_eq!(merged.client_id(Platform::Web), Some("env-web.apps.googleusercontent.com"));
    assert_eq!(merged.client_id(Platform::Ios), Some("file-ios.apps.googleusercontent.com"));
    assert_eq!(merged.client_secret(), Some("file-secret"));
    assert_eq!(merged.scheme(), Some("butterfly"));

    std::env::remove_var("GOOGLE_CLIENT_ID_WEB");
    std::fs::remove_file(path).ok();
}

#[test]
fn test_manifest_to_diagnostics() {
    let toml_content = r#"
[expo]
scheme = "butterfly"

[expo.extra]
googleClientSecret = "GOCSPX-from-file"

[expo.extra.googleClientId]
android = "android.apps.googleusercontent.com"
"#;
    let (_temp, path) = manifest_file(toml_content, "toml");

    let config = config::load_from_file(Some(path.clone())).expect("manifest loads");
    let diagnostics = ConfigDiagnostics::collect(Platform::Android, &config, None);

    assert!(diagnostics.is_ready());
    assert_eq!(diagnostics.redirect, "butterfly://");
    assert!(diagnostics.client_secret_set);
    assert!(!diagnostics.to_string().contains("GOCSPX-from-file"));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_invalid_manifest_is_config_error() {
    let (_temp, path) = manifest_file("scheme = [", "toml");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(ButterflyError::Config(_))));

    std::fs::remove_file(path).ok();
}
