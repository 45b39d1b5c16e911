//! Butterfly auth doctor
//!
//! Prints the Google sign-in configuration this host would use.
//!
//! ```text
//! butterfly-auth-doctor [ios|android|web] [page-origin]
//! ```

use std::process::ExitCode;

use butterfly_domain::Platform;
use butterfly_infra::{config, detect_platform, init_tracing, ConfigDiagnostics, LogFormat};

fn main() -> ExitCode {
    if let Err(e) = init_tracing(LogFormat::from_env()) {
        eprintln!("{e}");
    }

    let mut args = std::env::args().skip(1);
    let platform = match args.next().map(|arg| arg.parse::<Platform>()) {
        Some(Ok(platform)) => platform,
        Some(Err(e)) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
        None => detect_platform(),
    };
    let page_origin = args.next();

    let config = match config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load sign-in configuration");
            return ExitCode::FAILURE;
        }
    };

    let diagnostics = ConfigDiagnostics::collect(platform, &config, page_origin.as_deref());
    println!("{diagnostics}");

    if diagnostics.is_ready() {
        ExitCode::SUCCESS
    } else {
        tracing::warn!(%platform, "Google Client ID not configured for this platform");
        ExitCode::FAILURE
    }
}
