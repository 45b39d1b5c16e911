//! # Butterfly Infrastructure
//!
//! Host-facing wiring for the Google sign-in bridge.
//!
//! This crate contains:
//! - Configuration loading (`.env`, app manifest, environment overrides)
//! - Tracing subscriber installation
//! - Platform detection and sign-in flow selection
//! - The [`SignInTrigger`](auth::SignInTrigger) state holder behind a
//!   sign-in button
//! - Configuration diagnostics
//!
//! ## Architecture
//! - Builds on the flows and collaborator traits in `butterfly-common`
//! - Depends on `butterfly-domain` for configuration and result types
//! - Contains all "impure" code (environment, filesystem, global subscriber)

pub mod auth;
pub mod config;
pub mod observability;

// Re-export commonly used items
pub use auth::{detect_platform, select_flow, ConfigDiagnostics, FlowCollaborators, SignInTrigger};
pub use observability::{init_tracing, LogFormat};
