//! # Butterfly Domain
//!
//! Domain types shared by every Butterfly crate.
//!
//! This crate contains:
//! - Runtime platform tags and the normalized sign-in result
//! - Google client configuration structures
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Butterfly crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
