//! Testing utilities and helpers
//!
//! - **[`mocks`]**: test doubles for the sign-in bridge's platform
//!   collaborators (browser session, identity script, page document)
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use butterfly_common::auth::NativeRedirectFlow;
//! use butterfly_common::testing::MockBrowserSession;
//! use butterfly_domain::{AuthConfiguration, Platform};
//!
//! let browser = MockBrowserSession::cancelling();
//! let flow = NativeRedirectFlow::new(
//!     Platform::Ios,
//!     Arc::new(AuthConfiguration::default()),
//!     Arc::new(browser.clone()),
//! );
//! # drop(flow);
//! ```

pub mod mocks;

pub use mocks::{MockBrowserSession, MockDocumentHost, MockIdentityScript};
