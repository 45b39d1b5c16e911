//! Scoped injection of Google's identity script
//!
//! [`ScriptGuard`] ties the `<script>` tag's lifetime to the component that
//! needs it: acquisition is idempotent, and the tag is removed on drop only by
//! the guard that inserted it.

use std::sync::Arc;

use tracing::debug;

use super::error::AuthError;
use super::traits::DocumentHost;

/// Source URL of Google Identity Services
pub const GOOGLE_IDENTITY_SCRIPT_SRC: &str = "https://accounts.google.com/gsi/client";

/// Ownership of an injected identity script tag
pub struct ScriptGuard {
    host: Arc<dyn DocumentHost>,
    src: String,
    owned: bool,
}

impl ScriptGuard {
    /// Ensure the Google identity script is present in the document
    ///
    /// # Errors
    /// Returns error if the document rejects the script element.
    pub fn acquire(host: Arc<dyn DocumentHost>) -> Result<Self, AuthError> {
        Self::acquire_src(host, GOOGLE_IDENTITY_SCRIPT_SRC)
    }

    /// Ensure a script with `src` is present in the document
    ///
    /// # Errors
    /// Returns error if the document rejects the script element.
    pub fn acquire_src(host: Arc<dyn DocumentHost>, src: &str) -> Result<Self, AuthError> {
        let owned = if host.has_script(src) {
            false
        } else {
            host.append_script(src)?;
            debug!(src, "Injected identity script");
            true
        };

        Ok(Self { host, src: src.to_string(), owned })
    }

    /// Whether this guard inserted the tag (and will remove it)
    #[must_use]
    pub const fn is_owner(&self) -> bool {
        self.owned
    }

    #[must_use]
    pub fn src(&self) -> &str {
        &self.src
    }
}

impl Drop for ScriptGuard {
    fn drop(&mut self) {
        if self.owned {
            self.host.remove_script(&self.src);
            debug!(src = %self.src, "Removed identity script");
        }
    }
}

impl std::fmt::Debug for ScriptGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptGuard").field("src", &self.src).field("owned", &self.owned).finish()
    }
}
