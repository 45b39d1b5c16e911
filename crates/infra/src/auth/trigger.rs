//! Sign-in trigger state
//!
//! Holds what a sign-in button renders: whether an attempt is in flight and
//! the last error message. Presses while an attempt is in flight are
//! ignored, the way a disabled button ignores them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use butterfly_common::auth::{AuthError, SignInFlow};
use butterfly_common::ErrorClassification;
use butterfly_domain::{AuthResult, Platform};
use parking_lot::RwLock;
use tracing::{info, warn};

/// Button-facing wrapper around a [`SignInFlow`]
pub struct SignInTrigger {
    flow: Arc<dyn SignInFlow>,
    loading: AtomicBool,
    error: RwLock<Option<String>>,
}

/// Clears the loading flag when the attempt resolves or is dropped
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SignInTrigger {
    /// Wrap `flow`; starts idle with no error
    #[must_use]
    pub fn new(flow: Arc<dyn SignInFlow>) -> Self {
        Self { flow, loading: AtomicBool::new(false), error: RwLock::new(None) }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.flow.platform()
    }

    /// Whether an attempt is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Message of the last failed attempt
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error.read().clone()
    }

    pub fn clear_error(&self) {
        self.error.write().take();
    }

    /// Run one sign-in attempt
    ///
    /// Returns `None` without starting anything if an attempt is already in
    /// flight. Otherwise clears the previous error, runs the flow and
    /// records the failure message, if any.
    pub async fn press(&self) -> Option<Result<AuthResult, AuthError>> {
        if self.loading.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err()
        {
            info!("Sign-in already in progress, ignoring press");
            return None;
        }
        let _loading = LoadingGuard(&self.loading);

        self.clear_error();
        let result = self.flow.sign_in().await;

        if let Err(e) = &result {
            if e.is_cancelled() {
                info!(platform = %self.flow.platform(), "Sign-in cancelled by user");
            } else {
                warn!(
                    platform = %self.flow.platform(),
                    severity = %e.severity(),
                    retryable = e.is_retryable(),
                    error = %e,
                    "Sign-in failed"
                );
            }
            *self.error.write() = Some(e.to_string());
        }

        Some(result)
    }
}
