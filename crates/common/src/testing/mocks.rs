//! Mock implementations of the sign-in collaborators
//!
//! All mocks are cheaply cloneable handles onto shared state, so a test can
//! keep one clone for assertions while the flow owns another.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use crate::auth::{
    AuthError, BrowserOutcome, BrowserSession, ButtonOptions, CredentialCallback,
    CredentialResponse, DocumentHost, IdConfiguration, IdentityScript, MountPoint,
};

#[derive(Debug, Clone)]
enum BrowserBehavior {
    /// Redirect back with this authorization code and the request's state
    Approve(String),
    Fixed(BrowserOutcome),
}

/// Mock interactive browser session
///
/// # Examples
///
/// ```
/// use butterfly_common::testing::MockBrowserSession;
///
/// let browser = MockBrowserSession::approving("xyz");
/// assert!(browser.opened_urls().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MockBrowserSession {
    behavior: BrowserBehavior,
    opened: Arc<Mutex<Vec<String>>>,
}

impl MockBrowserSession {
    /// Approve every request, redirecting back with `code`
    ///
    /// The redirect echoes the `state` found in the authorization URL, the
    /// way Google does.
    #[must_use]
    pub fn approving(code: &str) -> Self {
        Self::with_behavior(BrowserBehavior::Approve(code.to_string()))
    }

    /// User dismisses every session
    #[must_use]
    pub fn cancelling() -> Self {
        Self::with_outcome(BrowserOutcome::Cancel)
    }

    /// End every session with `outcome`
    #[must_use]
    pub fn with_outcome(outcome: BrowserOutcome) -> Self {
        Self::with_behavior(BrowserBehavior::Fixed(outcome))
    }

    fn with_behavior(behavior: BrowserBehavior) -> Self {
        Self { behavior, opened: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Authorization URLs opened so far, in order
    #[must_use]
    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

#[async_trait]
impl BrowserSession for MockBrowserSession {
    async fn open(&self, auth_url: &str, return_url: &str) -> Result<BrowserOutcome, AuthError> {
        self.opened.lock().push(auth_url.to_string());

        match &self.behavior {
            BrowserBehavior::Fixed(outcome) => Ok(outcome.clone()),
            BrowserBehavior::Approve(code) => {
                let state = Url::parse(auth_url)
                    .ok()
                    .and_then(|url| {
                        url.query_pairs().find(|(k, _)| k == "state").map(|(_, v)| v.into_owned())
                    })
                    .unwrap_or_default();
                let callback_url = format!(
                    "{return_url}?code={}&state={}",
                    urlencoding::encode(code),
                    urlencoding::encode(&state)
                );
                Ok(BrowserOutcome::Success { callback_url })
            }
        }
    }
}

#[derive(Debug, Clone)]
enum InitializeBehavior {
    /// Keep the callback until the test delivers a credential
    Hold,
    /// Deliver this credential immediately
    Respond(String),
    /// Drop the callback without delivering
    Release,
}

/// Mock of Google's `google.accounts.id` object
#[derive(Clone)]
pub struct MockIdentityScript {
    polls_until_ready: Option<usize>,
    polls: Arc<AtomicUsize>,
    on_initialize: InitializeBehavior,
    callback: Arc<Mutex<Option<CredentialCallback>>>,
    initialized: Arc<Mutex<Option<IdConfiguration>>>,
    rendered: Arc<Mutex<Vec<MountPoint>>>,
    prompts: Arc<AtomicUsize>,
}

impl MockIdentityScript {
    /// Script that is loaded from the start
    #[must_use]
    pub fn ready() -> Self {
        Self::with_readiness(Some(0))
    }

    /// Script that reports ready from the `polls`-th readiness check on
    #[must_use]
    pub fn ready_after(polls: usize) -> Self {
        Self::with_readiness(Some(polls))
    }

    /// Script that never finishes loading
    #[must_use]
    pub fn never_ready() -> Self {
        Self::with_readiness(None)
    }

    fn with_readiness(polls_until_ready: Option<usize>) -> Self {
        Self {
            polls_until_ready,
            polls: Arc::new(AtomicUsize::new(0)),
            on_initialize: InitializeBehavior::Hold,
            callback: Arc::new(Mutex::new(None)),
            initialized: Arc::new(Mutex::new(None)),
            rendered: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Deliver `credential` as soon as the client is initialized
    #[must_use]
    pub fn respond_on_initialize(mut self, credential: &str) -> Self {
        self.on_initialize = InitializeBehavior::Respond(credential.to_string());
        self
    }

    /// Drop the callback as soon as the client is initialized
    #[must_use]
    pub fn release_on_initialize(mut self) -> Self {
        self.on_initialize = InitializeBehavior::Release;
        self
    }

    /// Deliver `credential` to the registered callback
    ///
    /// Returns `false` if no callback is registered yet.
    pub fn deliver(&self, credential: &str) -> bool {
        match self.callback.lock().as_ref() {
            Some(callback) => {
                callback(CredentialResponse::new(credential));
                true
            }
            None => false,
        }
    }

    /// Drop the registered callback (page teardown)
    pub fn release(&self) {
        self.callback.lock().take();
    }

    /// Configuration passed to the last `initialize`
    #[must_use]
    pub fn initialized_with(&self) -> Option<IdConfiguration> {
        self.initialized.lock().clone()
    }

    /// Mount points the button was rendered into
    #[must_use]
    pub fn rendered_into(&self) -> Vec<MountPoint> {
        self.rendered.lock().clone()
    }

    #[must_use]
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl IdentityScript for MockIdentityScript {
    fn is_ready(&self) -> bool {
        let polls = self.polls.fetch_add(1, Ordering::SeqCst);
        self.polls_until_ready.is_some_and(|needed| polls >= needed)
    }

    fn initialize(
        &self,
        config: IdConfiguration,
        callback: CredentialCallback,
    ) -> Result<(), AuthError> {
        *self.initialized.lock() = Some(config);

        match &self.on_initialize {
            InitializeBehavior::Hold => *self.callback.lock() = Some(callback),
            InitializeBehavior::Respond(credential) => {
                callback(CredentialResponse::new(credential.as_str()));
                *self.callback.lock() = Some(callback);
            }
            InitializeBehavior::Release => drop(callback),
        }
        Ok(())
    }

    fn render_button(&self, mount: &MountPoint, _options: &ButtonOptions) -> Result<(), AuthError> {
        self.rendered.lock().push(mount.clone());
        Ok(())
    }

    fn prompt(&self) -> Result<(), AuthError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory page document tracking `<script>` tags
#[derive(Debug, Clone, Default)]
pub struct MockDocumentHost {
    scripts: Arc<Mutex<HashSet<String>>>,
    appends: Arc<AtomicUsize>,
    reject_appends: Arc<AtomicBool>,
}

impl MockDocumentHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `append_script` fail
    pub fn set_reject_appends(&self, reject: bool) {
        self.reject_appends.store(reject, Ordering::SeqCst);
    }

    /// Number of successful `append_script` calls
    #[must_use]
    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }
}

impl DocumentHost for MockDocumentHost {
    fn has_script(&self, src: &str) -> bool {
        self.scripts.lock().contains(src)
    }

    fn append_script(&self, src: &str) -> Result<(), AuthError> {
        if self.reject_appends.load(Ordering::SeqCst) {
            return Err(AuthError::ProviderUnavailable("document rejected script".to_string()));
        }
        self.scripts.lock().insert(src.to_string());
        self.appends.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove_script(&self, src: &str) {
        self.scripts.lock().remove(src);
    }
}
