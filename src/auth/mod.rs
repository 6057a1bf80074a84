//! Bearer-token credentials.
//!
//! Smartsheet authenticates every request with a bearer token and optionally
//! acts on behalf of another account through the `Assume-User` header. Both
//! values may change while requests are in flight, so they live in a
//! [`CredentialStore`] that is swapped as a whole.
//!
//! # Examples
//!
//! ```
//! use integrations_smartsheet::auth::CredentialStore;
//!
//! let store = CredentialStore::new("old-token");
//! let before = store.snapshot();
//!
//! store.set_access_token("new-token");
//! store.set_assumed_user("jane@example.com");
//!
//! assert_eq!(before.access_token(), "old-token");
//! assert_eq!(store.snapshot().access_token(), "new-token");
//! assert_eq!(store.snapshot().assumed_user(), Some("jane@example.com"));
//! ```

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;

/// One immutable set of request credentials.
#[derive(Clone)]
pub struct Credentials {
    access_token: SecretString,
    assumed_user: Option<String>,
    change_agent: Option<String>,
}

impl Credentials {
    /// Creates credentials for a bearer token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            assumed_user: None,
            change_agent: None,
        }
    }

    /// Sets the assumed user.
    pub fn with_assumed_user(mut self, email: impl Into<String>) -> Self {
        self.assumed_user = Some(email.into());
        self
    }

    /// Sets the change agent.
    pub fn with_change_agent(mut self, agent: impl Into<String>) -> Self {
        self.change_agent = Some(agent.into());
        self
    }

    /// Returns the bearer token.
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Returns the assumed user, if any.
    pub fn assumed_user(&self) -> Option<&str> {
        self.assumed_user.as_deref()
    }

    /// Returns the change agent, if any.
    pub fn change_agent(&self) -> Option<&str> {
        self.change_agent.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"[REDACTED]")
            .field("assumed_user", &self.assumed_user)
            .field("change_agent", &self.change_agent)
            .finish()
    }
}

/// Atomically swappable holder for the current [`Credentials`].
///
/// Readers take an `Arc` snapshot and never hold the lock across a request.
/// Writers build a new value and replace the old one in a single store, so a
/// request sees either the old credentials or the new ones, never a mix.
#[derive(Debug)]
pub struct CredentialStore {
    current: RwLock<Arc<Credentials>>,
}

impl CredentialStore {
    /// Creates a store holding a bearer token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::from_credentials(Credentials::new(access_token))
    }

    /// Creates a store from complete credentials.
    pub fn from_credentials(credentials: Credentials) -> Self {
        Self {
            current: RwLock::new(Arc::new(credentials)),
        }
    }

    /// Returns the credentials to use for one request attempt.
    pub fn snapshot(&self) -> Arc<Credentials> {
        Arc::clone(&self.current.read())
    }

    /// Replaces the bearer token.
    pub fn set_access_token(&self, token: impl Into<String>) {
        let token = SecretString::new(token.into());
        self.update(|c| c.access_token = token);
    }

    /// Acts on behalf of another user for subsequent requests.
    pub fn set_assumed_user(&self, email: impl Into<String>) {
        let email = email.into();
        self.update(|c| c.assumed_user = Some(email));
    }

    /// Stops acting on behalf of another user.
    pub fn clear_assumed_user(&self) {
        self.update(|c| c.assumed_user = None);
    }

    /// Sets or clears the change agent reported with each request.
    pub fn set_change_agent(&self, agent: Option<String>) {
        self.update(|c| c.change_agent = agent);
    }

    fn update<F: FnOnce(&mut Credentials)>(&self, f: F) {
        let mut guard = self.current.write();
        let mut next = Credentials::clone(&guard);
        f(&mut next);
        *guard = Arc::new(next);
    }
}
