//! Profile store abstraction and the lifecycle handle that drives a
//! [`Session`] against it.
//!
//! `ProfileStore` is the seam to the backing record store. `SessionHandle`
//! owns the session, the store, and at most one live subscription to the
//! signed-in identity's record; the subscription is torn down on sign-out
//! or when a new sign-in replaces it.

use thiserror::Error;
use tracing::{debug, warn};

use watchgate_rbac::{RawProfileRecord, RoleRegistry};
use watchgate_types::UserId;

use crate::state::{Session, SessionError, SessionFault, SessionState};

/// Error raised by a profile store backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("profile store error: {0}")]
pub struct StoreError(pub String);

/// Teardown handle for a live record subscription.
///
/// Dropping the guard runs the teardown exactly once. The handle keeps at
/// most one guard alive, so stale listeners never outlive the identity
/// they were opened for.
pub struct SubscriptionGuard {
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionGuard {
    /// Wraps a teardown closure.
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("armed", &self.teardown.is_some())
            .finish()
    }
}

/// Backend that holds profile records and can watch them for changes.
pub trait ProfileStore {
    /// Fetches the record for an identity. `Ok(None)` means the identity
    /// exists but has no stored profile yet.
    fn fetch_profile(&self, user_id: &UserId) -> Result<Option<RawProfileRecord>, StoreError>;

    /// Opens a change subscription for an identity's record. The returned
    /// guard tears the subscription down on drop.
    fn subscribe(&self, user_id: &UserId) -> Result<SubscriptionGuard, StoreError>;
}

/// Drives a [`Session`] through sign-in, live updates, and sign-out
/// against a [`ProfileStore`].
#[derive(Debug)]
pub struct SessionHandle<S: ProfileStore> {
    session: Session,
    store: S,
    subscription: Option<SubscriptionGuard>,
}

impl<S: ProfileStore> SessionHandle<S> {
    /// Creates a handle over an unauthenticated session.
    pub fn new(store: S) -> Self {
        Self {
            session: Session::new(),
            store,
            subscription: None,
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a record subscription is currently live.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Runs the full sign-in sequence for an already-verified identity:
    /// fetch the record, provision a default when none exists, then open
    /// the live subscription.
    ///
    /// Any prior session and subscription are discarded first, so a new
    /// identity never observes state from the previous one.
    pub fn sign_in(
        &mut self,
        user_id: UserId,
        registry: &RoleRegistry,
    ) -> Result<(), SessionError> {
        self.subscription = None;
        self.session.sign_out();

        self.session.begin_authentication()?;
        self.session.authentication_succeeded(user_id.clone())?;

        match self.store.fetch_profile(&user_id) {
            Ok(Some(record)) => self.session.profile_loaded(&record, registry)?,
            Ok(None) => {
                self.session.profile_missing()?;
                self.session.provision_default(registry)?;
            }
            Err(err) => {
                let fault = SessionFault::ProfileLoadFailed(err.to_string());
                self.session.fail(fault.clone());
                return Err(fault.into());
            }
        }

        match self.store.subscribe(&user_id) {
            Ok(guard) => {
                debug!(user = %user_id, "profile subscription opened");
                self.subscription = Some(guard);
                Ok(())
            }
            Err(err) => {
                // The session stays usable; it just won't see live updates.
                warn!(user = %user_id, error = %err, "profile subscription unavailable");
                Ok(())
            }
        }
    }

    /// Applies a record change pushed by the subscription.
    pub fn apply_update(
        &mut self,
        record: &RawProfileRecord,
        registry: &RoleRegistry,
    ) -> Result<(), SessionError> {
        self.session.profile_updated(record, registry)
    }

    /// Signs out, tearing down the subscription and the session state.
    pub fn sign_out(&mut self) {
        self.subscription = None;
        self.session.sign_out();
        debug_assert!(matches!(
            self.session.state(),
            SessionState::Unauthenticated
        ));
    }
}
