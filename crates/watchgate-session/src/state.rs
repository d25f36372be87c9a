//! The session state machine.
//!
//! `Unauthenticated → Authenticating → (ProfileLoading | ProfileMissing) →
//! Ready`, with `Error` reachable from every non-terminal step. The machine
//! performs no I/O; callers feed it events as the external authentication
//! and persistence layers report outcomes.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use watchgate_rbac::{PermissionSet, ProfileError, RawProfileRecord, RoleRegistry, UserProfile};
use watchgate_types::UserId;

/// What took the session into its `Error` state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionFault {
    /// The external authentication step reported failure.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The profile store could not deliver the record.
    #[error("profile load failed: {0}")]
    ProfileLoadFailed(String),

    /// The stored record failed normalization.
    #[error("stored profile rejected: {0}")]
    InvalidProfile(#[from] ProfileError),
}

/// Error returned by session transition methods.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The event is not legal in the current state.
    #[error("invalid session transition: {event} while {from}")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },

    /// The event was legal but carried a failure; the session is now in its
    /// `Error` state with the same fault.
    #[error(transparent)]
    Fault(#[from] SessionFault),
}

/// Point-in-time view of the signed-in user.
///
/// The permission set is resolved once, on entry to `Ready`; decision
/// callers read it without touching the registry again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub profile: UserProfile,
    /// Role-effective permissions unioned with the profile's overrides.
    pub permissions: PermissionSet,
    pub established_at: DateTime<Utc>,
}

impl Snapshot {
    fn resolve(profile: UserProfile, registry: &RoleRegistry) -> Self {
        let permissions = registry
            .effective_permissions(profile.role)
            .union(&profile.permission_overrides);
        Self {
            profile,
            permissions,
            established_at: Utc::now(),
        }
    }
}

/// The session lifecycle states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No identity; the initial state and the result of sign-out.
    Unauthenticated,
    /// The external authentication provider is verifying credentials.
    Authenticating,
    /// Identity verified; waiting for the stored profile record.
    ProfileLoading { user_id: UserId },
    /// No stored record exists for this identity (first sign-in).
    ProfileMissing { user_id: UserId },
    /// Profile resolved; decisions may be served from the snapshot.
    Ready(Snapshot),
    /// A step failed. The cause is exposed; the session never silently
    /// regresses to a previous snapshot — callers must re-authenticate.
    Error { fault: SessionFault },
}

impl SessionState {
    /// Short state name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticating => "authenticating",
            SessionState::ProfileLoading { .. } => "profile_loading",
            SessionState::ProfileMissing { .. } => "profile_missing",
            SessionState::Ready(_) => "ready",
            SessionState::Error { .. } => "error",
        }
    }
}

/// The authenticated-identity lifecycle, driven by caller events.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// Creates a session in `Unauthenticated`.
    pub fn new() -> Self {
        Self {
            state: SessionState::Unauthenticated,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the snapshot when the session is `Ready`.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match &self.state {
            SessionState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Returns the fault when the session is in `Error`.
    pub fn fault(&self) -> Option<&SessionFault> {
        match &self.state {
            SessionState::Error { fault } => Some(fault),
            _ => None,
        }
    }

    /// Starts a sign-in attempt.
    ///
    /// Legal from `Unauthenticated` and from `Error` (re-authentication is
    /// the only way out of `Error`).
    pub fn begin_authentication(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Unauthenticated | SessionState::Error { .. } => {
                self.transition(SessionState::Authenticating);
                Ok(())
            }
            _ => Err(self.invalid("begin_authentication")),
        }
    }

    /// Records a verified identity and moves on to profile loading.
    pub fn authentication_succeeded(&mut self, user_id: UserId) -> Result<(), SessionError> {
        match self.state {
            SessionState::Authenticating => {
                self.transition(SessionState::ProfileLoading { user_id });
                Ok(())
            }
            _ => Err(self.invalid("authentication_succeeded")),
        }
    }

    /// Records a failed authentication attempt.
    pub fn authentication_failed(&mut self, reason: impl Into<String>) -> Result<(), SessionError> {
        match self.state {
            SessionState::Authenticating => {
                let fault = SessionFault::AuthenticationFailed(reason.into());
                self.transition(SessionState::Error { fault });
                Ok(())
            }
            _ => Err(self.invalid("authentication_failed")),
        }
    }

    /// Normalizes the fetched record and enters `Ready`.
    ///
    /// A record that fails normalization moves the session to `Error` and
    /// returns the fault; the half-loaded profile is discarded.
    pub fn profile_loaded(
        &mut self,
        record: &RawProfileRecord,
        registry: &RoleRegistry,
    ) -> Result<(), SessionError> {
        let SessionState::ProfileLoading { user_id } = &self.state else {
            return Err(self.invalid("profile_loaded"));
        };

        match UserProfile::from_raw(user_id.clone(), record) {
            Ok(profile) => {
                self.transition(SessionState::Ready(Snapshot::resolve(profile, registry)));
                Ok(())
            }
            Err(err) => {
                let fault = SessionFault::InvalidProfile(err);
                self.transition(SessionState::Error {
                    fault: fault.clone(),
                });
                Err(fault.into())
            }
        }
    }

    /// Records that no stored profile exists for the identity.
    pub fn profile_missing(&mut self) -> Result<(), SessionError> {
        match &self.state {
            SessionState::ProfileLoading { user_id } => {
                let user_id = user_id.clone();
                self.transition(SessionState::ProfileMissing { user_id });
                Ok(())
            }
            _ => Err(self.invalid("profile_missing")),
        }
    }

    /// Synthesizes the default first-login profile and enters `Ready`.
    ///
    /// Business rule, not a fallback: new identities become `Pending` users
    /// with empty geographic scope until an administrator approves them.
    pub fn provision_default(&mut self, registry: &RoleRegistry) -> Result<(), SessionError> {
        match &self.state {
            SessionState::ProfileMissing { user_id } => {
                let profile = UserProfile::provisional(user_id.clone());
                info!(user = %profile.user_id, "provisioned default profile on first sign-in");
                self.transition(SessionState::Ready(Snapshot::resolve(profile, registry)));
                Ok(())
            }
            _ => Err(self.invalid("provision_default")),
        }
    }

    /// Applies a pushed profile update to a `Ready` session.
    ///
    /// A record that fails normalization moves the session to `Error`; the
    /// previous snapshot is discarded, not kept.
    pub fn profile_updated(
        &mut self,
        record: &RawProfileRecord,
        registry: &RoleRegistry,
    ) -> Result<(), SessionError> {
        let SessionState::Ready(snapshot) = &self.state else {
            return Err(self.invalid("profile_updated"));
        };

        match UserProfile::from_raw(snapshot.profile.user_id.clone(), record) {
            Ok(profile) => {
                self.transition(SessionState::Ready(Snapshot::resolve(profile, registry)));
                Ok(())
            }
            Err(err) => {
                let fault = SessionFault::InvalidProfile(err);
                self.transition(SessionState::Error {
                    fault: fault.clone(),
                });
                Err(fault.into())
            }
        }
    }

    /// Moves the session to `Error` with the given fault.
    pub fn fail(&mut self, fault: SessionFault) {
        warn!(from = self.state.name(), fault = %fault, "session failed");
        self.state = SessionState::Error { fault };
    }

    /// Signs out, discarding any snapshot. Legal from every state.
    pub fn sign_out(&mut self) {
        self.transition(SessionState::Unauthenticated);
    }

    fn transition(&mut self, next: SessionState) {
        info!(from = self.state.name(), to = next.name(), "session transition");
        self.state = next;
    }

    fn invalid(&self, event: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            from: self.state.name(),
            event,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
