//! # watchgate-session: Session and profile lifecycle
//!
//! Models the authenticated-identity lifecycle as an explicit state machine:
//!
//! ```text
//! Unauthenticated → Authenticating → ProfileLoading → Ready
//!                                  ↘ ProfileMissing ↗
//!                        (Error reachable from every step)
//! ```
//!
//! [`Session`] is the pure machine; [`SessionHandle`] drives it against a
//! [`ProfileStore`] backend, keeping at most one live record subscription
//! per identity. On entry to `Ready` the profile's permissions are resolved
//! once into a [`Snapshot`], so decision callers never touch the registry
//! on the hot path.
//!
//! ## Example
//!
//! ```
//! use watchgate_rbac::{RawProfileRecord, Role, RoleRegistry};
//! use watchgate_session::Session;
//! use watchgate_types::UserId;
//!
//! let registry = RoleRegistry::build()?;
//! let mut session = Session::new();
//!
//! session.begin_authentication()?;
//! session.authentication_succeeded(UserId::from("u-7"))?;
//!
//! let record = RawProfileRecord {
//!     role: Some("lead".to_string()),
//!     ..RawProfileRecord::default()
//! };
//! session.profile_loaded(&record, &registry)?;
//!
//! assert_eq!(session.snapshot().unwrap().profile.role, Role::Lead);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod overlay;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use overlay::{OverlayController, OverlayHandler};
pub use state::{Session, SessionError, SessionFault, SessionState, Snapshot};
pub use store::{ProfileStore, SessionHandle, StoreError, SubscriptionGuard};
