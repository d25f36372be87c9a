//! # Watchgate: role, permission, and geographic access resolution
//!
//! Umbrella crate tying the pieces together:
//!
//! - [`watchgate_rbac`] — role hierarchy, permission catalog, cumulative
//!   inheritance, profile normalization, geographic scope, access decisions
//! - [`watchgate_routing`] — route classification and allow/redirect
//! - [`watchgate_session`] — authenticated-identity lifecycle
//!
//! [`Engine`] bundles the built role registry and the geographic directory
//! behind one facade, so application code holds a single value instead of
//! threading registry and directory references everywhere.
//!
//! ## Example
//!
//! ```
//! use watchgate::{Engine, RouteDecision};
//! use watchgate_rbac::{Directory, Permission, Role, UserProfile};
//! use watchgate_types::{BranchId, ProvinceId, UserId};
//!
//! let mut directory = Directory::new();
//! directory.add_province(ProvinceId::from("P1"));
//! directory.add_branch(ProvinceId::from("P1"), BranchId::from("B1"))?;
//!
//! let engine = Engine::new(directory)?;
//!
//! let manager = UserProfile::provisional(UserId::from("u-7"))
//!     .with_role(Role::BranchManager)
//!     .with_home(ProvinceId::from("P1"), BranchId::from("B1"));
//!
//! assert!(engine.has_permission(&manager, Permission::ApproveTransfer));
//! assert_eq!(
//!     engine.authorize_path("/P1/B1/dashboard", &manager),
//!     RouteDecision::Allow
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeSet;

use tracing::info;

use watchgate_rbac::{
    AccessGate, Directory, Permission, RegistryError, Role, RoleRegistry, UserProfile,
};
use watchgate_types::{BranchId, ProvinceId};

pub use watchgate_rbac as rbac;
pub use watchgate_routing as routing;
pub use watchgate_session as session;

// Re-export the types application code touches most
pub use watchgate_rbac::{PermissionSet, RawProfileRecord};
pub use watchgate_routing::{home_path_for, RouteDecision};
pub use watchgate_session::{Session, SessionHandle, Snapshot};

/// The resolution engine: built registry plus geographic directory.
///
/// Built once at startup; every method afterwards is a pure read, safe to
/// call from any number of request handlers concurrently.
#[derive(Debug)]
pub struct Engine {
    registry: RoleRegistry,
    directory: Directory,
}

impl Engine {
    /// Builds the engine over the given directory.
    ///
    /// Fails only when the role hierarchy is malformed, which a fixed
    /// release cannot be; the `Result` exists so configuration-driven
    /// hierarchies stay possible.
    pub fn new(directory: Directory) -> Result<Self, RegistryError> {
        let registry = RoleRegistry::build()?;
        info!(
            provinces = directory.provinces().count(),
            branches = directory.branches().count(),
            "engine initialized"
        );
        Ok(Self {
            registry,
            directory,
        })
    }

    /// The built role registry.
    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// The geographic directory.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// A decision gate bound to this engine's registry.
    pub fn gate(&self) -> AccessGate<'_> {
        AccessGate::new(&self.registry)
    }

    // ========================================================================
    // Permission and privilege checks
    // ========================================================================

    /// Whether the profile holds the permission (role-effective or override).
    pub fn has_permission(&self, profile: &UserProfile, permission: Permission) -> bool {
        self.gate().has_permission(profile, permission)
    }

    /// Whether the profile holds at least one candidate. Empty list: `false`.
    pub fn has_any_permission(&self, profile: &UserProfile, permissions: &[Permission]) -> bool {
        self.gate().has_any_permission(profile, permissions)
    }

    /// Whether the profile holds every requirement. Empty list: `true`.
    pub fn has_all_permissions(&self, profile: &UserProfile, permissions: &[Permission]) -> bool {
        self.gate().has_all_permissions(profile, permissions)
    }

    /// Whether the profile's role is at least as privileged as `required`.
    pub fn has_role_privilege(&self, profile: &UserProfile, required: Role) -> bool {
        self.gate().has_role_privilege(profile, required)
    }

    /// Whether `target` must be hidden from a listing rendered for `viewer`.
    pub fn should_hide_from_view(&self, viewer: &UserProfile, target: &UserProfile) -> bool {
        self.gate().should_hide_from_view(viewer, target)
    }

    // ========================================================================
    // Geographic scope
    // ========================================================================

    /// Provinces the profile may act within.
    pub fn allowed_provinces(&self, profile: &UserProfile) -> BTreeSet<ProvinceId> {
        self.directory.allowed_provinces(profile)
    }

    /// Branches the profile may act within.
    pub fn allowed_branches(&self, profile: &UserProfile) -> BTreeSet<BranchId> {
        self.directory.allowed_branches(profile)
    }

    /// Membership test against the profile's province scope.
    pub fn has_province_access(&self, profile: &UserProfile, province: &ProvinceId) -> bool {
        self.directory.has_province_access(profile, province)
    }

    /// Membership test against the profile's branch scope.
    pub fn has_branch_access(&self, profile: &UserProfile, branch: &BranchId) -> bool {
        self.directory.has_branch_access(profile, branch)
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Authorizes a requested path for a profile: `Allow`, or `Redirect`
    /// toward the profile's own landing path.
    pub fn authorize_path(&self, path: &str, profile: &UserProfile) -> RouteDecision {
        watchgate_routing::authorize(path, profile, &self.directory)
    }

    /// The profile's canonical landing path.
    pub fn home_path_for(&self, profile: &UserProfile) -> String {
        watchgate_routing::home_path_for(profile)
    }
}
