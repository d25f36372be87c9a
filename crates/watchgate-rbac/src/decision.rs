//! Access decisions over a resolved profile.
//!
//! All checks are pure reads over the immutable registry and the caller's
//! point-in-time profile copy; denials are ordinary `false` results, never
//! errors. Menu builders and conditional renderers call these directly.

use tracing::warn;

use crate::permissions::Permission;
use crate::profile::UserProfile;
use crate::registry::RoleRegistry;
use crate::roles::{Role, RoleCategory};

/// Decision engine bound to a built registry.
///
/// Cheap to construct; holds only a reference. The `audit_enabled` toggle
/// controls deny logging (off in tests that probe denials on purpose).
pub struct AccessGate<'a> {
    registry: &'a RoleRegistry,
    audit_enabled: bool,
}

impl<'a> AccessGate<'a> {
    /// Creates a gate over the given registry.
    pub fn new(registry: &'a RoleRegistry) -> Self {
        Self {
            registry,
            audit_enabled: true,
        }
    }

    /// Disables deny logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Returns whether the profile holds the permission, through its role's
    /// effective set or through an explicit per-user override.
    pub fn has_permission(&self, profile: &UserProfile, permission: Permission) -> bool {
        let held = self.registry.effective_permissions(profile.role).contains(permission)
            || profile.permission_overrides.contains(permission);

        if !held && self.audit_enabled {
            warn!(
                user = %profile.user_id,
                role = %profile.role,
                permission = %permission,
                "permission check denied"
            );
        }
        held
    }

    /// Returns whether the profile holds at least one of the candidates.
    ///
    /// An empty candidate list returns `false`: there is no candidate that
    /// could be satisfied. Deliberately asymmetric with
    /// [`AccessGate::has_all_permissions`].
    pub fn has_any_permission(&self, profile: &UserProfile, permissions: &[Permission]) -> bool {
        permissions
            .iter()
            .any(|p| self.has_permission(profile, *p))
    }

    /// Returns whether the profile holds every requirement.
    ///
    /// An empty requirement list returns `true` (vacuous truth): a feature
    /// that requires nothing is open to everyone who reached it.
    pub fn has_all_permissions(&self, profile: &UserProfile, permissions: &[Permission]) -> bool {
        permissions
            .iter()
            .all(|p| self.has_permission(profile, *p))
    }

    /// Returns whether the profile's role is at least as privileged as
    /// `required`.
    pub fn has_role_privilege(&self, profile: &UserProfile, required: Role) -> bool {
        profile.role.is_at_least(required)
    }

    /// Returns whether `target` must be hidden from a user list rendered for
    /// `viewer`.
    ///
    /// One-directional: developer accounts are invisible to non-developers.
    /// Evaluated before any other rendering decision about the row, and
    /// independent of every permission check.
    pub fn should_hide_from_view(&self, viewer: &UserProfile, target: &UserProfile) -> bool {
        RoleCategory::DEVELOPER.contains(target.role)
            && !RoleCategory::DEVELOPER.contains(viewer.role)
    }
}
