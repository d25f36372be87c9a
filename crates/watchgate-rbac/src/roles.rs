//! Role definitions and the privilege hierarchy.
//!
//! The hierarchy is encoded exactly once, as the ordered tier list
//! [`ROLE_TIERS`]. Ranks, privilege comparisons, and access layers are all
//! derived from that list mechanically, so there is no second representation
//! that could drift out of sync with it.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Role in the access control system.
///
/// Roles are assigned to users by administrators. `Guest` and `Pending` are
/// the two automatic roles: `Guest` for unauthenticated visitors, `Pending`
/// for freshly signed-in users awaiting approval.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unauthenticated visitor. No permissions, no geographic reach.
    Guest,

    /// Signed in but not yet approved by an administrator.
    Pending,

    /// Approved staff member at a single branch.
    User,

    /// Senior staff; may edit documents the plain `User` can only view.
    Lead,

    /// Manages one branch: approvals, branch accounts, branch HR view.
    BranchManager,

    /// Manages every branch inside a province.
    ProvinceManager,

    /// Province-level administrator; may manage users and branches.
    ProvinceAdmin,

    /// Executive over all provinces.
    GeneralManager,

    /// Deprecated predecessor of [`Role::GeneralManager`].
    ///
    /// Still present in stored profiles, so it remains in the closed set and
    /// shares `GeneralManager`'s tier. See DESIGN.md before touching this.
    Privilege,

    /// Full administrative access, including system settings.
    SuperAdmin,

    /// Engineering access. Developer accounts are hidden from user lists
    /// rendered for non-developers.
    Developer,
}

/// The canonical privilege ordering, most privileged tier first.
///
/// This list is the single source of truth for the hierarchy. A tier with
/// more than one role is a deliberate rank tie (`GeneralManager` /
/// `Privilege`); everything else is strictly ordered.
pub const ROLE_TIERS: &[&[Role]] = &[
    &[Role::Developer],
    &[Role::SuperAdmin],
    &[Role::GeneralManager, Role::Privilege],
    &[Role::ProvinceAdmin],
    &[Role::ProvinceManager],
    &[Role::BranchManager],
    &[Role::Lead],
    &[Role::User],
    &[Role::Pending],
    &[Role::Guest],
];

impl Role {
    /// Every role in the closed set, in privilege order (highest first).
    pub const ALL: [Role; 11] = [
        Role::Developer,
        Role::SuperAdmin,
        Role::GeneralManager,
        Role::Privilege,
        Role::ProvinceAdmin,
        Role::ProvinceManager,
        Role::BranchManager,
        Role::Lead,
        Role::User,
        Role::Pending,
        Role::Guest,
    ];

    /// Returns the privilege rank derived from [`ROLE_TIERS`].
    ///
    /// Lower rank = higher privilege. Ranks are tier indices, so the tied
    /// pair shares a rank.
    pub fn rank(self) -> usize {
        ROLE_TIERS
            .iter()
            .position(|tier| tier.contains(&self))
            .expect("every Role variant appears in ROLE_TIERS")
    }

    /// Returns whether this role is at least as privileged as `required`.
    ///
    /// Reflexive for every role. Antisymmetric for all pairs except the
    /// preserved `GeneralManager`/`Privilege` tie.
    pub fn is_at_least(self, required: Role) -> bool {
        self.rank() <= required.rank()
    }

    /// Returns the coarse access layer used for route classification.
    pub fn access_layer(self) -> AccessLayer {
        match self {
            Role::Guest | Role::Pending => AccessLayer::Guest,
            Role::User | Role::Lead | Role::BranchManager => AccessLayer::Branch,
            Role::ProvinceManager | Role::ProvinceAdmin => AccessLayer::Province,
            Role::GeneralManager | Role::Privilege | Role::SuperAdmin | Role::Developer => {
                AccessLayer::Executive
            }
        }
    }

    /// Returns the stable string identifier stored in profile records.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Pending => "pending",
            Role::User => "user",
            Role::Lead => "lead",
            Role::BranchManager => "branch_manager",
            Role::ProvinceManager => "province_manager",
            Role::ProvinceAdmin => "province_admin",
            Role::GeneralManager => "general_manager",
            Role::Privilege => "privilege",
            Role::SuperAdmin => "super_admin",
            Role::Developer => "developer",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownRole(s.to_string()))
    }
}

// ============================================================================
// Access Layer
// ============================================================================

/// Coarse classification of a role, used only for route requirements and
/// redirect decisions.
///
/// Variant order is privilege order: `Guest < Branch < Province < Executive`,
/// so the derived `Ord` is the privilege comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessLayer {
    /// No privileged access; public and pending pages only.
    Guest,
    /// Operates within a single branch.
    Branch,
    /// Operates across the branches of a province.
    Province,
    /// Operates across all provinces.
    Executive,
}

impl AccessLayer {
    /// Returns whether this layer satisfies a route that requires `required`.
    pub fn satisfies(self, required: AccessLayer) -> bool {
        self >= required
    }
}

// ============================================================================
// Role Categories
// ============================================================================

/// A named group of roles sharing a minimum privilege floor.
///
/// Categories let a feature say "requires at least branch-manager-level
/// privilege" without enumerating every qualifying role at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCategory {
    /// Stable category name.
    pub name: &'static str,
    /// Explicit member list; `contains` tests against this.
    pub members: &'static [Role],
    /// The least-privileged role that still qualifies.
    pub floor: Role,
}

impl RoleCategory {
    /// Executive-level roles (all-province reach).
    pub const EXECUTIVE: RoleCategory = RoleCategory {
        name: "executive",
        members: &[
            Role::GeneralManager,
            Role::Privilege,
            Role::SuperAdmin,
            Role::Developer,
        ],
        floor: Role::GeneralManager,
    };

    /// Province-management roles.
    pub const PROVINCE_MANAGEMENT: RoleCategory = RoleCategory {
        name: "province_management",
        members: &[Role::ProvinceManager, Role::ProvinceAdmin],
        floor: Role::ProvinceManager,
    };

    /// Branch-management roles.
    pub const BRANCH_MANAGEMENT: RoleCategory = RoleCategory {
        name: "branch_management",
        members: &[Role::BranchManager],
        floor: Role::BranchManager,
    };

    /// Engineering accounts, subject to visibility suppression.
    pub const DEVELOPER: RoleCategory = RoleCategory {
        name: "developer",
        members: &[Role::Developer],
        floor: Role::Developer,
    };

    /// Returns whether `role` is an explicit member of this category.
    pub fn contains(&self, role: Role) -> bool {
        self.members.contains(&role)
    }

    /// Returns whether `role` meets this category's privilege floor.
    pub fn meets_floor(&self, role: Role) -> bool {
        role.is_at_least(self.floor)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn ordering_is_total(a in any_role(), b in any_role()) {
            prop_assert!(a.is_at_least(b) || b.is_at_least(a));
        }

        #[test]
        fn is_at_least_agrees_with_derived_rank(a in any_role(), b in any_role()) {
            prop_assert_eq!(a.is_at_least(b), a.rank() <= b.rank());
        }

        #[test]
        fn layer_never_out_ranks_role_comparison(a in any_role(), b in any_role()) {
            // A role that out-ranks another can never land in a lower layer.
            if a.is_at_least(b) && !b.is_at_least(a) {
                prop_assert!(a.access_layer().satisfies(b.access_layer()));
            }
        }
    }
}
