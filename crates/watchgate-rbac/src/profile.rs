//! User profiles and raw-record normalization.
//!
//! Stored profile documents accumulated three schema generations: a legacy
//! `auth` section, loose top-level fields, and the current `rbac` section.
//! Normalization happens exactly once, when a raw record is loaded; the rest
//! of the engine only ever sees the canonical [`UserProfile`]. Precedence is
//! `rbac.*` over top-level over `auth.*`, field by field.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use watchgate_types::{BranchId, ProvinceId, UserId};

use crate::error::CatalogError;
use crate::permissions::PermissionSet;
use crate::roles::Role;

/// Error raised while normalizing a raw profile record.
///
/// Missing fields are never errors (they default to the most restrictive
/// value); identifiers outside the closed catalogs are.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// The stored role identifier is not in the closed role set.
    #[error("invalid role in stored profile: {0}")]
    InvalidRole(#[source] CatalogError),

    /// A stored permission override is not in the permission catalog.
    #[error("invalid permission override in stored profile: {0}")]
    InvalidOverride(#[source] CatalogError),
}

// ============================================================================
// Raw record (persistence-layer shape)
// ============================================================================

/// Legacy `auth` section kept by the first schema generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyAuthSection {
    pub role: Option<String>,
    pub province: Option<String>,
    pub branch: Option<String>,
}

/// Current `rbac` section; wins over every other location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RbacSection {
    pub role: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub home_province: Option<String>,
    pub home_branch: Option<String>,
    pub provinces: Option<Vec<String>>,
    pub branches: Option<Vec<String>>,
    pub complete: Option<bool>,
}

/// A profile document exactly as the persistence layer hands it over.
///
/// Every field is optional; the document may predate any of the three
/// schema generations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProfileRecord {
    pub role: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub province: Option<String>,
    pub branch: Option<String>,
    pub allowed_provinces: Option<Vec<String>>,
    pub allowed_branches: Option<Vec<String>>,
    pub complete: Option<bool>,
    pub auth: Option<LegacyAuthSection>,
    pub rbac: Option<RbacSection>,
}

// ============================================================================
// Canonical profile
// ============================================================================

/// The authorization-relevant view of one user, normalized and immutable.
///
/// The engine never mutates a profile; role and permission changes are
/// external writes that the session provider re-reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub role: Role,
    /// Per-user grants beyond the role's effective set.
    pub permission_overrides: PermissionSet,
    pub home_province: Option<ProvinceId>,
    pub home_branch: Option<BranchId>,
    /// Provinces allowed in addition to the home province.
    pub extra_provinces: Vec<ProvinceId>,
    /// Branches allowed in addition to the home branch.
    pub extra_branches: Vec<BranchId>,
    pub profile_complete: bool,
}

impl UserProfile {
    /// The default profile synthesized on first sign-in: lowest-privilege
    /// role, empty geographic scope, awaiting administrative approval.
    pub fn provisional(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Pending,
            permission_overrides: PermissionSet::empty(),
            home_province: None,
            home_branch: None,
            extra_provinces: Vec::new(),
            extra_branches: Vec::new(),
            profile_complete: false,
        }
    }

    /// Normalizes a raw stored record into the canonical profile.
    ///
    /// This is the only place precedence across schema generations is
    /// resolved. A missing role normalizes to `Pending`; missing geography
    /// normalizes to no reach at all.
    pub fn from_raw(user_id: UserId, record: &RawProfileRecord) -> Result<Self, ProfileError> {
        let rbac = record.rbac.clone().unwrap_or_default();
        let auth = record.auth.clone().unwrap_or_default();

        let role = match first_of(&[&rbac.role, &record.role, &auth.role]) {
            Some(name) => name.parse::<Role>().map_err(ProfileError::InvalidRole)?,
            None => Role::Pending,
        };

        let overrides = first_list(&[&rbac.permissions, &record.permissions]);
        let mut permission_overrides = PermissionSet::empty();
        for name in overrides {
            let permission = name.parse().map_err(ProfileError::InvalidOverride)?;
            permission_overrides.grant(permission);
        }
        if permission_overrides.has_high_risk_permission() {
            warn!(user = %user_id, role = %role, "profile carries high-risk permission overrides");
        }

        let home_province = first_of(&[&rbac.home_province, &record.province, &auth.province])
            .map(ProvinceId::new);
        let home_branch =
            first_of(&[&rbac.home_branch, &record.branch, &auth.branch]).map(BranchId::new);

        let extra_provinces = first_list(&[&rbac.provinces, &record.allowed_provinces])
            .into_iter()
            .map(ProvinceId::new)
            .collect();
        let extra_branches = first_list(&[&rbac.branches, &record.allowed_branches])
            .into_iter()
            .map(BranchId::new)
            .collect();

        let profile_complete = rbac.complete.or(record.complete).unwrap_or(false);

        Ok(Self {
            user_id,
            role,
            permission_overrides,
            home_province,
            home_branch,
            extra_provinces,
            extra_branches,
            profile_complete,
        })
    }

    /// Test/builder convenience: replaces the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Test/builder convenience: sets the home province and branch.
    pub fn with_home(mut self, province: ProvinceId, branch: BranchId) -> Self {
        self.home_province = Some(province);
        self.home_branch = Some(branch);
        self
    }

    /// Test/builder convenience: appends an extra allowed province.
    pub fn with_extra_province(mut self, province: ProvinceId) -> Self {
        self.extra_provinces.push(province);
        self
    }

    /// Test/builder convenience: appends an extra allowed branch.
    pub fn with_extra_branch(mut self, branch: BranchId) -> Self {
        self.extra_branches.push(branch);
        self
    }

    /// Test/builder convenience: grants a permission override.
    pub fn with_override(mut self, permission: crate::permissions::Permission) -> Self {
        self.permission_overrides.grant(permission);
        self
    }
}

/// First `Some` among the candidate string fields, in precedence order.
fn first_of(candidates: &[&Option<String>]) -> Option<String> {
    candidates.iter().find_map(|c| (*c).clone())
}

/// First `Some` among the candidate list fields; absent everywhere = empty.
fn first_list(candidates: &[&Option<Vec<String>>]) -> Vec<String> {
    candidates
        .iter()
        .find_map(|c| (*c).clone())
        .unwrap_or_default()
}
