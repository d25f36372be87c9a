//! The role registry: role → effective-permission-set table.
//!
//! Built once at startup by cumulative inheritance: each role's effective set
//! is its own permissions unioned with everything inherited down the chain.
//! Construction is the fail-fast point for configuration errors (cycles,
//! inverted edges); after a successful build the table is immutable and can
//! be shared freely across threads.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::permissions::{Permission, PermissionSet};
use crate::roles::Role;

/// Error raised while building the registry.
///
/// All variants are fatal: an engine with a malformed hierarchy must not
/// start serving decisions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The inheritance graph loops back on itself.
    #[error("role hierarchy cycle detected at {role}")]
    HierarchyCycle { role: Role },

    /// A role inherits from a role that does not sit below it.
    #[error("{role} inherits from {parent}, which does not rank below it")]
    InvertedEdge { role: Role, parent: Role },
}

/// The role each role inherits permissions from (one step down in privilege).
///
/// `Guest` is the root of the chain. Both halves of the tied tier inherit
/// from `ProvinceAdmin` independently.
fn default_parent(role: Role) -> Option<Role> {
    match role {
        Role::Guest => None,
        Role::Pending => Some(Role::Guest),
        Role::User => Some(Role::Pending),
        Role::Lead => Some(Role::User),
        Role::BranchManager => Some(Role::Lead),
        Role::ProvinceManager => Some(Role::BranchManager),
        Role::ProvinceAdmin => Some(Role::ProvinceManager),
        Role::GeneralManager | Role::Privilege => Some(Role::ProvinceAdmin),
        Role::SuperAdmin => Some(Role::GeneralManager),
        Role::Developer => Some(Role::SuperAdmin),
    }
}

/// Permissions a role grants on top of what it inherits.
fn own_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Guest | Role::Pending => &[],
        Role::User => &[
            Permission::ViewDashboard,
            Permission::ViewWarehouse,
            Permission::ViewSales,
        ],
        Role::Lead => &[
            Permission::EditWarehouse,
            Permission::EditSales,
            Permission::ViewReports,
        ],
        Role::BranchManager => &[
            Permission::ApproveTransfer,
            Permission::ApproveSales,
            Permission::ViewAccounts,
            Permission::ViewHr,
            Permission::ExportReports,
        ],
        Role::ProvinceManager => &[
            Permission::EditAccounts,
            Permission::EditHr,
            Permission::ApproveUsers,
        ],
        Role::ProvinceAdmin => &[Permission::ManageUsers, Permission::ManageBranches],
        // Privilege is the deprecated alias of GeneralManager; the own-sets
        // stay identical so the two remain interchangeable in stored data.
        Role::GeneralManager | Role::Privilege => &[
            Permission::ManageProvinces,
            Permission::AssignRoles,
            Permission::CloseAccounts,
        ],
        Role::SuperAdmin => &[Permission::ManageSystem, Permission::ViewAuditLog],
        Role::Developer => &[Permission::DeveloperTools],
    }
}

/// Immutable role → effective-permission table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    effective: BTreeMap<Role, PermissionSet>,
}

impl RoleRegistry {
    /// Builds the registry from the built-in hierarchy.
    pub fn build() -> Result<Self, RegistryError> {
        Self::build_with(default_parent)
    }

    /// Builds the registry from an explicit inheritance function.
    ///
    /// Validates the graph before computing any set:
    /// - every inheritance chain must terminate (no cycles)
    /// - every edge must point strictly downward in privilege
    pub fn build_with(parent_of: impl Fn(Role) -> Option<Role>) -> Result<Self, RegistryError> {
        let mut effective = BTreeMap::new();

        for role in Role::ALL {
            let mut chain = vec![role];
            let mut current = role;

            // Cycle detection first: a cycle always contains an upward edge,
            // and the cycle is the more useful diagnosis of the two.
            while let Some(parent) = parent_of(current) {
                if chain.contains(&parent) {
                    return Err(RegistryError::HierarchyCycle { role: parent });
                }
                chain.push(parent);
                current = parent;
            }

            for pair in chain.windows(2) {
                if pair[1].rank() <= pair[0].rank() {
                    return Err(RegistryError::InvertedEdge {
                        role: pair[0],
                        parent: pair[1],
                    });
                }
            }

            let mut set = PermissionSet::empty();
            for link in &chain {
                for permission in own_permissions(*link) {
                    set.grant(*permission);
                }
            }
            effective.insert(role, set);
        }

        debug!(roles = effective.len(), "role registry built");
        Ok(Self { effective })
    }

    /// Returns the effective permission set for a role.
    ///
    /// Stable across calls: the table was computed once at build time.
    pub fn effective_permissions(&self, role: Role) -> &PermissionSet {
        self.effective
            .get(&role)
            .expect("registry holds every role in the closed set")
    }
}
