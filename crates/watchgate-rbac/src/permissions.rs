//! The permission catalog.
//!
//! A closed, enumerable set of atomic capabilities, independent of role.
//! Roles and per-user overrides both draw from this shared vocabulary, which
//! lets the registry verify at build time that nothing references an
//! undefined capability.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// An atomic capability that can be granted to a role or a single user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// View the landing dashboard.
    ViewDashboard,

    /// View warehouse stock and transfer documents.
    ViewWarehouse,
    /// Create and edit warehouse documents.
    EditWarehouse,
    /// Approve inventory transfers between branches.
    ApproveTransfer,

    /// View sales documents.
    ViewSales,
    /// Create and edit sales documents.
    EditSales,
    /// Approve sales documents above the staff limit.
    ApproveSales,

    /// View accounting entries.
    ViewAccounts,
    /// Create and edit accounting entries.
    EditAccounts,
    /// Close an accounting period.
    CloseAccounts,

    /// View HR records.
    ViewHr,
    /// Edit HR records.
    EditHr,

    /// View aggregated reports.
    ViewReports,
    /// Export report data outside the system.
    ExportReports,

    /// Approve pending sign-ups into real roles.
    ApproveUsers,
    /// Create, disable, and edit user accounts.
    ManageUsers,
    /// Assign and change user roles.
    AssignRoles,

    /// Create and edit branches.
    ManageBranches,
    /// Create and edit provinces.
    ManageProvinces,

    /// Change system-wide settings.
    ManageSystem,
    /// View the audit log.
    ViewAuditLog,
    /// Access developer tooling.
    DeveloperTools,
}

impl Permission {
    /// Every permission in the catalog.
    pub const ALL: [Permission; 22] = [
        Permission::ViewDashboard,
        Permission::ViewWarehouse,
        Permission::EditWarehouse,
        Permission::ApproveTransfer,
        Permission::ViewSales,
        Permission::EditSales,
        Permission::ApproveSales,
        Permission::ViewAccounts,
        Permission::EditAccounts,
        Permission::CloseAccounts,
        Permission::ViewHr,
        Permission::EditHr,
        Permission::ViewReports,
        Permission::ExportReports,
        Permission::ApproveUsers,
        Permission::ManageUsers,
        Permission::AssignRoles,
        Permission::ManageBranches,
        Permission::ManageProvinces,
        Permission::ManageSystem,
        Permission::ViewAuditLog,
        Permission::DeveloperTools,
    ];

    /// Returns whether the identifier names a catalog permission.
    pub fn exists(identifier: &str) -> bool {
        identifier.parse::<Permission>().is_ok()
    }

    /// Returns whether this permission can alter who may do what.
    ///
    /// High-risk permissions warrant extra audit logging when granted as
    /// per-user overrides.
    pub fn is_high_risk(self) -> bool {
        matches!(
            self,
            Permission::ManageUsers
                | Permission::AssignRoles
                | Permission::ManageProvinces
                | Permission::ManageSystem
        )
    }

    /// Returns the stable string identifier stored in profile records.
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view_dashboard",
            Permission::ViewWarehouse => "view_warehouse",
            Permission::EditWarehouse => "edit_warehouse",
            Permission::ApproveTransfer => "approve_transfer",
            Permission::ViewSales => "view_sales",
            Permission::EditSales => "edit_sales",
            Permission::ApproveSales => "approve_sales",
            Permission::ViewAccounts => "view_accounts",
            Permission::EditAccounts => "edit_accounts",
            Permission::CloseAccounts => "close_accounts",
            Permission::ViewHr => "view_hr",
            Permission::EditHr => "edit_hr",
            Permission::ViewReports => "view_reports",
            Permission::ExportReports => "export_reports",
            Permission::ApproveUsers => "approve_users",
            Permission::ManageUsers => "manage_users",
            Permission::AssignRoles => "assign_roles",
            Permission::ManageBranches => "manage_branches",
            Permission::ManageProvinces => "manage_provinces",
            Permission::ManageSystem => "manage_system",
            Permission::ViewAuditLog => "view_audit_log",
            Permission::DeveloperTools => "developer_tools",
        }
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Permission {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownPermission(s.to_string()))
    }
}

// ============================================================================
// Permission Sets
// ============================================================================

/// Set of permissions. Duplicate grants are no-ops; order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    permissions: Vec<Permission>,
}

impl PermissionSet {
    /// Creates a set from the given permissions, dropping duplicates.
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        let mut set = Self::empty();
        for p in permissions {
            set.grant(p);
        }
        set
    }

    /// Creates an empty permission set.
    pub fn empty() -> Self {
        Self {
            permissions: Vec::new(),
        }
    }

    /// Returns whether this set contains the given permission.
    pub fn contains(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Adds a permission to the set.
    pub fn grant(&mut self, permission: Permission) {
        if !self.permissions.contains(&permission) {
            self.permissions.push(permission);
        }
    }

    /// Removes a permission from the set.
    pub fn revoke(&mut self, permission: Permission) {
        self.permissions.retain(|p| *p != permission);
    }

    /// Returns the union of this set and `other` as a new set.
    pub fn union(&self, other: &PermissionSet) -> PermissionSet {
        let mut merged = self.clone();
        for p in other.iter() {
            merged.grant(*p);
        }
        merged
    }

    /// Returns whether every permission in `other` is also in this set.
    pub fn is_superset_of(&self, other: &PermissionSet) -> bool {
        other.iter().all(|p| self.contains(*p))
    }

    /// Returns all permissions in the set.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Returns the number of distinct permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Returns whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Returns whether any permission in the set is high-risk.
    pub fn has_high_risk_permission(&self) -> bool {
        self.permissions.iter().any(|p| p.is_high_risk())
    }
}

impl From<Vec<Permission>> for PermissionSet {
    fn from(permissions: Vec<Permission>) -> Self {
        Self::new(permissions)
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_round_trip() {
        for p in Permission::ALL {
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
            assert!(Permission::exists(p.as_str()));
        }
        assert!(!Permission::exists("summon_dragons"));
    }

    #[test]
    fn test_unknown_permission_is_rejected() {
        let err = "summon_dragons".parse::<Permission>().unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownPermission("summon_dragons".to_string())
        );
    }

    #[test]
    fn test_permission_set_operations() {
        let mut set = PermissionSet::empty();
        assert!(!set.contains(Permission::ViewSales));

        set.grant(Permission::ViewSales);
        assert!(set.contains(Permission::ViewSales));

        set.grant(Permission::ViewSales); // Duplicate grant is no-op
        assert_eq!(set.len(), 1);

        set.grant(Permission::EditSales);
        assert_eq!(set.len(), 2);

        set.revoke(Permission::ViewSales);
        assert!(!set.contains(Permission::ViewSales));
        assert!(set.contains(Permission::EditSales));
    }

    #[test]
    fn test_union_and_superset() {
        let base = PermissionSet::new([Permission::ViewSales, Permission::ViewWarehouse]);
        let extra = PermissionSet::new([Permission::ViewSales, Permission::ExportReports]);

        let merged = base.union(&extra);
        assert_eq!(merged.len(), 3);
        assert!(merged.is_superset_of(&base));
        assert!(merged.is_superset_of(&extra));
        assert!(!base.is_superset_of(&extra));
    }

    #[test]
    fn test_high_risk_permissions() {
        assert!(Permission::ManageUsers.is_high_risk());
        assert!(Permission::AssignRoles.is_high_risk());
        assert!(!Permission::ViewDashboard.is_high_risk());

        let mut set = PermissionSet::new([Permission::ViewReports]);
        assert!(!set.has_high_risk_permission());
        set.grant(Permission::ManageSystem);
        assert!(set.has_high_risk_permission());
    }
}
