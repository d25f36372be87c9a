//! Geographic scope resolution.
//!
//! The [`Directory`] holds the known provinces and branches (built once at
//! startup from organization data, immutable afterwards). Scope resolution
//! is a pure function over a profile: executives reach everything, everyone
//! else reaches their home geography plus explicit allowances.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use watchgate_types::{BranchId, ProvinceId};

use crate::profile::UserProfile;
use crate::roles::RoleCategory;

/// Error raised while assembling the directory.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// A branch was registered under a province the directory does not know.
    #[error("branch {branch} registered under unknown province {province}")]
    UnknownProvince {
        branch: BranchId,
        province: ProvinceId,
    },
}

/// Registry of known provinces and branches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    provinces: BTreeSet<ProvinceId>,
    branches: BTreeMap<BranchId, ProvinceId>,
}

impl Directory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a province. Duplicate registration is a no-op.
    pub fn add_province(&mut self, province: ProvinceId) {
        self.provinces.insert(province);
    }

    /// Registers a branch under an already-registered province.
    pub fn add_branch(
        &mut self,
        province: ProvinceId,
        branch: BranchId,
    ) -> Result<(), DirectoryError> {
        if !self.provinces.contains(&province) {
            return Err(DirectoryError::UnknownProvince { branch, province });
        }
        self.branches.insert(branch, province);
        Ok(())
    }

    /// Returns whether the directory knows this province.
    pub fn contains_province(&self, province: &ProvinceId) -> bool {
        self.provinces.contains(province)
    }

    /// Returns whether the directory knows this branch.
    pub fn contains_branch(&self, branch: &BranchId) -> bool {
        self.branches.contains_key(branch)
    }

    /// Returns the owning province of a branch, if known.
    pub fn province_of(&self, branch: &BranchId) -> Option<&ProvinceId> {
        self.branches.get(branch)
    }

    /// All known provinces.
    pub fn provinces(&self) -> impl Iterator<Item = &ProvinceId> {
        self.provinces.iter()
    }

    /// All known branches.
    pub fn branches(&self) -> impl Iterator<Item = &BranchId> {
        self.branches.keys()
    }

    // ========================================================================
    // Scope resolution
    // ========================================================================

    /// Returns the provinces this profile may act within.
    ///
    /// Roles at or above the executive floor get the universal set,
    /// independent of any explicit list on the profile. Everyone else gets
    /// their explicit allowances plus the home province — the home province
    /// is always implicitly allowed, even when an administrator forgot to
    /// put it on the explicit list.
    pub fn allowed_provinces(&self, profile: &UserProfile) -> BTreeSet<ProvinceId> {
        if RoleCategory::EXECUTIVE.meets_floor(profile.role) {
            return self.provinces.clone();
        }

        let mut allowed: BTreeSet<ProvinceId> = profile.extra_provinces.iter().cloned().collect();
        if let Some(home) = &profile.home_province {
            allowed.insert(home.clone());
        }
        allowed
    }

    /// Returns the branches this profile may act within.
    ///
    /// Scoped beneath the resolved province set: explicit branch allowances
    /// only count when their owning province is itself allowed. The home
    /// branch is always implicitly included.
    pub fn allowed_branches(&self, profile: &UserProfile) -> BTreeSet<BranchId> {
        if RoleCategory::EXECUTIVE.meets_floor(profile.role) {
            return self.branches.keys().cloned().collect();
        }

        let provinces = self.allowed_provinces(profile);
        let mut allowed = BTreeSet::new();
        for branch in &profile.extra_branches {
            match self.province_of(branch) {
                Some(province) if provinces.contains(province) => {
                    allowed.insert(branch.clone());
                }
                // Unknown branches and branches outside the province set
                // resolve restrictively: not allowed.
                _ => {}
            }
        }
        if let Some(home) = &profile.home_branch {
            allowed.insert(home.clone());
        }
        allowed
    }

    /// Membership test against [`Directory::allowed_provinces`].
    pub fn has_province_access(&self, profile: &UserProfile, province: &ProvinceId) -> bool {
        self.allowed_provinces(profile).contains(province)
    }

    /// Membership test against [`Directory::allowed_branches`].
    pub fn has_branch_access(&self, profile: &UserProfile, branch: &BranchId) -> bool {
        self.allowed_branches(profile).contains(branch)
    }
}
