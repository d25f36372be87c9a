//! # watchgate-types: Core types for Watchgate
//!
//! This crate contains the shared identifier types used across the
//! Watchgate access-resolution engine:
//! - [`UserId`]: opaque uid issued by the authentication provider
//! - [`ProvinceId`]: province code (e.g. `"NSN"`)
//! - [`BranchId`]: branch code within a province (e.g. `"0450"`)
//!
//! All three are thin string newtypes. They exist so that a branch code can
//! never be passed where a province code is expected, and so the rest of the
//! engine never handles bare strings.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

// ============================================================================
// Entity IDs - string-backed (codes issued by external systems)
// ============================================================================

/// Unique identifier for an authenticated user.
///
/// Issued by the external authentication provider; treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier for a province (top level of the geographic hierarchy).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProvinceId(String);

impl ProvinceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProvinceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProvinceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ProvinceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier for a branch (second level, always owned by a province).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BranchId(String);

impl BranchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BranchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BranchId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BranchId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_distinct_types() {
        let user = UserId::from("u-1001");
        let province = ProvinceId::from("NSN");
        let branch = BranchId::from("0450");

        assert_eq!(user.as_str(), "u-1001");
        assert_eq!(province.to_string(), "NSN");
        assert_eq!(branch.to_string(), "0450");
    }

    #[test]
    fn test_ids_order_and_hash() {
        let mut provinces = vec![ProvinceId::from("NSN"), ProvinceId::from("KPP")];
        provinces.sort();
        assert_eq!(provinces[0], ProvinceId::from("KPP"));
    }
}
