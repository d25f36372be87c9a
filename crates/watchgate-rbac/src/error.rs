//! Catalog error types.

use thiserror::Error;

/// Error raised when an identifier falls outside one of the closed catalogs.
///
/// These indicate misconfiguration (a stored record or a table definition
/// referencing a role or permission that does not exist), not a runtime
/// denial. Denials are ordinary `false`/`Redirect` results.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Role identifier not in the closed role set.
    #[error("unknown role identifier: {0:?}")]
    UnknownRole(String),

    /// Permission identifier not in the permission catalog.
    #[error("unknown permission identifier: {0:?}")]
    UnknownPermission(String),
}
