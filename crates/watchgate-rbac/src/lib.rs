//! # watchgate-rbac: Role-Based Access Control
//!
//! The decision core of the Watchgate engine:
//! - **Role hierarchy** (11 roles, one canonical tier ordering)
//! - **Permission catalog** (closed capability set)
//! - **Cumulative inheritance** (role → effective permission table, built
//!   once at startup, immutable and lock-free afterwards)
//! - **Profile normalization** (three schema generations → one canonical
//!   [`UserProfile`])
//! - **Geographic scope** (province/branch containment)
//! - **Access decisions** (permission, privilege, and visibility checks)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  RawProfileRecord (persistence layer)        │
//! └─────────────────┬────────────────────────────┘
//!                   │ UserProfile::from_raw (once per load)
//!                   ▼
//! ┌──────────────────────────────────────────────┐
//! │  UserProfile (canonical, immutable)          │
//! └───────┬─────────────────┬────────────────────┘
//!         │                 │
//!         ▼                 ▼
//! ┌───────────────┐  ┌──────────────────────────┐
//! │  AccessGate   │  │  Directory               │
//! │  permission / │  │  allowed provinces and   │
//! │  privilege /  │  │  branches, membership    │
//! │  visibility   │  │  tests                   │
//! └───────────────┘  └──────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use watchgate_rbac::{AccessGate, Permission, Role, RoleRegistry, UserProfile};
//! use watchgate_types::UserId;
//!
//! let registry = RoleRegistry::build()?;
//! let gate = AccessGate::new(&registry);
//!
//! let profile = UserProfile::provisional(UserId::from("u-1")).with_role(Role::Lead);
//! assert!(gate.has_permission(&profile, Permission::EditSales));
//! assert!(!gate.has_permission(&profile, Permission::ManageUsers));
//! # Ok::<(), watchgate_rbac::RegistryError>(())
//! ```

pub mod decision;
pub mod error;
pub mod permissions;
pub mod profile;
pub mod registry;
pub mod roles;
pub mod scope;

// Re-export commonly used types
pub use decision::AccessGate;
pub use error::CatalogError;
pub use permissions::{Permission, PermissionSet};
pub use profile::{ProfileError, RawProfileRecord, UserProfile};
pub use registry::{RegistryError, RoleRegistry};
pub use roles::{AccessLayer, Role, RoleCategory, ROLE_TIERS};
pub use scope::{Directory, DirectoryError};
