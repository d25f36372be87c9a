//! # watchgate-routing: Route classification and redirects
//!
//! Maps requested application paths to access requirements and decides, for
//! a given profile, between `Allow` and `Redirect(path)`:
//!
//! 1. **Classify**: recognize a `/{province}` or `/{province}/{branch}`
//!    prefix via the [`watchgate_rbac::Directory`], then match the next
//!    segment against the static route table. Unrecognized paths carry no
//!    requirement (deliberate allow-by-default for informational pages).
//! 2. **Authorize**: the profile's access layer must satisfy the template's
//!    layer; geography-scoped templates additionally check the path's geo
//!    segments against the profile's allowed scope.
//! 3. **Decide**: `Allow`, or `Redirect` to the profile's own landing path.
//!
//! The whole pipeline is synchronous and side-effect-free; route guards act
//! on the returned decision.
//!
//! ## Example
//!
//! ```
//! use watchgate_rbac::{Directory, Role, UserProfile};
//! use watchgate_routing::{authorize, RouteDecision};
//! use watchgate_types::{BranchId, ProvinceId, UserId};
//!
//! let mut directory = Directory::new();
//! directory.add_province(ProvinceId::from("P1"));
//! directory.add_branch(ProvinceId::from("P1"), BranchId::from("B1"))?;
//!
//! let manager = UserProfile::provisional(UserId::from("u-7"))
//!     .with_role(Role::BranchManager)
//!     .with_home(ProvinceId::from("P1"), BranchId::from("B1"));
//!
//! assert_eq!(
//!     authorize("/P1/B1/dashboard", &manager, &directory),
//!     RouteDecision::Allow
//! );
//! # Ok::<(), watchgate_rbac::DirectoryError>(())
//! ```

pub mod classify;
pub mod redirect;
pub mod table;

// Re-export commonly used types
pub use classify::{classify, RouteRequest};
pub use redirect::{authorize, home_path_for, RouteDecision};
pub use table::{RouteScope, RouteTemplate, ROUTE_TABLE};
