//! The static route template table.
//!
//! Templates are keyed by the first path segment after any geographic
//! prefix. Segments not in the table classify to "no requirement": the
//! application deliberately allows unrecognized informational pages through
//! without a privilege check.

use watchgate_rbac::AccessLayer;

/// Whether a route is geography-scoped, and at which depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteScope {
    /// Not geography-scoped; the path carries no meaningful geo segment.
    None,
    /// Scoped to a province; a province prefix must be inside the user's
    /// allowed province set.
    Province,
    /// Scoped to a branch; province and branch prefixes must both be inside
    /// the user's allowed scope.
    Branch,
}

/// One canonical route template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTemplate {
    /// First path segment after the geographic prefix.
    pub segment: &'static str,
    /// Minimum access layer required to enter.
    pub layer: AccessLayer,
    /// Geographic scoping of the route.
    pub scope: RouteScope,
}

/// Every privileged route the application serves.
pub const ROUTE_TABLE: &[RouteTemplate] = &[
    // Public / pending pages
    RouteTemplate { segment: "login", layer: AccessLayer::Guest, scope: RouteScope::None },
    RouteTemplate { segment: "pending", layer: AccessLayer::Guest, scope: RouteScope::None },
    RouteTemplate { segment: "profile", layer: AccessLayer::Guest, scope: RouteScope::None },
    // Branch-scoped operations
    RouteTemplate { segment: "dashboard", layer: AccessLayer::Branch, scope: RouteScope::Branch },
    RouteTemplate { segment: "warehouse", layer: AccessLayer::Branch, scope: RouteScope::Branch },
    RouteTemplate { segment: "sales", layer: AccessLayer::Branch, scope: RouteScope::Branch },
    RouteTemplate { segment: "accounting", layer: AccessLayer::Branch, scope: RouteScope::Branch },
    // Province-scoped operations
    RouteTemplate { segment: "overview", layer: AccessLayer::Province, scope: RouteScope::Province },
    RouteTemplate { segment: "reports", layer: AccessLayer::Province, scope: RouteScope::Province },
    RouteTemplate { segment: "hr", layer: AccessLayer::Province, scope: RouteScope::Province },
    // Executive pages
    RouteTemplate { segment: "users", layer: AccessLayer::Executive, scope: RouteScope::None },
    RouteTemplate { segment: "settings", layer: AccessLayer::Executive, scope: RouteScope::None },
    RouteTemplate { segment: "developer", layer: AccessLayer::Executive, scope: RouteScope::None },
];

/// Looks up the template for a canonical segment.
pub fn lookup(segment: &str) -> Option<&'static RouteTemplate> {
    ROUTE_TABLE.iter().find(|t| t.segment == segment)
}
