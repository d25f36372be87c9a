//! Route authorization and redirect computation.
//!
//! A denied route never raises an error; it resolves to a redirect toward
//! the profile's own landing path. `home_path_for` is constructed so that
//! the landing path always authorizes for the same profile — route guards
//! can follow a redirect without re-checking for loops.

use tracing::{info, warn};

use watchgate_rbac::{AccessLayer, Directory, Role, UserProfile};

use crate::classify::classify;
use crate::table::RouteScope;

/// Terminal outcome of a route authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// The profile may enter the requested path.
    Allow,
    /// The profile may not; navigate to the contained path instead.
    Redirect(String),
}

impl RouteDecision {
    /// Returns whether this is an `Allow`.
    pub fn is_allow(&self) -> bool {
        matches!(self, RouteDecision::Allow)
    }
}

/// Authorizes a path for a profile.
///
/// Synchronous and side-effect-free: classification, a layer comparison,
/// and geographic membership tests over already-resolved in-memory values.
pub fn authorize(path: &str, profile: &UserProfile, directory: &Directory) -> RouteDecision {
    let request = classify(path, directory);

    let Some(template) = request.template else {
        // Allow-by-default for paths outside the table. Deliberate: pages
        // without a template carry no privileged data.
        return RouteDecision::Allow;
    };

    let layer = profile.role.access_layer();
    if !layer.satisfies(template.layer) {
        warn!(
            user = %profile.user_id,
            role = %profile.role,
            path = %path,
            required = ?template.layer,
            "route denied: insufficient access layer"
        );
        return RouteDecision::Redirect(home_path_for(profile));
    }

    let geo_allowed = match template.scope {
        RouteScope::None => true,
        RouteScope::Province => request
            .province
            .as_ref()
            .is_none_or(|p| directory.has_province_access(profile, p)),
        RouteScope::Branch => {
            request
                .province
                .as_ref()
                .is_none_or(|p| directory.has_province_access(profile, p))
                && request
                    .branch
                    .as_ref()
                    .is_none_or(|b| directory.has_branch_access(profile, b))
        }
    };

    if !geo_allowed {
        warn!(
            user = %profile.user_id,
            role = %profile.role,
            path = %path,
            "route denied: geographic segment outside allowed scope"
        );
        return RouteDecision::Redirect(home_path_for(profile));
    }

    info!(user = %profile.user_id, path = %path, "route allowed");
    RouteDecision::Allow
}

/// Computes the canonical landing path for a profile.
///
/// Invariant: `authorize(home_path_for(p), p, dir)` is `Allow` for every
/// constructible profile. Guest-layer fallbacks keep that true for profiles
/// with incomplete home geography.
pub fn home_path_for(profile: &UserProfile) -> String {
    match profile.role {
        Role::Guest => "/login".to_string(),
        Role::Pending => "/pending".to_string(),
        _ => match profile.role.access_layer() {
            AccessLayer::Executive => "/overview".to_string(),
            AccessLayer::Province => match &profile.home_province {
                Some(province) => format!("/{province}/overview"),
                None => "/overview".to_string(),
            },
            AccessLayer::Branch => match (&profile.home_province, &profile.home_branch) {
                (Some(province), Some(branch)) => format!("/{province}/{branch}/dashboard"),
                // Incomplete home geography: park on the pending page until
                // an administrator finishes the profile.
                _ => "/pending".to_string(),
            },
            AccessLayer::Guest => "/pending".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchgate_types::{BranchId, ProvinceId, UserId};

    fn directory() -> Directory {
        let mut dir = Directory::new();
        for p in ["P1", "P2"] {
            dir.add_province(ProvinceId::from(p));
        }
        dir.add_branch(ProvinceId::from("P1"), BranchId::from("B1"))
            .unwrap();
        dir.add_branch(ProvinceId::from("P2"), BranchId::from("B2"))
            .unwrap();
        dir
    }

    fn profile(role: Role) -> UserProfile {
        UserProfile::provisional(UserId::from("u-1")).with_role(role)
    }

    #[test]
    fn branch_manager_own_branch_allowed_foreign_branch_redirected() {
        let dir = directory();
        let manager = profile(Role::BranchManager)
            .with_home(ProvinceId::from("P1"), BranchId::from("B1"));

        assert_eq!(
            authorize("/P1/B1/dashboard", &manager, &dir),
            RouteDecision::Allow
        );
        assert_eq!(
            authorize("/P2/B2/dashboard", &manager, &dir),
            RouteDecision::Redirect("/P1/B1/dashboard".to_string())
        );
    }

    #[test]
    fn pending_role_is_redirected_from_every_protected_path() {
        let dir = directory();
        let pending = profile(Role::Pending);

        for path in ["/P1/B1/dashboard", "/P1/overview", "/users", "/settings"] {
            assert_eq!(
                authorize(path, &pending, &dir),
                RouteDecision::Redirect("/pending".to_string()),
                "{path}"
            );
        }
        assert_eq!(authorize("/pending", &pending, &dir), RouteDecision::Allow);
    }

    #[test]
    fn unrecognized_paths_pass_through_by_design() {
        // Deliberate allow-by-default for informational pages.
        let dir = directory();
        let guest = profile(Role::Guest);
        assert_eq!(
            authorize("/release-notes", &guest, &dir),
            RouteDecision::Allow
        );
    }

    #[test]
    fn executive_enters_any_geography() {
        let dir = directory();
        let gm = profile(Role::GeneralManager);

        assert_eq!(authorize("/P1/B1/dashboard", &gm, &dir), RouteDecision::Allow);
        assert_eq!(authorize("/P2/overview", &gm, &dir), RouteDecision::Allow);
        assert_eq!(authorize("/users", &gm, &dir), RouteDecision::Allow);
    }

    #[test]
    fn province_manager_is_confined_to_allowed_provinces() {
        let dir = directory();
        let pm = profile(Role::ProvinceManager)
            .with_home(ProvinceId::from("P1"), BranchId::from("B1"));

        assert_eq!(authorize("/P1/overview", &pm, &dir), RouteDecision::Allow);
        assert_eq!(
            authorize("/P2/overview", &pm, &dir),
            RouteDecision::Redirect("/P1/overview".to_string())
        );
        // Executive pages stay out of reach.
        assert_eq!(
            authorize("/settings", &pm, &dir),
            RouteDecision::Redirect("/P1/overview".to_string())
        );
    }

    #[test]
    fn geo_free_path_to_scoped_route_checks_layer_only() {
        let dir = directory();
        let manager = profile(Role::BranchManager)
            .with_home(ProvinceId::from("P1"), BranchId::from("B1"));
        // No geo segment present, so only the layer requirement applies.
        assert_eq!(authorize("/dashboard", &manager, &dir), RouteDecision::Allow);
    }

    #[test]
    fn home_paths_by_layer() {
        assert_eq!(home_path_for(&profile(Role::Guest)), "/login");
        assert_eq!(home_path_for(&profile(Role::Pending)), "/pending");
        assert_eq!(home_path_for(&profile(Role::SuperAdmin)), "/overview");

        let pm = profile(Role::ProvinceManager)
            .with_home(ProvinceId::from("P1"), BranchId::from("B1"));
        assert_eq!(home_path_for(&pm), "/P1/overview");

        let bm = profile(Role::BranchManager)
            .with_home(ProvinceId::from("P1"), BranchId::from("B1"));
        assert_eq!(home_path_for(&bm), "/P1/B1/dashboard");

        // Incomplete home geography falls back to always-authorized pages.
        assert_eq!(home_path_for(&profile(Role::User)), "/pending");
        assert_eq!(home_path_for(&profile(Role::ProvinceManager)), "/overview");
    }

    #[test]
    fn home_path_always_authorizes_for_its_own_profile() {
        let dir = directory();
        for role in Role::ALL {
            let bare = profile(role);
            let homed = profile(role).with_home(ProvinceId::from("P1"), BranchId::from("B1"));
            for p in [bare, homed] {
                let home = home_path_for(&p);
                assert_eq!(
                    authorize(&home, &p, &dir),
                    RouteDecision::Allow,
                    "redirect loop for {role} at {home}"
                );
            }
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use watchgate_rbac::PermissionSet;
    use watchgate_types::{BranchId, ProvinceId, UserId};

    fn directory() -> Directory {
        let mut dir = Directory::new();
        for p in ["P1", "P2", "P3"] {
            dir.add_province(ProvinceId::from(p));
        }
        dir.add_branch(ProvinceId::from("P1"), BranchId::from("B1")).unwrap();
        dir.add_branch(ProvinceId::from("P2"), BranchId::from("B2")).unwrap();
        dir.add_branch(ProvinceId::from("P3"), BranchId::from("B3")).unwrap();
        dir
    }

    fn any_profile() -> impl Strategy<Value = UserProfile> {
        let role = prop::sample::select(Role::ALL.to_vec());
        let home_province = prop::option::of(prop::sample::select(vec!["P1", "P2", "P3", "P9"]));
        let home_branch = prop::option::of(prop::sample::select(vec!["B1", "B2", "B3", "B9"]));
        let extra_provinces = prop::collection::vec(prop::sample::select(vec!["P1", "P2", "P3"]), 0..3);
        let extra_branches = prop::collection::vec(prop::sample::select(vec!["B1", "B2", "B3"]), 0..3);

        (role, home_province, home_branch, extra_provinces, extra_branches).prop_map(
            |(role, province, branch, extra_provinces, extra_branches)| UserProfile {
                user_id: UserId::from("u-prop"),
                role,
                permission_overrides: PermissionSet::empty(),
                home_province: province.map(ProvinceId::from),
                home_branch: branch.map(BranchId::from),
                extra_provinces: extra_provinces.into_iter().map(ProvinceId::from).collect(),
                extra_branches: extra_branches.into_iter().map(BranchId::from).collect(),
                profile_complete: true,
            },
        )
    }

    proptest! {
        /// The computed landing path must authorize for the profile that
        /// produced it, for every constructible profile: no redirect loops.
        #[test]
        fn home_path_never_loops(profile in any_profile()) {
            let dir = directory();
            let home = home_path_for(&profile);
            prop_assert_eq!(authorize(&home, &profile, &dir), RouteDecision::Allow);
        }

        /// Authorization is terminal: following one redirect always lands on
        /// an allowed path.
        #[test]
        fn one_redirect_suffices(profile in any_profile(), path in "/[a-z0-9/]{0,24}") {
            let dir = directory();
            if let RouteDecision::Redirect(target) = authorize(&path, &profile, &dir) {
                prop_assert_eq!(authorize(&target, &profile, &dir), RouteDecision::Allow);
            }
        }
    }
}
