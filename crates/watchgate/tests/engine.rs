//! End-to-end scenarios across the engine facade: stored record in, access
//! decisions and route redirects out.

use watchgate::{Engine, RouteDecision};
use watchgate_rbac::{Directory, Permission, RawProfileRecord, Role, UserProfile};
use watchgate_session::{Session, SessionHandle, ProfileStore, StoreError, SubscriptionGuard};
use watchgate_types::{BranchId, ProvinceId, UserId};

fn engine() -> Engine {
    let mut directory = Directory::new();
    for p in ["NSN", "KPP"] {
        directory.add_province(ProvinceId::from(p));
    }
    directory
        .add_branch(ProvinceId::from("NSN"), BranchId::from("0450"))
        .unwrap();
    directory
        .add_branch(ProvinceId::from("NSN"), BranchId::from("0451"))
        .unwrap();
    directory
        .add_branch(ProvinceId::from("KPP"), BranchId::from("0100"))
        .unwrap();
    Engine::new(directory).unwrap()
}

fn stored_branch_manager() -> RawProfileRecord {
    serde_json::from_str(
        r#"{
            "role": "user",
            "rbac": {
                "role": "branch_manager",
                "home_province": "NSN",
                "home_branch": "0450",
                "permissions": ["export_reports"],
                "complete": true
            }
        }"#,
    )
    .unwrap()
}

#[test]
fn stored_record_to_decisions_end_to_end() {
    let engine = engine();
    let profile = UserProfile::from_raw(UserId::from("u-1"), &stored_branch_manager()).unwrap();

    // The rbac section won over the stale top-level role.
    assert_eq!(profile.role, Role::BranchManager);

    // Inherited down the chain plus the explicit override.
    assert!(engine.has_permission(&profile, Permission::ViewDashboard));
    assert!(engine.has_permission(&profile, Permission::ApproveTransfer));
    assert!(engine.has_permission(&profile, Permission::ExportReports));
    assert!(!engine.has_permission(&profile, Permission::ManageUsers));

    // Geographic reach is the home geography only.
    assert!(engine.has_branch_access(&profile, &BranchId::from("0450")));
    assert!(!engine.has_branch_access(&profile, &BranchId::from("0451")));
    assert!(!engine.has_province_access(&profile, &ProvinceId::from("KPP")));

    // Routing follows: own dashboard allowed, foreign geography bounced home.
    assert_eq!(
        engine.authorize_path("/NSN/0450/dashboard", &profile),
        RouteDecision::Allow
    );
    assert_eq!(
        engine.authorize_path("/KPP/0100/dashboard", &profile),
        RouteDecision::Redirect("/NSN/0450/dashboard".to_string())
    );
    assert_eq!(
        engine.authorize_path("/users", &profile),
        RouteDecision::Redirect("/NSN/0450/dashboard".to_string())
    );
}

#[test]
fn first_sign_in_lands_on_pending() {
    let engine = engine();
    let mut session = Session::new();

    session.begin_authentication().unwrap();
    session
        .authentication_succeeded(UserId::from("u-new"))
        .unwrap();
    session.profile_missing().unwrap();
    session.provision_default(engine.registry()).unwrap();

    let snapshot = session.snapshot().unwrap().clone();
    assert_eq!(snapshot.profile.role, Role::Pending);

    // A pending user reaches only the pending page.
    assert_eq!(engine.home_path_for(&snapshot.profile), "/pending");
    assert_eq!(
        engine.authorize_path("/NSN/0450/dashboard", &snapshot.profile),
        RouteDecision::Redirect("/pending".to_string())
    );
    assert_eq!(
        engine.authorize_path("/pending", &snapshot.profile),
        RouteDecision::Allow
    );
}

#[test]
fn role_change_pushed_mid_session_takes_effect_immediately() {
    let engine = engine();
    let mut session = Session::new();

    session.begin_authentication().unwrap();
    session
        .authentication_succeeded(UserId::from("u-1"))
        .unwrap();
    session
        .profile_loaded(&stored_branch_manager(), engine.registry())
        .unwrap();

    // An administrator promotes the user; the subscription pushes the record.
    let promoted: RawProfileRecord = serde_json::from_str(
        r#"{ "rbac": { "role": "general_manager", "complete": true } }"#,
    )
    .unwrap();
    session
        .profile_updated(&promoted, engine.registry())
        .unwrap();

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.profile.role, Role::GeneralManager);
    assert!(snapshot.permissions.contains(Permission::ManageProvinces));

    // Executive reach: every geography, executive pages included.
    assert_eq!(
        engine.authorize_path("/KPP/0100/dashboard", &snapshot.profile),
        RouteDecision::Allow
    );
    assert_eq!(
        engine.authorize_path("/users", &snapshot.profile),
        RouteDecision::Allow
    );
}

#[test]
fn executive_scope_spans_the_whole_directory() {
    let engine = engine();
    let gm = UserProfile::provisional(UserId::from("u-gm")).with_role(Role::GeneralManager);

    assert_eq!(engine.allowed_provinces(&gm).len(), 2);
    assert_eq!(engine.allowed_branches(&gm).len(), 3);
    assert_eq!(engine.home_path_for(&gm), "/overview");
}

#[test]
fn developer_accounts_are_invisible_to_administrators() {
    let engine = engine();
    let admin = UserProfile::provisional(UserId::from("u-a")).with_role(Role::SuperAdmin);
    let dev = UserProfile::provisional(UserId::from("u-d")).with_role(Role::Developer);

    assert!(engine.should_hide_from_view(&admin, &dev));
    assert!(!engine.should_hide_from_view(&dev, &admin));
}

#[test]
fn tied_roles_decide_identically() {
    let engine = engine();
    let gm = UserProfile::provisional(UserId::from("u-1")).with_role(Role::GeneralManager);
    let privilege = UserProfile::provisional(UserId::from("u-2")).with_role(Role::Privilege);

    for permission in Permission::ALL {
        assert_eq!(
            engine.has_permission(&gm, permission),
            engine.has_permission(&privilege, permission),
            "{permission}"
        );
    }
    assert!(engine.has_role_privilege(&gm, Role::Privilege));
    assert!(engine.has_role_privilege(&privilege, Role::GeneralManager));
}

// Store-driven lifecycle through the facade.

struct OneRecordStore {
    user: &'static str,
    record: RawProfileRecord,
}

impl ProfileStore for OneRecordStore {
    fn fetch_profile(&self, user_id: &UserId) -> Result<Option<RawProfileRecord>, StoreError> {
        Ok((user_id.as_str() == self.user).then(|| self.record.clone()))
    }

    fn subscribe(&self, _user_id: &UserId) -> Result<SubscriptionGuard, StoreError> {
        Ok(SubscriptionGuard::new(|| {}))
    }
}

#[test]
fn handle_sign_in_then_route_decisions() {
    let engine = engine();
    let mut handle = SessionHandle::new(OneRecordStore {
        user: "u-1",
        record: stored_branch_manager(),
    });

    handle
        .sign_in(UserId::from("u-1"), engine.registry())
        .unwrap();
    let snapshot = handle.session().snapshot().unwrap().clone();

    assert!(snapshot.permissions.contains(Permission::ApproveTransfer));
    assert_eq!(
        engine.authorize_path("/NSN/0450/warehouse", &snapshot.profile),
        RouteDecision::Allow
    );

    handle.sign_out();
    assert!(handle.session().snapshot().is_none());
}
