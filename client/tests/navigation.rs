//! Navigation through the ITAMS route table for each kind of session.

use std::sync::Arc;

use client::{AuthSession, Navigation, Navigator, RouteTable};
use shared::policy::{ADMIN_HOME, Role, USER_HOME};

fn navigator(role: Option<Role>) -> Navigator {
    let session = Arc::new(AuthSession::new());
    if let Some(role) = role {
        session.sign_in(role);
    }
    Navigator::new(RouteTable::itams(), session)
}

fn activated(path: &str) -> Navigation {
    Navigation::Activated {
        path: path.to_string(),
    }
}

#[test]
fn regular_user_bounced_from_admin_tree() {
    let nav = navigator(Some(Role::User));
    assert_eq!(nav.navigate("/admin/dashboard"), activated(USER_HOME));
    assert_eq!(nav.navigate("/admin/audit-logs"), activated(USER_HOME));
}

#[test]
fn super_admin_bounced_from_user_tree() {
    let nav = navigator(Some(Role::SuperAdmin));
    assert_eq!(nav.navigate(USER_HOME), activated(ADMIN_HOME));
    assert_eq!(nav.navigate("/user/assets"), activated(ADMIN_HOME));
    assert_eq!(nav.navigate("/admin/projects"), activated("/admin/projects"));
}

#[test]
fn anonymous_visitor_lands_on_login_with_return_url() {
    let nav = navigator(None);
    assert_eq!(
        nav.navigate("/admin/users"),
        activated("/login?returnUrl=%2Fadmin%2Fusers")
    );
    assert_eq!(
        nav.navigate("/profile"),
        activated("/login?returnUrl=%2Fprofile")
    );
}

#[test]
fn signed_in_users_skip_login_page() {
    assert_eq!(navigator(Some(Role::User)).navigate("/login"), activated(USER_HOME));
    assert_eq!(
        navigator(Some(Role::SuperAdmin)).navigate("/login?returnUrl=%2Fprofile"),
        activated(ADMIN_HOME)
    );
}

#[test]
fn legacy_paths_follow_aliases_then_guards() {
    let user = navigator(Some(Role::User));
    assert_eq!(user.navigate("/"), activated(USER_HOME));
    assert_eq!(user.navigate("/dashboard"), activated(USER_HOME));
    assert_eq!(user.navigate("/assets"), activated("/user/assets"));
    assert_eq!(user.navigate("/superadmin"), activated(USER_HOME));

    let admin = navigator(Some(Role::SuperAdmin));
    assert_eq!(admin.navigate("/superadmin/dashboard"), activated(ADMIN_HOME));
    assert_eq!(admin.navigate("/dashboard"), activated(ADMIN_HOME));

    assert_eq!(navigator(None).navigate("/"), activated("/login"));
}

#[test]
fn unknown_paths_go_to_login() {
    assert_eq!(navigator(None).navigate("/nope"), activated("/login"));
    assert_eq!(navigator(Some(Role::User)).navigate("/nope"), activated(USER_HOME));
}

#[test]
fn profile_is_open_to_both_roles() {
    assert_eq!(navigator(Some(Role::User)).navigate("/profile"), activated("/profile"));
    assert_eq!(
        navigator(Some(Role::SuperAdmin)).navigate("/profile"),
        activated("/profile")
    );
}

#[test]
fn sign_out_is_seen_by_next_navigation() {
    let nav = navigator(Some(Role::User));
    assert_eq!(nav.navigate("/user/profile"), activated("/user/profile"));

    nav.session().sign_out();
    assert_eq!(
        nav.navigate("/user/profile"),
        activated("/login?returnUrl=%2Fuser%2Fprofile")
    );
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn every_navigation_terminates_in_an_allowed_view(
            path in "/[a-z/-]{0,20}",
            role in prop::option::of(prop::sample::select(vec![Role::User, Role::SuperAdmin])),
        ) {
            match navigator(role).navigate(&path) {
                Navigation::Activated { path } => {
                    let area = shared::policy::RouteArea::for_path(&path);
                    match role {
                        None => prop_assert!(path.starts_with("/login")),
                        Some(role) => prop_assert!(shared::policy::authorize(role, area).is_allowed()),
                    }
                }
                Navigation::Rejected { reason } => prop_assert!(false, "rejected: {}", reason),
            }
        }
    }
}
