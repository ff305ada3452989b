//! Route guards.
//!
//! Each guard reads the session once per navigation and either lets the
//! route activate or names where to go instead.  Nothing is cached between
//! navigations.

use tracing::debug;

use shared::policy::{self, AreaDecision, LOGIN_ROUTE, Role, RouteArea};

use crate::auth_state::AuthSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    /// Deny activation and navigate here instead.
    Redirect(String),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

pub trait RouteGuard: Send + Sync + std::fmt::Debug {
    /// Decide whether `target` (path plus query) may activate.
    fn can_activate(&self, session: &AuthSession, target: &str) -> GuardOutcome;
}

/// `/login?returnUrl=<target>` with the target percent-encoded.
pub fn login_redirect(target: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("{}?returnUrl={}", LOGIN_ROUTE, encoded)
}

fn current_role(session: &AuthSession) -> Role {
    Role::from_super_admin(session.is_super_admin())
}

fn area_guard(session: &AuthSession, target: &str, area: RouteArea) -> GuardOutcome {
    if !session.is_authenticated() {
        debug!("Anonymous navigation to {} sent to login", target);
        return GuardOutcome::Redirect(login_redirect(target));
    }

    match policy::authorize(current_role(session), area) {
        AreaDecision::Allow => GuardOutcome::Allow,
        AreaDecision::WrongRole { home } => {
            debug!("Wrong area for {}; redirecting to {}", target, home);
            GuardOutcome::Redirect(home.to_string())
        }
    }
}

/// Any signed-in user.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGuard;

impl RouteGuard for AuthGuard {
    fn can_activate(&self, session: &AuthSession, target: &str) -> GuardOutcome {
        if session.is_authenticated() {
            GuardOutcome::Allow
        } else {
            GuardOutcome::Redirect(login_redirect(target))
        }
    }
}

/// Super-admins only; regular users go to their dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminGuard;

impl RouteGuard for AdminGuard {
    fn can_activate(&self, session: &AuthSession, target: &str) -> GuardOutcome {
        area_guard(session, target, RouteArea::Admin)
    }
}

/// Regular users only; super-admins go to the admin dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserGuard;

impl RouteGuard for UserGuard {
    fn can_activate(&self, session: &AuthSession, target: &str) -> GuardOutcome {
        area_guard(session, target, RouteArea::User)
    }
}

/// Keeps signed-in users off the login page.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginGuard;

impl RouteGuard for LoginGuard {
    fn can_activate(&self, session: &AuthSession, _target: &str) -> GuardOutcome {
        if session.is_authenticated() {
            GuardOutcome::Redirect(current_role(session).home_route().to_string())
        } else {
            GuardOutcome::Allow
        }
    }
}
