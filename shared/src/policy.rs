//! Area authorization policy.
//!
//! ITAMS splits its UI and API into two route trees: `/admin/*` for
//! super-admins and `/user/*` for everyone else.  The server applies
//! [`authorize`] as the enforcement point; the navigation client applies the
//! same function to pick redirects, which is a convenience only and never a
//! substitute for the server check.

use serde::{Deserialize, Serialize};

pub const ADMIN_HOME: &str = "/admin/dashboard";
pub const USER_HOME: &str = "/user/dashboard";
pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    User,
}

impl Role {
    pub fn from_super_admin(is_super_admin: bool) -> Self {
        if is_super_admin {
            Role::SuperAdmin
        } else {
            Role::User
        }
    }

    pub fn is_super_admin(self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Landing route for this role.
    pub fn home_route(self) -> &'static str {
        match self {
            Role::SuperAdmin => ADMIN_HOME,
            Role::User => USER_HOME,
        }
    }

    /// The area this role is allowed into, besides public routes.
    pub fn area(self) -> RouteArea {
        match self {
            Role::SuperAdmin => RouteArea::Admin,
            Role::User => RouteArea::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteArea {
    Admin,
    User,
    Public,
}

impl RouteArea {
    /// Classify a path by its first segment.  Query strings and fragments
    /// are ignored; `/administrator` is not `/admin`.
    pub fn for_path(path: &str) -> Self {
        let clean = path
            .split(['?', '#'])
            .next()
            .unwrap_or(path);

        let first = clean
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or("");

        match first {
            "admin" => RouteArea::Admin,
            "user" => RouteArea::User,
            _ => RouteArea::Public,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaDecision {
    Allow,
    /// The principal is in the wrong tree; `home` is where it belongs.
    WrongRole { home: &'static str },
}

impl AreaDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, AreaDecision::Allow)
    }
}

/// Decide whether `role` may enter `area`.
pub fn authorize(role: Role, area: RouteArea) -> AreaDecision {
    match area {
        RouteArea::Public => AreaDecision::Allow,
        area if area == role.area() => AreaDecision::Allow,
        _ => AreaDecision::WrongRole {
            home: role.home_route(),
        },
    }
}

/// Convenience wrapper: classify `path` and authorize `role` against it.
pub fn authorize_path(role: Role, path: &str) -> AreaDecision {
    authorize(role, RouteArea::for_path(path))
}
