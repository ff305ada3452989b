use std::collections::HashMap;
use std::sync::Arc;

use shared::policy::{ADMIN_HOME, LOGIN_ROUTE, USER_HOME};

use crate::guards::{AdminGuard, AuthGuard, LoginGuard, RouteGuard, UserGuard};

#[derive(Debug, Clone)]
pub enum RouteTarget {
    /// A real view, entered only if the guard allows.
    Guarded(Arc<dyn RouteGuard>),
    /// Legacy path that forwards elsewhere unconditionally.
    Alias(String),
}

/// Path → target lookup.  Paths are compared without query, fragment or
/// trailing slash.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteTarget>,
    fallback: Option<String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guarded<G: RouteGuard + 'static>(mut self, path: &str, guard: G) -> Self {
        self.routes
            .insert(normalize(path).to_string(), RouteTarget::Guarded(Arc::new(guard)));
        self
    }

    pub fn alias(mut self, from: &str, to: &str) -> Self {
        self.routes
            .insert(normalize(from).to_string(), RouteTarget::Alias(to.to_string()));
        self
    }

    /// Where unknown paths go.
    pub fn fallback(mut self, to: &str) -> Self {
        self.fallback = Some(to.to_string());
        self
    }

    pub fn resolve(&self, url: &str) -> Option<RouteTarget> {
        self.routes
            .get(normalize(url))
            .cloned()
            .or_else(|| self.fallback.clone().map(RouteTarget::Alias))
    }

    /// The ITAMS application routes.
    pub fn itams() -> Self {
        Self::new()
            .guarded(LOGIN_ROUTE, LoginGuard)
            // Super-admin tree
            .guarded(ADMIN_HOME, AdminGuard)
            .guarded("/admin/users", AdminGuard)
            .guarded("/admin/projects", AdminGuard)
            .guarded("/admin/assets", AdminGuard)
            .guarded("/admin/audit-logs", AdminGuard)
            // Regular-user tree
            .guarded(USER_HOME, UserGuard)
            .guarded("/user/assets", UserGuard)
            .guarded("/user/profile", UserGuard)
            .guarded("/profile", AuthGuard)
            // Legacy paths
            .alias("/", LOGIN_ROUTE)
            .alias("/dashboard", USER_HOME)
            .alias("/assets", "/user/assets")
            .alias("/superadmin", ADMIN_HOME)
            .alias("/superadmin/dashboard", ADMIN_HOME)
            .fallback(LOGIN_ROUTE)
    }
}

/// Strip query, fragment and trailing slash.  `/` stays `/`.
pub fn normalize(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
