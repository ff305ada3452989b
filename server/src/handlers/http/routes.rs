use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use hyper::{Method, Response, StatusCode, header};
use tracing::{error, warn};

use shared::policy::{self, AreaDecision};
use shared::types::AccessContext;

use crate::AppState;
use crate::handlers::http::utils::{self, deliver_error_json, internal_error};
use crate::handlers::http::{ApiRequest, ApiResponse, admin, auth, session, user};

// ---------------------------------------------------------------------------
// Handler type aliases
// ---------------------------------------------------------------------------
//
// Three tiers, all driven by the `AccessContext` the access middleware put
// into the request extensions:
//
//   OpenHandler:    no check.  Receives (req, state).
//                   Use for: /health, login, logout.
//
//   ContextHandler: requires `AccessContext.user_id`.  Receives
//                   (req, state, ctx).  Used by both `Authenticated` and
//                   `Area` routes; `Area` additionally runs the shared
//                   area policy on the path.

type HandlerFuture = Pin<Box<dyn Future<Output = Result<ApiResponse>> + Send>>;

type OpenHandler = Box<dyn Fn(ApiRequest, AppState) -> HandlerFuture + Send + Sync>;

type ContextHandler =
    Box<dyn Fn(ApiRequest, AppState, AccessContext) -> HandlerFuture + Send + Sync>;

// ---------------------------------------------------------------------------
// RouteKind
// ---------------------------------------------------------------------------

enum RouteKind {
    /// No authentication check.
    Open(OpenHandler),

    /// Any caller whose context carries a user id.
    Authenticated(ContextHandler),

    /// Authenticated, and the caller's role must match the path's area
    /// (`/api/admin/*` super-admin, `/api/user/*` regular user).
    Area(ContextHandler),
}

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

struct Route {
    method: Method,
    path: String,
    kind: RouteKind,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.routes.len())
            .finish()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    fn open<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(ApiRequest, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ApiResponse>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            kind: RouteKind::Open(Box::new(move |req, state| Box::pin(handler(req, state)))),
        });
        self
    }

    fn with_context<F, Fut>(mut self, method: Method, path: &str, area: bool, handler: F) -> Self
    where
        F: Fn(ApiRequest, AppState, AccessContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ApiResponse>> + Send + 'static,
    {
        let boxed: ContextHandler =
            Box::new(move |req, state, ctx| Box::pin(handler(req, state, ctx)));
        self.routes.push(Route {
            method,
            path: path.to_string(),
            kind: if area {
                RouteKind::Area(boxed)
            } else {
                RouteKind::Authenticated(boxed)
            },
        });
        self
    }

    // ── Open (no auth) ────────────────────────────────────────────────────────

    /// GET with no authentication: public pages and health checks.
    pub fn get<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(ApiRequest, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ApiResponse>> + Send + 'static,
    {
        self.open(Method::GET, path, handler)
    }

    /// POST with no authentication: login / logout only.
    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(ApiRequest, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ApiResponse>> + Send + 'static,
    {
        self.open(Method::POST, path, handler)
    }

    // ── Authenticated ────────────────────────────────────────────────────────

    /// GET for any authenticated caller.
    pub fn get_auth<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(ApiRequest, AppState, AccessContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ApiResponse>> + Send + 'static,
    {
        self.with_context(Method::GET, path, false, handler)
    }

    // ── Area (authenticated + role matches path tree) ────────────────────────

    /// GET restricted to the role owning the path's area.
    pub fn get_area<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(ApiRequest, AppState, AccessContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ApiResponse>> + Send + 'static,
    {
        self.with_context(Method::GET, path, true, handler)
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    /// Route a request, turning handler errors into a 500 JSON envelope.
    pub async fn dispatch(&self, req: ApiRequest, state: AppState) -> ApiResponse {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        match self.route(req, state).await {
            Ok(response) => response,
            Err(e) => {
                error!("{} {} failed: {:#}", method, path, e);
                internal_error()
            }
        }
    }

    pub async fn route(&self, req: ApiRequest, state: AppState) -> Result<ApiResponse> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        for route in &self.routes {
            if route.method != method || !Self::path_matches(&route.path, &path) {
                continue;
            }

            return match &route.kind {
                RouteKind::Open(h) => h(req, state).await,

                RouteKind::Authenticated(h) => match authenticated_context(&req) {
                    Some(ctx) => h(req, state, ctx).await,
                    None => {
                        warn!("Unauthenticated request rejected: {} {}", method, path);
                        unauthorized()
                    }
                },

                RouteKind::Area(h) => match authenticated_context(&req) {
                    Some(ctx) => match policy::authorize_path(ctx.role(), area_path(&path)) {
                        AreaDecision::Allow => h(req, state, ctx).await,
                        AreaDecision::WrongRole { home } => {
                            warn!(
                                "User {:?} ({:?}) denied {} {}; home is {}",
                                ctx.user_id,
                                ctx.role(),
                                method,
                                path,
                                home
                            );
                            forbidden()
                        }
                    },
                    None => {
                        warn!("Unauthenticated request rejected: {} {}", method, path);
                        unauthorized()
                    }
                },
            };
        }

        deliver_error_json("NOT_FOUND", "Endpoint not found", StatusCode::NOT_FOUND)
            .context("Failed to deliver 404 response")
    }

    // ── Path matching ─────────────────────────────────────────────────────────

    pub fn path_matches(route_path: &str, request_path: &str) -> bool {
        // Strip query string from incoming request path before comparing.
        let clean = request_path.split('?').next().unwrap_or(request_path);

        // Exact match.
        if route_path == clean {
            return true;
        }

        // Segment-by-segment matching for `:param` wildcards.
        // e.g.  "/api/admin/users/:id"  matches  "/api/admin/users/42"
        let route_segs: Vec<&str> = route_path.split('/').collect();
        let path_segs: Vec<&str> = clean.split('/').collect();

        if route_segs.len() != path_segs.len() {
            return false;
        }

        route_segs
            .iter()
            .zip(path_segs.iter())
            .all(|(r, p)| r.starts_with(':') || r == p)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The caller's context, if the access middleware resolved a user id.
fn authenticated_context(req: &ApiRequest) -> Option<AccessContext> {
    req.extensions()
        .get::<AccessContext>()
        .filter(|ctx| ctx.is_authenticated())
        .cloned()
}

/// API paths mirror the UI trees under an `/api` prefix.
fn area_path(path: &str) -> &str {
    path.strip_prefix("/api").unwrap_or(path)
}

fn unauthorized() -> Result<ApiResponse> {
    deliver_error_json(
        "UNAUTHORIZED",
        "Authentication required",
        StatusCode::UNAUTHORIZED,
    )
    .context("Failed to deliver 401 response")
}

fn forbidden() -> Result<ApiResponse> {
    deliver_error_json(
        "FORBIDDEN",
        "Insufficient privileges",
        StatusCode::FORBIDDEN,
    )
    .context("Failed to deliver 403 response")
}

async fn health(_req: ApiRequest, _state: AppState) -> Result<ApiResponse> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(utils::full(r#"{"status":"success","health":"ok"}"#))
        .context("Failed to build health response")
}

// ---------------------------------------------------------------------------
// API router
//
// Authorization is enforced here at the routing level; handlers receive the
// verified context and must not repeat the check.
// ---------------------------------------------------------------------------

pub fn build_api_router() -> Router {
    Router::new()
        // ── Public ───────────────────────────────────────────────────────────
        .get("/health", health)
        .post("/api/auth/login", auth::handle_login)
        .post("/api/auth/logout", auth::handle_logout)
        .post("/api/superadmin/login", auth::superadmin_login::handle_login)
        // ── Any authenticated caller ─────────────────────────────────────────
        .get_auth("/api/session", session::handle_get_session)
        // ── Super-admin tree ─────────────────────────────────────────────────
        .get_area("/api/admin/users", admin::handle_list_users)
        // ── Regular-user tree ────────────────────────────────────────────────
        .get_area("/api/user/project", user::handle_get_project)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_path_matches() {
        assert!(Router::path_matches("/api/session", "/api/session"));
    }

    #[test]
    fn different_paths_do_not_match() {
        assert!(!Router::path_matches("/api/session", "/api/settings"));
    }

    #[test]
    fn trailing_slash_does_not_match_without_slash() {
        assert!(!Router::path_matches("/api/session", "/api/session/"));
    }

    #[test]
    fn wildcard_segment_matches_numeric_id() {
        assert!(Router::path_matches("/api/admin/users/:id", "/api/admin/users/42"));
    }

    #[test]
    fn wildcard_does_not_match_extra_segments() {
        assert!(!Router::path_matches(
            "/api/admin/users/:id",
            "/api/admin/users/42/roles"
        ));
    }

    #[test]
    fn query_string_stripped_before_match() {
        assert!(Router::path_matches("/api/admin/users", "/api/admin/users?page=2"));
    }

    #[test]
    fn area_path_strips_api_prefix() {
        assert_eq!(area_path("/api/admin/users"), "/admin/users");
        assert_eq!(area_path("/health"), "/health");
    }

    #[test]
    fn router_new_has_no_routes() {
        assert!(Router::new().routes.is_empty());
    }

    #[test]
    fn api_router_registers_each_tier() {
        let r = build_api_router();
        let kind_of = |path: &str| {
            r.routes
                .iter()
                .find(|route| route.path == path)
                .map(|route| match route.kind {
                    RouteKind::Open(_) => "open",
                    RouteKind::Authenticated(_) => "auth",
                    RouteKind::Area(_) => "area",
                })
        };
        assert_eq!(kind_of("/api/auth/login"), Some("open"));
        assert_eq!(kind_of("/api/superadmin/login"), Some("open"));
        assert_eq!(kind_of("/api/session"), Some("auth"));
        assert_eq!(kind_of("/api/admin/users"), Some("area"));
        assert_eq!(kind_of("/api/user/project"), Some("area"));
    }
}
