//! ITAMS HTTP server.
//!
//! Requests pass through a tower stack before reaching the router:
//!
//! ```text
//! Timeout → Authentication → Activity → AccessContext → Router
//! ```
//!
//! Authentication turns a verified JWT into a [`access::Principal`], the
//! activity layer stamps the caller's last-seen time, and the access layer
//! resolves a [`shared::types::AccessContext`] that the router checks
//! against the path.

pub mod access;
pub mod database;
pub mod handlers;
pub mod tower_middle;

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use shared::types::server_config::AppConfig;
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower::util::BoxCloneService;

use access::{
    AccessControlService, ActivityStore, SqlAccessControl, SqlActivityStore, TokenKeys,
};
use handlers::http::routes::Router;
use handlers::http::{ApiRequest, ApiResponse};
use tower_middle::{AccessContextLayer, ActivityLayer, AuthenticationLayer, TimeoutLayer};

/// Everything a handler or middleware needs, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: SqlitePool,
    pub tokens: Arc<TokenKeys>,
    pub access: Arc<dyn AccessControlService>,
    pub activity: Arc<dyn ActivityStore>,
}

impl AppState {
    /// State backed by `db` for both access lookups and activity writes.
    pub fn new(config: AppConfig, db: SqlitePool, jwt_secret: &str) -> Self {
        Self {
            config: Arc::new(config),
            tokens: Arc::new(TokenKeys::from_secret(jwt_secret)),
            access: Arc::new(SqlAccessControl::new(db.clone())),
            activity: Arc::new(SqlActivityStore::new(db.clone())),
            db,
        }
    }

    pub fn with_access(mut self, access: Arc<dyn AccessControlService>) -> Self {
        self.access = access;
        self
    }

    pub fn with_activity(mut self, activity: Arc<dyn ActivityStore>) -> Self {
        self.activity = activity;
        self
    }
}

/// The full request pipeline as one cloneable service.
pub type ApiService = BoxCloneService<ApiRequest, ApiResponse, Infallible>;

/// Wrap `router` in the middleware stack configured by `config`.
pub fn build_service(state: AppState, router: Arc<Router>, config: &AppConfig) -> ApiService {
    let timeout = Duration::from_secs(config.server.request_timeout_secs);
    let bypass = config.access.bypass_prefixes.clone();

    let endpoint = {
        let state = state.clone();
        tower::service_fn(move |req: ApiRequest| {
            let router = router.clone();
            let state = state.clone();
            async move { Ok::<_, Infallible>(router.dispatch(req, state).await) }
        })
    };

    let svc = ServiceBuilder::new()
        .layer(TimeoutLayer::new(timeout))
        .layer(AuthenticationLayer::new(state.tokens.clone()))
        .layer(ActivityLayer::new(state.activity.clone()))
        .layer(AccessContextLayer::new(state.access.clone(), bypass))
        .service(endpoint);

    BoxCloneService::new(svc)
}
