use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use hyper::{Request, Response, StatusCode};
use shared::types::AccessContext;
use tower::{Layer, Service};
use tracing::{debug, error};

use crate::access::{AccessControlService, Principal, resolve_context};

/// Tower layer that resolves the caller's [`AccessContext`] and stores it in
/// the request extensions for downstream handlers.
///
/// Requests under a bypass prefix (the login endpoints) go straight to the
/// inner service.  Every other request gets a context, empty when the caller
/// is anonymous or its claims did not parse.  This layer never denies
/// access; the router enforces.
#[derive(Clone)]
pub struct AccessContextLayer {
    service: Arc<dyn AccessControlService>,
    bypass: Arc<[String]>,
}

impl AccessContextLayer {
    pub fn new(service: Arc<dyn AccessControlService>, bypass_prefixes: Vec<String>) -> Self {
        let bypass = bypass_prefixes
            .into_iter()
            .map(|p| p.trim_end_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>();

        Self {
            service,
            bypass: bypass.into(),
        }
    }
}

impl<S> Layer<S> for AccessContextLayer {
    type Service = AccessContextService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessContextService {
            inner,
            service: self.service.clone(),
            bypass: self.bypass.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AccessContextService<S> {
    inner: S,
    service: Arc<dyn AccessControlService>,
    bypass: Arc<[String]>,
}

/// Segment-aware, case-insensitive prefix match: `/api/auth` matches
/// `/api/auth` and `/api/auth/login` but not `/api/authors`.
pub fn is_bypassed(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        let prefix = prefix.trim_end_matches('/');
        match path.get(..prefix.len()) {
            Some(head) if head.eq_ignore_ascii_case(prefix) => {
                let rest = &path[prefix.len()..];
                rest.is_empty() || rest.starts_with('/')
            }
            _ => false,
        }
    })
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AccessContextService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        // Hand the polled-ready service to the future, keep a fresh clone.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        if is_bypassed(req.uri().path(), &self.bypass) {
            return Box::pin(inner.call(req));
        }

        let principal = req.extensions().get::<Principal>().cloned();
        let service = self.service.clone();

        Box::pin(async move {
            let ctx = match principal {
                Some(principal) => match resolve_context(service.as_ref(), &principal).await {
                    Ok(ctx) => ctx,
                    Err(e) => {
                        error!(
                            "Access context lookup failed for {} on {}: {:#}",
                            principal.name,
                            req.uri().path(),
                            e
                        );
                        let mut response = Response::new(ResBody::default());
                        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                        return Ok(response);
                    }
                },
                None => AccessContext::default(),
            };

            debug!(
                user_id = ?ctx.user_id,
                role_id = ?ctx.role_id,
                is_super_admin = ?ctx.is_super_admin,
                project_id = ?ctx.project_id,
                "Access context for {}",
                req.uri().path()
            );

            req.extensions_mut().insert(ctx);
            inner.call(req).await
        })
    }
}
