use std::sync::Arc;
use std::task::{Context, Poll};

use hyper::Request;
use tower::{Layer, Service};
use tracing::debug;

use crate::access::{Principal, TokenKeys};
use crate::handlers::http::utils::extract_session_token;

/// Tower layer that turns a bearer token or `auth_id` cookie into a
/// [`Principal`] request extension.
///
/// Never rejects: a missing or invalid token leaves the request anonymous
/// and the router decides what anonymous callers may reach.
#[derive(Clone)]
pub struct AuthenticationLayer {
    keys: Arc<TokenKeys>,
}

impl AuthenticationLayer {
    pub fn new(keys: Arc<TokenKeys>) -> Self {
        Self { keys }
    }
}

impl<S> Layer<S> for AuthenticationLayer {
    type Service = AuthenticationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthenticationService {
            inner,
            keys: self.keys.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthenticationService<S> {
    inner: S,
    keys: Arc<TokenKeys>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for AuthenticationService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        if let Some(token) = extract_session_token(req.headers()) {
            match self.keys.decode(&token) {
                Ok(claims) => {
                    let principal = Principal::from_claims(claims);
                    debug!("Authenticated request from {}", principal.name);
                    req.extensions_mut().insert(principal);
                }
                Err(e) => {
                    debug!("Ignoring invalid token on {}: {:#}", req.uri().path(), e);
                }
            }
        }

        self.inner.call(req)
    }
}
