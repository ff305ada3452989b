use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use hyper::Request;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::access::{ActivityStore, Principal};
use crate::database::get_timestamp;

/// Tower layer that stamps the caller's "last activity" time.
///
/// One write per authenticated request, awaited before the request moves
/// on.  The write is best-effort: a failure is logged and the request
/// proceeds exactly as if it had succeeded.  Concurrent requests for the
/// same user race and the last write wins.
#[derive(Clone)]
pub struct ActivityLayer {
    store: Arc<dyn ActivityStore>,
}

impl ActivityLayer {
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }
}

impl<S> Layer<S> for ActivityLayer {
    type Service = ActivityService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ActivityService {
            inner,
            store: self.store.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ActivityService<S> {
    inner: S,
    store: Arc<dyn ActivityStore>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for ActivityService<S>
where
    S: Service<Request<ReqBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let username = req
            .extensions()
            .get::<Principal>()
            .map(|p| p.name.clone());
        let store = self.store.clone();

        Box::pin(async move {
            if let Some(username) = username {
                match store.touch(&username, get_timestamp()).await {
                    Ok(0) => debug!("No user row to stamp activity for {}", username),
                    Ok(_) => debug!("Stamped activity for {}", username),
                    Err(e) => warn!("Failed to record activity for {}: {:#}", username, e),
                }
            }

            inner.call(req).await
        })
    }
}
