use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use hyper::{Request, Response, StatusCode};
use tokio::time;
use tower::{Layer, Service};

/// Tower layer for request timeouts
///
/// If the inner service does not respond within the configured
/// duration, a 408 Request Timeout response is returned.
#[derive(Clone)]
pub struct TimeoutLayer {
    duration: Duration,
}

impl TimeoutLayer {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl<S> Layer<S> for TimeoutLayer {
    type Service = TimeoutService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TimeoutService {
            inner,
            duration: self.duration,
        }
    }
}

/// The actual timeout service
#[derive(Clone)]
pub struct TimeoutService<S> {
    inner: S,
    duration: Duration,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for TimeoutService<S>
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

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let duration = self.duration;
        let path = req.uri().path().to_string();
        let fut = self.inner.call(req);

        Box::pin(async move {
            match time::timeout(duration, fut).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("Request to {} timed out after {:?}", path, duration);

                    let mut response = Response::new(ResBody::default());
                    *response.status_mut() = StatusCode::REQUEST_TIMEOUT;
                    Ok(response)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::Full;
    use std::convert::Infallible;
    use tower::ServiceExt;

    async fn slow(_req: Request<Full<Bytes>>) -> Result<Response<Full<Bytes>>, Infallible> {
        time::sleep(Duration::from_secs(5)).await;
        Ok(Response::new(Full::from("late")))
    }

    async fn fast(_req: Request<Full<Bytes>>) -> Result<Response<Full<Bytes>>, Infallible> {
        Ok(Response::new(Full::from("ok")))
    }

    #[tokio::test]
    async fn slow_handler_gets_408() {
        let svc = TimeoutLayer::new(Duration::from_millis(50)).layer(tower::service_fn(slow));
        let res = svc.oneshot(Request::new(Full::default())).await.unwrap();
        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn fast_handler_passes_through() {
        let svc = TimeoutLayer::new(Duration::from_secs(1)).layer(tower::service_fn(fast));
        let res = svc.oneshot(Request::new(Full::default())).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
