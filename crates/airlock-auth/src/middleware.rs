//! Tower middleware that guards a whole router subtree.
//!
//! `RequireAuthLayer` and `RequireAuthService` apply [`require_auth`] to
//! every request before it reaches the inner service.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::response::IntoResponse;
use http::Request;
use tower::{Layer, Service};

use crate::guard::{Guarded, fault_response, require_auth};
use crate::Airlock;

/// Tower `Layer` that requires authentication for every request.
#[derive(Clone)]
pub struct RequireAuthLayer {
    airlock: Airlock,
}

impl RequireAuthLayer {
    pub fn new(airlock: Airlock) -> Self {
        Self { airlock }
    }
}

impl<S> Layer<S> for RequireAuthLayer {
    type Service = RequireAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireAuthService {
            inner,
            airlock: self.airlock.clone(),
        }
    }
}

/// Tower `Service` that resolves authentication before forwarding.
///
/// Signed-in requests get their [`Identity`](crate::Identity) inserted into
/// request extensions. Signed-out requests are answered with a 303 to login
/// and never reach the inner service.
#[derive(Clone)]
pub struct RequireAuthService<S> {
    inner: S,
    airlock: Airlock,
}

impl<S> Service<Request<Body>> for RequireAuthService<S>
where
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let airlock = self.airlock.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();

            let guarded = match airlock.normalize_parts(&parts, Bytes::new()) {
                Ok(normalized) => require_auth(&airlock, &normalized).await,
                Err(err) => Err(err),
            };

            match guarded {
                Ok(Guarded::Authenticated(identity)) => {
                    let mut req = Request::from_parts(parts, body);
                    req.extensions_mut().insert(identity);
                    let resp = inner
                        .call(req)
                        .await
                        .unwrap_or_else(|infallible| match infallible {});
                    Ok(resp.into_response())
                }
                Ok(Guarded::RedirectRequired(redirect)) => Ok(redirect.into_response()),
                Err(err) => Ok(fault_response(&err)),
            }
        })
    }
}
