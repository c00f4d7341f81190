use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tower::Layer;
use tower::Service;

use super::authorizer::Authorizer;

/// Middleware layer that requires a permission tag on the bearer token.
///
/// On success the verified [`ClaimSet`](super::ClaimSet) is inserted into
/// the request extensions before the inner service runs.
#[derive(Clone)]
pub struct RequirePermission {
    authorizer: Arc<Authorizer>,
    permission: Arc<str>,
}

impl RequirePermission {
    pub fn new(authorizer: Arc<Authorizer>, permission: &str) -> Self {
        Self {
            authorizer,
            permission: Arc::from(permission),
        }
    }
}

impl<S> Layer<S> for RequirePermission {
    type Service = RequirePermissionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePermissionMiddleware {
            inner,
            authorizer: self.authorizer.clone(),
            permission: self.permission.clone(),
        }
    }
}

#[derive(Clone)]
pub struct RequirePermissionMiddleware<S> {
    inner: S,
    authorizer: Arc<Authorizer>,
    permission: Arc<str>,
}

impl<S> Service<Request> for RequirePermissionMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        // The clone may not be ready; keep the polled service for this call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let authorizer = self.authorizer.clone();
        let permission = self.permission.clone();

        Box::pin(async move {
            let outcome = authorizer.authorize(&permission, request.headers()).await;
            match outcome {
                Ok(claims) => {
                    tracing::debug!(permission = %permission, subject = ?claims.subject(), "Request authorized");
                    request.extensions_mut().insert(claims);
                    inner.call(request).await
                }
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}
