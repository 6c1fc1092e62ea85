//! Service URL providers for resource link construction
//!
//! The registry never knows the base URL itself; it asks its provider at
//! link-construction time. Deployments behind a fixed hostname use
//! [`ConstantServiceUrlProvider`]; deployments that must echo whatever host
//! the client reached use [`RequestUrlProvider`] together with
//! [`request_base_url_middleware`].

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

tokio::task_local! {
    static REQUEST_BASE_URL: String;
}

/// Source of the externally visible base URL.
pub trait ServiceUrlProvider: Send + Sync {
    /// The currently applicable base URL
    fn url(&self) -> String;
}

/// Fixed base URL, set once from configuration.
#[derive(Debug, Clone)]
pub struct ConstantServiceUrlProvider {
    base_url: String,
}

impl ConstantServiceUrlProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl ServiceUrlProvider for ConstantServiceUrlProvider {
    fn url(&self) -> String {
        self.base_url.clone()
    }
}

impl From<&str> for ConstantServiceUrlProvider {
    fn from(base_url: &str) -> Self {
        Self::new(base_url)
    }
}

impl From<String> for ConstantServiceUrlProvider {
    fn from(base_url: String) -> Self {
        Self::new(base_url)
    }
}

/// Base URL derived from the incoming request.
///
/// Reads the task-local value installed by [`request_base_url_middleware`];
/// outside a request scope (bootstrap logging, background tasks) it falls
/// back to the configured default.
#[derive(Debug, Clone)]
pub struct RequestUrlProvider {
    fallback: String,
}

impl RequestUrlProvider {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }
}

impl ServiceUrlProvider for RequestUrlProvider {
    fn url(&self) -> String {
        REQUEST_BASE_URL
            .try_with(|url| url.clone())
            .unwrap_or_else(|_| self.fallback.clone())
    }
}

/// Middleware that makes the request's base URL visible to
/// [`RequestUrlProvider`] for the rest of the handler chain.
///
/// Scheme comes from `x-forwarded-proto` (defaulting to `http`), authority
/// from the `Host` header. Requests without a `Host` header run unscoped
/// and see the fallback.
pub async fn request_base_url_middleware(request: Request, next: Next) -> Response {
    match base_url_from_request(&request) {
        Some(base_url) => REQUEST_BASE_URL.scope(base_url, next.run(request)).await,
        None => next.run(request).await,
    }
}

fn base_url_from_request(request: &Request) -> Option<String> {
    let host = request.headers().get(header::HOST)?.to_str().ok()?;
    let proto = request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    Some(format!("{}://{}", proto, host))
}
