/// Browser hardening headers
///
/// A small tower layer that stamps the usual OWASP response headers onto
/// everything the API sends. The API serves JSON only, so the CSP is as
/// strict as it gets and frame embedding is denied outright. HSTS is tied
/// to the production flag because it would pin plain-HTTP dev setups.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    response::Response,
};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Writes the security header set into `headers`
///
/// `hsts` adds Strict-Transport-Security on top of the base set.
fn apply_security_headers(headers: &mut HeaderMap, hsts: bool) {
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-XSS-Protection",
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("default-src 'self'; frame-ancestors 'none'"),
    );

    if hsts {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }
}

/// Layer that wraps a service in [`SecurityHeadersService`]
#[derive(Debug, Clone, Copy)]
pub struct SecurityHeadersLayer {
    hsts: bool,
}

impl SecurityHeadersLayer {
    /// `enable_hsts` should be true only for HTTPS deployments
    pub fn new(enable_hsts: bool) -> Self {
        Self { hsts: enable_hsts }
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersService {
            inner,
            hsts: self.hsts,
        }
    }
}

/// Service that adds the security headers to each outgoing response
#[derive(Debug, Clone)]
pub struct SecurityHeadersService<S> {
    inner: S,
    hsts: bool,
}

impl<S> Service<Request> for SecurityHeadersService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let hsts = self.hsts;
        let future = self.inner.call(request);

        Box::pin(async move {
            let mut response = future.await?;
            apply_security_headers(response.headers_mut(), hsts);
            Ok(response)
        })
    }
}
