//! The external transport capability boundary.
//!
//! All TLS handshake emulation, fingerprint mimicry, and low-level
//! transmission live behind [`Transport`]; the session only issues these
//! calls and owns none of that machinery.

mod emulated;

pub use emulated::EmulatedTransport;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::cookie::Cookie;
use crate::error::Result;

/// A fully assembled transport-level request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute target URL.
    pub url: Url,
    /// Headers in transmission order, original casing.
    pub headers: Vec<(String, String)>,
    /// Encoded body, if any.
    pub body: Option<Bytes>,
}

/// What the transport hands back after reading the full response body.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// Final URL, after any redirects.
    pub url: Url,
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Full response body.
    pub body: Bytes,
    /// Cookies set by this response.
    pub cookies: Vec<Cookie>,
}

/// Capability interface over the external TLS-fingerprinting client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request and read the full response body.
    async fn perform(&self, request: TransportRequest) -> Result<TransportResponse>;

    /// Cookies the store would send to `url`.
    fn cookies_for(&self, url: &Url) -> Vec<Cookie>;

    /// Add cookies to the store for `url`.
    fn store_cookies(&self, url: &Url, cookies: &[Cookie]);

    /// Replace the cookie store with an empty one.
    fn clear_cookie_store(&self);

    /// Route subsequent requests through `proxy`. Syntactic acceptance
    /// only; nothing is contacted.
    fn set_proxy(&mut self, proxy: &Url) -> Result<()>;
}
