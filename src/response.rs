//! HTTP response wrapper.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::cookie::Cookie;
use crate::error::{Error, Result};
use crate::transport::TransportResponse;

/// A fully-read HTTP response.
#[derive(Debug)]
pub struct Response {
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    cookies: Vec<Cookie>,
}

impl Response {
    pub(crate) fn from_transport(response: TransportResponse) -> Self {
        Self {
            url: response.url,
            status: response.status,
            headers: response.headers,
            body: response.body,
            cookies: response.cookies,
        }
    }

    /// The final URL, after any redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether the response was successful (2xx).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Whether the response was a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Whether the response was a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A specific header value, if present and valid UTF-8.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// The content type, if declared.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// The declared content length, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length").and_then(|v| v.parse().ok())
    }

    /// The response body as bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Consume the response and return the body bytes.
    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// The response body as text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Cookies set by this response.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// A response cookie by exact name.
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }
}
