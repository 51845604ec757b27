//! Production transport backed by the `wreq` fingerprinting client.

use std::time::Duration;

use async_trait::async_trait;
use http::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, SET_COOKIE};
use parking_lot::RwLock;
use tracing::trace;
use url::Url;
use wreq_util::Emulation;

use super::{Transport, TransportRequest, TransportResponse};
use crate::cookie::{Cookie, CookieJar};
use crate::error::{Error, Result};

/// Transport that emulates a real browser's TLS and HTTP/2 fingerprint.
///
/// Cookie storage is a manual jar owned by this transport: `Set-Cookie`
/// response headers are ingested after every perform, and a `Cookie`
/// header is synthesized from the jar when the caller supplies none.
/// Changing the proxy rebuilds the inner client with the same profile,
/// timeout, and jar.
pub struct EmulatedTransport {
    client: wreq::Client,
    jar: RwLock<CookieJar>,
    profile: Emulation,
    timeout: Duration,
}

impl EmulatedTransport {
    /// Build a transport for the given browser profile and per-request
    /// timeout.
    pub fn new(profile: Emulation, timeout: Duration) -> Result<Self> {
        let client = build_client(profile, timeout, None)?;
        Ok(Self {
            client,
            jar: RwLock::new(CookieJar::new()),
            profile,
            timeout,
        })
    }

    /// The emulation profile this transport presents.
    pub fn profile(&self) -> Emulation {
        self.profile
    }
}

fn build_client(
    profile: Emulation,
    timeout: Duration,
    proxy: Option<&Url>,
) -> Result<wreq::Client> {
    let mut builder = wreq::Client::builder().emulation(profile).timeout(timeout);
    if let Some(proxy) = proxy {
        let proxy =
            wreq::Proxy::all(proxy.as_str()).map_err(|e| Error::InvalidProxy(e.to_string()))?;
        builder = builder.proxy(proxy);
    }
    builder.build().map_err(|e| Error::Transport(e.to_string()))
}

#[async_trait]
impl Transport for EmulatedTransport {
    async fn perform(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut headers = HeaderMap::new();
        let mut has_cookie_header = false;
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::RequestConstruction(e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::RequestConstruction(e.to_string()))?;
            has_cookie_header |= name == COOKIE;
            headers.append(name, value);
        }
        if !has_cookie_header
            && let Some(cookie_line) = self.jar.read().header_for(&request.url)
        {
            let value = HeaderValue::from_str(&cookie_line)
                .map_err(|e| Error::RequestConstruction(e.to_string()))?;
            headers.append(COOKIE, value);
        }

        trace!(method = %request.method, url = %request.url, "dispatching");

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str())
            .headers(headers);
        if let Some(body) = request.body.clone() {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let final_url = Url::parse(&response.url().to_string())
            .unwrap_or_else(|_| request.url.clone());

        let cookies: Vec<Cookie> = response_headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| Cookie::parse_set_cookie(value, &final_url).ok())
            .collect();
        if !cookies.is_empty() {
            let mut jar = self.jar.write();
            for cookie in &cookies {
                jar.store_for(&final_url, cookie.clone());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(TransportResponse {
            url: final_url,
            status,
            headers: response_headers,
            body,
            cookies,
        })
    }

    fn cookies_for(&self, url: &Url) -> Vec<Cookie> {
        self.jar.read().matching(url)
    }

    fn store_cookies(&self, url: &Url, cookies: &[Cookie]) {
        let mut jar = self.jar.write();
        for cookie in cookies {
            jar.store_for(url, cookie.clone());
        }
    }

    fn clear_cookie_store(&self) {
        *self.jar.write() = CookieJar::new();
    }

    fn set_proxy(&mut self, proxy: &Url) -> Result<()> {
        self.client = build_client(self.profile, self.timeout, Some(proxy))?;
        Ok(())
    }
}
