//! The HTTP session: transport ownership, retry-driven request execution,
//! and cookie/proxy passthroughs.

use http::Method;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::body;
use crate::config::SessionConfig;
use crate::cookie::{Cookie, SameSite};
use crate::error::{Error, Result};
use crate::headers::{format_headers, HeaderDefaults};
use crate::request::RequestOptions;
use crate::response::Response;
use crate::retry::RetryPolicy;
use crate::transport::{EmulatedTransport, Transport, TransportRequest};
use crate::urls::build_url;

/// One year, the max-age applied by [`Session::set_cookie`].
const DEFAULT_COOKIE_MAX_AGE: i64 = 60 * 60 * 24 * 365;

/// An HTTP session backed by a TLS-fingerprinting transport.
///
/// The session owns its transport exclusively. Request execution borrows
/// `&self`; proxy changes and closing take `&mut self`, so shared use
/// across tasks needs external synchronization. After [`Session::close`]
/// every operation fails fast with [`Error::InvalidSession`].
pub struct Session {
    transport: Option<Box<dyn Transport>>,
    defaults: HeaderDefaults,
    retry: RetryPolicy,
}

/// Basic information about a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    /// Whether the session still owns a transport.
    pub valid: bool,
    /// Default User-Agent.
    pub user_agent: String,
    /// Default `sec-ch-ua` signature.
    pub sec_ch_ua: String,
    /// Default `sec-ch-ua-platform` signature.
    pub sec_ch_ua_platform: String,
    /// Configured retry budget.
    pub max_retries: u32,
}

impl Session {
    /// Create a session with an emulated browser transport.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let transport = EmulatedTransport::new(config.profile, config.timeout)?;
        debug!(
            profile = ?config.profile,
            max_retries = config.max_retries,
            "session created"
        );
        Ok(Self::with_transport(Box::new(transport), &config))
    }

    /// Create a session over a caller-supplied transport.
    pub fn with_transport(transport: Box<dyn Transport>, config: &SessionConfig) -> Self {
        Self {
            transport: Some(transport),
            defaults: HeaderDefaults {
                user_agent: config.user_agent.clone(),
                sec_ch_ua: config.sec_ch_ua.clone(),
                sec_ch_ua_platform: config.sec_ch_ua_platform.clone(),
            },
            retry: RetryPolicy::new(config.max_retries),
        }
    }

    /// Whether the session still owns a usable transport.
    pub fn is_valid(&self) -> bool {
        self.transport.is_some()
    }

    /// Basic information about this session.
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            valid: self.is_valid(),
            user_agent: self.defaults.user_agent.clone(),
            sec_ch_ua: self.defaults.sec_ch_ua.clone(),
            sec_ch_ua_platform: self.defaults.sec_ch_ua_platform.clone(),
            max_retries: self.retry.max_attempts,
        }
    }

    fn transport(&self) -> Result<&dyn Transport> {
        self.transport.as_deref().ok_or(Error::InvalidSession)
    }

    /// Perform a GET request.
    pub async fn get(&self, request: RequestOptions) -> Result<Response> {
        self.execute(Method::GET, request).await
    }

    /// Perform a POST request.
    pub async fn post(&self, request: RequestOptions) -> Result<Response> {
        self.execute(Method::POST, request).await
    }

    /// Perform a PUT request.
    pub async fn put(&self, request: RequestOptions) -> Result<Response> {
        self.execute(Method::PUT, request).await
    }

    /// Perform a DELETE request.
    pub async fn delete(&self, request: RequestOptions) -> Result<Response> {
        self.execute(Method::DELETE, request).await
    }

    /// Perform a PATCH request.
    pub async fn patch(&self, request: RequestOptions) -> Result<Response> {
        self.execute(Method::PATCH, request).await
    }

    /// Perform a HEAD request.
    pub async fn head(&self, request: RequestOptions) -> Result<Response> {
        self.execute(Method::HEAD, request).await
    }

    /// Perform an OPTIONS request.
    pub async fn options(&self, request: RequestOptions) -> Result<Response> {
        self.execute(Method::OPTIONS, request).await
    }

    /// Execute a request with the session's retry policy.
    ///
    /// Validation and assembly failures return immediately; only failures
    /// reported by the transport enter the retry loop, and the loop
    /// retries them uniformly regardless of cause.
    pub async fn execute(&self, method: Method, request: RequestOptions) -> Result<Response> {
        let transport = self.transport()?;

        if request.url.trim().is_empty() {
            return Err(Error::EmptyUrl);
        }
        let url = build_url(&request.url, &request.params)?;
        let encoded = body::encode(&request.headers, request.body.as_ref())?;

        let mut headers = request.headers.clone();
        // Only multipart may clobber a caller-supplied content type: the
        // encoded value carries the generated boundary.
        if let Some(encoded) = &encoded
            && encoded.content_type.contains(body::MULTIPART_FORM_DATA)
        {
            overwrite_content_type(&mut headers, &encoded.content_type);
        }
        let headers = format_headers(&self.defaults, &headers)?;

        let assembled = TransportRequest {
            method,
            url,
            headers,
            body: encoded.map(|e| e.bytes),
        };

        self.execute_with_retry(transport, assembled).await
    }

    async fn execute_with_retry(
        &self,
        transport: &dyn Transport,
        request: TransportRequest,
    ) -> Result<Response> {
        let attempts = self.retry.effective_attempts();
        let mut last_error: Option<Error> = None;

        for attempt in 0..attempts {
            match transport.perform(request.clone()).await {
                Ok(response) => return Ok(Response::from_transport(response)),
                Err(error) => {
                    if error.is_transient() {
                        debug!(attempt = attempt + 1, error = %error, "attempt failed");
                    } else {
                        warn!(attempt = attempt + 1, error = %error, "attempt failed");
                    }
                    last_error = Some(error);
                    if attempt + 1 < attempts {
                        let delay = self.retry.delay_for_attempt(attempt);
                        debug!(?delay, "backing off before retry");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        warn!(attempts, url = %request.url, "retry budget exhausted");
        Err(Error::RetriesExhausted {
            attempts,
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string()),
        })
    }

    /// Set a cookie with the session defaults: one-year max-age, HttpOnly,
    /// Secure on https targets, SameSite=None.
    pub fn set_cookie(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
        url: &Url,
    ) -> Result<()> {
        let transport = self.transport()?;
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::EmptyCookieName);
        }
        let cookie = Cookie {
            secure: url.scheme() == "https",
            http_only: true,
            same_site: Some(SameSite::None),
            max_age: Some(DEFAULT_COOKIE_MAX_AGE),
            ..Cookie::new(name, value)
        };
        transport.store_cookies(url, &[cookie]);
        Ok(())
    }

    /// Set a cookie with fully custom attributes.
    pub fn set_cookie_with(&self, cookie: Cookie, url: &Url) -> Result<()> {
        let transport = self.transport()?;
        if cookie.name.trim().is_empty() {
            return Err(Error::EmptyCookieName);
        }
        transport.store_cookies(url, &[cookie]);
        Ok(())
    }

    /// All cookies the store would send to `url`, skipping nameless
    /// entries.
    pub fn get_cookies(&self, url: &Url) -> Result<Vec<Cookie>> {
        let cookies = self.transport()?.cookies_for(url);
        Ok(cookies
            .into_iter()
            .filter(|cookie| !cookie.name.trim().is_empty())
            .collect())
    }

    /// Look up a cookie by exact name. First match wins; ordering follows
    /// the transport's storage order.
    pub fn get_cookie(&self, name: &str, url: &Url) -> Result<Option<Cookie>> {
        let transport = self.transport()?;
        if name.trim().is_empty() {
            return Ok(None);
        }
        Ok(transport
            .cookies_for(url)
            .into_iter()
            .find(|cookie| cookie.name == name))
    }

    /// Replace the transport's cookie store with an empty one.
    pub fn clear_cookies(&self) -> Result<()> {
        self.transport()?.clear_cookie_store();
        Ok(())
    }

    /// Route subsequent requests through a proxy. The URL is validated
    /// syntactically only; no connectivity check is made.
    pub fn set_proxy(&mut self, proxy: &str) -> Result<()> {
        let transport = self.transport.as_deref_mut().ok_or(Error::InvalidSession)?;
        if proxy.trim().is_empty() {
            return Err(Error::InvalidProxy("proxy URL cannot be empty".to_string()));
        }
        let proxy = Url::parse(proxy).map_err(|e| Error::InvalidProxy(e.to_string()))?;
        transport.set_proxy(&proxy)
    }

    /// Close the session: best-effort cookie clear, then release of the
    /// transport handle. Idempotent. Every later operation fails with
    /// [`Error::InvalidSession`].
    pub fn close(&mut self) -> Result<()> {
        if let Some(transport) = self.transport.take() {
            transport.clear_cookie_store();
            debug!("session closed");
        }
        Ok(())
    }
}

fn overwrite_content_type(headers: &mut Vec<(String, String)>, content_type: &str) {
    match headers
        .iter_mut()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
    {
        Some((_, value)) => *value = content_type.to_string(),
        None => headers.push(("content-type".to_string(), content_type.to_string())),
    }
}
