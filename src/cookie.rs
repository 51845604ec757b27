//! Cookie model and the manual jar owned by the transport.
//!
//! Storage is deliberately simple: no automatic cookie engine, no
//! persistence. The transport ingests `Set-Cookie` response headers into
//! the jar and synthesizes a `Cookie` header from it on the way out.

use std::collections::HashMap;
use std::fmt;

use url::Url;

use crate::error::{Error, Result};

/// `SameSite` cookie policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// Sent only for same-site requests.
    Strict,
    /// Sent for same-site requests and top-level navigations.
    Lax,
    /// Sent for all requests; requires `Secure`.
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("Strict"),
            Self::Lax => f.write_str("Lax"),
            Self::None => f.write_str("None"),
        }
    }
}

/// A cookie with its transport-level attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Domain the cookie applies to; filled from the request URL when stored
    /// without one.
    pub domain: String,
    /// Path prefix the cookie applies to.
    pub path: String,
    /// Only send over https.
    pub secure: bool,
    /// Hidden from script access.
    pub http_only: bool,
    /// `SameSite` policy, if any.
    pub same_site: Option<SameSite>,
    /// Lifetime in seconds, if bounded.
    pub max_age: Option<i64>,
}

impl Cookie {
    /// A bare `name=value` cookie with default attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            secure: false,
            http_only: false,
            same_site: None,
            max_age: None,
        }
    }

    /// Parse a `Set-Cookie` header value received for `request_url`.
    pub fn parse_set_cookie(header: &str, request_url: &Url) -> Result<Self> {
        let request_domain = request_url
            .host_str()
            .ok_or_else(|| Error::CookieParse("no host in request URL".to_string()))?;

        let mut parts = header.split(';').map(str::trim);
        let first = parts
            .next()
            .ok_or_else(|| Error::CookieParse("empty header".to_string()))?;
        let (name, value) = first
            .split_once('=')
            .ok_or_else(|| Error::CookieParse("missing `=` in cookie pair".to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyCookieName);
        }

        let mut cookie = Cookie::new(name, value.trim());
        cookie.domain = normalize_domain(request_domain);

        for attr in parts {
            if attr.eq_ignore_ascii_case("secure") {
                cookie.secure = true;
            } else if attr.eq_ignore_ascii_case("httponly") {
                cookie.http_only = true;
            } else if let Some((key, val)) = attr.split_once('=') {
                let val = val.trim();
                match key.trim().to_ascii_lowercase().as_str() {
                    "domain" => cookie.domain = normalize_domain(val),
                    "path" => cookie.path = val.to_string(),
                    "max-age" => cookie.max_age = val.parse().ok(),
                    "samesite" => cookie.same_site = parse_same_site(val),
                    _ => {}
                }
            }
        }
        Ok(cookie)
    }

    /// Whether the store would send this cookie to `url`.
    pub fn matches_url(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        if self.secure && url.scheme() != "https" {
            return false;
        }

        let host = host.to_ascii_lowercase();
        let domain = self.domain.to_ascii_lowercase();
        if host != domain && !host.ends_with(&format!(".{domain}")) {
            return false;
        }

        let request_path = url.path();
        request_path == self.path
            || request_path.starts_with(&format!("{}/", self.path.trim_end_matches('/')))
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Manual cookie jar keyed by domain, then by cookie name.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: HashMap<String, HashMap<String, Cookie>>,
}

impl CookieJar {
    /// An empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cookie received for (or targeted at) `url`, filling the
    /// domain from the URL host when the cookie carries none.
    pub fn store_for(&mut self, url: &Url, mut cookie: Cookie) {
        if cookie.name.trim().is_empty() {
            return;
        }
        if cookie.domain.is_empty() {
            let Some(host) = url.host_str() else { return };
            cookie.domain = normalize_domain(host);
        } else {
            cookie.domain = normalize_domain(&cookie.domain);
        }
        self.cookies
            .entry(cookie.domain.clone())
            .or_default()
            .insert(cookie.name.clone(), cookie);
    }

    /// Cookies the store would send to `url`, in storage order.
    pub fn matching(&self, url: &Url) -> Vec<Cookie> {
        self.cookies
            .values()
            .flat_map(|by_name| by_name.values())
            .filter(|c| c.matches_url(url))
            .cloned()
            .collect()
    }

    /// The `Cookie` request-header value for `url`, if any cookie matches.
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let matching = self.matching(url);
        if matching.is_empty() {
            return None;
        }
        Some(
            matching
                .iter()
                .map(Cookie::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Look up a cookie by domain and name.
    pub fn get(&self, domain: &str, name: &str) -> Option<&Cookie> {
        self.cookies.get(&normalize_domain(domain))?.get(name)
    }

    /// Drop every cookie.
    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Number of stored cookies.
    pub fn len(&self) -> usize {
        self.cookies.values().map(HashMap::len).sum()
    }

    /// Whether the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn normalize_domain(domain: &str) -> String {
    domain.strip_prefix('.').unwrap_or(domain).to_ascii_lowercase()
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    if value.eq_ignore_ascii_case("strict") {
        Some(SameSite::Strict)
    } else if value.eq_ignore_ascii_case("lax") {
        Some(SameSite::Lax)
    } else if value.eq_ignore_ascii_case("none") {
        Some(SameSite::None)
    } else {
        Option::None
    }
}
