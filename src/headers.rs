//! Ordered header formatting with session defaults.
//!
//! The transport transmits headers in the order supplied, and header
//! order is part of a browser fingerprint. Insertion order and original
//! key casing are a hard contract here, not cosmetics.

use crate::error::{Error, Result};

/// Value callers may pass to request the session default for a reserved
/// header. An empty value does the same.
pub const DEFAULT_SENTINEL: &str = "default";

/// Session default values substituted for the reserved headers.
#[derive(Debug, Clone)]
pub struct HeaderDefaults {
    /// Substituted for `user-agent`.
    pub user_agent: String,
    /// Substituted for `sec-ch-ua`.
    pub sec_ch_ua: String,
    /// Substituted for `sec-ch-ua-platform`.
    pub sec_ch_ua_platform: String,
}

/// Format a caller-supplied header list for transmission.
///
/// Keys are lower-cased only to match the three reserved names; the
/// original casing and insertion order pass through untouched. A blank
/// key is a hard failure, not a skip.
pub fn format_headers(
    defaults: &HeaderDefaults,
    headers: &[(String, String)],
) -> Result<Vec<(String, String)>> {
    let mut formatted = Vec::with_capacity(headers.len());
    for (key, value) in headers {
        if key.trim().is_empty() {
            return Err(Error::EmptyHeaderKey);
        }
        let wants_default = value.is_empty() || value == DEFAULT_SENTINEL;
        let value = match key.to_ascii_lowercase().as_str() {
            "user-agent" if wants_default => defaults.user_agent.clone(),
            "sec-ch-ua" if wants_default => defaults.sec_ch_ua.clone(),
            "sec-ch-ua-platform" if wants_default => defaults.sec_ch_ua_platform.clone(),
            _ => value.clone(),
        };
        formatted.push((key.clone(), value));
    }
    Ok(formatted)
}
