//! Per-call request options.

use crate::body::Body;

/// Options for a single request.
///
/// A value object: immutable once handed to the session, with no identity
/// beyond the call. Headers and query parameters keep their insertion
/// order; header casing is preserved for transmission.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Target URL. Required and non-empty.
    pub url: String,
    /// Headers in transmission order, original casing.
    pub headers: Vec<(String, String)>,
    /// Optional body payload.
    pub body: Option<Body>,
    /// Extra query parameters merged into the URL.
    pub params: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options targeting `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Append a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append multiple headers, keeping their order.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the body payload.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append an extra query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Append multiple extra query parameters.
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_accumulates_in_order() {
        let options = RequestOptions::new("https://example.com/")
            .header("b", "2")
            .header("a", "1")
            .param("x", "10")
            .body(json!({"k": "v"}));

        assert_eq!(options.url, "https://example.com/");
        assert_eq!(
            options.headers,
            vec![("b".to_string(), "2".to_string()), ("a".to_string(), "1".to_string())]
        );
        assert_eq!(options.params, vec![("x".to_string(), "10".to_string())]);
        assert_eq!(options.body, Some(Body::Json(json!({"k": "v"}))));
    }

    #[test]
    fn test_bulk_setters() {
        let options = RequestOptions::new("https://example.com/")
            .headers([("a", "1"), ("b", "2")])
            .params([("q", "rust")]);
        assert_eq!(options.headers.len(), 2);
        assert_eq!(options.params.len(), 1);
    }
}
