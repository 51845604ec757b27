//! Request body encoding driven by the declared or inferred content type.

use std::fmt::Write as _;

use bytes::Bytes;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;

use crate::error::{Error, Result};

/// Content type handled by the form encoder.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
/// Content type handled by the plain-text encoder.
pub const TEXT_PLAIN: &str = "text/plain";
/// Content type handled by the multipart encoder.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
/// Content type handled by the default JSON encoder.
pub const APPLICATION_JSON: &str = "application/json";

/// A request body payload.
///
/// One variant per shape the encoders accept: raw text, a flat
/// string-to-string mapping, or an arbitrary JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Raw text.
    Text(String),
    /// Flat key/value fields, in insertion order.
    Form(Vec<(String, String)>),
    /// An arbitrary JSON value.
    Json(Value),
}

impl Body {
    /// Build a form body from key/value pairs, preserving order.
    pub fn form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// An encoded body plus the content type it was encoded as.
///
/// The content type can differ from the declared one: multipart encoding
/// generates a boundary-bearing value that must replace the caller's.
#[derive(Debug, Clone)]
pub struct EncodedBody {
    /// The serialized body.
    pub bytes: Bytes,
    /// The content type the body was actually encoded as.
    pub content_type: String,
}

/// Resolve the content type from `headers` and encode `body` accordingly.
///
/// With no declared content type, a text body infers `text/plain` and
/// anything else infers JSON. Dispatch checks content-type substrings in
/// fixed priority order: form-urlencoded, plain text, multipart, then
/// JSON as the default.
pub fn encode(headers: &[(String, String)], body: Option<&Body>) -> Result<Option<EncodedBody>> {
    let Some(body) = body else {
        return Ok(None);
    };

    let declared = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty());

    let content_type = declared.unwrap_or_else(|| {
        match body {
            Body::Text(_) => TEXT_PLAIN,
            _ => APPLICATION_JSON,
        }
        .to_string()
    });

    let encoded = if content_type.contains(FORM_URLENCODED) {
        encode_form(&content_type, body)?
    } else if content_type.contains(TEXT_PLAIN) {
        encode_text(&content_type, body)?
    } else if content_type.contains(MULTIPART_FORM_DATA) {
        encode_multipart(body)?
    } else {
        encode_json(body)?
    };
    Ok(Some(encoded))
}

fn encode_form(content_type: &str, body: &Body) -> Result<EncodedBody> {
    let Body::Form(fields) = body else {
        return Err(Error::BodyTypeMismatch {
            content_type: content_type.to_string(),
            expected: "a flat string map",
        });
    };
    let encoded =
        serde_urlencoded::to_string(fields).map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(EncodedBody {
        bytes: Bytes::from(encoded),
        content_type: FORM_URLENCODED.to_string(),
    })
}

fn encode_text(content_type: &str, body: &Body) -> Result<EncodedBody> {
    let Body::Text(text) = body else {
        return Err(Error::BodyTypeMismatch {
            content_type: content_type.to_string(),
            expected: "a string",
        });
    };
    Ok(EncodedBody {
        bytes: Bytes::from(text.clone()),
        content_type: TEXT_PLAIN.to_string(),
    })
}

fn encode_multipart(body: &Body) -> Result<EncodedBody> {
    let Body::Form(fields) = body else {
        return Err(Error::BodyTypeMismatch {
            content_type: MULTIPART_FORM_DATA.to_string(),
            expected: "a flat string map",
        });
    };

    let boundary = random_boundary();
    let mut out = String::new();
    for (name, value) in fields {
        write!(
            out,
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{value}\r\n",
            escape_field_name(name),
        )
        .map_err(|e| Error::MultipartEncode {
            field: name.clone(),
            message: e.to_string(),
        })?;
    }
    out.push_str(&format!("--{boundary}--\r\n"));

    Ok(EncodedBody {
        bytes: Bytes::from(out),
        content_type: format!("{MULTIPART_FORM_DATA}; boundary={boundary}"),
    })
}

fn encode_json(body: &Body) -> Result<EncodedBody> {
    let value = match body {
        Body::Text(text) => Value::String(text.clone()),
        Body::Form(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        ),
        Body::Json(value) => value.clone(),
    };
    let bytes = serde_json::to_vec(&value).map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(EncodedBody {
        bytes: Bytes::from(bytes),
        content_type: APPLICATION_JSON.to_string(),
    })
}

fn random_boundary() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(30)
        .map(char::from)
        .collect()
}

fn escape_field_name(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(input: &[(&str, &str)]) -> Vec<(String, String)> {
        input
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_absent_body_encodes_nothing() {
        assert!(encode(&[], None).unwrap().is_none());
    }

    #[test]
    fn test_text_body_infers_text_plain() {
        let body = Body::from("hello");
        let encoded = encode(&[], Some(&body)).unwrap().unwrap();
        assert_eq!(encoded.content_type, TEXT_PLAIN);
        assert_eq!(&encoded.bytes[..], b"hello");
    }

    #[test]
    fn test_non_text_body_infers_json() {
        let body = Body::from(json!({"a": 1}));
        let encoded = encode(&[], Some(&body)).unwrap().unwrap();
        assert_eq!(encoded.content_type, APPLICATION_JSON);
        assert_eq!(&encoded.bytes[..], br#"{"a":1}"#);
    }

    #[test]
    fn test_declared_content_type_matches_case_insensitively() {
        let body = Body::form([("a", "1")]);
        let encoded = encode(
            &headers(&[("Content-Type", "APPLICATION/X-WWW-FORM-URLENCODED")]),
            Some(&body),
        )
        .unwrap()
        .unwrap();
        assert_eq!(encoded.content_type, FORM_URLENCODED);
    }

    #[test]
    fn test_form_encoding_percent_encodes() {
        let body = Body::form([("key one", "a&b"), ("two", "2")]);
        let encoded = encode(
            &headers(&[("content-type", FORM_URLENCODED)]),
            Some(&body),
        )
        .unwrap()
        .unwrap();
        assert_eq!(&encoded.bytes[..], b"key+one=a%26b&two=2");
    }

    #[test]
    fn test_form_requires_flat_string_map() {
        let body = Body::from("not a map");
        let result = encode(&headers(&[("content-type", FORM_URLENCODED)]), Some(&body));
        assert!(matches!(result, Err(Error::BodyTypeMismatch { .. })));
    }

    #[test]
    fn test_text_requires_string() {
        let body = Body::form([("a", "1")]);
        let result = encode(&headers(&[("content-type", "text/plain")]), Some(&body));
        assert!(matches!(result, Err(Error::BodyTypeMismatch { .. })));
    }

    #[test]
    fn test_multipart_generates_fresh_boundary() {
        let body = Body::form([("field", "value")]);
        let first = encode(
            &headers(&[("content-type", MULTIPART_FORM_DATA)]),
            Some(&body),
        )
        .unwrap()
        .unwrap();
        let second = encode(
            &headers(&[("content-type", MULTIPART_FORM_DATA)]),
            Some(&body),
        )
        .unwrap()
        .unwrap();

        let boundary = first
            .content_type
            .split("boundary=")
            .nth(1)
            .unwrap()
            .to_string();
        assert!(!boundary.is_empty());
        assert_ne!(first.content_type, second.content_type);

        let payload = String::from_utf8(first.bytes.to_vec()).unwrap();
        assert!(payload.contains(&format!("--{boundary}\r\n")));
        assert!(payload.contains("Content-Disposition: form-data; name=\"field\""));
        assert!(payload.contains("\r\n\r\nvalue\r\n"));
        assert!(payload.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn test_multipart_escapes_field_names() {
        let body = Body::form([(r#"we"ird"#, "v")]);
        let encoded = encode(
            &headers(&[("content-type", MULTIPART_FORM_DATA)]),
            Some(&body),
        )
        .unwrap()
        .unwrap();
        let payload = String::from_utf8(encoded.bytes.to_vec()).unwrap();
        assert!(payload.contains(r#"name="we\"ird""#));
    }

    #[test]
    fn test_json_default_serializes_structurally() {
        let body = Body::from(json!({"nested": {"k": [1, 2]}}));
        let encoded = encode(&headers(&[("content-type", "application/json")]), Some(&body))
            .unwrap()
            .unwrap();
        let round: Value = serde_json::from_slice(&encoded.bytes).unwrap();
        assert_eq!(round, json!({"nested": {"k": [1, 2]}}));
    }

    #[test]
    fn test_json_accepts_any_body_shape() {
        let text = encode(
            &headers(&[("content-type", "application/json")]),
            Some(&Body::from("plain")),
        )
        .unwrap()
        .unwrap();
        assert_eq!(&text.bytes[..], br#""plain""#);

        let form = encode(
            &headers(&[("content-type", "application/json")]),
            Some(&Body::form([("a", "1")])),
        )
        .unwrap()
        .unwrap();
        assert_eq!(&form.bytes[..], br#"{"a":"1"}"#);
    }

    #[test]
    fn test_unknown_content_type_falls_back_to_json() {
        let body = Body::from(json!([1, 2, 3]));
        let encoded = encode(
            &headers(&[("content-type", "application/vnd.custom+whatever")]),
            Some(&body),
        )
        .unwrap()
        .unwrap();
        assert_eq!(encoded.content_type, APPLICATION_JSON);
    }

    #[test]
    fn test_produced_content_type_round_trips_to_same_branch() {
        // Re-declaring the produced content type selects the branch that
        // produced it.
        let cases = [
            (Body::form([("a", "1")]), FORM_URLENCODED),
            (Body::from("text"), TEXT_PLAIN),
            (Body::from(json!({"a": 1})), APPLICATION_JSON),
        ];
        for (body, declared) in cases {
            let first = encode(&headers(&[("content-type", declared)]), Some(&body))
                .unwrap()
                .unwrap();
            let again = encode(
                &headers(&[("content-type", first.content_type.as_str())]),
                Some(&body),
            )
            .unwrap()
            .unwrap();
            assert_eq!(again.content_type, first.content_type);
        }

        // Multipart re-enters the multipart branch but always generates a
        // fresh boundary.
        let multipart = encode(
            &headers(&[("content-type", MULTIPART_FORM_DATA)]),
            Some(&Body::form([("a", "1")])),
        )
        .unwrap()
        .unwrap();
        let again = encode(
            &headers(&[("content-type", multipart.content_type.as_str())]),
            Some(&Body::form([("a", "1")])),
        )
        .unwrap()
        .unwrap();
        assert!(again.content_type.contains(MULTIPART_FORM_DATA));
        assert_ne!(again.content_type, multipart.content_type);
    }
}
