//! Session error types.

use thiserror::Error;

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Transport failure signatures that usually clear up on their own.
///
/// Carried over from the transient errors observed in production traffic;
/// used for log-level selection only. The retry driver does not consult
/// this list and retries every transport failure uniformly.
const TRANSIENT_SIGNATURES: &[&str] = &[
    "TLS handshake timeout",
    "Proxy responded with non 200 code",
    "no such host",
    "EOF",
    "410 Gone",
    "407 Proxy Authentication Required",
    "417 Expectation Failed",
    "unknown authority",
    "certificate: x509",
    "while awaiting headers",
    "remote error",
];

/// Session errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The session has been closed and no longer owns a transport.
    #[error("session is closed")]
    InvalidSession,

    /// The request URL was empty or whitespace-only.
    #[error("URL cannot be empty")]
    EmptyUrl,

    /// The request URL failed to parse.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A supplied header key was empty or whitespace-only.
    #[error("header key cannot be empty")]
    EmptyHeaderKey,

    /// A cookie name was empty or whitespace-only.
    #[error("cookie name cannot be empty")]
    EmptyCookieName,

    /// A `Set-Cookie` header value could not be parsed.
    #[error("cookie parse error: {0}")]
    CookieParse(String),

    /// The body variant does not match the resolved content type.
    #[error("body must be {expected} for {content_type}")]
    BodyTypeMismatch {
        /// The content type the dispatch resolved to.
        content_type: String,
        /// The body shape that content type requires.
        expected: &'static str,
    },

    /// Structural serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A multipart form field could not be written.
    #[error("error writing multipart field {field}: {message}")]
    MultipartEncode {
        /// Name of the field that failed.
        field: String,
        /// Underlying write error.
        message: String,
    },

    /// The transport-level request could not be assembled.
    #[error("failed to build request: {0}")]
    RequestConstruction(String),

    /// The proxy URL failed syntactic validation.
    #[error("invalid proxy URL: {0}")]
    InvalidProxy(String),

    /// A failure reported by the external transport. The message passes
    /// through `Display` verbatim so retry wrapping preserves it.
    #[error("{0}")]
    Transport(String),

    /// All retry attempts failed; wraps the final transport failure.
    #[error("max retries ({attempts}) exceeded: {message}")]
    RetriesExhausted {
        /// The attempt budget that was exhausted.
        attempts: u32,
        /// Message of the last failed attempt.
        message: String,
    },
}

impl Error {
    /// Whether this looks like a transient transport failure.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(message) => {
                TRANSIENT_SIGNATURES.iter().any(|sig| message.contains(sig))
            }
            _ => false,
        }
    }

    /// Whether this failure happened before any network attempt.
    pub fn is_pre_dispatch(&self) -> bool {
        !matches!(self, Self::Transport(_) | Self::RetriesExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_exhausted_display() {
        let err = Error::RetriesExhausted {
            attempts: 3,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "max retries (3) exceeded: boom");
    }

    #[test]
    fn test_transport_message_passes_through_verbatim() {
        let err = Error::Transport("connection reset by peer".to_string());
        assert_eq!(err.to_string(), "connection reset by peer");
    }

    #[test]
    fn test_transient_classification() {
        assert!(Error::Transport("net: TLS handshake timeout".to_string()).is_transient());
        assert!(Error::Transport("lookup x: no such host".to_string()).is_transient());
        assert!(!Error::Transport("boom".to_string()).is_transient());
        assert!(!Error::EmptyUrl.is_transient());
    }

    #[test]
    fn test_pre_dispatch_classification() {
        assert!(Error::EmptyHeaderKey.is_pre_dispatch());
        assert!(Error::InvalidSession.is_pre_dispatch());
        assert!(!Error::Transport("boom".to_string()).is_pre_dispatch());
        assert!(
            !Error::RetriesExhausted {
                attempts: 1,
                message: "x".to_string()
            }
            .is_pre_dispatch()
        );
    }
}
