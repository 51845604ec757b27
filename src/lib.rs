//! # Plumage
//!
//! A convenience session layer over a TLS-fingerprinting HTTP transport:
//! browser-realistic sessions with retry-driven request execution,
//! ordered header formatting, body encoding, and cookie/proxy management.
//!
//! The hard parts (TLS handshake emulation, HTTP/2 fingerprinting,
//! browser signature mimicry) are delegated to the external transport
//! (`wreq` with `wreq-util` emulation profiles). This crate is the glue:
//! it builds URLs, formats headers in transmission order, serializes
//! bodies, and drives retries.
//!
//! ## Features
//!
//! - **Browser emulation**: sessions present a real browser's TLS/HTTP2
//!   fingerprint via [`Emulation`] profiles
//! - **Retry with linear backoff**: transport failures retry up to a
//!   configurable budget
//! - **Ordered headers**: transmission order and casing preserved for
//!   fingerprint realism, with `sec-ch-ua`/`user-agent` defaulting
//! - **Body encoding**: JSON, form, multipart, and plain-text bodies from
//!   one tagged payload type
//! - **Cookie and proxy management**: jar owned by the transport, thin
//!   passthroughs on the session
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use plumage::{RequestOptions, Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::new(SessionConfig::default())?;
//!
//!     let response = session
//!         .get(RequestOptions::new("https://example.com/search").param("q", "plumage"))
//!         .await?;
//!
//!     println!("status: {}", response.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Headers, bodies, retries
//!
//! ```rust,no_run
//! use plumage::{RequestOptions, Session, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::builder().max_retries(5).build();
//!     let session = Session::new(config)?;
//!
//!     // "default" asks for the session's browser-signature value.
//!     let response = session
//!         .post(
//!             RequestOptions::new("https://api.example.com/orders")
//!                 .header("User-Agent", "default")
//!                 .body(serde_json::json!({ "item": "widget", "quantity": 5 })),
//!         )
//!         .await?;
//!
//!     println!("{}", response.text()?);
//!     Ok(())
//! }
//! ```

mod body;
mod config;
mod cookie;
mod error;
mod headers;
mod request;
mod response;
mod retry;
mod session;
mod transport;
mod urls;

pub use body::{Body, EncodedBody};
pub use config::{SessionConfig, SessionConfigBuilder};
pub use cookie::{Cookie, CookieJar, SameSite};
pub use error::{Error, Result};
pub use headers::{format_headers, HeaderDefaults, DEFAULT_SENTINEL};
pub use request::RequestOptions;
pub use response::Response;
pub use retry::RetryPolicy;
pub use session::{Session, SessionInfo};
pub use transport::{EmulatedTransport, Transport, TransportRequest, TransportResponse};
pub use urls::{build_url, validate_url};

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, Method, StatusCode};
pub use url::Url;
pub use wreq_util::Emulation;

/// Prelude for common imports.
///
/// ```
/// use plumage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::body::Body;
    pub use crate::config::{SessionConfig, SessionConfigBuilder};
    pub use crate::cookie::{Cookie, SameSite};
    pub use crate::error::{Error, Result};
    pub use crate::request::RequestOptions;
    pub use crate::response::Response;
    pub use crate::session::Session;
    pub use crate::transport::Transport;
    pub use http::{Method, StatusCode};
    pub use wreq_util::Emulation;
}
