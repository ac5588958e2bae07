//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Extract the raw Host and Cookie values the compliance engine needs
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Host values stay raw bytes so duplicates are compared exactly
//! - Cookie bytes are decoded lossily: invalid UTF-8 (e.g. Latin-1 `\xe9`)
//!   becomes U+FFFD and does not round-trip to the original bytes
//! - Repeated Cookie headers are joined with "; " before parsing

use axum::http::{header, HeaderMap, HeaderName, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::compliance::RawHeaders;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a fresh UUID v4 for each request lacking an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// The request ID for log fields, or `"unknown"` before the layer ran.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Collect the Host and Cookie values of a request.
///
/// Without any `Host` header (HTTP/2), the URI authority stands in for it.
pub fn raw_headers(headers: &HeaderMap, uri: &Uri) -> RawHeaders {
    let mut host: Vec<Vec<u8>> = headers
        .get_all(header::HOST)
        .iter()
        .map(|v| v.as_bytes().to_vec())
        .collect();
    if host.is_empty() {
        if let Some(authority) = uri.authority() {
            host.push(authority.as_str().as_bytes().to_vec());
        }
    }

    let cookies: Vec<String> = headers
        .get_all(header::COOKIE)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    let cookie = if cookies.is_empty() {
        None
    } else {
        Some(cookies.join("; "))
    };

    RawHeaders { host, cookie }
}
