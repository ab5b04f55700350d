//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Recognise urlencoded form bodies and read the method override field
//! - Render the hidden form field that browsers use to send PUT and DELETE
//!
//! # Design Decisions
//! - Only POST bodies are inspected for an override, like HTML forms
//! - The query string is never consulted

use axum::http::{header, HeaderMap, HeaderValue};
use uuid::Uuid;

use crate::dispatch::DEFAULT_METHOD_OVERRIDE_FIELD;
use crate::routing::Method;

/// Header carrying the request ID on responses.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Opaque per-request identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn header_value(&self) -> HeaderValue {
        // a hyphenated UUID is always a valid header value
        HeaderValue::from_str(&self.0.to_string()).unwrap_or_else(|_| HeaderValue::from_static("unknown"))
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// True if the body is `application/x-www-form-urlencoded`.
pub fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.split(';')
                .next()
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
        })
        .unwrap_or(false)
}

/// Value of `field` in an urlencoded form body, if present.
pub fn override_method(body: &[u8], field: &str) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == field)
        .map(|(_, value)| value.into_owned())
}

/// Hidden input that makes an HTML form submit as `method`.
pub fn method_field(method: Method) -> String {
    format!(
        "<input type='hidden' name='{}' value='{}'>",
        DEFAULT_METHOD_OVERRIDE_FIELD, method
    )
}
