//! Request-header size guard.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ErrorBody;

/// Reject requests whose headers (names plus values) exceed `max_bytes`
/// with 431 Request Header Fields Too Large.
///
/// Mounted with `axum::middleware::from_fn_with_state(max_bytes, limit_header_size)`.
pub async fn limit_header_size(
    State(max_bytes): State<usize>,
    request: Request,
    next: Next,
) -> Response {
    let size = header_bytes(&request);
    if size > max_bytes {
        tracing::warn!(size, max_bytes, "Rejecting request with oversized headers");
        let body = ErrorBody {
            message: "request headers too large".to_string(),
            code: "HEADERS_TOO_LARGE",
            details: Some(format!("{size} bytes, limit is {max_bytes}")),
        };
        return (StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE, Json(body)).into_response();
    }

    next.run(request).await
}

fn header_bytes(request: &Request) -> usize {
    request
        .headers()
        .iter()
        .map(|(name, value)| name.as_str().len() + value.len())
        .sum()
}
