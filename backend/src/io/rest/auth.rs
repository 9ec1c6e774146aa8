//! API key check applied to every `/api` route.
//!
//! The key is accepted in an `apikey` header or as `Authorization: Bearer <key>`.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ShiftError;
use crate::AppState;

pub const API_KEY_HEADER: &str = "apikey";

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(key) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(key.trim());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ShiftError> {
    match presented_key(request.headers()) {
        Some(key) if key == &*state.api_key => Ok(next.run(request).await),
        _ => {
            warn!(
                "Rejected {} {}: missing or invalid API key",
                request.method(),
                request.uri().path()
            );
            Err(ShiftError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_presented_key_sources() {
        let mut headers = HeaderMap::new();
        assert_eq!(presented_key(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        assert_eq!(presented_key(&headers), Some("secret"));

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("other"));
        assert_eq!(presented_key(&headers), Some("other"));
    }

    #[test]
    fn test_non_bearer_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic c2VjcmV0"));
        assert_eq!(presented_key(&headers), None);
    }
}
