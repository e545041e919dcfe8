//! Request correlation.
//!
//! Every request runs inside a `request` span tagged with its id. The id is the
//! caller's `x-request-id` when one was sent, a fresh UUID otherwise, and it is
//! echoed on the response.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, HeaderValue, StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};
use std::{fmt, time::Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::metrics;

/// Header carrying the correlation id in both directions
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id of one HTTP request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Take the caller's id, or generate one when the header is missing, blank
    /// or not valid ASCII.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let supplied = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty());

        match supplied {
            Some(id) => Self(id.to_string()),
            None => Self(Uuid::new_v4().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tag the request, run it inside its span, then echo the id and record the
/// access log line and the HTTP counter.
///
/// ```no_run
/// use axum::{Router, middleware, routing::get};
/// use sp_server::api::request_id::track_request;
///
/// let app: Router = Router::new()
///     .route("/", get(|| async { "ok" }))
///     .layer(middleware::from_fn(track_request));
/// ```
pub async fn track_request(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let span = tracing::info_span!("request", request_id = %request_id);
    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).instrument(span.clone()).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let status = response.status();
    metrics::http_requests_total(method.as_str(), &path, status.as_u16());
    span.in_scope(|| {
        tracing::info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
    });

    response
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestId>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "request id middleware not installed",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, middleware, routing::get};
    use tower::ServiceExt;

    fn headers_with(id: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(id));
        headers
    }

    #[test]
    fn test_supplied_id_kept() {
        let id = RequestId::from_headers(&headers_with("round-7-retry"));
        assert_eq!(id.as_str(), "round-7-retry");
        assert_eq!(id.to_string(), "round-7-retry");
    }

    #[test]
    fn test_missing_or_blank_id_generated() {
        let generated = RequestId::from_headers(&HeaderMap::new());
        assert!(Uuid::parse_str(generated.as_str()).is_ok());

        let blank = RequestId::from_headers(&headers_with("   "));
        assert!(Uuid::parse_str(blank.as_str()).is_ok());
    }

    #[tokio::test]
    async fn test_handler_sees_the_echoed_id() {
        let app: Router = Router::new()
            .route("/", get(|id: RequestId| async move { id.to_string() }))
            .layer(middleware::from_fn(track_request));

        let request = axum::http::Request::builder()
            .uri("/")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
    }
}
