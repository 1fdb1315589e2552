//! Conditional GET support: ETag validators and If-None-Match.
//!
//! Applied as an outer wrapper around the handler chain. For a successful
//! GET the response body is buffered, a validator is derived from the
//! exact body bytes (unless the handler already set one), and a matching
//! `If-None-Match` turns the response into an empty 304. The comparison
//! always runs against the just-computed validator, never a stale one.

use std::fmt::Write as _;

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};

// Collection responses are buffered in full to fingerprint them.
const MAX_BUFFERED_BODY: usize = 16 * 1024 * 1024;

pub async fn etag(req: Request, next: Next) -> Response {
    let is_get = req.method() == Method::GET;
    let if_none_match = req.headers().get(header::IF_NONE_MATCH).cloned();

    let res = next.run(req).await;

    if !is_get || res.status() != StatusCode::OK {
        return res;
    }

    let (mut parts, body) = res.into_parts();
    let bytes = match to_bytes(body, MAX_BUFFERED_BODY).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "failed to buffer response body for validator");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if !parts.headers.contains_key(header::ETAG)
        && let Ok(value) = HeaderValue::from_str(&validator_for(&bytes))
    {
        parts.headers.insert(header::ETAG, value);
    }

    if let (Some(candidate), Some(current)) =
        (if_none_match.as_ref(), parts.headers.get(header::ETAG))
        && candidate == current
    {
        parts.status = StatusCode::NOT_MODIFIED;
        parts.headers.remove(header::CONTENT_LENGTH);
        return Response::from_parts(parts, Body::empty());
    }

    Response::from_parts(parts, Body::from(bytes))
}

/// Validator for a response body. A pure function of the bytes: identical
/// bodies yield identical validators across requests and over time.
pub fn validator_for(body: &[u8]) -> String {
    let digest = Sha256::digest(body);

    let mut tag = String::with_capacity(2 + digest.len() * 2);
    tag.push('"');
    for byte in digest {
        let _ = write!(tag, "{byte:02x}");
    }
    tag.push('"');
    tag
}

#[cfg(test)]
mod tests {
    use axum::{
        Json, Router,
        http::Request as HttpRequest,
        middleware::from_fn,
        routing::{get, post},
    };
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        async fn books() -> Json<serde_json::Value> {
            Json(serde_json::json!({ "books": [{ "id": 1, "title": "Dune" }] }))
        }

        async fn tagged() -> Response {
            ([(header::ETAG, "\"handler-chosen\"")], "payload").into_response()
        }

        async fn missing() -> (StatusCode, &'static str) {
            (StatusCode::NOT_FOUND, "gone")
        }

        Router::new()
            .route("/books", get(books).post(|| async { "created" }))
            .route("/tagged", get(tagged))
            .route("/missing", get(missing))
            .layer(from_fn(etag))
    }

    async fn get_with(uri: &str, if_none_match: Option<&str>) -> Response {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(value) = if_none_match {
            builder = builder.header(header::IF_NONE_MATCH, value);
        }
        app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn validator_is_deterministic_and_quoted() {
        let a = validator_for(b"same bytes");
        let b = validator_for(b"same bytes");
        assert_eq!(a, b);
        assert!(a.starts_with('"') && a.ends_with('"'));
        // quoted sha-256 hex
        assert_eq!(a.len(), 66);

        assert_ne!(validator_for(b"same bytes"), validator_for(b"other bytes"));
    }

    #[tokio::test]
    async fn get_responses_carry_a_validator() {
        let res = get_with("/books", None).await;
        assert_eq!(res.status(), StatusCode::OK);

        let tag = res
            .headers()
            .get(header::ETAG)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(tag, validator_for(&body));
    }

    #[tokio::test]
    async fn matching_validator_short_circuits_to_304() {
        let first = get_with("/books", None).await;
        let tag = first
            .headers()
            .get(header::ETAG)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let second = get_with("/books", Some(&tag)).await;
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(second.headers().get(header::ETAG).unwrap(), tag.as_str());

        let body = to_bytes(second.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn mismatched_validator_returns_full_body() {
        let res = get_with("/books", Some("\"0000\"")).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(!body.is_empty());
    }

    #[tokio::test]
    async fn handler_set_validator_is_respected() {
        let res = get_with("/tagged", None).await;
        assert_eq!(
            res.headers().get(header::ETAG).unwrap(),
            "\"handler-chosen\""
        );

        let res = get_with("/tagged", Some("\"handler-chosen\"")).await;
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn non_get_and_non_200_are_untouched() {
        let res = app()
            .oneshot(
                HttpRequest::builder()
                    .method(Method::POST)
                    .uri("/books")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(res.headers().get(header::ETAG).is_none());

        let res = get_with("/missing", None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(res.headers().get(header::ETAG).is_none());
    }
}
