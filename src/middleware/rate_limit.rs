//! Per-client request throttling.
//!
//! The limiter itself is an injected collaborator (`services::rate_limit`);
//! this middleware only derives the client key and maps the decision to a
//! response. Backend failure fails open.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

pub async fn limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&req);

    match state.rate_limiter.hit(&key).await {
        Ok(true) => Ok(next.run(req).await),
        Ok(false) => Err(AppError::RateLimited),
        Err(err) => {
            tracing::warn!(
                error = %err,
                backend = state.rate_limiter.backend_name(),
                "rate limit backend failure, allowing request"
            );
            Ok(next.run(req).await)
        }
    }
}

// Client identity for throttling: first X-Forwarded-For hop when present
// (the API is expected to sit behind a proxy), else the peer address.
fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        && let Some(first) = forwarded.split(',').next()
    {
        let first = first.trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    use super::*;

    #[test]
    fn forwarded_header_wins_over_peer_address() {
        let req = HttpRequest::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&req), "203.0.113.9");
    }

    #[test]
    fn falls_back_to_connect_info() {
        let mut req = HttpRequest::builder().body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("192.0.2.4:5000".parse().unwrap()));
        assert_eq!(client_key(&req), "192.0.2.4");
    }

    #[test]
    fn unknown_when_no_client_information() {
        let req = HttpRequest::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&req), "unknown");
    }
}
