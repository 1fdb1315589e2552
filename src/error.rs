/*
 * Responsibility
 * - Application-wide AppError taxonomy
 * - IntoResponse impl (HTTP status / JSON error body)
 * - Authentication failures carry a `_links.login` hint for clients
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::dto::links::Link;
use crate::repos::error::RepoError;
use crate::services::auth::rbac::Scope;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<ErrorLinks>,
}

#[derive(Debug, Serialize)]
pub struct ErrorLinks {
    pub login: Link,
}

impl ErrorLinks {
    fn login_hint() -> Self {
        Self {
            login: Link::new("/login"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Validation failures and malformed auth headers on the login path.
    #[error("{0}")]
    BadRequest(String),

    /// No usable bearer token on a protected route, or a guard ran without
    /// a preceding authentication step. Distinct from insufficient privilege.
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Malformed, unsigned and expired tokens are indistinguishable here.
    #[error("Invalid or expired token")]
    TokenInvalid,

    #[error("Insufficient permissions")]
    InsufficientRole,

    #[error("Insufficient permissions - required scope '{0}' not granted")]
    InsufficientScope(Scope),

    #[error("{0}")]
    NotFound(String),

    #[error("Too many requests, please slow down")]
    RateLimited,

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AuthenticationRequired
            | AppError::InvalidCredentials
            | AppError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AppError::InsufficientRole | AppError::InsufficientScope(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let links = match self {
            AppError::AuthenticationRequired
            | AppError::TokenInvalid
            | AppError::InsufficientRole
            | AppError::InsufficientScope(_) => Some(ErrorLinks::login_hint()),
            _ => None,
        };

        let body = ErrorResponse {
            message: self.to_string(),
            links,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::bad_request("Resource already exists"),
            RepoError::Db(err) => {
                // Never leak database details to the client.
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}
