//! Access guard: bearer authentication plus role/scope checks.
//!
//! `authenticate` verifies `Authorization: Bearer <token>` and stores the
//! verified claims in request extensions as `AuthCtx`. The `check_role` /
//! `check_scope` guards read that context and either let the request
//! through or terminate the chain before any handler runs.
//!
//! A guard that finds no `AuthCtx` rejects with 401, not 403: absence of
//! authentication is distinct from insufficient privilege.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::rbac::{Role, Scope};
use crate::state::AppState;

/// Authentication step. On success the verified claims become the
/// request's identity, consumable by guards and handlers.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::AuthenticationRequired)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(AppError::AuthenticationRequired)?;

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(_) => {
            // Log the event, never the token.
            tracing::warn!("bearer token verification failed");
            return Err(AppError::TokenInvalid);
        }
    };

    req.extensions_mut().insert(AuthCtx::new(claims));

    Ok(next.run(req).await)
}

/// Role check against the static hierarchy.
pub async fn check_role(
    required: Role,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<AuthCtx>()
        .ok_or(AppError::AuthenticationRequired)?;

    if ctx.role().satisfies(required) {
        Ok(next.run(req).await)
    } else {
        Err(AppError::InsufficientRole)
    }
}

/// Scope membership check. The 403 names the missing scope so clients can
/// tell a scope rejection apart from a role rejection.
pub async fn check_scope(
    required: Scope,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<AuthCtx>()
        .ok_or(AppError::AuthenticationRequired)?;

    if ctx.has_scope(required) {
        Ok(next.run(req).await)
    } else {
        Err(AppError::InsufficientScope(required))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        handler::Handler,
        http::{Request as HttpRequest, StatusCode},
        middleware::{from_fn, from_fn_with_state},
        routing::get,
    };
    use sqlx::PgPool;
    use tower::ServiceExt;

    use super::*;
    use crate::services::auth::password::PasswordHasher;
    use crate::services::auth::token::{Claims, TokenService};
    use crate::services::rate_limit::MemoryRateLimiter;

    fn test_state() -> AppState {
        // connect_lazy performs no IO; these tests never reach the database.
        let db = PgPool::connect_lazy("postgres://postgres@localhost/unused").unwrap();
        AppState::new(
            db,
            Arc::new(TokenService::new("test-secret", 3600)),
            PasswordHasher::new(4),
            Arc::new(MemoryRateLimiter::new(1000, 60)),
        )
    }

    async fn probe() -> &'static str {
        "ok"
    }

    fn scope_guarded_app(state: AppState) -> Router {
        Router::new()
            .route(
                "/admin/users",
                get(probe
                    .layer(from_fn(|req: Request, next: Next| {
                        check_scope(Scope::UsersRead, req, next)
                    }))
                    .layer(from_fn_with_state(state.clone(), authenticate))),
            )
            .with_state(state)
    }

    fn bearer(state: &AppState, role: Role) -> String {
        let token = state
            .tokens
            .sign(&Claims::for_role(1, "tester", role, 3600))
            .unwrap();
        format!("Bearer {token}")
    }

    async fn send(app: Router, auth: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = HttpRequest::builder().uri("/admin/users");
        if let Some(value) = auth {
            builder = builder.header("authorization", value);
        }
        let res = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn missing_header_is_401_with_login_hint() {
        let state = test_state();
        let (status, body) = send(scope_guarded_app(state), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["_links"]["login"]["href"], "/login");
    }

    #[tokio::test]
    async fn wrong_scheme_is_401() {
        let state = test_state();
        let (status, _) = send(scope_guarded_app(state), Some("Basic dXNlcjpwdw==")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_401() {
        let state = test_state();
        let (status, body) =
            send(scope_guarded_app(state), Some("Bearer not.a.token")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn user_token_is_403_naming_the_scope() {
        let state = test_state();
        let auth = bearer(&state, Role::User);
        let (status, body) = send(scope_guarded_app(state), Some(&auth)).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("users:read"), "got: {message}");
    }

    #[tokio::test]
    async fn admin_token_passes_through() {
        let state = test_state();
        let auth = bearer(&state, Role::Admin);
        let res = scope_guarded_app(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/admin/users")
                    .header("authorization", auth)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn scope_guard_without_authentication_is_401_not_403() {
        // Guard wired without a preceding authenticate layer: missing
        // identity must read as an authentication failure.
        let app: Router = Router::new().route(
            "/admin/users",
            get(probe.layer(from_fn(|req: Request, next: Next| {
                check_scope(Scope::UsersRead, req, next)
            }))),
        );

        let (status, _) = send(app, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn role_guard_enforces_hierarchy() {
        let state = test_state();
        let app = |state: AppState| -> Router {
            Router::new()
                .route(
                    "/admin/users",
                    get(probe
                        .layer(from_fn(|req: Request, next: Next| {
                            check_role(Role::Editor, req, next)
                        }))
                        .layer(from_fn_with_state(state.clone(), authenticate))),
                )
                .with_state(state)
        };

        let user = bearer(&state, Role::User);
        let (status, _) = send(app(state.clone()), Some(&user)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let editor = bearer(&state, Role::Editor);
        let (status, _) = send(app(state.clone()), Some(&editor)).await;
        assert_eq!(status, StatusCode::OK);

        let admin = bearer(&state, Role::Admin);
        let (status, _) = send(app(state), Some(&admin)).await;
        assert_eq!(status, StatusCode::OK);
    }
}
