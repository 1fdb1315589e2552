/*
 * Responsibility
 * - /register and /login handlers
 * - Login runs the whole credential path: Basic header → credential
 *   lookup → password verify → token issue
 * - Nothing on this path logs credentials, hashes or tokens
 */
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::api::dto::auth::{LoginResponse, LoginUser, RegisterRequest, RegisterResponse};
use crate::error::AppError;
use crate::repos::error::RepoError;
use crate::repos::{role_repo, user_repo};
use crate::services::auth::rbac::Role;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let (username, password) = req.validate().map_err(AppError::bad_request)?;

    let role = match req.role.as_deref() {
        Some(name) => name
            .parse::<Role>()
            .map_err(|_| AppError::bad_request("Invalid role specified"))?,
        None => Role::User,
    };

    let role_id = role_repo::find_id_by_name(&state.db, role.as_str())
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid role specified"))?;

    let password_hash = state.passwords.hash(password)?;

    match user_repo::create(&state.db, username, &password_hash, role_id).await {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(RegisterResponse {
                message: "User registered successfully".to_string(),
                username: username.to_string(),
                role: role.to_string(),
            }),
        )),
        Err(RepoError::Conflict) => Err(AppError::bad_request("Username already exists")),
        Err(err) => Err(err.into()),
    }
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LoginResponse>, AppError> {
    let (username, password) = basic_credentials(&headers)?;

    let user = user_repo::find_by_username(&state.db, &username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    // Identities without a stored secret cannot authenticate this way.
    let stored_hash = user.password.as_deref().ok_or(AppError::InvalidCredentials)?;

    if !state.passwords.verify(&password, stored_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue_for(&state.db, user.id, &user.username).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: LoginUser {
            id: user.id,
            username: user.username,
        },
    }))
}

/// Parse `Authorization: Basic base64(username:password)`.
fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), AppError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::bad_request("Authorization header missing"))?;

    let encoded = header_value
        .strip_prefix("Basic ")
        .ok_or_else(|| AppError::bad_request("Invalid Authorization format"))?;

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| AppError::bad_request("Invalid Authorization format"))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AppError::bad_request("Invalid Authorization format"))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| AppError::bad_request("Invalid credentials format"))?;

    if username.is_empty() || password.is_empty() {
        return Err(AppError::bad_request("Invalid credentials format"));
    }

    Ok((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn parses_well_formed_basic_header() {
        // admin:adminpassword
        let headers = headers_with("Basic YWRtaW46YWRtaW5wYXNzd29yZA==");
        let (username, password) = basic_credentials(&headers).unwrap();
        assert_eq!(username, "admin");
        assert_eq!(password, "adminpassword");
    }

    #[test]
    fn password_may_contain_colons() {
        // alice:pa:ss
        let encoded = BASE64.encode("alice:pa:ss");
        let headers = headers_with(&format!("Basic {encoded}"));
        let (username, password) = basic_credentials(&headers).unwrap();
        assert_eq!(username, "alice");
        assert_eq!(password, "pa:ss");
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = basic_credentials(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn wrong_scheme_is_rejected() {
        let headers = headers_with("Bearer sometoken");
        assert!(basic_credentials(&headers).is_err());
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let headers = headers_with("Basic !!!not-base64!!!");
        assert!(basic_credentials(&headers).is_err());
    }

    #[test]
    fn empty_username_or_password_is_rejected() {
        for raw in [":pw", "user:", "nocolon"] {
            let encoded = BASE64.encode(raw);
            let headers = headers_with(&format!("Basic {encoded}"));
            assert!(basic_credentials(&headers).is_err(), "{raw} should fail");
        }
    }
}
