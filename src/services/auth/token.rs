//! Token issuance and verification (HS256).
//!
//! Issuance runs only on the login path, after the password has verified.
//! From that point the login must not fail: any error while resolving the
//! user's role degrades to a minimal read-only token instead of aborting.
//!
//! Verification is strict: signature plus expiry with zero leeway. Callers
//! get no distinction between malformed and expired tokens.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::repos::error::RepoError;
use crate::repos::{role_repo, user_repo};
use crate::services::auth::rbac::{Role, Scope};

/// Claims embedded in a bearer token. Immutable once issued; there is no
/// server-side session state and no revocation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub scopes: Vec<Scope>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn for_role(id: i64, username: &str, role: Role, ttl_seconds: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id,
            username: username.to_string(),
            role,
            scopes: role.scopes(),
            iat: now,
            exp: now + ttl_seconds as i64,
        }
    }

    /// Fallback claims when role resolution fails: plain user, read-only.
    pub fn degraded(id: i64, username: &str, ttl_seconds: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id,
            username: username.to_string(),
            role: Role::User,
            scopes: vec![Scope::BooksRead, Scope::ReviewsRead],
            iat: now,
            exp: now + ttl_seconds as i64,
        }
    }

    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid or expired token")]
pub struct InvalidToken;

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is a hard edge: a token is invalid the moment `exp` passes.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a token for an authenticated identity.
    ///
    /// Role resolution self-heals: a user row without a role gets the
    /// default `user` role assigned (persisted) before the lookup. If any
    /// of that fails, a degraded read-only token is issued instead of
    /// failing the login.
    pub async fn issue_for(
        &self,
        db: &PgPool,
        user_id: i64,
        username: &str,
    ) -> Result<String, AppError> {
        let claims = match self.resolve_claims(db, user_id, username).await {
            Ok(claims) => claims,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    user_id,
                    "role resolution failed, issuing degraded token"
                );
                Claims::degraded(user_id, username, self.ttl_seconds)
            }
        };

        self.sign(&claims)
    }

    async fn resolve_claims(
        &self,
        db: &PgPool,
        user_id: i64,
        username: &str,
    ) -> Result<Claims, RepoError> {
        if user_repo::role_id(db, user_id).await?.is_none() {
            if let Some(default_id) = role_repo::find_id_by_name(db, Role::User.as_str()).await? {
                user_repo::assign_role(db, user_id, default_id).await?;
            }
        }

        let role = role_repo::role_of_user(db, user_id)
            .await?
            .and_then(|name| name.parse::<Role>().ok())
            .unwrap_or(Role::User);

        Ok(Claims::for_role(user_id, username, role, self.ttl_seconds))
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(
            |e| {
                tracing::error!(error = %e, "failed to sign token");
                AppError::Internal
            },
        )
    }

    pub fn verify(&self, token: &str) -> Result<Claims, InvalidToken> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 3600)
    }

    #[test]
    fn issued_claims_round_trip() {
        let svc = service();
        let claims = Claims::for_role(42, "alice", Role::Admin, 3600);
        let token = svc.sign(&claims).unwrap();

        let verified = svc.verify(&token).unwrap();
        assert_eq!(verified.id, 42);
        assert_eq!(verified.username, "alice");
        assert_eq!(verified.role, Role::Admin);
        assert_eq!(verified.scopes, Role::Admin.scopes());
        assert!(verified.has_scope(Scope::UsersDelete));
        assert_eq!(verified.exp - verified.iat, 3600);
    }

    #[test]
    fn expired_token_is_invalid() {
        let svc = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: 1,
            username: "bob".into(),
            role: Role::User,
            scopes: Role::User.scopes(),
            iat: now - 100,
            exp: now - 10,
        };
        let token = svc.sign(&claims).unwrap();

        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn tampered_token_is_invalid() {
        let svc = service();
        let token = svc
            .sign(&Claims::for_role(1, "bob", Role::User, 3600))
            .unwrap();

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(svc.verify(&tampered).is_err());
        assert!(svc.verify("not-a-token").is_err());
        assert!(svc.verify("").is_err());
    }

    #[test]
    fn token_from_another_key_is_invalid() {
        let ours = service();
        let theirs = TokenService::new("other-secret", 3600);
        let token = theirs
            .sign(&Claims::for_role(1, "mallory", Role::Admin, 3600))
            .unwrap();

        assert!(ours.verify(&token).is_err());
    }

    #[test]
    fn user_token_embeds_exactly_base_scopes() {
        let claims = Claims::for_role(7, "carol", Role::User, 3600);
        assert_eq!(claims.role, Role::User);
        assert_eq!(
            claims.scopes,
            vec![Scope::BooksRead, Scope::ReviewsRead, Scope::ReviewsWrite]
        );
    }

    #[test]
    fn degraded_claims_are_read_only() {
        let claims = Claims::degraded(7, "carol", 3600);
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.scopes, vec![Scope::BooksRead, Scope::ReviewsRead]);
        assert!(!claims.has_scope(Scope::ReviewsWrite));
    }
}
