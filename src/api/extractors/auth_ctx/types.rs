/*
 * Responsibility
 * - The authenticated-request context as handlers see it
 * - The middleware verifies the token and stores this in request
 *   extensions; handlers and guards consume only this type
 */
use crate::services::auth::rbac::{Role, Scope};
use crate::services::auth::token::Claims;

/// Context attached to a request once its bearer token has verified.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    claims: Claims,
}

impl AuthCtx {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn user_id(&self) -> i64 {
        self.claims.id
    }

    pub fn username(&self) -> &str {
        &self.claims.username
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub fn has_scope(&self, scope: Scope) -> bool {
        self.claims.has_scope(scope)
    }
}
