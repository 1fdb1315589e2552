/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Clone is cheap (pool and services are Arc-backed)
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::services::auth::password::PasswordHasher;
use crate::services::auth::token::TokenService;
use crate::services::rate_limit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
    pub rate_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        tokens: Arc<TokenService>,
        passwords: PasswordHasher,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            db,
            tokens,
            passwords,
            rate_limiter,
        }
    }
}
