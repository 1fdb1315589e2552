/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Expose the authenticated request context (AuthCtx) to handlers
 * - axum wiring lives in core, the type contract in types
 */

mod auth_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
