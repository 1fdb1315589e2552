/*!
 * Rate limiting behind an injected collaborator.
 *
 * The HTTP layer only sees the `RateLimiter` trait; the backend is chosen
 * at startup (in-memory for a single instance, Valkey for a fleet).
 */

mod memory;
mod store;
mod valkey;

pub use memory::MemoryRateLimiter;
pub use store::{RateLimitError, RateLimiter};
pub use valkey::ValkeyRateLimiter;
