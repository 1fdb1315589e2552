//! Password hashing and verification (bcrypt).
//!
//! Verification fails closed: any backend error (malformed stored hash,
//! unsupported cost) is reported as a non-match. Plaintext and hashes are
//! never logged.

use crate::error::AppError;

#[derive(Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        bcrypt::hash(plaintext, self.cost).map_err(|_| AppError::Internal)
    }

    /// Compare a plaintext secret against a stored bcrypt hash.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        bcrypt::verify(plaintext, stored_hash).unwrap_or(false)
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps the tests fast; production default is 10.
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn verify_accepts_matching_password() {
        let h = hasher();
        let stored = h.hash("adminpassword").unwrap();
        assert!(h.verify("adminpassword", &stored));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let h = hasher();
        let stored = h.hash("adminpassword").unwrap();
        assert!(!h.verify("adminpassw0rd", &stored));
        assert!(!h.verify("", &stored));
    }

    #[test]
    fn verify_fails_closed_on_malformed_hash() {
        let h = hasher();
        assert!(!h.verify("anything", "not-a-bcrypt-hash"));
        assert!(!h.verify("anything", ""));
    }

    #[test]
    fn hashes_are_salted() {
        let h = hasher();
        let a = h.hash("same-password").unwrap();
        let b = h.hash("same-password").unwrap();
        assert_ne!(a, b);
        assert!(h.verify("same-password", &a));
        assert!(h.verify("same-password", &b));
    }
}
