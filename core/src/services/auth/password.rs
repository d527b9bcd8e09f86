//! Password hashing primitive.
//!
//! Thin wrapper over bcrypt; the rest of the crate never touches the
//! algorithm directly.

use crate::errors::{DomainError, DomainResult};

/// Hash a plaintext password with the given bcrypt cost
pub fn hash_password(password: &str, cost: u32) -> DomainResult<String> {
    bcrypt::hash(password, cost).map_err(|e| DomainError::Internal {
        message: format!("Failed to hash password: {}", e),
    })
}

/// Verify a plaintext password against a stored digest
pub fn verify_password(password: &str, digest: &str) -> DomainResult<bool> {
    bcrypt::verify(password, digest).map_err(|e| DomainError::Internal {
        message: format!("Failed to verify password: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // low cost keeps the test fast; production uses the config default
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let digest = hash_password("p1", TEST_COST).unwrap();

        assert_ne!(digest, "p1");
        assert!(verify_password("p1", &digest).unwrap());
        assert!(!verify_password("wrong", &digest).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let a = hash_password("p1", TEST_COST).unwrap();
        let b = hash_password("p1", TEST_COST).unwrap();
        assert_ne!(a, b);
    }
}
