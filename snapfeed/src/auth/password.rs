//! Password hashing and verification.

use super::errors::{AuthError, AuthResult};

/// bcrypt cost factor
const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password with bcrypt.
///
/// The salt is generated per-hash by bcrypt itself and embedded in the
/// output string.
pub fn hash(plaintext: &str) -> AuthResult<String> {
    bcrypt::hash(plaintext, BCRYPT_COST).map_err(|_| AuthError::HashingFailed)
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Returns `Ok(false)` on mismatch; an unparseable hash or internal bcrypt
/// failure propagates as [`AuthError::HashingFailed`] rather than being
/// treated as "no match".
pub fn verify(plaintext: &str, hash: &str) -> AuthResult<bool> {
    bcrypt::verify(plaintext, hash).map_err(|_| AuthError::HashingFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hashed = hash("Hunter2!long").unwrap();
        assert!(verify("Hunter2!long", &hashed).unwrap());
        assert!(!verify("Hunter2!wrong", &hashed).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash("Hunter2!long").unwrap();
        let b = hash("Hunter2!long").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        let err = verify("Hunter2!long", "not-a-bcrypt-hash").unwrap_err();
        assert!(matches!(err, AuthError::HashingFailed));
    }
}
