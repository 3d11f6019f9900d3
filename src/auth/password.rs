/// Password Hashing and Verification
///
/// Argon2id with a fresh random salt per hash; cost parameters and salt
/// are embedded in the PHC output string. No password or digest ever
/// appears in an error message or a log line.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

use crate::error::AuthError;

/// Hash a password with Argon2id.
///
/// # Errors
/// Returns `AuthError::PasswordHash` if hashing fails; the message
/// carries only the algorithm error, never the password.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verify a password against a PHC digest string.
///
/// The comparison is constant-time inside the argon2 crate. A malformed
/// digest returns `false` rather than an error — a corrupted stored
/// digest must read as "wrong password", not crash the login path.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match PasswordHash::new(digest) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let digest = hash_password("correct horse battery staple").expect("Failed to hash");

        assert_ne!(digest, "correct horse battery staple");
        assert!(digest.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery staple", &digest));
    }

    #[test]
    fn test_wrong_password_fails() {
        let digest = hash_password("correct horse battery staple").expect("Failed to hash");
        assert!(!verify_password("incorrect horse", &digest));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let first = hash_password("password123").unwrap();
        let second = hash_password("password123").unwrap();
        // Fresh salt per call.
        assert_ne!(first, second);
    }

    #[test]
    fn test_corrupted_digest_returns_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "$argon2id$v=19$truncated"));
    }
}
