/// Access Token Issuance and Verification
///
/// Builds and validates short-lived access tokens signed with
/// HMAC-SHA256. Access tokens are stateless: there is no revocation, they
/// simply expire. Verification establishes signature validity before any
/// claim (including expiry) is trusted.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::AuthSettings;
use crate::error::AuthError;

/// Map a jsonwebtoken failure onto the two caller-visible conditions.
///
/// Only a valid signature with expired claims becomes `Expired`; every
/// other failure (bad signature, malformed structure, wrong issuer,
/// disallowed algorithm) collapses into `Invalid`.
pub(crate) fn map_token_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => {
            tracing::warn!(error = %err, "token rejected");
            AuthError::Invalid
        }
    }
}

pub(crate) fn strict_validation(issuer: &str) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);
    validation.leeway = 0;
    validation
}

/// Issues and verifies access tokens with keys cached at construction.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    access_token_expiry: i64,
}

impl TokenIssuer {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.signing_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.signing_key.as_bytes()),
            validation: strict_validation(&settings.issuer),
            issuer: settings.issuer.clone(),
            access_token_expiry: settings.access_token_expiry,
        }
    }

    /// Mint an access token for a user.
    ///
    /// # Errors
    /// Returns `AuthError::Signing` if signing fails.
    pub fn issue_access_token(&self, user_id: &str) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, self.access_token_expiry, &self.issuer);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify an access token and return its subject.
    ///
    /// # Errors
    /// `AuthError::Expired` when the signature is valid but the token has
    /// outlived its expiry; `AuthError::Invalid` for anything else.
    pub fn verify_access_token(&self, token: &str) -> Result<String, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(map_token_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_settings() -> AuthSettings {
        AuthSettings {
            signing_key: "test-signing-key-at-least-32-chars-long".to_string(),
            encryption_key: "01234567890123456789012345678901".to_string(),
            issuer: "vcb-member".to_string(),
            access_token_expiry: 1800,
            refresh_token_expiry: 604800,
            worker_id: 1,
        }
    }

    #[test]
    fn test_issue_then_verify_returns_subject() {
        let issuer = TokenIssuer::new(&test_settings());

        let token = issuer.issue_access_token("user-42").expect("Failed to issue token");
        let subject = issuer.verify_access_token(&token).expect("Failed to verify token");

        assert_eq!(subject, "user-42");
    }

    #[test]
    fn test_expired_token_fails_with_expired() {
        let settings = test_settings();
        let issuer = TokenIssuer::new(&settings);

        // Sign claims dated far in the past with the same key.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-42".to_string(),
            iat: now - 7200,
            exp: now - 3600,
            iss: settings.issuer.clone(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(settings.signing_key.as_bytes()),
        )
        .unwrap();

        match issuer.verify_access_token(&token) {
            Err(AuthError::Expired) => {}
            other => panic!("Expected Expired, got {:?}", other),
        }
    }

    #[test]
    fn test_tampered_signature_fails_with_invalid() {
        let issuer = TokenIssuer::new(&test_settings());
        let token = issuer.issue_access_token("user-42").unwrap();

        // Flip the last signature character.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        match issuer.verify_access_token(&tampered) {
            Err(AuthError::Invalid) => {}
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_token_fails_with_invalid() {
        let issuer = TokenIssuer::new(&test_settings());

        match issuer.verify_access_token("not.a.token") {
            Err(AuthError::Invalid) => {}
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_issuer_fails_with_invalid() {
        let mut settings = test_settings();
        let issuer = TokenIssuer::new(&settings);
        let token = issuer.issue_access_token("user-42").unwrap();

        settings.issuer = "someone-else".to_string();
        let verifier = TokenIssuer::new(&settings);

        match verifier.verify_access_token(&token) {
            Err(AuthError::Invalid) => {}
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_key_fails_with_invalid() {
        let issuer = TokenIssuer::new(&test_settings());
        let token = issuer.issue_access_token("user-42").unwrap();

        let mut settings = test_settings();
        settings.signing_key = "a-completely-different-signing-key".to_string();
        let verifier = TokenIssuer::new(&settings);

        match verifier.verify_access_token(&token) {
            Err(AuthError::Invalid) => {}
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }
}
