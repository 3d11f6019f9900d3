/// JWT Claims structures
///
/// Payloads for the two token kinds (RFC 7519 field names). Access tokens
/// carry issuer/subject/timestamps only; refresh tokens additionally carry
/// `jti`, the token id cross-checked against the principal record.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Claims for short-lived, stateless access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (opaque user id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Build claims expiring `expiry_seconds` from now.
    pub fn new(user_id: &str, expiry_seconds: i64, issuer: &str) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer.to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}

/// Claims for long-lived, store-checked refresh tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    /// Token id; a refresh token is valid only while this equals the
    /// principal's stored pointer
    pub jti: String,
}

impl RefreshClaims {
    pub fn new(user_id: &str, token_id: &str, expiry_seconds: i64, issuer: &str) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer.to_string(),
            jti: token_id.to_string(),
        }
    }

    /// Same subject, issuer, and token id with fresh timestamps.
    /// Used by the resign operation for sliding-expiration renewal.
    pub fn refreshed(&self, expiry_seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: self.sub.clone(),
            exp: now + expiry_seconds,
            iat: now,
            iss: self.iss.clone(),
            jti: self.jti.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("user-1", 1800, "vcb-member");

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.iss, "vcb-member");
        assert_eq!(claims.exp, claims.iat + 1800);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let mut claims = Claims::new("user-1", 1800, "vcb-member");
        claims.exp = Utc::now().timestamp() - 60;
        assert!(claims.is_expired());
    }

    #[test]
    fn test_refreshed_keeps_identity_and_token_id() {
        let original = RefreshClaims::new("user-1", "id-123", 604800, "vcb-member");
        let mut stale = original.clone();
        stale.iat -= 3600;
        stale.exp -= 3600;

        let renewed = stale.refreshed(604800);

        assert_eq!(renewed.sub, original.sub);
        assert_eq!(renewed.jti, original.jti);
        assert_eq!(renewed.iss, original.iss);
        assert!(renewed.exp >= original.exp);
        assert_eq!(renewed.exp, renewed.iat + 604800);
    }
}
