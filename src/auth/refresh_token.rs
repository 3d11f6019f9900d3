/// Refresh Token Rotation Management
///
/// Builds, resigns, and validates long-lived refresh tokens. The record
/// store holds exactly one live token id per principal; overwriting that
/// pointer on issuance invalidates every previously issued refresh token
/// for the principal, including ones never presented since issuance
/// (logout-all / rotation-on-use semantics). The store is the single
/// source of truth for revocation.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::RefreshClaims;
use crate::auth::jwt::{map_token_error, strict_validation};
use crate::configuration::AuthSettings;
use crate::error::{AuthError, StoreError};
use crate::idgen::SnowflakeGenerator;
use crate::store::TokenStore;

/// Issues and verifies refresh tokens against a [`TokenStore`].
pub struct RefreshManager<S> {
    store: S,
    generator: Arc<SnowflakeGenerator>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    signature_only: Validation,
    issuer: String,
    refresh_token_expiry: i64,
}

impl<S: TokenStore> RefreshManager<S> {
    pub fn new(settings: &AuthSettings, generator: Arc<SnowflakeGenerator>, store: S) -> Self {
        // Resigning checks the signature only; expiry is refreshed anyway.
        let mut signature_only = Validation::new(Algorithm::HS256);
        signature_only.validate_exp = false;

        Self {
            store,
            generator,
            encoding_key: EncodingKey::from_secret(settings.signing_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.signing_key.as_bytes()),
            validation: strict_validation(&settings.issuer),
            signature_only,
            issuer: settings.issuer.clone(),
            refresh_token_expiry: settings.refresh_token_expiry,
        }
    }

    /// Mint a refresh token for a user, rotating out any previous one.
    ///
    /// The new token id is written to the principal's record before the
    /// token is signed: if the store write fails or affects no row, no
    /// token is handed out — an unrevocable token must never exist.
    /// Concurrent issuance for one principal is last-writer-wins; the
    /// losing call's token simply never verifies.
    pub async fn issue_refresh_token(&self, user_id: &str) -> Result<String, AuthError> {
        let token_id = self.generator.next_id()?;

        let rows = self.store.set_current_token_id(user_id, &token_id).await?;
        if rows == 0 {
            return Err(AuthError::Store(StoreError::NotFound(user_id.to_string())));
        }
        tracing::info!(user_id = %user_id, "refresh token rotated");

        let claims = RefreshClaims::new(user_id, &token_id, self.refresh_token_expiry, &self.issuer);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Resign a refresh token with fresh timestamps (sliding expiration).
    ///
    /// Checks the signature only and keeps the original token id; the
    /// store is not consulted or updated. If the token id no longer
    /// matches the stored pointer, the resigned token still fails
    /// verification later — resigning never resurrects a rotated token.
    pub fn reissue_refresh_token(&self, old_token: &str) -> Result<String, AuthError> {
        let data = decode::<RefreshClaims>(old_token, &self.decoding_key, &self.signature_only)
            .map_err(map_token_error)?;

        let claims = data.claims.refreshed(self.refresh_token_expiry);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify a refresh token and return its subject.
    ///
    /// Order: signature (`Invalid`), then expiry (`Expired`), then the
    /// revocation check — the token id must equal the principal's stored
    /// pointer. A missing principal, an absent pointer, and a mismatched
    /// id are all `Invalid`, indistinguishable from a forged token.
    pub async fn verify_refresh_token(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<RefreshClaims>(token, &self.decoding_key, &self.validation)
            .map_err(map_token_error)?;
        let claims = data.claims;

        match self.store.current_token_id(&claims.sub).await? {
            Some(ref current) if *current == claims.jti => Ok(claims.sub),
            _ => {
                tracing::warn!(user_id = %claims.sub, "refresh token does not match stored token id");
                Err(AuthError::Invalid)
            }
        }
    }
}
