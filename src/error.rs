/// Error Handling Module
///
/// Unified error types for the token lifecycle core:
/// 1. Token verification outcomes (Expired / Invalid) exposed to callers
/// 2. Domain-specific error types for the store, cipher, and ID generator
/// 3. From implementations for control-flow conversion

use std::error::Error as StdError;
use std::fmt;

/// Errors from the record store collaborator
#[derive(Debug)]
pub enum StoreError {
    /// The principal row does not exist (zero rows affected on update)
    NotFound(String),
    /// Query execution or connection failure, passed through verbatim
    Query(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(user_id) => write!(f, "no principal record for {}", user_id),
            StoreError::Query(msg) => write!(f, "store error: {}", msg),
        }
    }
}

impl StdError for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

/// Errors from the snowflake ID generator
#[derive(Debug)]
pub enum IdError {
    /// Wall clock moved behind the last observed timestamp.
    /// The generator fails fast instead of reusing or waiting out
    /// the regressed interval; callers may retry.
    ClockRegression { last_ms: u64, now_ms: u64 },
    /// Worker id does not fit the bit width reserved for it
    WorkerIdOutOfRange(u64),
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::ClockRegression { last_ms, now_ms } => write!(
                f,
                "clock moved backwards: last timestamp {}ms, now {}ms",
                last_ms, now_ms
            ),
            IdError::WorkerIdOutOfRange(id) => {
                write!(f, "worker id {} exceeds the 10-bit range", id)
            }
        }
    }
}

impl StdError for IdError {}

/// Errors from the symmetric cipher
#[derive(Debug)]
pub enum CryptoError {
    /// Key material has the wrong length. Raised once at construction,
    /// never on the per-call path.
    KeyLength { got: usize, expected: usize },
    /// AEAD seal failure
    Encrypt(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::KeyLength { got, expected } => {
                write!(f, "encryption key is {} bytes, expected {}", got, expected)
            }
            CryptoError::Encrypt(msg) => write!(f, "encryption failed: {}", msg),
        }
    }
}

impl StdError for CryptoError {}

/// Central error type for token operations
///
/// `Expired` and `Invalid` are the two conditions callers branch on:
/// `Expired` means the signature was valid but temporal validity failed
/// (prompt re-authentication); `Invalid` covers bad signatures, malformed
/// tokens, and revocation mismatches, deliberately indistinguishable from
/// one another. Everything else passes the underlying failure through.
#[derive(Debug)]
pub enum AuthError {
    /// Valid signature, expired claims
    Expired,
    /// Bad signature, malformed token, or revocation mismatch
    Invalid,
    /// Signing a token failed
    Signing(String),
    /// Password hashing failed (the message never carries the password)
    PasswordHash(String),
    /// Store read/write failure
    Store(StoreError),
    /// ID generation failure
    Id(IdError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Expired => write!(f, "Expired"),
            AuthError::Invalid => write!(f, "Invalid"),
            AuthError::Signing(msg) => write!(f, "token signing failed: {}", msg),
            AuthError::PasswordHash(msg) => write!(f, "password hashing failed: {}", msg),
            AuthError::Store(e) => write!(f, "{}", e),
            AuthError::Id(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for AuthError {}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Store(err)
    }
}

impl From<IdError> for AuthError {
    fn from(err: IdError) -> Self {
        AuthError::Id(err)
    }
}
