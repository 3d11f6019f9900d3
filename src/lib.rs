/// Token lifecycle core for the membership service.
///
/// Issues, verifies, and rotates signed session tokens, generates
/// time-ordered unique identifiers, hashes and verifies passwords, and
/// seals sensitive payloads with AES-256-GCM. HTTP routing, response
/// envelopes, and the relational schema live in the embedding service;
/// this crate consumes the store only through the `TokenStore` seam and
/// secret material only through `AuthSettings`.

pub mod auth;
pub mod configuration;
pub mod crypto;
pub mod error;
pub mod idgen;
pub mod store;
pub mod telemetry;

pub use auth::{hash_password, verify_password, RefreshManager, TokenIssuer};
pub use crypto::{Ciphertext, SymmetricCipher};
pub use error::AuthError;
pub use idgen::SnowflakeGenerator;
pub use store::{InMemoryTokenStore, PgTokenStore, TokenStore};
