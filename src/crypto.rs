/// Payload Sealing
///
/// One-way authenticated encryption of sensitive payloads with
/// AES-256-GCM, plus a SHA-256 text fingerprint helper. Callers that need
/// to read sealed data back do so outside this core; no decrypt path is
/// exposed here.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CryptoError;

/// Nonce size for AES-256-GCM (12 bytes / 96 bits)
const NONCE_SIZE: usize = 12;

/// AES-256 key length in bytes
const KEY_LENGTH: usize = 32;

/// Sealed payload envelope.
///
/// Both fields are base64 URL-safe (padded) strings; the same variant is
/// applied uniformly on encode and any future decode. Constructed fresh
/// per call and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ciphertext {
    pub iv: String,
    pub ciphertext: String,
}

/// AES-256-GCM sealing engine with a fixed, pre-shared key.
pub struct SymmetricCipher {
    cipher: Aes256Gcm,
}

impl SymmetricCipher {
    /// Create a cipher from raw key material.
    ///
    /// The key must be exactly 32 bytes; anything else is a configuration
    /// error surfaced here, once, at startup — never on the per-call path.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_LENGTH {
            return Err(CryptoError::KeyLength {
                got: key.len(),
                expected: KEY_LENGTH,
            });
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| CryptoError::Encrypt(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Seal a plaintext into a [`Ciphertext`] envelope.
    ///
    /// A fresh 96-bit nonce is drawn from the OS random source on every
    /// call, so encrypting the same plaintext twice yields two different,
    /// independently valid envelopes. Fails closed if randomness cannot
    /// be read; a nonce is never reused.
    pub fn encrypt(&self, plaintext: &str) -> Result<Ciphertext, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| CryptoError::Encrypt(format!("nonce generation failed: {}", e)))?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| CryptoError::Encrypt(e.to_string()))?;

        Ok(Ciphertext {
            iv: URL_SAFE.encode(nonce_bytes),
            ciphertext: URL_SAFE.encode(sealed),
        })
    }
}

/// One-way text fingerprint: SHA-256 rendered base64 URL-safe.
///
/// Used as a stable, non-reversible stand-in for sensitive strings.
pub fn fingerprint(plaintext: &str) -> String {
    let hash = Sha256::digest(plaintext.as_bytes());
    URL_SAFE.encode(hash)
}
