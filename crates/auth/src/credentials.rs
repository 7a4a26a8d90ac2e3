//! Credential guard: authenticated encryption of stored passwords.
//!
//! Passwords are sealed with ChaCha20-Poly1305 under a 256-bit process key.
//! The stored form is `hex(nonce || ciphertext || tag)` so the users collection
//! never holds plaintext.

use chacha20poly1305::aead::rand_core::RngCore;
use chacha20poly1305::aead::{Aead, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use subtle::ConstantTimeEq;
use thiserror::Error;

use postboard_core::DomainError;

/// Symmetric key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;
/// Nonce length required by ChaCha20-Poly1305.
pub const NONCE_LEN: usize = 12;
/// Poly1305 authentication tag length.
pub const TAG_LEN: usize = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("system entropy unavailable: {0}")]
    EntropyUnavailable(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("encryption failed")]
    EncryptionFailed,
    /// Tag mismatch, truncated blob or undecodable hex.
    #[error("authentication failure")]
    AuthenticationFailure,
}

impl From<CredentialError> for DomainError {
    fn from(_value: CredentialError) -> Self {
        // Every guard failure is a server-side fault; the detail stays in logs.
        DomainError::AuthenticationFailure
    }
}

/// 256-bit symmetric key. Debug output never shows key material.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialKey([u8; KEY_LEN]);

impl CredentialKey {
    /// Draw a fresh key from the OS CSPRNG.
    pub fn generate() -> Result<Self, CredentialError> {
        let mut bytes = [0u8; KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CredentialError::EntropyUnavailable(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CredentialError> {
        let bytes: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CredentialError::InvalidKey(format!("expected {KEY_LEN} bytes, got {}", bytes.len())))?;
        Ok(Self(bytes))
    }

    /// Parse a hex-encoded key (64 hex characters).
    pub fn from_hex(encoded: &str) -> Result<Self, CredentialError> {
        let bytes = hex::decode(encoded.trim()).map_err(|e| CredentialError::InvalidKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl core::fmt::Debug for CredentialKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("CredentialKey(<redacted>)")
    }
}

/// Seals and opens password blobs under one key.
///
/// Built once from configuration and shared read-only across requests.
#[derive(Clone)]
pub struct CredentialGuard {
    cipher: ChaCha20Poly1305,
}

impl CredentialGuard {
    pub fn new(key: &CredentialKey) -> Self {
        Self {
            cipher: ChaCha20Poly1305::new(Key::from_slice(&key.0)),
        }
    }

    /// Encrypt `plaintext`, returning `nonce || ciphertext || tag`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CredentialError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| CredentialError::EntropyUnavailable(e.to_string()))?;

        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| CredentialError::EncryptionFailed)?;

        let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&sealed);
        Ok(blob)
    }

    /// Verify and decrypt a blob produced by [`CredentialGuard::encrypt`].
    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, CredentialError> {
        if blob.len() < NONCE_LEN + TAG_LEN {
            return Err(CredentialError::AuthenticationFailure);
        }
        let (nonce, sealed) = blob.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CredentialError::AuthenticationFailure)
    }

    /// Encrypt a password into its stored hex form.
    pub fn seal_password(&self, password: &str) -> Result<String, CredentialError> {
        self.encrypt(password.as_bytes()).map(hex::encode)
    }

    /// Decode and decrypt a stored hex password.
    pub fn open_password(&self, stored: &str) -> Result<String, CredentialError> {
        let blob = hex::decode(stored).map_err(|_| CredentialError::AuthenticationFailure)?;
        let plaintext = self.decrypt(&blob)?;
        String::from_utf8(plaintext).map_err(|_| CredentialError::AuthenticationFailure)
    }

    /// Check a candidate password against a stored blob. The comparison runs
    /// in constant time for equal-length inputs.
    pub fn verify_password(&self, stored: &str, candidate: &str) -> Result<bool, CredentialError> {
        let plaintext = self.open_password(stored)?;
        Ok(plaintext.as_bytes().ct_eq(candidate.as_bytes()).into())
    }
}

impl core::fmt::Debug for CredentialGuard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialGuard").finish_non_exhaustive()
    }
}
