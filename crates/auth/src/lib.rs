//! `postboard-auth`: at-rest credential protection.
//!
//! This crate has no HTTP or storage dependencies. It turns
//! plaintext passwords into hex-encoded authenticated ciphertext and back.

pub mod credentials;

pub use credentials::{CredentialError, CredentialGuard, CredentialKey, KEY_LEN, NONCE_LEN, TAG_LEN};
