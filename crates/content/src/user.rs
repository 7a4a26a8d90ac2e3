//! User documents.

use serde::{Deserialize, Serialize};

use postboard_core::{Entity, UserId};

/// Hex-encoded `nonce || ciphertext || tag` produced by the credential guard.
///
/// Wrapping the string keeps plaintext passwords and sealed blobs from being
/// mixed up at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SealedPassword(String);

impl SealedPassword {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Body of a document in the `users` collection (the id lives beside it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Display name. Posts reference users by this value, not by id.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: SealedPassword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub password: SealedPassword,
}

impl User {
    pub fn from_record(id: UserId, record: UserRecord) -> Self {
        Self {
            id,
            name: record.name,
            email: record.email,
            password: record.password,
        }
    }
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
}
