//! Strongly-typed identifiers used across the domain.
//!
//! Every stored document is keyed by a [`DocumentId`]: a UUIDv7 rendered as 32
//! lowercase hex characters. UUIDv7 leads with a millisecond timestamp, so the
//! hex form sorts (byte-wise and lexicographically) in creation order. Page
//! cursors rely on that.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Length of the hex form of a [`DocumentId`].
pub const DOCUMENT_ID_HEX_LEN: usize = 32;

/// Store-assigned identifier of a document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Create a new time-ordered identifier.
    ///
    /// Only stores should call this; services never mint ids themselves.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Lowercase 32-character hex form.
    pub fn to_hex(&self) -> String {
        self.0.simple().to_string()
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0.simple(), f)
    }
}

impl FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != DOCUMENT_ID_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DomainError::invalid_argument(format!(
                "identifier must be {DOCUMENT_ID_HEX_LEN} hex characters"
            )));
        }
        let uuid = Uuid::try_parse(s)
            .map_err(|e| DomainError::invalid_argument(format!("identifier: {e}")))?;
        Ok(Self(uuid))
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.to_hex()
    }
}

macro_rules! impl_document_id_newtype {
    ($t:ident, $name:literal) => {
        #[doc = concat!("Identifier of a ", $name, " document.")]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(DocumentId);

        impl $t {
            pub fn new(id: DocumentId) -> Self {
                Self(id)
            }

            pub fn document_id(&self) -> DocumentId {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<DocumentId> for $t {
            fn from(value: DocumentId) -> Self {
                Self(value)
            }
        }

        impl From<$t> for DocumentId {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id = DocumentId::from_str(s)
                    .map_err(|e| DomainError::invalid_argument(format!("{} {}", $name, e)))?;
                Ok(Self(id))
            }
        }
    };
}

impl_document_id_newtype!(UserId, "user");
impl_document_id_newtype!(PostId, "post");
