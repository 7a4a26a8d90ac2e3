//! Typed access to the `users` and `posts` collections.
//!
//! These wrap a [`DocumentStore`](crate::document_store::DocumentStore) and do
//! the JSON <-> entity mapping, so a record that fails to decode surfaces as a
//! [`StoreError::Malformed`](crate::document_store::StoreError) on the request
//! that read it.

pub mod posts;
pub mod users;

pub use posts::PostCollection;
pub use users::UserCollection;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::document_store::{Document, StoreError};

fn encode<T: Serialize>(record: &T) -> Result<JsonValue, StoreError> {
    serde_json::to_value(record).map_err(|e| StoreError::Malformed(format!("encode: {e}")))
}

fn decode<T: DeserializeOwned>(collection: &str, doc: Document) -> Result<(postboard_core::DocumentId, T), StoreError> {
    let record = serde_json::from_value(doc.body)
        .map_err(|e| StoreError::Malformed(format!("{collection}/{}: {e}", doc.id)))?;
    Ok((doc.id, record))
}
