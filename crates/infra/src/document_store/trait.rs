use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;
use tokio_stream::Stream;

use postboard_core::{DocumentId, DomainError};

/// A stored document: store-assigned id plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub body: JsonValue,
}

/// Exact-match predicate on a top-level field of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: JsonValue,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, body: &JsonValue) -> bool {
        body.get(&self.field) == Some(&self.value)
    }
}

/// Iteration order of [`DocumentStore::find`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FindOrder {
    /// Whatever order the backend produces; callers must treat it as unordered.
    Natural,
    /// Ascending by document id (byte-wise, equal to hex order).
    IdAscending,
}

/// Lazy sequence of documents. Dropping it stops the scan.
pub type DocumentStream<'a> = Pin<Box<dyn Stream<Item = Result<Document, StoreError>> + Send + 'a>>;

/// Document store operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not serve the request (connection, query, lock).
    #[error("store backend error: {0}")]
    Backend(String),

    /// A stored or submitted document has the wrong shape.
    #[error("malformed document: {0}")]
    Malformed(String),
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        DomainError::store_unavailable(value.to_string())
    }
}

/// Collection-oriented document store.
///
/// Implementations must:
/// - assign a fresh, time-ordered [`DocumentId`] on every insert
/// - only accept JSON objects as bodies
/// - honour [`FindOrder::IdAscending`] when asked
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a body into `collection`, returning the assigned id.
    async fn insert(&self, collection: &str, body: JsonValue) -> Result<DocumentId, StoreError>;

    /// Fetch one document by id. `Ok(None)` when it does not exist.
    async fn find_one(&self, collection: &str, id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// Stream every document in `collection` matching `filter`.
    fn find(&self, collection: &str, filter: FieldFilter, order: FindOrder) -> DocumentStream<'_>;
}

#[async_trait::async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn insert(&self, collection: &str, body: JsonValue) -> Result<DocumentId, StoreError> {
        (**self).insert(collection, body).await
    }

    async fn find_one(&self, collection: &str, id: DocumentId) -> Result<Option<Document>, StoreError> {
        (**self).find_one(collection, id).await
    }

    fn find(&self, collection: &str, filter: FieldFilter, order: FindOrder) -> DocumentStream<'_> {
        (**self).find(collection, filter, order)
    }
}
