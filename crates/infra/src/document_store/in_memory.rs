use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use postboard_core::DocumentId;

use super::r#trait::{Document, DocumentStore, DocumentStream, FieldFilter, FindOrder, StoreError};

/// In-memory document store.
///
/// Intended for tests/dev. Each collection keeps documents in insertion order,
/// which is what [`FindOrder::Natural`] yields.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> StoreError {
        StoreError::Backend("lock poisoned".to_string())
    }

    /// Snapshot the matching documents. The lock is released before the
    /// caller starts consuming them.
    pub(crate) fn matching(&self, collection: &str, filter: &FieldFilter, order: FindOrder) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::lock_poisoned())?;

        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(&d.body)).cloned().collect())
            .unwrap_or_default();

        if order == FindOrder::IdAscending {
            docs.sort_by_key(|d| d.id);
        }
        Ok(docs)
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, collection: &str, body: JsonValue) -> Result<DocumentId, StoreError> {
        if !body.is_object() {
            return Err(StoreError::Malformed("document body must be a JSON object".to_string()));
        }

        let mut collections = self.collections.write().map_err(|_| Self::lock_poisoned())?;
        let id = DocumentId::generate();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document { id, body });
        Ok(id)
    }

    async fn find_one(&self, collection: &str, id: DocumentId) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::lock_poisoned())?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    fn find(&self, collection: &str, filter: FieldFilter, order: FindOrder) -> DocumentStream<'_> {
        match self.matching(collection, &filter, order) {
            Ok(docs) => Box::pin(tokio_stream::iter(docs.into_iter().map(Ok::<_, StoreError>))),
            Err(e) => Box::pin(tokio_stream::once(Err(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_stream::StreamExt;

    async fn collect(stream: DocumentStream<'_>) -> Vec<Document> {
        stream.map(|r| r.unwrap()).collect().await
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = InMemoryDocumentStore::new();
        let a = store.insert("posts", json!({ "n": 1 })).await.unwrap();
        let b = store.insert("posts", json!({ "n": 2 })).await.unwrap();
        assert!(a < b);
    }

    #[tokio::test]
    async fn non_object_bodies_are_rejected() {
        let store = InMemoryDocumentStore::new();
        let err = store.insert("posts", json!("just a string")).await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[tokio::test]
    async fn find_one_is_scoped_to_collection() {
        let store = InMemoryDocumentStore::new();
        let id = store.insert("users", json!({ "name": "alice" })).await.unwrap();

        let found = store.find_one("users", id).await.unwrap().unwrap();
        assert_eq!(found.body["name"], "alice");
        assert_eq!(store.find_one("posts", id).await.unwrap(), None);
        assert_eq!(store.find_one("users", DocumentId::generate()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn find_filters_by_exact_field_value() {
        let store = InMemoryDocumentStore::new();
        store.insert("posts", json!({ "author": "alice" })).await.unwrap();
        store.insert("posts", json!({ "author": "bob" })).await.unwrap();
        store.insert("posts", json!({ "author": "Alice" })).await.unwrap();
        store.insert("posts", json!({ "content": "no author" })).await.unwrap();

        let docs = collect(store.find("posts", FieldFilter::eq("author", "alice"), FindOrder::Natural)).await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].body["author"], "alice");
    }

    #[tokio::test]
    async fn id_ascending_sorts_whatever_the_insert_order() {
        let store = InMemoryDocumentStore::new();
        let early = DocumentId::generate();
        let late = DocumentId::generate();
        {
            // Simulate a backend whose natural order disagrees with id order.
            let mut collections = store.collections.write().unwrap();
            let posts = collections.entry("posts".to_string()).or_default();
            posts.push(Document { id: late, body: json!({ "author": "alice" }) });
            posts.push(Document { id: early, body: json!({ "author": "alice" }) });
        }

        let filter = FieldFilter::eq("author", "alice");
        let natural = collect(store.find("posts", filter.clone(), FindOrder::Natural)).await;
        assert_eq!(natural.iter().map(|d| d.id).collect::<Vec<_>>(), vec![late, early]);

        let sorted = collect(store.find("posts", filter, FindOrder::IdAscending)).await;
        assert_eq!(sorted.iter().map(|d| d.id).collect::<Vec<_>>(), vec![early, late]);
    }
}
