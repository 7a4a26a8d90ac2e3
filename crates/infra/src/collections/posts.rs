use std::pin::Pin;

use chrono::{DateTime, Utc};
use tokio_stream::{Stream, StreamExt};

use postboard_content::{Post, PostRecord};
use postboard_core::{DomainError, DomainResult, Entity, PostId};

use super::{decode, encode};
use crate::document_store::{DocumentStore, FieldFilter, FindOrder, StoreError};

/// Lazily decoded posts.
pub type PostStream<'a> = Pin<Box<dyn Stream<Item = Result<Post, StoreError>> + Send + 'a>>;

#[derive(Debug, Clone)]
pub struct PostCollection<S> {
    store: S,
}

impl<S> PostCollection<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert a post stamped with `now`.
    pub async fn create(&self, author: String, content: String, now: DateTime<Utc>) -> DomainResult<PostId> {
        let record = PostRecord::new(author, content, now);
        let id = self.store.insert(Post::COLLECTION, encode(&record)?).await?;
        Ok(PostId::new(id))
    }

    pub async fn get(&self, id: PostId) -> DomainResult<Post> {
        let doc = self
            .store
            .find_one(Post::COLLECTION, id.document_id())
            .await?
            .ok_or_else(|| DomainError::not_found("post"))?;
        let (id, record): (_, PostRecord) = decode(Post::COLLECTION, doc)?;
        Ok(Post::from_record(PostId::new(id), record))
    }

    /// Stream the posts whose author field equals `author`.
    ///
    /// Authors are matched by display name, so posts written under a previous
    /// name are not returned.
    pub fn by_author(&self, author: &str, order: FindOrder) -> PostStream<'_> {
        let docs = self
            .store
            .find(Post::COLLECTION, FieldFilter::eq(PostRecord::AUTHOR_FIELD, author), order);

        Box::pin(docs.map(|doc| {
            let (id, record): (_, PostRecord) = decode(Post::COLLECTION, doc?)?;
            Ok(Post::from_record(PostId::new(id), record))
        }))
    }
}
