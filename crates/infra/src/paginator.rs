//! Cursor paginator over a user's posts.
//!
//! Resolves the user, streams their posts in ascending id order and feeds them
//! to a [`PageBuilder`] until the page is full. The stream is dropped as soon as
//! the page fills, so the rest of the author's posts are never read.
//!
//! Ordering is requested explicitly ([`FindOrder::IdAscending`]) rather than
//! relying on the store's natural order; without it, chaining cursors could
//! skip or repeat posts.

use tokio_stream::StreamExt;
use tracing::instrument;

use postboard_content::{Page, PageBuilder, PageProgress, PageRequest};
use postboard_core::{DomainError, DomainResult, UserId};

use crate::collections::{PostCollection, UserCollection};
use crate::document_store::{DocumentStore, FindOrder};

#[derive(Debug, Clone)]
pub struct CursorPaginator<S> {
    users: UserCollection<S>,
    posts: PostCollection<S>,
}

impl<S> CursorPaginator<S>
where
    S: DocumentStore,
{
    pub fn new(users: UserCollection<S>, posts: PostCollection<S>) -> Self {
        Self { users, posts }
    }

    /// Return one page of `user_id`'s posts.
    ///
    /// Fails with `NotFound` if the user does not resolve, and with
    /// `StoreUnavailable` if the store fails or any scanned post is malformed.
    #[instrument(skip_all, fields(user_id = %user_id, page_size = request.page_size.get()), err)]
    pub async fn list_user_posts(&self, user_id: UserId, request: PageRequest) -> DomainResult<Page> {
        let user = self.users.get(user_id).await?;

        let mut posts = self.posts.by_author(&user.name, FindOrder::IdAscending);
        let mut builder = PageBuilder::new(request);
        let mut scanned = 0usize;

        while let Some(post) = posts.next().await {
            let post = post.map_err(DomainError::from)?;
            scanned += 1;
            if builder.offer(post) == PageProgress::Full {
                break;
            }
        }

        let page = builder.finish();
        tracing::debug!(scanned, returned = page.posts.len(), "assembled page");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use serde_json::json;

    use postboard_auth::{CredentialGuard, CredentialKey};
    use postboard_content::PageSize;
    use postboard_core::{DocumentId, PostId};

    use crate::document_store::{Document, DocumentStream, FieldFilter, InMemoryDocumentStore, StoreError};

    struct Fixture {
        store: Arc<InMemoryDocumentStore>,
        users: UserCollection<Arc<InMemoryDocumentStore>>,
        posts: PostCollection<Arc<InMemoryDocumentStore>>,
        paginator: CursorPaginator<Arc<InMemoryDocumentStore>>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryDocumentStore::new());
        let guard = CredentialGuard::new(&CredentialKey::generate().unwrap());
        let users = UserCollection::new(store.clone(), guard);
        let posts = PostCollection::new(store.clone());
        let paginator = CursorPaginator::new(users.clone(), posts.clone());
        Fixture {
            store,
            users,
            posts,
            paginator,
        }
    }

    fn request(size: usize, lower_bound: Option<PostId>) -> PageRequest {
        PageRequest::new(PageSize::new(size).unwrap(), lower_bound)
    }

    async fn seed_alice(f: &Fixture) -> (UserId, Vec<PostId>) {
        let alice = f.users.create("alice".to_string(), None, "hunter2").await.unwrap();
        let mut ids = Vec::new();
        for i in 1..=3 {
            ids.push(f.posts.create("alice".to_string(), format!("p{i}"), Utc::now()).await.unwrap());
        }
        f.posts.create("bob".to_string(), "not alice".to_string(), Utc::now()).await.unwrap();
        (alice, ids)
    }

    #[tokio::test]
    async fn two_pages_then_done() {
        let f = fixture();
        let (alice, ids) = seed_alice(&f).await;

        let first = f.paginator.list_user_posts(alice, request(2, None)).await.unwrap();
        assert_eq!(first.posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ids[0], ids[1]]);
        assert_eq!(first.next_cursor, Some(ids[1]));

        let second = f
            .paginator
            .list_user_posts(alice, request(2, first.next_cursor))
            .await
            .unwrap();
        assert_eq!(second.posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ids[2]]);
        assert_eq!(second.next_cursor, Some(ids[2]));

        let third = f
            .paginator
            .list_user_posts(alice, request(2, second.next_cursor))
            .await
            .unwrap();
        assert!(third.posts.is_empty());
        assert_eq!(third.next_cursor, None);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let f = fixture();
        seed_alice(&f).await;
        let unknown = UserId::new(DocumentId::generate());
        let err = f.paginator.list_user_posts(unknown, request(5, None)).await.unwrap_err();
        assert_eq!(err, DomainError::not_found("user"));
    }

    #[tokio::test]
    async fn user_without_posts_gets_empty_page() {
        let f = fixture();
        let carol = f.users.create("carol".to_string(), None, "pw").await.unwrap();
        let page = f.paginator.list_user_posts(carol, request(5, None)).await.unwrap();
        assert_eq!(page, Page::empty());
    }

    #[tokio::test]
    async fn posts_follow_the_current_display_name() {
        let f = fixture();
        let (_alice, _ids) = seed_alice(&f).await;
        // A second account sharing the name sees the same posts: authors are
        // matched by name, not by user id.
        let namesake = f.users.create("alice".to_string(), None, "other").await.unwrap();
        let page = f.paginator.list_user_posts(namesake, request(10, None)).await.unwrap();
        assert_eq!(page.posts.len(), 3);
    }

    #[tokio::test]
    async fn malformed_post_fails_only_that_request() {
        let f = fixture();
        let (alice, ids) = seed_alice(&f).await;
        f.store
            .insert("posts", json!({ "author": "alice", "content": 17 }))
            .await
            .unwrap();

        let err = f.paginator.list_user_posts(alice, request(10, None)).await.unwrap_err();
        assert!(matches!(err, DomainError::StoreUnavailable(_)));

        // A page that fills before reaching the bad record still succeeds.
        let page = f.paginator.list_user_posts(alice, request(3, None)).await.unwrap();
        assert_eq!(page.posts.iter().map(|p| p.id).collect::<Vec<_>>(), ids);
    }

    /// Store whose natural order is reversed; the paginator must still page
    /// in id order because it asks for it.
    struct ReversedStore(InMemoryDocumentStore);

    #[async_trait::async_trait]
    impl DocumentStore for ReversedStore {
        async fn insert(&self, collection: &str, body: serde_json::Value) -> Result<DocumentId, StoreError> {
            self.0.insert(collection, body).await
        }

        async fn find_one(&self, collection: &str, id: DocumentId) -> Result<Option<Document>, StoreError> {
            self.0.find_one(collection, id).await
        }

        fn find(&self, collection: &str, filter: FieldFilter, order: FindOrder) -> DocumentStream<'_> {
            match order {
                FindOrder::IdAscending => self.0.find(collection, filter, order),
                FindOrder::Natural => {
                    let mut docs = self.0.matching(collection, &filter, order).unwrap_or_default();
                    docs.reverse();
                    Box::pin(tokio_stream::iter(docs.into_iter().map(Ok::<_, StoreError>)))
                }
            }
        }
    }

    #[tokio::test]
    async fn paging_is_id_ordered_even_if_natural_order_is_not() {
        let store = Arc::new(ReversedStore(InMemoryDocumentStore::new()));
        let guard = CredentialGuard::new(&CredentialKey::generate().unwrap());
        let users = UserCollection::new(store.clone(), guard);
        let posts = PostCollection::new(store.clone());
        let paginator = CursorPaginator::new(users.clone(), posts.clone());

        let alice = users.create("alice".to_string(), None, "pw").await.unwrap();
        let mut ids = Vec::new();
        for i in 0..7 {
            ids.push(posts.create("alice".to_string(), format!("{i}"), Utc::now()).await.unwrap());
        }

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = paginator.list_user_posts(alice, request(3, cursor)).await.unwrap();
            if page.posts.is_empty() {
                break;
            }
            seen.extend(page.posts.iter().map(|p| p.id));
            cursor = page.next_cursor;
        }
        assert_eq!(seen, ids);
    }
}
