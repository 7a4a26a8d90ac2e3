//! Store and collection wiring shared by every handler.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use postboard_auth::{CredentialGuard, CredentialKey};
use postboard_content::{Page, PageRequest, Post, User};
use postboard_core::{DomainResult, PostId, UserId};
use postboard_infra::{
    CursorPaginator, DocumentStore, InMemoryDocumentStore, PostCollection, PostgresDocumentStore, UserCollection,
};

use crate::config::{ApiConfig, StoreConfig};

/// Store handle shared across requests.
pub type SharedStore = Arc<dyn DocumentStore>;

#[derive(Clone)]
pub struct AppServices {
    users: UserCollection<SharedStore>,
    posts: PostCollection<SharedStore>,
    paginator: CursorPaginator<SharedStore>,
}

impl AppServices {
    pub fn new(store: SharedStore, guard: CredentialGuard) -> Self {
        let users = UserCollection::new(store.clone(), guard);
        let posts = PostCollection::new(store);
        let paginator = CursorPaginator::new(users.clone(), posts.clone());
        Self { users, posts, paginator }
    }

    /// Services over a fresh in-memory store.
    pub fn in_memory(guard: CredentialGuard) -> Self {
        Self::new(Arc::new(InMemoryDocumentStore::new()), guard)
    }

    pub async fn create_user(&self, name: String, email: Option<String>, password: &str) -> DomainResult<UserId> {
        self.users.create(name, email, password).await
    }

    pub async fn get_user(&self, id: UserId) -> DomainResult<User> {
        self.users.get(id).await
    }

    /// Create a post stamped with the server clock.
    pub async fn create_post(&self, author: String, content: String) -> DomainResult<PostId> {
        self.posts.create(author, content, Utc::now()).await
    }

    pub async fn get_post(&self, id: PostId) -> DomainResult<Post> {
        self.posts.get(id).await
    }

    pub async fn list_user_posts(&self, user_id: UserId, request: PageRequest) -> DomainResult<Page> {
        self.paginator.list_user_posts(user_id, request).await
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let key = match &config.credential_key {
        Some(key) => key.clone(),
        None => {
            tracing::warn!(
                "CREDENTIAL_KEY not set, generated a random key; stored passwords will not decrypt after a restart"
            );
            CredentialKey::generate().context("failed to generate credential key")?
        }
    };
    let guard = CredentialGuard::new(&key);

    let store: SharedStore = match &config.store {
        StoreConfig::InMemory => {
            tracing::info!("using in-memory document store");
            Arc::new(InMemoryDocumentStore::new())
        }
        StoreConfig::Postgres { url, max_connections } => {
            tracing::info!(max_connections, "connecting to postgres document store");
            let store = PostgresDocumentStore::connect(url, *max_connections)
                .await
                .context("failed to connect to postgres")?;
            Arc::new(store)
        }
    };

    Ok(AppServices::new(store, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use postboard_content::PageSize;
    use postboard_core::DomainError;

    fn services() -> AppServices {
        AppServices::in_memory(CredentialGuard::new(&CredentialKey::generate().unwrap()))
    }

    #[tokio::test]
    async fn builds_in_memory_services_without_a_key() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        let services = build_services(&config).await.unwrap();
        let id = services.create_user("alice".to_string(), None, "pw").await.unwrap();
        assert_eq!(services.get_user(id).await.unwrap().name, "alice");
    }

    #[tokio::test]
    async fn posts_and_pages_share_one_store() {
        let services = services();
        let alice = services.create_user("alice".to_string(), None, "pw").await.unwrap();
        let post = services.create_post("alice".to_string(), "hi".to_string()).await.unwrap();

        let page = services
            .list_user_posts(alice, PageRequest::new(PageSize::new(10).unwrap(), None))
            .await
            .unwrap();
        assert_eq!(page.next_cursor, Some(post));
        assert_eq!(services.get_post(post).await.unwrap().content, "hi");
    }

    #[tokio::test]
    async fn lookups_of_unknown_ids_are_not_found() {
        let services = services();
        let missing = postboard_core::DocumentId::generate();
        assert_eq!(
            services.get_user(UserId::new(missing)).await,
            Err(DomainError::not_found("user"))
        );
        assert_eq!(
            services.get_post(PostId::new(missing)).await,
            Err(DomainError::not_found("post"))
        );
    }
}
