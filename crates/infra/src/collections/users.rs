use postboard_auth::CredentialGuard;
use postboard_content::{SealedPassword, User, UserRecord};
use postboard_core::{DomainError, DomainResult, Entity, UserId};

use super::{decode, encode};
use crate::document_store::DocumentStore;

/// Users collection. Passwords are sealed here, before anything reaches the
/// store.
#[derive(Debug, Clone)]
pub struct UserCollection<S> {
    store: S,
    guard: CredentialGuard,
}

impl<S> UserCollection<S>
where
    S: DocumentStore,
{
    pub fn new(store: S, guard: CredentialGuard) -> Self {
        Self { store, guard }
    }

    pub fn guard(&self) -> &CredentialGuard {
        &self.guard
    }

    /// Seal the password and insert the user.
    pub async fn create(&self, name: String, email: Option<String>, password: &str) -> DomainResult<UserId> {
        let sealed = self.guard.seal_password(password).map_err(|e| {
            tracing::error!(error = %e, "failed to seal password");
            DomainError::from(e)
        })?;

        let record = UserRecord {
            name,
            email,
            password: SealedPassword::new(sealed),
        };
        let id = self.store.insert(User::COLLECTION, encode(&record)?).await?;
        Ok(UserId::new(id))
    }

    /// Resolve a user by id.
    pub async fn get(&self, id: UserId) -> DomainResult<User> {
        let doc = self
            .store
            .find_one(User::COLLECTION, id.document_id())
            .await?
            .ok_or_else(|| DomainError::not_found("user"))?;
        let (id, record): (_, UserRecord) = decode(User::COLLECTION, doc)?;
        Ok(User::from_record(UserId::new(id), record))
    }

    /// Check `candidate` against the stored password of `id`.
    pub async fn verify_password(&self, id: UserId, candidate: &str) -> DomainResult<bool> {
        let user = self.get(id).await?;
        self.guard
            .verify_password(user.password.as_str(), candidate)
            .map_err(DomainError::from)
    }
}
