//! Infrastructure layer: document store adapters, typed collections and the
//! user-posts paginator.

pub mod collections;
pub mod document_store;
pub mod paginator;

pub use collections::{PostCollection, UserCollection};
pub use document_store::{DocumentStore, InMemoryDocumentStore, PostgresDocumentStore, StoreError};
pub use paginator::CursorPaginator;
