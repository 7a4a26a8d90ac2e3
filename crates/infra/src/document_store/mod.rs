//! Document store boundary.
//!
//! The store owns identifier assignment and serializes access to its storage.
//! Everything above it works with [`Document`]s: a store-assigned id next to a
//! JSON body.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use r#trait::{Document, DocumentStore, DocumentStream, FieldFilter, FindOrder, StoreError};
