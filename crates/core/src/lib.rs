//! `postboard-core`: shared domain building blocks.
//!
//! Identifiers, the domain error taxonomy and the `Entity` trait. No storage or
//! HTTP concerns live here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{DocumentId, PostId, UserId};
