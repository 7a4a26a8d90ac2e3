//! `postboard-content`: users, posts and page assembly.
//!
//! Pure domain code: no IO. The infra crate feeds posts from the document
//! store into a [`PageBuilder`]; everything that decides what lands on a page
//! lives here.

pub mod page;
pub mod post;
pub mod user;

pub use page::{MAX_PAGE_SIZE, Page, PageBuilder, PageProgress, PageRequest, PageSize, paginate};
pub use post::{Post, PostRecord};
pub use user::{SealedPassword, User, UserRecord};
