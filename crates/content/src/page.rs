//! Cursor page assembly.
//!
//! A page is built by offering posts, in ascending id order, to a
//! [`PageBuilder`]. The builder drops posts at or below the cursor and reports
//! [`PageProgress::Full`] as soon as the page holds `page_size` posts, so the
//! caller can stop reading its source early.
//!
//! Cursors are stateless: the id of the last post on a page is handed back to
//! the client, which re-submits it as the exclusive lower bound of the next
//! request. Chaining pages covers every post exactly once provided the source
//! yields posts in ascending id order.

use core::num::{IntErrorKind, NonZeroUsize};

use postboard_core::{DomainError, DomainResult, PostId};

use crate::post::Post;

/// Upper bound on a single page; larger requests are clamped.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Positive, clamped page size.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub fn new(size: usize) -> DomainResult<Self> {
        let size = NonZeroUsize::new(size.min(MAX_PAGE_SIZE))
            .ok_or_else(|| DomainError::invalid_argument("limit must be a positive integer"))?;
        Ok(Self(size))
    }

    /// Parse the `limit` query parameter. Missing, non-numeric and zero values
    /// are rejected; values above [`MAX_PAGE_SIZE`] clamp to it.
    pub fn parse(raw: Option<&str>) -> DomainResult<Self> {
        let raw = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DomainError::invalid_argument("limit is required"))?;
        let size = match raw.parse::<usize>() {
            Ok(size) => size,
            // A run of digits too large for usize is still a positive integer.
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => MAX_PAGE_SIZE,
            Err(_) => {
                return Err(DomainError::invalid_argument(format!(
                    "limit must be a positive integer, got {raw:?}"
                )));
            }
        };
        Self::new(size)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

/// What the client asked for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_size: PageSize,
    /// Exclusive lower bound: only posts with a strictly greater id qualify.
    pub lower_bound: Option<PostId>,
}

impl PageRequest {
    pub fn new(page_size: PageSize, lower_bound: Option<PostId>) -> Self {
        Self { page_size, lower_bound }
    }

    /// Build a request from raw query parameters.
    ///
    /// A malformed cursor is treated as absent rather than rejected.
    pub fn from_query(limit: Option<&str>, lower_bound: Option<&str>) -> DomainResult<Self> {
        let page_size = PageSize::parse(limit)?;
        let lower_bound = lower_bound.and_then(|raw| raw.trim().parse::<PostId>().ok());
        Ok(Self::new(page_size, lower_bound))
    }

    /// Whether a post with `id` lies past the cursor.
    pub fn admits(&self, id: &PostId) -> bool {
        match &self.lower_bound {
            Some(bound) => id > bound,
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub posts: Vec<Post>,
    /// Id of the last post on the page; `None` when the page is empty.
    pub next_cursor: Option<PostId>,
}

impl Page {
    pub fn empty() -> Self {
        Self {
            posts: Vec::new(),
            next_cursor: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PageProgress {
    /// More posts may be offered.
    Open,
    /// The page holds `page_size` posts; stop reading.
    Full,
}

#[derive(Debug)]
pub struct PageBuilder {
    request: PageRequest,
    posts: Vec<Post>,
}

impl PageBuilder {
    pub fn new(request: PageRequest) -> Self {
        Self {
            posts: Vec::with_capacity(request.page_size.get().min(64)),
            request,
        }
    }

    /// Offer the next post from the source.
    pub fn offer(&mut self, post: Post) -> PageProgress {
        if !self.is_full() && self.request.admits(&post.id) {
            self.posts.push(post);
        }
        if self.is_full() {
            PageProgress::Full
        } else {
            PageProgress::Open
        }
    }

    pub fn is_full(&self) -> bool {
        self.posts.len() >= self.request.page_size.get()
    }

    pub fn finish(self) -> Page {
        let next_cursor = self.posts.last().map(|p| p.id);
        Page {
            posts: self.posts,
            next_cursor,
        }
    }
}

/// Assemble a page from an in-order source, stopping at the first full page.
pub fn paginate<I>(request: PageRequest, posts: I) -> Page
where
    I: IntoIterator<Item = Post>,
{
    let mut builder = PageBuilder::new(request);
    for post in posts {
        if builder.offer(post) == PageProgress::Full {
            break;
        }
    }
    builder.finish()
}
