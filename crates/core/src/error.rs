//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every failure a request can hit is one of these four kinds. Callers always
/// get the error back as a value; nothing here is logged-and-dropped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A user or post identifier did not resolve.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A request argument was malformed (page size, identifier, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An authenticated ciphertext failed verification or was malformed.
    #[error("authentication failure")]
    AuthenticationFailure,

    /// The document store failed, or returned a record that does not decode.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound(resource)
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Whether the failure is the caller's fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidArgument(_))
    }
}
