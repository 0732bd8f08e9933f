//! Error types for membership and asset operations
//!
//! This module defines the failure taxonomy reported to callers of the
//! membership and asset services, plus the narrower error type returned by
//! storage collaborators.

use thiserror::Error;

/// Coarse classification of an [`OrgError`].
///
/// Lets the transport layer tell "you may not do this" apart from "this
/// does not exist", "the input itself is invalid" and "try again later".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller may not perform the operation.
    Denied,
    /// The organization or membership does not exist.
    Missing,
    /// The request itself is invalid.
    InvalidInput,
    /// A storage collaborator failed.
    Unavailable,
}

/// Organization service error types.
#[derive(Debug, Error)]
pub enum OrgError {
    /// Caller lacks the role required for this operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Unknown organization or membership
    #[error("Not found: {0}")]
    NotFound(String),

    /// The user is already a member of the organization
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The operation would leave the organization without an administrator
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Uploaded payload exceeds the configured ceiling
    #[error("Payload too large: limit is {limit} bytes")]
    PayloadTooLarge {
        /// Configured ceiling in bytes.
        limit: usize,
    },

    /// Declared content type is not an accepted image format
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Payload could not be read or is empty
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A storage collaborator failed; nothing is retried locally
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Result type for organization operations.
pub type OrgResult<T> = Result<T, OrgError>;

impl OrgError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrgError::Forbidden(_) | OrgError::InvariantViolation(_) => ErrorKind::Denied,
            OrgError::NotFound(_) => ErrorKind::Missing,
            OrgError::Conflict(_)
            | OrgError::PayloadTooLarge { .. }
            | OrgError::UnsupportedMediaType(_)
            | OrgError::InvalidPayload(_) => ErrorKind::InvalidInput,
            OrgError::StorageUnavailable(_) => ErrorKind::Unavailable,
        }
    }

    /// Check if this error should be logged at error level.
    ///
    /// Rejections caused by the caller are expected and are not server
    /// errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, OrgError::StorageUnavailable(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            OrgError::Forbidden(_) => 403,
            OrgError::NotFound(_) => 404,
            OrgError::Conflict(_) | OrgError::InvariantViolation(_) => 409,
            OrgError::PayloadTooLarge { .. } => 413,
            OrgError::UnsupportedMediaType(_) => 415,
            OrgError::InvalidPayload(_) => 400,
            OrgError::StorageUnavailable(_) => 503,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrgError::Forbidden(_) => "FORBIDDEN",
            OrgError::NotFound(_) => "NOT_FOUND",
            OrgError::Conflict(_) => "CONFLICT",
            OrgError::InvariantViolation(_) => "INVARIANT_VIOLATION",
            OrgError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            OrgError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            OrgError::InvalidPayload(_) => "INVALID_PAYLOAD",
            OrgError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
        }
    }
}

/// Errors returned by storage collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key (organization or membership) does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflicting concurrent mutation
    #[error("Write conflict: {0}")]
    Conflict(String),

    /// Backend failed or timed out
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for storage collaborator operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-level conflicts map to `StorageUnavailable`. `OrgError::Conflict`
/// is only raised by the membership service for duplicate members.
impl From<StoreError> for OrgError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => OrgError::NotFound(what),
            StoreError::Conflict(what) => {
                OrgError::StorageUnavailable(format!("write conflict: {}", what))
            }
            StoreError::Unavailable(reason) => OrgError::StorageUnavailable(reason),
        }
    }
}
