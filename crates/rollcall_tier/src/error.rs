// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for store and cache operations.

use std::fmt;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// What went wrong while talking to a cache tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CacheErrorKind {
    /// The cache tier could not be reached.
    Unavailable,
    /// The tier answered, but the stored value is not a valid record collection.
    Malformed,
}

impl fmt::Display for CacheErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unavailable => "cache unavailable",
            Self::Malformed => "malformed cache value",
        })
    }
}

/// An error from a cache operation.
///
/// # Example
///
/// ```
/// use rollcall_tier::{CacheError, CacheErrorKind};
///
/// let error = CacheError::unavailable("connection refused");
/// assert_eq!(error.kind(), CacheErrorKind::Unavailable);
/// ```
#[ohno::error]
#[display("{kind}")]
pub struct CacheError {
    kind: CacheErrorKind,
}

impl CacheError {
    /// Creates an error for a cache tier that could not be reached.
    pub fn unavailable(cause: impl Into<Cause>) -> Self {
        Self::caused_by(CacheErrorKind::Unavailable, cause)
    }

    /// Creates an error for a stored value that could not be decoded.
    pub fn malformed(cause: impl Into<Cause>) -> Self {
        Self::caused_by(CacheErrorKind::Malformed, cause)
    }

    /// Returns what went wrong.
    #[must_use]
    pub fn kind(&self) -> CacheErrorKind {
        self.kind
    }
}

/// What went wrong while querying the backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// The backing store could not be reached.
    Unavailable,
    /// The query was issued but failed or was malformed.
    Query,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unavailable => "store unavailable",
            Self::Query => "store query failed",
        })
    }
}

/// An error from the backing store.
///
/// # Example
///
/// ```
/// use rollcall_tier::{StoreError, StoreErrorKind};
///
/// let error = StoreError::query("syntax error near FROM");
/// assert_eq!(error.kind(), StoreErrorKind::Query);
/// assert!(error.to_string().starts_with("store query failed"));
/// ```
#[ohno::error]
#[display("{kind}")]
pub struct StoreError {
    kind: StoreErrorKind,
}

impl StoreError {
    /// Creates an error for a store that could not be reached.
    pub fn unavailable(cause: impl Into<Cause>) -> Self {
        Self::caused_by(StoreErrorKind::Unavailable, cause)
    }

    /// Creates an error for a query that failed to execute.
    pub fn query(cause: impl Into<Cause>) -> Self {
        Self::caused_by(StoreErrorKind::Query, cause)
    }

    /// Returns what went wrong.
    #[must_use]
    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }
}
