// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The error returned by a failed read.

use rollcall_tier::{CacheKey, StoreError, StoreErrorKind};

/// A read that needed to populate the cache and could not.
///
/// Cache faults never produce this error; only a failed store query does. The
/// [`StoreError`] is kept as the source.
///
/// # Example
///
/// ```
/// use rollcall::{CachedReader, ReadError};
/// use rollcall_tier::{StoreErrorKind, testing::{MockCache, MockStore}};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new(vec![1_u32]);
/// store.fail_once(StoreErrorKind::Unavailable);
/// let reader: CachedReader<u32, _, _> = CachedReader::new(store, MockCache::new());
///
/// let error: ReadError = reader.get_all().await.unwrap_err();
/// assert_eq!(error.store_error_kind(), StoreErrorKind::Unavailable);
/// # });
/// ```
#[ohno::error]
#[display("failed to populate records for key {key}")]
pub struct ReadError {
    key: CacheKey,
    kind: StoreErrorKind,
}

impl ReadError {
    pub(crate) fn from_store(key: CacheKey, error: StoreError) -> Self {
        Self::caused_by(key, error.kind(), error)
    }

    /// Returns the key whose populate failed.
    #[must_use]
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Returns the kind of the underlying store failure.
    #[must_use]
    pub fn store_error_kind(&self) -> StoreErrorKind {
        self.kind
    }
}
