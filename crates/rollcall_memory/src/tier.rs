// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Byte-storing cache tier.

use bytes::Bytes;
use moka::future::Cache;
use rollcall_tier::{CacheError, CacheKey, RecordCache, codec};
use serde::{Serialize, de::DeserializeOwned};

use crate::builder::InMemoryCacheBuilder;

/// An in-process cache holding encoded record collections.
///
/// Clones are handles to the same storage.
///
/// # Examples
///
/// ```
/// use rollcall_memory::InMemoryCache;
/// use rollcall_tier::{CacheKey, RecordCache};
/// # futures::executor::block_on(async {
///
/// let cache = InMemoryCache::new();
/// let key = CacheKey::ALL_RECORDS;
///
/// // An empty collection is a cached value, not a miss.
/// cache.set(&key, Vec::<u32>::new()).await?;
/// let records: Option<Vec<u32>> = cache.get(&key).await?;
/// assert_eq!(records, Some(Vec::new()));
/// # Ok::<(), rollcall_tier::CacheError>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    inner: Cache<CacheKey, Bytes>,
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCache {
    /// Creates an empty cache with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder for configuring the cache.
    #[must_use]
    pub fn builder() -> InMemoryCacheBuilder {
        InMemoryCacheBuilder::new()
    }

    pub(crate) fn from_builder(builder: &InMemoryCacheBuilder) -> Self {
        let mut moka_builder = Cache::builder();

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        Self {
            inner: moka_builder.build(),
        }
    }

    /// Returns true if an entry is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns the encoded bytes stored under `key`.
    pub async fn get_raw(&self, key: &CacheKey) -> Option<Bytes> {
        self.inner.get(key).await
    }

    /// Stores already-encoded bytes under `key`.
    ///
    /// Reads decode these bytes, so anything that is not a valid collection surfaces
    /// as a [`Malformed`](rollcall_tier::CacheErrorKind::Malformed) error on `get`.
    pub async fn set_raw(&self, key: CacheKey, bytes: Bytes) {
        self.inner.insert(key, bytes).await;
    }

    /// Removes the entry under `key`.
    pub async fn invalidate(&self, key: &CacheKey) {
        self.inner.invalidate(key).await;
    }

    /// Returns the approximate number of entries.
    ///
    /// moka updates this lazily, so it may trail recent writes.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl<R> RecordCache<R> for InMemoryCache
where
    R: Serialize + DeserializeOwned + Send + Sync,
{
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<R>>, CacheError> {
        self.inner.get(key).await.map(|bytes| codec::decode(&bytes)).transpose()
    }

    async fn set(&self, key: &CacheKey, records: Vec<R>) -> Result<(), CacheError> {
        let bytes = codec::encode(&records)?;
        self.inner.insert(key.clone(), bytes).await;
        Ok(())
    }
}
