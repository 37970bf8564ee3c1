// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The read-through reader and its double-checked populate path.

use std::{fmt, marker::PhantomData, time::Duration};

use rollcall_tier::{CacheKey, RecordCache, RecordStore};
use tick::{Clock, Stopwatch};

use crate::{
    CachedReaderBuilder, KeyedGates, ReadError,
    telemetry::{ReaderActivity, ReaderName, ReaderTelemetry},
};

/// Which step of the read served the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ReadPath {
    /// The fast-path cache lookup hit; no gate was taken.
    Cache,
    /// The fast path missed, but another caller populated the cache while this one
    /// waited at the gate.
    CacheAfterWait,
    /// This caller queried the store and populated the cache.
    Store,
}

/// A read-through reader over one cached record collection.
///
/// Reads try the cache first. On a miss the reader takes the key's gate, looks in
/// the cache again, and only if the collection is still absent queries the store
/// and writes the result back. However many callers miss at the same time, one of
/// them queries the store and the rest are answered from the cache once it is warm.
///
/// The gate is scoped to the reader's [`KeyedGates`] registry. Each reader builds its
/// own registry unless one is passed to [`CachedReaderBuilder::gates`], so readers
/// over the same cache and key must share a registry to admit a single populate
/// between them.
///
/// Cache faults are never surfaced: a failed lookup counts as a miss and a failed
/// write is logged and dropped. Only a failed store query fails the read, as a
/// [`ReadError`], and the gate is always released so the next caller retries.
///
/// # Examples
///
/// ```
/// use rollcall::{CachedReader, ReadPath};
/// use rollcall_tier::testing::{MockCache, MockStore};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new(vec!["ada".to_string(), "grace".to_string()]);
/// let reader: CachedReader<String, _, _> = CachedReader::new(store.clone(), MockCache::new());
///
/// let (first, path) = reader.get_all_with_path().await?;
/// assert_eq!(path, ReadPath::Store);
///
/// let (second, path) = reader.get_all_with_path().await?;
/// assert_eq!(path, ReadPath::Cache);
/// assert_eq!(first, second);
/// assert_eq!(store.query_count(), 1);
/// # Ok::<(), rollcall::ReadError>(())
/// # });
/// ```
pub struct CachedReader<R, S, C> {
    pub(crate) store: S,
    pub(crate) cache: C,
    pub(crate) key: CacheKey,
    pub(crate) name: ReaderName,
    pub(crate) gates: KeyedGates,
    pub(crate) clock: Option<Clock>,
    pub(crate) telemetry: ReaderTelemetry,
    pub(crate) _records: PhantomData<fn() -> R>,
}

impl<R, S, C> fmt::Debug for CachedReader<R, S, C>
where
    S: fmt::Debug,
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedReader")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("store", &self.store)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<R, S, C> CachedReader<R, S, C> {
    /// Starts building a reader over `store` and `cache`.
    #[must_use]
    pub fn builder(store: S, cache: C) -> CachedReaderBuilder<R, S, C> {
        CachedReaderBuilder::new(store, cache)
    }

    /// Creates a reader with the default key, name, and telemetry.
    #[must_use]
    pub fn new(store: S, cache: C) -> Self {
        Self::builder(store, cache).build()
    }

    /// Returns the key the collection is cached under.
    #[must_use]
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Returns the name used in logs and metrics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the cache tier.
    #[must_use]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the gate registry this reader populates through.
    #[must_use]
    pub fn gates(&self) -> &KeyedGates {
        &self.gates
    }
}

impl<R, S, C> CachedReader<R, S, C>
where
    R: Clone + Send + Sync,
    S: RecordStore<R>,
    C: RecordCache<R>,
{
    /// Returns the full record collection, populating the cache from the store if it
    /// is cold.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] when a populate was required and the store query failed.
    /// Nothing is cached in that case.
    pub async fn get_all(&self) -> Result<Vec<R>, ReadError> {
        self.get_all_with_path().await.map(|(records, _)| records)
    }

    /// Same as [`get_all`](Self::get_all), also reporting which step served the records.
    ///
    /// # Errors
    ///
    /// Returns [`ReadError`] when a populate was required and the store query failed.
    pub async fn get_all_with_path(&self) -> Result<(Vec<R>, ReadPath), ReadError> {
        let stopwatch = self.clock.as_ref().map(Clock::stopwatch);

        if let Some(records) = self.lookup(stopwatch.as_ref()).await {
            self.record(ReaderActivity::Hit, stopwatch.as_ref());
            return Ok((records, ReadPath::Cache));
        }
        self.record(ReaderActivity::Miss, stopwatch.as_ref());

        // Held until return, on every path out of this function.
        let _gate = self.gates.acquire(&self.key).await;

        if let Some(records) = self.lookup(stopwatch.as_ref()).await {
            self.record(ReaderActivity::Coalesced, stopwatch.as_ref());
            return Ok((records, ReadPath::CacheAfterWait));
        }

        let records = match self.store.query_all().await {
            Ok(records) => records,
            Err(error) => {
                self.telemetry.record_error(
                    self.name,
                    &self.key,
                    ReaderActivity::StoreError,
                    elapsed(stopwatch.as_ref()),
                    &error,
                );
                return Err(ReadError::from_store(self.key.clone(), error));
            }
        };

        if let Err(error) = self.cache.set(&self.key, records.clone()).await {
            self.telemetry.record_error(
                self.name,
                &self.key,
                ReaderActivity::CacheSetError,
                elapsed(stopwatch.as_ref()),
                &error,
            );
        }

        self.record(ReaderActivity::Populated, stopwatch.as_ref());
        Ok((records, ReadPath::Store))
    }

    /// Looks the collection up in the cache, treating a faulty tier as a miss.
    async fn lookup(&self, stopwatch: Option<&Stopwatch>) -> Option<Vec<R>> {
        match self.cache.get(&self.key).await {
            Ok(records) => records,
            Err(error) => {
                self.telemetry
                    .record_error(self.name, &self.key, ReaderActivity::CacheGetError, elapsed(stopwatch), &error);
                None
            }
        }
    }

    fn record(&self, activity: ReaderActivity, stopwatch: Option<&Stopwatch>) {
        self.telemetry.record(self.name, &self.key, activity, elapsed(stopwatch));
    }
}

fn elapsed(stopwatch: Option<&Stopwatch>) -> Option<Duration> {
    stopwatch.map(Stopwatch::elapsed)
}
