// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Test doubles for the store and cache capabilities.
//!
//! [`MockCache`] records every operation and supports failure injection and external
//! invalidation. [`MockStore`] counts queries and can be slowed down, held shut behind
//! a [`StoreValve`], or made to fail.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::{CacheError, CacheKey, RecordCache, RecordStore, StoreError, StoreErrorKind};

/// Recorded cache operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOp<R> {
    /// A get was issued for the key.
    Get(CacheKey),
    /// A set was issued for the key with the given collection.
    Set {
        /// The key that was written.
        key: CacheKey,
        /// The collection that was written.
        records: Vec<R>,
    },
}

type FailPredicate<R> = Box<dyn Fn(&CacheOp<R>) -> bool + Send + Sync>;

/// An in-memory cache that records operations and can be told to fail.
///
/// Clones share state, so a test can keep a handle while the reader owns another.
///
/// # Examples
///
/// ```
/// use rollcall_tier::{CacheKey, RecordCache, testing::{CacheOp, MockCache}};
///
/// # futures::executor::block_on(async {
/// let cache = MockCache::<u32>::new();
/// let key = CacheKey::ALL_RECORDS;
///
/// cache.set(&key, vec![1, 2]).await.unwrap();
/// assert_eq!(cache.get(&key).await.unwrap(), Some(vec![1, 2]));
///
/// cache.fail_when(|op| matches!(op, CacheOp::Get(_)));
/// assert!(cache.get(&key).await.is_err());
/// # });
/// ```
pub struct MockCache<R> {
    data: Arc<Mutex<HashMap<CacheKey, Vec<R>>>>,
    operations: Arc<Mutex<Vec<CacheOp<R>>>>,
    fail_when: Arc<Mutex<Option<FailPredicate<R>>>>,
}

impl<R: std::fmt::Debug> std::fmt::Debug for MockCache<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCache")
            .field("data", &self.data)
            .field("operations", &self.operations.lock().len())
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl<R> Clone for MockCache<R> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl<R> Default for MockCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> MockCache<R> {
    /// Creates an empty mock cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::default(),
            operations: Arc::default(),
            fail_when: Arc::default(),
        }
    }

    /// Creates a mock cache that already holds `records` under `key`.
    #[must_use]
    pub fn with_records(key: CacheKey, records: Vec<R>) -> Self {
        let cache = Self::new();
        cache.data.lock().insert(key, records);
        cache
    }

    /// Returns true if a collection is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Drops the entry under `key`, as an external invalidation would.
    pub fn remove(&self, key: &CacheKey) {
        self.data.lock().remove(key);
    }

    /// Sets a predicate that decides which operations fail with
    /// [`CacheErrorKind::Unavailable`](crate::CacheErrorKind::Unavailable).
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&CacheOp<R>) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns the number of recorded gets.
    #[must_use]
    pub fn get_count(&self) -> usize {
        self.operations.lock().iter().filter(|op| matches!(op, CacheOp::Get(_))).count()
    }

    /// Returns the number of recorded sets.
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.operations.lock().iter().filter(|op| matches!(op, CacheOp::Set { .. })).count()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn should_fail(&self, op: &CacheOp<R>) -> bool {
        self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(op))
    }
}

impl<R: Clone> MockCache<R> {
    /// Returns the collection stored under `key` without recording an operation.
    #[must_use]
    pub fn peek(&self, key: &CacheKey) -> Option<Vec<R>> {
        self.data.lock().get(key).cloned()
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<CacheOp<R>> {
        self.operations.lock().clone()
    }
}

impl<R> RecordCache<R> for MockCache<R>
where
    R: Clone + Send + Sync,
{
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<R>>, CacheError> {
        let op = CacheOp::Get(key.clone());
        let fail = self.should_fail(&op);
        self.operations.lock().push(op);
        if fail {
            return Err(CacheError::unavailable("mock: get failed"));
        }
        Ok(self.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &CacheKey, records: Vec<R>) -> Result<(), CacheError> {
        let op = CacheOp::Set {
            key: key.clone(),
            records: records.clone(),
        };
        let fail = self.should_fail(&op);
        self.operations.lock().push(op);
        if fail {
            return Err(CacheError::unavailable("mock: set failed"));
        }
        self.data.lock().insert(key.clone(), records);
        Ok(())
    }
}

/// Holds [`MockStore`] queries until opened.
///
/// Obtained from [`MockStore::valve`]. Queries that arrive while the valve is shut are
/// counted immediately but do not return until [`open`](Self::open) is called.
#[derive(Debug, Clone)]
pub struct StoreValve {
    sender: Arc<watch::Sender<bool>>,
}

impl StoreValve {
    /// Lets every held and future query through.
    pub fn open(&self) {
        self.sender.send_replace(true);
    }
}

#[derive(Debug)]
struct StoreState<R> {
    records: Mutex<Vec<R>>,
    calls: AtomicUsize,
    latency: Mutex<Option<Duration>>,
    failures: Mutex<Failures>,
    valve: Mutex<Option<watch::Receiver<bool>>>,
}

#[derive(Debug, Default)]
struct Failures {
    once: Vec<StoreErrorKind>,
    always: Option<StoreErrorKind>,
}

/// A backing store double that counts queries.
///
/// Clones share state.
///
/// # Examples
///
/// ```
/// use rollcall_tier::{RecordStore, StoreErrorKind, testing::MockStore};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new(vec![1_u32, 2]);
/// store.fail_once(StoreErrorKind::Unavailable);
///
/// assert!(store.query_all().await.is_err());
/// assert_eq!(store.query_all().await.unwrap(), vec![1, 2]);
/// assert_eq!(store.query_count(), 2);
/// # });
/// ```
#[derive(Debug)]
pub struct MockStore<R> {
    state: Arc<StoreState<R>>,
}

impl<R> Clone for MockStore<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<R> MockStore<R> {
    /// Creates a store that answers every query with `records`.
    #[must_use]
    pub fn new(records: Vec<R>) -> Self {
        Self {
            state: Arc::new(StoreState {
                records: Mutex::new(records),
                calls: AtomicUsize::new(0),
                latency: Mutex::new(None),
                failures: Mutex::default(),
                valve: Mutex::new(None),
            }),
        }
    }

    /// Makes every query sleep for `latency` before answering.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.state.latency.lock() = Some(latency);
        self
    }

    /// Shuts queries behind a valve and returns the handle that opens it.
    #[must_use]
    pub fn valve(&self) -> StoreValve {
        let (sender, receiver) = watch::channel(false);
        *self.state.valve.lock() = Some(receiver);
        StoreValve { sender: Arc::new(sender) }
    }

    /// Replaces the records future queries answer with.
    pub fn set_records(&self, records: Vec<R>) {
        *self.state.records.lock() = records;
    }

    /// Fails the next query with `kind`. Calls queue up in order.
    pub fn fail_once(&self, kind: StoreErrorKind) {
        self.state.failures.lock().once.push(kind);
    }

    /// Fails every query with `kind` until [`clear_failures`](Self::clear_failures).
    pub fn fail_always(&self, kind: StoreErrorKind) {
        self.state.failures.lock().always = Some(kind);
    }

    /// Clears every injected failure.
    pub fn clear_failures(&self) {
        *self.state.failures.lock() = Failures::default();
    }

    /// Returns how many queries have been issued.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.state.calls.load(Ordering::Acquire)
    }

    fn next_failure(&self) -> Option<StoreErrorKind> {
        let mut failures = self.state.failures.lock();
        if failures.once.is_empty() {
            failures.always
        } else {
            Some(failures.once.remove(0))
        }
    }
}

impl<R> RecordStore<R> for MockStore<R>
where
    R: Clone + Send + Sync,
{
    async fn query_all(&self) -> Result<Vec<R>, StoreError> {
        self.state.calls.fetch_add(1, Ordering::AcqRel);

        let valve = self.state.valve.lock().clone();
        if let Some(mut valve) = valve {
            loop {
                let open = *valve.borrow_and_update();
                // A dropped sender can never open the valve; answer anyway.
                if open || valve.changed().await.is_err() {
                    break;
                }
            }
        }

        let latency = *self.state.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match self.next_failure() {
            Some(StoreErrorKind::Unavailable) => Err(StoreError::unavailable("mock: store unreachable")),
            Some(_) => Err(StoreError::query("mock: query failed")),
            None => Ok(self.state.records.lock().clone()),
        }
    }
}
