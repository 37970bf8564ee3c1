// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-key exclusive gates for the populate path.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use rollcall_tier::CacheKey;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type GateMap = HashMap<CacheKey, Arc<AsyncMutex<()>>>;

/// A registry of exclusive gates, one per cache key, created on first use.
///
/// Readers that share a registry share gates: two readers over the same key admit
/// one populate between them, while readers over different keys never wait on each
/// other. Clones are handles to the same registry.
///
/// The registry map is locked only while a gate is looked up or inserted; the gate
/// itself is an async mutex so it can be held across the store and cache calls.
///
/// # Examples
///
/// ```
/// use rollcall::KeyedGates;
/// use rollcall_tier::CacheKey;
///
/// # futures::executor::block_on(async {
/// let gates = KeyedGates::new();
/// let key = CacheKey::ALL_RECORDS;
///
/// let guard = gates.acquire(&key).await;
/// assert!(gates.is_held(&key));
/// drop(guard);
/// assert!(!gates.is_held(&key));
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyedGates {
    gates: Arc<Mutex<GateMap>>,
}

/// Exclusive access to one key's gate. Dropping it opens the gate.
#[derive(Debug)]
#[must_use = "the gate is released as soon as the guard is dropped"]
pub struct GateGuard {
    _guard: OwnedMutexGuard<()>,
}

impl KeyedGates {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until the gate for `key` is free and takes it.
    ///
    /// Waiters are admitted in arrival order. Dropping the returned future while it
    /// waits gives up the place in line without taking the gate.
    pub async fn acquire(&self, key: &CacheKey) -> GateGuard {
        let gate = self.gate(key);
        GateGuard {
            _guard: gate.lock_owned().await,
        }
    }

    /// Returns true if some caller currently holds the gate for `key`.
    #[must_use]
    pub fn is_held(&self, key: &CacheKey) -> bool {
        self.gates.lock().get(key).is_some_and(|gate| gate.try_lock().is_err())
    }

    /// Returns the number of gates created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gates.lock().len()
    }

    /// Returns true if no gate has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gates.lock().is_empty()
    }

    fn gate(&self, key: &CacheKey) -> Arc<AsyncMutex<()>> {
        let mut gates = self.gates.lock();
        Arc::clone(gates.entry(key.clone()).or_default())
    }
}
