// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(docsrs, feature(doc_cfg))]

//! A read-through record cache that populates each cold key exactly once.
//!
//! [`CachedReader`] serves a record collection from a fast [`RecordCache`] and falls
//! back to a slower [`RecordStore`] when the cache is cold. Concurrent misses are
//! funneled through a per-key gate and checked against the cache a second time, so a
//! burst of readers hitting a cold cache produces one store query rather than one per
//! reader.
//!
//! # Quick Start
//!
//! ```
//! use rollcall::CachedReader;
//! use rollcall_tier::testing::{MockCache, MockStore};
//!
//! # futures::executor::block_on(async {
//! let store = MockStore::new(vec![1_u32, 2, 3]);
//! let reader: CachedReader<u32, _, _> = CachedReader::new(store.clone(), MockCache::new());
//!
//! assert_eq!(reader.get_all().await?, vec![1, 2, 3]);
//! assert_eq!(reader.get_all().await?, vec![1, 2, 3]);
//! assert_eq!(store.query_count(), 1);
//! # Ok::<(), rollcall::ReadError>(())
//! # });
//! ```
//!
//! # Sharing gates
//!
//! Each reader owns a [`KeyedGates`] registry by default. Readers over the same cache
//! and key should share one through [`CachedReaderBuilder::gates`] so that they admit
//! a single populate between them.
//!
//! # Failure behavior
//!
//! - A cache lookup that fails counts as a miss.
//! - A cache write that fails is logged and the read still succeeds.
//! - A store query that fails is returned as a [`ReadError`]; nothing is cached and
//!   the next read tries again.
//!
//! # Features
//!
//! - `memory` (default): re-exports [`InMemoryCache`], the `moka`-backed tier.
//! - `metrics`: OpenTelemetry metrics through [`TelemetryConfig::with_metrics`].
//! - `test-util`: re-exports `rollcall_tier::testing` as [`testing`], the store and
//!   cache doubles.

mod builder;
mod error;
mod gate;
mod reader;
mod telemetry;

pub use builder::CachedReaderBuilder;
pub use error::ReadError;
pub use gate::{GateGuard, KeyedGates};
pub use reader::{CachedReader, ReadPath};
#[cfg(feature = "memory")]
pub use rollcall_memory::{InMemoryCache, InMemoryCacheBuilder};
pub use rollcall_tier::{CacheError, CacheErrorKind, CacheKey, RecordCache, RecordStore, StoreError, StoreErrorKind};
pub use telemetry::TelemetryConfig;

#[cfg(feature = "test-util")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
pub use rollcall_tier::testing;
