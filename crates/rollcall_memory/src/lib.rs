// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-process cache transport backed by moka.
//!
//! [`InMemoryCache`] stores each record collection as encoded bytes, the same way a
//! remote cache tier would, and decodes on the way out. Use it as the cache
//! capability of a reader in single-process deployments or in tests that want real
//! serialization in the loop.
//!
//! # Quick Start
//!
//! ```
//! use rollcall_memory::InMemoryCache;
//! use rollcall_tier::{CacheKey, RecordCache};
//!
//! # futures::executor::block_on(async {
//! let cache = InMemoryCache::builder().name("students").build();
//! let key = CacheKey::ALL_RECORDS;
//!
//! cache.set(&key, vec!["Ada".to_string()]).await?;
//! let records: Option<Vec<String>> = cache.get(&key).await?;
//! assert_eq!(records, Some(vec!["Ada".to_string()]));
//! # Ok::<(), rollcall_tier::CacheError>(())
//! # });
//! ```
//!
//! Entries never expire and are never evicted; they leave only through
//! [`InMemoryCache::invalidate`].

pub mod builder;
pub mod tier;

#[doc(inline)]
pub use builder::InMemoryCacheBuilder;
#[doc(inline)]
pub use tier::InMemoryCache;
