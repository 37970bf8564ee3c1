// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Capability traits for read-through record caching.
//!
//! A read-through reader sits between two collaborators it does not own:
//!
//! - a [`RecordStore`], the slow canonical source that can return every record at once;
//! - a [`RecordCache`], the fast tier that holds the whole collection under one [`CacheKey`].
//!
//! This crate defines those two seams together with their error types, so that
//! transports (an in-process cache, a remote cache client, a database gateway) can be
//! implemented independently of the reader in `rollcall`.
//!
//! # Implementing a Store
//!
//! ```
//! use rollcall_tier::{RecordStore, StoreError};
//!
//! struct Fixed(Vec<u32>);
//!
//! impl RecordStore<u32> for Fixed {
//!     async fn query_all(&self) -> Result<Vec<u32>, StoreError> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```
//!
//! # Implementing a Cache
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//!
//! use rollcall_tier::{CacheError, CacheKey, RecordCache};
//!
//! struct Simple(Mutex<HashMap<CacheKey, Vec<u32>>>);
//!
//! impl RecordCache<u32> for Simple {
//!     async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u32>>, CacheError> {
//!         let map = self.0.lock().map_err(|e| CacheError::unavailable(e.to_string()))?;
//!         Ok(map.get(key).cloned())
//!     }
//!
//!     async fn set(&self, key: &CacheKey, records: Vec<u32>) -> Result<(), CacheError> {
//!         let mut map = self.0.lock().map_err(|e| CacheError::unavailable(e.to_string()))?;
//!         map.insert(key.clone(), records);
//!         Ok(())
//!     }
//! }
//! ```

mod cache;
pub mod codec;
pub mod error;
mod key;
mod store;
#[cfg(any(feature = "test-util", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
pub mod testing;

#[doc(inline)]
pub use cache::RecordCache;
#[doc(inline)]
pub use error::{CacheError, CacheErrorKind, StoreError, StoreErrorKind};
#[doc(inline)]
pub use key::CacheKey;
#[doc(inline)]
pub use store::RecordStore;
