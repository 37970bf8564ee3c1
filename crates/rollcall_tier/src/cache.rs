// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The fast tier a reader serves hits from.

use std::sync::Arc;

use crate::{CacheError, CacheKey};

/// Trait for cache transports holding record collections.
///
/// A collection is stored and fetched as one unit under a [`CacheKey`]. `Ok(None)`
/// means the key is not cached, which is different from `Ok(Some(vec![]))`: an empty
/// collection is a valid cached value.
///
/// Errors are advisory from the reader's point of view. A failed `get` is served as a
/// miss and a failed `set` only means the next read populates again.
pub trait RecordCache<R>: Send + Sync {
    /// Fetches the collection stored under `key`.
    fn get(&self, key: &CacheKey) -> impl Future<Output = Result<Option<Vec<R>>, CacheError>> + Send;

    /// Stores `records` under `key`, replacing any previous collection.
    fn set(&self, key: &CacheKey, records: Vec<R>) -> impl Future<Output = Result<(), CacheError>> + Send;
}

impl<R, C> RecordCache<R> for Arc<C>
where
    C: RecordCache<R>,
{
    fn get(&self, key: &CacheKey) -> impl Future<Output = Result<Option<Vec<R>>, CacheError>> + Send {
        self.as_ref().get(key)
    }

    fn set(&self, key: &CacheKey, records: Vec<R>) -> impl Future<Output = Result<(), CacheError>> + Send {
        self.as_ref().set(key, records)
    }
}
