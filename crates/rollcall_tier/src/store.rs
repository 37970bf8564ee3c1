// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The slow, canonical source of records.

use std::sync::Arc;

use crate::StoreError;

/// Trait for the backing store a reader populates its cache from.
///
/// A store answers one question: "give me every record". Implementations must not
/// mutate anything on read and must tolerate being called from many tasks at once;
/// the reader does not serialize calls outside of its populate gate.
///
/// Failures are reported as [`StoreError`] with a kind distinguishing an unreachable
/// store ([`StoreErrorKind::Unavailable`](crate::StoreErrorKind::Unavailable)) from a
/// query that ran and failed ([`StoreErrorKind::Query`](crate::StoreErrorKind::Query)).
pub trait RecordStore<R>: Send + Sync {
    /// Returns every record, in the store's canonical order.
    fn query_all(&self) -> impl Future<Output = Result<Vec<R>, StoreError>> + Send;
}

impl<R, S> RecordStore<R> for Arc<S>
where
    S: RecordStore<R>,
{
    fn query_all(&self) -> impl Future<Output = Result<Vec<R>, StoreError>> + Send {
        self.as_ref().query_all()
    }
}
