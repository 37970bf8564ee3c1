// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! An unpublished crate containing testing utilities for use within this repo.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::task::JoinSet;

mod log;

pub use log::*;

/// If something (whatever) does not happen in a test within this time, the test will fail.
///
/// This is only to break out of hung tests, not for any situations that are actually expected.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs `total` invocations of `f` on the current runtime with at most `concurrency` of them
/// in flight at any moment.
///
/// Each worker task pulls the next index from a shared counter until all `total` indices are
/// claimed, so the fan-out behaves like a fixed-size thread pool draining a queue of calls.
/// Results are returned in completion order.
///
/// # Panics
///
/// Panics if `concurrency` is zero or if any invocation panics.
pub async fn fan_out<F, Fut, T>(total: usize, concurrency: usize, f: Arc<F>) -> Vec<T>
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    assert!(concurrency > 0, "fan_out needs at least one worker");

    let next = Arc::new(AtomicUsize::new(0));
    let mut workers = JoinSet::new();

    for _ in 0..concurrency.min(total.max(1)) {
        let next = Arc::clone(&next);
        let f = Arc::clone(&f);
        workers.spawn(async move {
            let mut results = Vec::new();
            loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                if index >= total {
                    break results;
                }
                results.push(f(index).await);
            }
        });
    }

    let mut results = Vec::with_capacity(total);
    while let Some(worker) = workers.join_next().await {
        results.extend(worker.expect("fan_out worker panicked"));
    }

    results
}
