// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Fires a burst of concurrent reads at a cold cache and reports how many of them
//! reached the backing store.
//!
//! Run with `cargo run -p rollcall --example penetration`.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use rollcall::{CachedReader, InMemoryCache, RecordStore, StoreError};
use serde::{Deserialize, Serialize};
use tick::Clock;

const READS: usize = 10_000;
const CONCURRENCY: usize = 25;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Student {
    id: u32,
    name: String,
}

/// A student table that takes a while to answer.
#[derive(Debug, Default)]
struct StudentTable {
    queries: AtomicUsize,
}

impl RecordStore<Student> for StudentTable {
    async fn query_all(&self) -> Result<Vec<Student>, StoreError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(100)).await;

        Ok(vec![
            Student {
                id: 1,
                name: "Ada".to_string(),
            },
            Student {
                id: 2,
                name: "Grace".to_string(),
            },
        ])
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    testing_aids::log_to_stdout();

    let table = Arc::new(StudentTable::default());
    let reader: Arc<CachedReader<Student, _, _>> = Arc::new(
        CachedReader::builder(Arc::clone(&table), InMemoryCache::builder().name("students").build())
            .key("allStudents")
            .name("students")
            .clock(Clock::new_tokio())
            .build(),
    );

    let results = testing_aids::fan_out(
        READS,
        CONCURRENCY,
        Arc::new({
            let reader = Arc::clone(&reader);
            move |_| {
                let reader = Arc::clone(&reader);
                async move { reader.get_all().await }
            }
        }),
    )
    .await;

    let failures = results.iter().filter(|result| result.is_err()).count();
    println!("{READS} concurrent reads finished with {failures} failures");

    let (students, path) = reader.get_all_with_path().await?;
    println!("final read served from {path:?}: {students:?}");
    println!("store was queried {} time(s)", table.queries.load(Ordering::Relaxed));

    Ok(())
}
