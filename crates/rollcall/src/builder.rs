// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::marker::PhantomData;

use rollcall_tier::CacheKey;
use tick::Clock;

use crate::{CachedReader, KeyedGates, TelemetryConfig, telemetry::ReaderName};

const DEFAULT_NAME: ReaderName = "rollcall";

/// Builder for [`CachedReader`].
///
/// Created by [`CachedReader::builder`]. Unless overridden, the reader caches under
/// [`CacheKey::ALL_RECORDS`], is named `"rollcall"`, owns a fresh [`KeyedGates`]
/// registry, logs through `tracing` and records no durations.
///
/// # Examples
///
/// ```
/// use rollcall::{CachedReader, KeyedGates, TelemetryConfig};
/// use rollcall_tier::testing::{MockCache, MockStore};
/// use tick::Clock;
///
/// let gates = KeyedGates::new();
/// let reader: CachedReader<u32, _, _> = CachedReader::builder(MockStore::new(vec![1_u32]), MockCache::<u32>::new())
///     .key("allStudents")
///     .name("students")
///     .gates(gates.clone())
///     .clock(Clock::new_frozen())
///     .telemetry(TelemetryConfig::new().with_logs())
///     .build();
///
/// assert_eq!(reader.key().as_str(), "allStudents");
/// assert_eq!(reader.name(), "students");
/// ```
#[derive(Debug)]
#[must_use]
pub struct CachedReaderBuilder<R, S, C> {
    store: S,
    cache: C,
    key: CacheKey,
    name: ReaderName,
    gates: Option<KeyedGates>,
    clock: Option<Clock>,
    telemetry: TelemetryConfig,
    _records: PhantomData<fn() -> R>,
}

impl<R, S, C> CachedReaderBuilder<R, S, C> {
    pub(crate) fn new(store: S, cache: C) -> Self {
        Self {
            store,
            cache,
            key: CacheKey::ALL_RECORDS,
            name: DEFAULT_NAME,
            gates: None,
            clock: None,
            telemetry: TelemetryConfig::new().with_logs(),
            _records: PhantomData,
        }
    }

    /// Sets the key the collection is cached under.
    pub fn key(mut self, key: impl Into<CacheKey>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the name reported in logs and metrics.
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Populates through a shared gate registry.
    ///
    /// Readers that share a registry and a key admit a single populate between them.
    pub fn gates(mut self, gates: KeyedGates) -> Self {
        self.gates = Some(gates);
        self
    }

    /// Times every read with `clock` and reports the durations in telemetry.
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replaces the telemetry configuration.
    pub fn telemetry(mut self, config: TelemetryConfig) -> Self {
        self.telemetry = config;
        self
    }

    /// Builds the reader.
    pub fn build(self) -> CachedReader<R, S, C> {
        CachedReader {
            store: self.store,
            cache: self.cache,
            key: self.key,
            name: self.name,
            gates: self.gates.unwrap_or_default(),
            clock: self.clock,
            telemetry: self.telemetry.build(),
            _records: PhantomData,
        }
    }
}
