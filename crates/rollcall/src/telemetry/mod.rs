// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured logs and metrics for reader activity.
//!
//! Every read records one activity per decision it takes: a hit on the fast path, a
//! miss that heads for the gate, a hit found after waiting at the gate, a populate
//! from the store, or a fault. Logs go through `tracing`; metrics through
//! OpenTelemetry when the `metrics` feature is enabled.

use std::time::Duration;

#[cfg(any(feature = "metrics", test))]
use opentelemetry::KeyValue;
use rollcall_tier::CacheKey;

pub(crate) mod attributes;
mod config;
#[cfg(any(feature = "metrics", test))]
pub(crate) mod metrics;
#[cfg(test)]
pub(crate) mod testing;

pub use config::TelemetryConfig;

/// Name identifying a reader in logs and metrics.
pub type ReaderName = &'static str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReaderActivity {
    Hit,
    Miss,
    Coalesced,
    Populated,
    CacheGetError,
    CacheSetError,
    StoreError,
}

impl ReaderActivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "reader.hit",
            Self::Miss => "reader.miss",
            Self::Coalesced => "reader.coalesced",
            Self::Populated => "reader.populated",
            Self::CacheGetError => "reader.cache_get_error",
            Self::CacheSetError => "reader.cache_set_error",
            Self::StoreError => "reader.store_error",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::Hit | Self::Miss | Self::Coalesced => Severity::Debug,
            Self::Populated => Severity::Info,
            Self::CacheGetError | Self::CacheSetError => Severity::Warn,
            Self::StoreError => Severity::Error,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ReaderTelemetry {
    logging_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    metrics: Option<metrics::ReaderMetrics>,
}

impl ReaderTelemetry {
    /// Records an activity that carries no error.
    #[inline]
    pub(crate) fn record(&self, name: ReaderName, key: &CacheKey, activity: ReaderActivity, duration: Option<Duration>) {
        self.record_inner(name, key, activity, duration, None);
    }

    /// Records a fault together with the error that caused it.
    #[inline]
    pub(crate) fn record_error(
        &self,
        name: ReaderName,
        key: &CacheKey,
        activity: ReaderActivity,
        duration: Option<Duration>,
        error: &dyn std::error::Error,
    ) {
        self.record_inner(name, key, activity, duration, Some(error));
    }

    fn record_inner(
        &self,
        name: ReaderName,
        key: &CacheKey,
        activity: ReaderActivity,
        duration: Option<Duration>,
        error: Option<&dyn std::error::Error>,
    ) {
        #[cfg(any(feature = "metrics", test))]
        if let Some(m) = &self.metrics {
            let attrs = [
                KeyValue::new(attributes::READER_NAME, name),
                KeyValue::new(attributes::READER_KEY, key.as_str().to_owned()),
                KeyValue::new(attributes::READER_ACTIVITY_NAME, activity.as_str()),
            ];
            m.record(&attrs, duration);
        }

        if self.logging_enabled {
            let error = error.map(ToString::to_string);
            Self::emit(name, key, activity, duration, error.as_deref());
        }
    }

    fn emit(name: ReaderName, key: &CacheKey, activity: ReaderActivity, duration: Option<Duration>, error: Option<&str>) {
        let key = key.as_str();
        let act = activity.as_str();
        let duration_ns = duration.map(|d| d.as_nanos());

        // Tracing levels must be constant, hence one arm per level. Field names must
        // match the constants in attributes.rs.
        macro_rules! emit_event {
            ($level:ident) => {
                tracing::$level!(
                    reader.name = name,
                    reader.key = key,
                    reader.activity = act,
                    reader.duration_ns = ?duration_ns,
                    reader.error = error,
                    "reader.event"
                )
            };
        }

        match activity.severity() {
            Severity::Error => emit_event!(error),
            Severity::Warn => emit_event!(warn),
            Severity::Info => emit_event!(info),
            Severity::Debug => emit_event!(debug),
        }
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry::metrics::MeterProvider;
    use rollcall_tier::StoreError;
    use testing_aids::LogCapture;

    use super::*;
    use crate::telemetry::testing::MetricTester;

    fn telemetry_with_logs() -> ReaderTelemetry {
        TelemetryConfig::new().with_logs().build()
    }

    #[test]
    fn activity_as_str() {
        assert_eq!(ReaderActivity::Hit.as_str(), "reader.hit");
        assert_eq!(ReaderActivity::Miss.as_str(), "reader.miss");
        assert_eq!(ReaderActivity::Coalesced.as_str(), "reader.coalesced");
        assert_eq!(ReaderActivity::Populated.as_str(), "reader.populated");
        assert_eq!(ReaderActivity::CacheGetError.as_str(), "reader.cache_get_error");
        assert_eq!(ReaderActivity::CacheSetError.as_str(), "reader.cache_set_error");
        assert_eq!(ReaderActivity::StoreError.as_str(), "reader.store_error");
    }

    #[test]
    fn activity_severities() {
        assert_eq!(ReaderActivity::Hit.severity(), Severity::Debug);
        assert_eq!(ReaderActivity::Miss.severity(), Severity::Debug);
        assert_eq!(ReaderActivity::Coalesced.severity(), Severity::Debug);
        assert_eq!(ReaderActivity::Populated.severity(), Severity::Info);
        assert_eq!(ReaderActivity::CacheGetError.severity(), Severity::Warn);
        assert_eq!(ReaderActivity::CacheSetError.severity(), Severity::Warn);
        assert_eq!(ReaderActivity::StoreError.severity(), Severity::Error);
    }

    #[test]
    fn logs_contain_all_fields_and_values() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        let error = StoreError::unavailable("connection refused");
        telemetry_with_logs().record_error(
            "students",
            &CacheKey::from_static("allStudents"),
            ReaderActivity::StoreError,
            Some(Duration::from_nanos(4242)),
            &error,
        );

        capture.assert_contains(attributes::READER_NAME);
        capture.assert_contains(attributes::READER_KEY);
        capture.assert_contains(attributes::READER_ACTIVITY_NAME);
        capture.assert_contains(attributes::READER_DURATION_NAME);
        capture.assert_contains(attributes::READER_ERROR_NAME);
        capture.assert_contains(attributes::READER_EVENT_NAME);

        capture.assert_contains("students");
        capture.assert_contains("allStudents");
        capture.assert_contains(ReaderActivity::StoreError.as_str());
        capture.assert_contains("connection refused");
        capture.assert_contains("4242");
    }

    #[test]
    fn logs_use_activity_level() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        telemetry_with_logs().record("r", &CacheKey::ALL_RECORDS, ReaderActivity::Populated, None);
        capture.assert_contains("INFO");

        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        telemetry_with_logs().record("r", &CacheKey::ALL_RECORDS, ReaderActivity::CacheSetError, None);
        capture.assert_contains("WARN");

        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());
        telemetry_with_logs().record("r", &CacheKey::ALL_RECORDS, ReaderActivity::Hit, None);
        capture.assert_contains("DEBUG");
    }

    #[test]
    fn disabled_telemetry_emits_nothing() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        TelemetryConfig::new()
            .build()
            .record("r", &CacheKey::ALL_RECORDS, ReaderActivity::Populated, None);

        assert!(capture.output().is_empty());
    }

    #[test]
    fn metrics_carry_reader_attributes() {
        let tester = MetricTester::new();
        let telemetry = TelemetryConfig::new().with_metrics(tester.meter_provider()).build();

        telemetry.record(
            "students",
            &CacheKey::from_static("allStudents"),
            ReaderActivity::Populated,
            Some(Duration::from_millis(3)),
        );

        tester.assert_attributes_contain(&[
            KeyValue::new(attributes::READER_NAME, "students"),
            KeyValue::new(attributes::READER_KEY, "allStudents"),
            KeyValue::new(attributes::READER_ACTIVITY_NAME, ReaderActivity::Populated.as_str()),
        ]);
    }

    #[test]
    fn metrics_without_duration_still_count() {
        let tester = MetricTester::new();
        let meter = tester.meter_provider().meter("direct");
        let reader_metrics = metrics::ReaderMetrics::new(&meter);

        reader_metrics.record(&[KeyValue::new(attributes::READER_ACTIVITY_NAME, "reader.miss")], None);

        tester.assert_attributes_contain(&[KeyValue::new(attributes::READER_ACTIVITY_NAME, "reader.miss")]);
    }
}
