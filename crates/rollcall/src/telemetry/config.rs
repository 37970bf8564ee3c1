// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(any(feature = "metrics", test))]
use opentelemetry::metrics::MeterProvider;

use crate::telemetry::ReaderTelemetry;

/// Configuration for reader telemetry.
///
/// Everything starts disabled. Enable logs and/or metrics with the builder methods and
/// hand the result to [`CachedReaderBuilder::telemetry`](crate::CachedReaderBuilder::telemetry).
/// Readers built without an explicit configuration log and collect no metrics.
///
/// # Examples
///
/// ```
/// use rollcall::TelemetryConfig;
///
/// // Silence a reader completely.
/// let quiet = TelemetryConfig::new();
///
/// // Structured logs only.
/// let logs = TelemetryConfig::new().with_logs();
/// # let _ = (quiet, logs);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TelemetryConfig {
    logs_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    metrics: Option<crate::telemetry::metrics::ReaderMetrics>,
}

impl TelemetryConfig {
    /// Creates a configuration with everything disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables structured logging via the `tracing` crate.
    #[must_use]
    pub fn with_logs(self) -> Self {
        Self {
            logs_enabled: true,
            ..self
        }
    }

    /// Enables metrics collection using the provided meter provider.
    #[cfg(any(feature = "metrics", test))]
    #[must_use]
    pub fn with_metrics(mut self, provider: &dyn MeterProvider) -> Self {
        use crate::telemetry::metrics;
        let meter = metrics::create_meter(provider);
        self.metrics = Some(metrics::ReaderMetrics::new(&meter));
        self
    }

    pub(crate) fn build(self) -> ReaderTelemetry {
        ReaderTelemetry {
            logging_enabled: self.logs_enabled,
            #[cfg(any(feature = "metrics", test))]
            metrics: self.metrics,
        }
    }
}
