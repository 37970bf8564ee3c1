// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use opentelemetry::{
    InstrumentationScope, KeyValue,
    metrics::{Counter, Histogram, Meter, MeterProvider},
};

const METER_NAME: &str = "rollcall";
const VERSION: &str = "v0.1.0";
const SCHEMA_URL: &str = "https://opentelemetry.io/schemas/1.47.0";
const READER_EVENT_COUNT_NAME: &str = "reader.event.count";
const READER_OPERATION_DURATION_NAME: &str = "reader.operation.duration";

pub(crate) fn create_meter(meter_provider: &dyn MeterProvider) -> Meter {
    meter_provider.meter_with_scope(
        InstrumentationScope::builder(METER_NAME)
            .with_version(VERSION)
            .with_schema_url(SCHEMA_URL)
            .build(),
    )
}

#[derive(Clone, Debug)]
pub(crate) struct ReaderMetrics {
    event_counter: Counter<u64>,
    operation_duration: Histogram<f64>,
}

impl ReaderMetrics {
    pub(crate) fn new(meter: &Meter) -> Self {
        Self {
            event_counter: meter
                .u64_counter(READER_EVENT_COUNT_NAME)
                .with_description("Read-through reader events")
                .with_unit("{event}")
                .build(),
            operation_duration: meter
                .f64_histogram(READER_OPERATION_DURATION_NAME)
                .with_description("Duration of reads served by the reader")
                .with_unit("s")
                .build(),
        }
    }

    pub(crate) fn record(&self, attrs: &[KeyValue], duration: Option<Duration>) {
        self.event_counter.add(1, attrs);
        if let Some(d) = duration {
            self.operation_duration.record(d.as_secs_f64(), attrs);
        }
    }
}
