// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(any(feature = "metrics", test))]
pub(crate) const READER_NAME: &str = "reader.name";

#[cfg(any(feature = "metrics", test))]
pub(crate) const READER_KEY: &str = "reader.key";

#[cfg(any(feature = "metrics", test))]
pub(crate) const READER_ACTIVITY_NAME: &str = "reader.activity";

#[cfg(test)]
pub(crate) const READER_DURATION_NAME: &str = "reader.duration_ns";

#[cfg(test)]
pub(crate) const READER_ERROR_NAME: &str = "reader.error";

#[cfg(test)]
pub(crate) const READER_EVENT_NAME: &str = "reader.event";
