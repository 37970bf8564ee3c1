// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{borrow::Cow, fmt};

/// The key a record collection is cached under.
///
/// Keys are cheap to clone when built from a `&'static str`, which is how readers
/// normally name their collection.
///
/// # Examples
///
/// ```
/// use rollcall_tier::CacheKey;
///
/// let key = CacheKey::from_static("allStudents");
/// assert_eq!(key.as_str(), "allStudents");
/// assert_eq!(CacheKey::default(), CacheKey::ALL_RECORDS);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(Cow<'static, str>);

impl CacheKey {
    /// The key used when a reader is not given one.
    pub const ALL_RECORDS: Self = Self::from_static("allRecords");

    /// Creates a key from a static string without allocating.
    #[must_use]
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CacheKey {
    fn default() -> Self {
        Self::ALL_RECORDS
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for CacheKey {
    fn from(key: &'static str) -> Self {
        Self::from_static(key)
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}
