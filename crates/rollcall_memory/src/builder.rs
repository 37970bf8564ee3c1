// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for [`InMemoryCache`].

use crate::InMemoryCache;

/// Configures an [`InMemoryCache`] without exposing moka types.
///
/// # Examples
///
/// ```
/// use rollcall_memory::InMemoryCacheBuilder;
///
/// let cache = InMemoryCacheBuilder::new()
///     .initial_capacity(4)
///     .name("students")
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCacheBuilder {
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) name: Option<String>,
}

impl InMemoryCacheBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocates room for `capacity` keys.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Names the underlying moka cache, which shows up in its debug output.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the cache.
    #[must_use]
    pub fn build(self) -> InMemoryCache {
        InMemoryCache::from_builder(&self)
    }
}
