// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Wire encoding for cached record collections.
//!
//! Cache transports that only hold bytes use these helpers so every tier agrees on
//! one representation. Collections are encoded as a JSON array, which keeps an empty
//! collection (`[]`) distinct from an absent entry.

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use crate::CacheError;

/// Encodes a record collection for storage.
///
/// # Errors
///
/// Returns a [`Malformed`](crate::CacheErrorKind::Malformed) error if a record cannot
/// be serialized.
///
/// # Examples
///
/// ```
/// use rollcall_tier::codec;
///
/// let bytes = codec::encode(&[1_u32, 2, 3])?;
/// let records: Vec<u32> = codec::decode(&bytes)?;
/// assert_eq!(records, vec![1, 2, 3]);
/// # Ok::<(), rollcall_tier::CacheError>(())
/// ```
pub fn encode<R: Serialize>(records: &[R]) -> Result<Bytes, CacheError> {
    serde_json::to_vec(records).map(Bytes::from).map_err(CacheError::malformed)
}

/// Decodes a record collection previously produced by [`encode`].
///
/// # Errors
///
/// Returns a [`Malformed`](crate::CacheErrorKind::Malformed) error if the bytes are not
/// a valid collection of `R`.
pub fn decode<R: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<R>, CacheError> {
    serde_json::from_slice(bytes).map_err(CacheError::malformed)
}
