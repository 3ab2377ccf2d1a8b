//! Persisted search index.
//!
//! The serialized index is stored under one key as
//! `{"version": 1, "index": {...}}`. An entry is only trusted when its
//! version is current, its fingerprint and word count match the word list
//! being searched, and every position is in range; anything else is a miss
//! and the caller rebuilds.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::search::index::SearchIndex;
use crate::store::KeyValueStore;
use crate::types::Word;

/// Bumped whenever the serialized index layout changes.
pub const INDEX_CACHE_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    index: &'a SearchIndex,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    index: SearchIndex,
}

/// Why a lookup did not produce an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMiss {
    /// Nothing stored under the key.
    Missing,
    /// Stored by a different layout version.
    VersionMismatch,
    /// Built from a different word list.
    Stale,
    /// Contents fail the range check.
    Corrupt,
}

/// Load the index stored under `key` if it was built from `words`.
///
/// # Errors
/// Store read failures and malformed JSON.
pub fn load(
    store: &impl KeyValueStore,
    key: &str,
    words: &[Word],
) -> Result<std::result::Result<SearchIndex, CacheMiss>> {
    let Some(raw) = store.get(key)? else {
        return Ok(Err(CacheMiss::Missing));
    };
    let envelope: Envelope = serde_json::from_str(&raw)?;
    if envelope.version != INDEX_CACHE_VERSION {
        return Ok(Err(CacheMiss::VersionMismatch));
    }
    if !envelope.index.is_built_from(words) {
        return Ok(Err(CacheMiss::Stale));
    }
    if !envelope.index.positions_in_range() {
        return Ok(Err(CacheMiss::Corrupt));
    }
    Ok(Ok(envelope.index))
}

/// Store `index` under `key`, replacing whatever was there.
///
/// # Errors
/// Serialization failures and store write failures (e.g. quota).
pub fn save(store: &impl KeyValueStore, key: &str, index: &SearchIndex) -> Result<()> {
    let json = serde_json::to_string(&EnvelopeRef {
        version: INDEX_CACHE_VERSION,
        index,
    })?;
    store.set(key, &json)
}
