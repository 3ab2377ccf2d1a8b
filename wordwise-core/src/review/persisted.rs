//! Persisted shapes of the review maps.
//!
//! Both shapes are shared with existing browser data and must stay
//! byte-compatible:
//!
//! - strengths: `[["cat", 2], ["dog", 0]]`: a serialized `Map`'s entry
//!   list, in insertion order;
//! - review times: `{"cat": 1718000000000, "dog": 1717000000000}`: epoch
//!   milliseconds, keys in insertion order.
//!
//! A repeated word keeps its first position and its last value, as a
//! `Map` rebuilt from the same entries would.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::Timestamp;

/// Word → strength, kept as an ordered pair list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StrengthTable(Vec<(String, u32)>);

impl StrengthTable {
    /// Strength recorded for `word`.
    #[must_use]
    pub fn get(&self, word: &str) -> Option<u32> {
        self.0
            .iter()
            .find(|(text, _)| text == word)
            .map(|&(_, strength)| strength)
    }

    /// Update in place, or append a new entry at the end.
    pub fn set(&mut self, word: &str, strength: u32) {
        match self.0.iter_mut().find(|(text, _)| text == word) {
            Some(entry) => entry.1 = strength,
            None => self.0.push((word.to_string(), strength)),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for StrengthTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(String, u32)>::deserialize(deserializer)?;
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(pairs.len());
        let mut entries: Vec<(String, u32)> = Vec::with_capacity(pairs.len());
        for (word, strength) in pairs {
            match positions.get(&word) {
                Some(&position) => entries[position].1 = strength,
                None => {
                    positions.insert(word.clone(), entries.len());
                    entries.push((word, strength));
                }
            }
        }
        Ok(Self(entries))
    }
}

/// Word → next review time, in insertion order.
pub type ReviewTimes = IndexMap<String, Timestamp>;
