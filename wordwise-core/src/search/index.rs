//! Prefix, first-letter and part-of-speech index over a word list.
//!
//! For a list of `n` words the index holds:
//!
//! - `prefix_map`: every lowercase prefix of every headword (length ≥ 1)
//!   → positions of the words whose lowercased text starts with it;
//! - `first_letter_map`: uppercase first letter → positions;
//! - `part_of_speech_map`: tag (with the fallback for untagged words) →
//!   positions.
//!
//! Positions in every list are ascending. Build cost is O(total characters)
//! entries, which suits vocabularies of thousands of words.
//!
//! The index is a pure function of the word list. It is never updated in
//! place: a changed list means a new build. The fingerprint and word count
//! recorded at build time let callers detect an index that no longer
//! matches its list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{PartOfSpeech, Word};
use crate::vocabulary::fingerprint;

/// Immutable search index built from one word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIndex {
    prefix_map: BTreeMap<String, Vec<usize>>,
    first_letter_map: BTreeMap<char, Vec<usize>>,
    part_of_speech_map: BTreeMap<PartOfSpeech, Vec<usize>>,
    fingerprint: u32,
    word_count: usize,
}

impl SearchIndex {
    /// Build the index for `words`.
    #[must_use]
    pub fn build(words: &[Word]) -> Self {
        let mut prefix_map: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut first_letter_map: BTreeMap<char, Vec<usize>> = BTreeMap::new();
        let mut part_of_speech_map: BTreeMap<PartOfSpeech, Vec<usize>> = BTreeMap::new();

        for (position, word) in words.iter().enumerate() {
            let lowered = word.text.to_lowercase();
            for (start, ch) in lowered.char_indices() {
                let prefix = &lowered[..start + ch.len_utf8()];
                prefix_map.entry(prefix.to_string()).or_default().push(position);
            }
            if let Some(letter) = word.first_letter() {
                first_letter_map.entry(letter).or_default().push(position);
            }
            part_of_speech_map
                .entry(word.category())
                .or_default()
                .push(position);
        }

        Self {
            prefix_map,
            first_letter_map,
            part_of_speech_map,
            fingerprint: fingerprint(words),
            word_count: words.len(),
        }
    }

    /// Positions of words starting with `prefix` (already lowercase).
    #[must_use]
    pub fn prefix(&self, prefix: &str) -> Option<&[usize]> {
        self.prefix_map.get(prefix).map(Vec::as_slice)
    }

    /// All prefix keys with their positions, in key order.
    pub fn prefix_entries(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.prefix_map
            .iter()
            .map(|(key, positions)| (key.as_str(), positions.as_slice()))
    }

    /// Number of distinct prefix keys.
    #[must_use]
    pub fn prefix_key_count(&self) -> usize {
        self.prefix_map.len()
    }

    /// Positions of words whose first letter is `letter` (uppercase).
    #[must_use]
    pub fn letter(&self, letter: char) -> &[usize] {
        self.first_letter_map
            .get(&letter)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Letters that start at least one word, ascending.
    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.first_letter_map.keys().copied()
    }

    /// Positions of words in category `tag`.
    #[must_use]
    pub fn part_of_speech(&self, tag: PartOfSpeech) -> &[usize] {
        self.part_of_speech_map
            .get(&tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Content hash of the list this index was built from.
    #[must_use]
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }

    /// Length of the list this index was built from.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Whether this index describes exactly `words`.
    #[must_use]
    pub fn is_built_from(&self, words: &[Word]) -> bool {
        self.word_count == words.len() && self.fingerprint == fingerprint(words)
    }

    /// Whether every stored position is in range for `word_count`.
    ///
    /// A deserialized index must pass this before it is used to subscript
    /// the word list.
    #[must_use]
    pub fn positions_in_range(&self) -> bool {
        let in_range = |positions: &Vec<usize>| positions.iter().all(|&p| p < self.word_count);
        self.prefix_map.values().all(in_range)
            && self.first_letter_map.values().all(in_range)
            && self.part_of_speech_map.values().all(in_range)
    }
}
