//! Single-criterion queries, answered from the index when one is given and
//! by a linear scan otherwise.
//!
//! Search runs in three tiers, stopping at the first that finds anything:
//!
//! 1. **Prefix**: the term is a key of the prefix map. Covers prefix and
//!    exact matches, since a full headword is a prefix of itself.
//! 2. **Substring**: for terms longer than one character, scan at most
//!    `key_limit` prefix keys (in key order) for ones containing the term.
//! 3. **Linear**: scan every word for the term in its text, meaning or
//!    example. Never consults the index, so it cannot miss a match.
//!
//! Without an index the same tiers are evaluated by scanning the words, so
//! both paths return the same sets whenever tier 2 is not truncated by
//! `key_limit`. An index built from a list of a different length is ignored
//! and the scan runs instead; callers that may hold an index for another
//! list of the same length should check [`SearchIndex::is_built_from`].

use std::collections::BTreeSet;

use crate::search::index::SearchIndex;
use crate::types::{PartOfSpeech, Word};

/// Which tier answered a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchTier {
    /// Exact prefix-key lookup (or its linear equivalent).
    Prefix,
    /// Substring match against headwords.
    Substring,
    /// Full scan over text, meaning and example.
    Linear,
}

/// Canonical form of a search term: trimmed and lowercased.
#[must_use]
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Positions of words whose first letter, uppercased, is `letter`.
#[must_use]
pub fn query_letter(words: &[Word], index: Option<&SearchIndex>, letter: char) -> BTreeSet<usize> {
    let letter = letter.to_uppercase().next().unwrap_or(letter);
    match usable(words, index) {
        Some(index) => index.letter(letter).iter().copied().collect(),
        None => positions_where(words, |word| word.first_letter() == Some(letter)),
    }
}

/// Positions of words in category `tag` (untagged words count as
/// [`PartOfSpeech::Other`]).
#[must_use]
pub fn query_part_of_speech(
    words: &[Word],
    index: Option<&SearchIndex>,
    tag: PartOfSpeech,
) -> BTreeSet<usize> {
    match usable(words, index) {
        Some(index) => index.part_of_speech(tag).iter().copied().collect(),
        None => positions_where(words, |word| word.category() == tag),
    }
}

/// Positions of words matching `term`, and the tier that found them.
///
/// An empty (or blank) term matches every word.
#[must_use]
pub fn query_search(
    words: &[Word],
    index: Option<&SearchIndex>,
    term: &str,
    key_limit: usize,
) -> (BTreeSet<usize>, SearchTier) {
    let index = usable(words, index);
    let term = normalize_term(term);
    if term.is_empty() {
        return ((0..words.len()).collect(), SearchTier::Linear);
    }
    let multi_char = term.chars().nth(1).is_some();

    let prefix_hits: BTreeSet<usize> = match index {
        Some(index) => index
            .prefix(&term)
            .map(|hits| hits.iter().copied().collect())
            .unwrap_or_default(),
        None => positions_where(words, |word| word.text.to_lowercase().starts_with(&term)),
    };
    if !prefix_hits.is_empty() {
        return (prefix_hits, SearchTier::Prefix);
    }

    if multi_char {
        let substring_hits: BTreeSet<usize> = match index {
            Some(index) => index
                .prefix_entries()
                .take(key_limit)
                .filter(|(key, _)| key.contains(term.as_str()))
                .flat_map(|(_, positions)| positions.iter().copied())
                .collect(),
            None => positions_where(words, |word| word.text.to_lowercase().contains(&term)),
        };
        if !substring_hits.is_empty() {
            return (substring_hits, SearchTier::Substring);
        }
    }

    (linear_scan(words, &term), SearchTier::Linear)
}

/// Positions of words whose text, meaning or example contains `term`
/// (already normalized).
#[must_use]
pub fn linear_scan(words: &[Word], term: &str) -> BTreeSet<usize> {
    positions_where(words, |word| {
        word.text.to_lowercase().contains(term)
            || word.meaning.to_lowercase().contains(term)
            || word
                .example
                .as_ref()
                .is_some_and(|example| example.to_lowercase().contains(term))
    })
}

/// `index` if it was built from a list as long as `words`.
fn usable<'i>(words: &[Word], index: Option<&'i SearchIndex>) -> Option<&'i SearchIndex> {
    index.filter(|index| index.word_count() == words.len())
}

fn positions_where(words: &[Word], mut keep: impl FnMut(&Word) -> bool) -> BTreeSet<usize> {
    words
        .iter()
        .enumerate()
        .filter(|(_, word)| keep(word))
        .map(|(position, _)| position)
        .collect()
}
