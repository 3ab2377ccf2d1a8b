//! Filter composition, sorting and pagination.
//!
//! A [`FilterQuery`] selects a base set (everything, one first letter, or a
//! search term) and narrows it by part of speech and difficulty. Letter and
//! search cannot both be active: [`Selection`] holds at most one of them,
//! and setting either replaces the other.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::search::index::SearchIndex;
use crate::search::query::{self, SearchTier};
use crate::types::{Difficulty, PartOfSpeech, Word};

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// The base set a filter starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Every word.
    #[default]
    All,
    /// Words starting with this uppercase letter.
    Letter(char),
    /// Words matching this normalized search term.
    Search(String),
}

/// A composed word filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterQuery {
    selection: Selection,
    part_of_speech: Option<PartOfSpeech>,
    difficulty: Option<Difficulty>,
}

impl FilterQuery {
    /// A filter that matches every word.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by first letter, clearing any search term.
    #[must_use]
    pub fn with_letter(mut self, letter: char) -> Self {
        self.set_letter(Some(letter));
        self
    }

    /// Filter by search term, clearing any letter.
    #[must_use]
    pub fn with_search(mut self, term: &str) -> Self {
        self.set_search(Some(term));
        self
    }

    /// Restrict to one part of speech.
    #[must_use]
    pub fn with_part_of_speech(mut self, tag: PartOfSpeech) -> Self {
        self.part_of_speech = Some(tag);
        self
    }

    /// Restrict to one difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Set or clear the letter filter. Setting it clears the search term.
    pub fn set_letter(&mut self, letter: Option<char>) {
        match letter {
            Some(letter) => {
                let upper = letter.to_uppercase().next().unwrap_or(letter);
                self.selection = Selection::Letter(upper);
            }
            None => {
                if matches!(self.selection, Selection::Letter(_)) {
                    self.selection = Selection::All;
                }
            }
        }
    }

    /// Set or clear the search term. Setting a non-blank term clears the
    /// letter; a blank term behaves like `None`.
    pub fn set_search(&mut self, term: Option<&str>) {
        let term = term.map(query::normalize_term).filter(|t| !t.is_empty());
        match term {
            Some(term) => self.selection = Selection::Search(term),
            None => {
                if matches!(self.selection, Selection::Search(_)) {
                    self.selection = Selection::All;
                }
            }
        }
    }

    /// Set or clear the part-of-speech restriction.
    pub fn set_part_of_speech(&mut self, tag: Option<PartOfSpeech>) {
        self.part_of_speech = tag;
    }

    /// Set or clear the difficulty restriction.
    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.difficulty = difficulty;
    }

    /// The active base selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The active letter, if any.
    #[must_use]
    pub fn letter(&self) -> Option<char> {
        match self.selection {
            Selection::Letter(letter) => Some(letter),
            _ => None,
        }
    }

    /// The active search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        match &self.selection {
            Selection::Search(term) => Some(term),
            _ => None,
        }
    }

    /// The part-of-speech restriction, if any.
    #[must_use]
    pub fn part_of_speech(&self) -> Option<PartOfSpeech> {
        self.part_of_speech
    }

    /// The difficulty restriction, if any.
    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }
}

/// Positions of the words matching `query`, ascending.
///
/// The base set comes from the selection; part of speech and difficulty are
/// then intersected with it. Difficulty is computed per word, never indexed.
#[must_use]
pub fn apply_filters(
    words: &[Word],
    index: Option<&SearchIndex>,
    query: &FilterQuery,
    key_limit: usize,
) -> Vec<usize> {
    apply_filters_traced(words, index, query, key_limit).0
}

/// [`apply_filters`], also reporting which search tier answered (if the
/// selection was a search).
pub(crate) fn apply_filters_traced(
    words: &[Word],
    index: Option<&SearchIndex>,
    query: &FilterQuery,
    key_limit: usize,
) -> (Vec<usize>, Option<SearchTier>) {
    let (base, tier): (BTreeSet<usize>, Option<SearchTier>) = match &query.selection {
        Selection::All => ((0..words.len()).collect(), None),
        Selection::Letter(letter) => (query::query_letter(words, index, *letter), None),
        Selection::Search(term) => {
            let (hits, tier) = query::query_search(words, index, term, key_limit);
            (hits, Some(tier))
        }
    };

    let tagged = query
        .part_of_speech
        .map(|tag| query::query_part_of_speech(words, index, tag));

    let positions = base
        .into_iter()
        .filter(|position| tagged.as_ref().is_none_or(|set| set.contains(position)))
        .filter(|&position| {
            query
                .difficulty
                .is_none_or(|difficulty| {
                    words
                        .get(position)
                        .is_some_and(|word| word.difficulty() == difficulty)
                })
        })
        .collect();
    (positions, tier)
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Alphabetical by headword.
    #[default]
    Text,
    /// Alphabetical by meaning.
    Meaning,
    /// Shortest headword first.
    Length,
}

/// Sort word positions in place. Stable: ties keep their incoming order.
///
/// Alphabetical orders compare case-insensitively first and fall back to
/// the exact text, so "apple" and "Apple" stay adjacent.
pub fn sort_positions(words: &[Word], positions: &mut [usize], key: SortKey) {
    match key {
        SortKey::Text => positions
            .sort_by_cached_key(|&p| (words[p].text.to_lowercase(), words[p].text.clone())),
        SortKey::Meaning => positions
            .sort_by_cached_key(|&p| (words[p].meaning.to_lowercase(), words[p].meaning.clone())),
        SortKey::Length => positions.sort_by_key(|&p| words[p].text.chars().count()),
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number actually served.
    pub page: usize,
    /// Page size used.
    pub page_size: usize,
    /// Items across all pages.
    pub total_items: usize,
    /// Number of non-empty pages.
    pub total_pages: usize,
}

/// Slice `items` to page `page` (1-based) of `page_size`.
///
/// Page bounds are `[(page-1)*size, page*size)` clamped to the item count.
/// A page past the end is empty, not an error. Page 0 is served as page 1
/// and a page size of 0 as 1.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_items = items.len();
    let start = (page - 1).saturating_mul(page_size).min(total_items);
    let end = page.saturating_mul(page_size).min(total_items);

    Page {
        items: items.into_iter().skip(start).take(end - start).collect(),
        page,
        page_size,
        total_items,
        total_pages: total_items.div_ceil(page_size),
    }
}
