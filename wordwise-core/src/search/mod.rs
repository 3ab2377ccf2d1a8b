//! Word search: index, queries, filtering and result caching.
//!
//! [`WordSearch`] owns a word list and its [`SearchIndex`]. On construction
//! (and whenever the list is replaced) it loads the persisted index if the
//! store holds one built from the same list, and otherwise builds a fresh one
//! and persists it.
//!
//! Filter results are memoised in an in-memory LRU keyed by query and sort
//! order. The cache policy is uniform: every entry, whatever the filter type,
//! is dropped when the word list changes, and no query bypasses it. Since
//! the index is always rebuilt for the current list, a cached result can
//! never be stale.

pub mod cache;
pub mod filter;
pub mod index;
pub mod query;

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::time::Instant;

use lru::LruCache;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::metrics::{SearchCounters, SearchSnapshot};
use crate::store::KeyValueStore;
use crate::types::{PartOfSpeech, Word};
use crate::vocabulary::VocabularySource;
use filter::{FilterQuery, Page, SortKey};
use index::SearchIndex;
use query::SearchTier;

/// Cache key: the filter plus the order its positions were sorted in
/// (`None` for index order).
type ResultKey = (FilterQuery, Option<SortKey>);

/// Searchable word list with a persisted index and a result cache.
pub struct WordSearch<S> {
    store: S,
    config: SearchConfig,
    words: Vec<Word>,
    index: SearchIndex,
    results: Option<LruCache<ResultKey, Vec<usize>>>,
    counters: SearchCounters,
}

impl<S> std::fmt::Debug for WordSearch<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordSearch")
            .field("words", &self.words.len())
            .field("prefix_keys", &self.index.prefix_key_count())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> WordSearch<S> {
    /// Take ownership of `words` and make them searchable.
    pub fn new(store: S, words: Vec<Word>, config: SearchConfig) -> Self {
        let counters = SearchCounters::new();
        let index = load_or_build(&store, &config, &words, &counters);
        let results = NonZeroUsize::new(config.result_cache_capacity).map(LruCache::new);
        Self {
            store,
            config,
            words,
            index,
            results,
            counters,
        }
    }

    /// Copy the current list out of a vocabulary source.
    pub fn from_source(store: S, source: &impl VocabularySource, config: SearchConfig) -> Self {
        Self::new(store, source.words().to_vec(), config)
    }

    /// Swap in a new word list. The index is reloaded or rebuilt for it and
    /// every cached result is dropped.
    pub fn replace_words(&mut self, words: Vec<Word>) {
        self.index = load_or_build(&self.store, &self.config, &words, &self.counters);
        self.words = words;
        if let Some(results) = self.results.as_mut() {
            results.clear();
        }
    }

    /// The current word list.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// The index for the current word list.
    #[must_use]
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Positions of words whose first letter is `letter` (any case).
    #[must_use]
    pub fn query_letter(&self, letter: char) -> BTreeSet<usize> {
        query::query_letter(&self.words, Some(&self.index), letter)
    }

    /// Positions of words matching `term`, via the three search tiers.
    #[must_use]
    pub fn query_search(&self, term: &str) -> BTreeSet<usize> {
        let (hits, tier) =
            query::query_search(&self.words, Some(&self.index), term, self.config.fuzzy_key_limit);
        self.note_tier(tier);
        hits
    }

    /// Positions of words in category `tag`.
    #[must_use]
    pub fn query_part_of_speech(&self, tag: PartOfSpeech) -> BTreeSet<usize> {
        query::query_part_of_speech(&self.words, Some(&self.index), tag)
    }

    /// Words matching `query`, in list order.
    pub fn apply_filters(&mut self, query: &FilterQuery) -> Vec<&Word> {
        let positions = self.filtered_positions(query, None);
        positions.into_iter().map(|p| &self.words[p]).collect()
    }

    /// Words matching `query`, sorted by `sort`, one page at a time.
    ///
    /// Uses the configured page size; a page past the end is empty.
    pub fn browse(&mut self, query: &FilterQuery, sort: SortKey, page: usize) -> Page<&Word> {
        let positions = self.filtered_positions(query, Some(sort));
        let page = filter::paginate(positions, page, self.config.page_size);
        Page {
            items: page.items.into_iter().map(|p| &self.words[p]).collect(),
            page: page.page,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
        }
    }

    /// Snapshot of this engine's counters.
    #[must_use]
    pub fn counters(&self) -> SearchSnapshot {
        self.counters.snapshot()
    }

    fn filtered_positions(&mut self, query: &FilterQuery, sort: Option<SortKey>) -> Vec<usize> {
        let key = (query.clone(), sort);
        if let Some(hit) = self.results.as_mut().and_then(|results| results.get(&key)) {
            SearchCounters::bump(&self.counters.result_cache_hits);
            return hit.clone();
        }
        SearchCounters::bump(&self.counters.result_cache_misses);

        let (mut positions, tier) = filter::apply_filters_traced(
            &self.words,
            Some(&self.index),
            query,
            self.config.fuzzy_key_limit,
        );
        if let Some(tier) = tier {
            self.note_tier(tier);
        }
        if let Some(sort) = sort {
            filter::sort_positions(&self.words, &mut positions, sort);
        }

        if let Some(results) = self.results.as_mut() {
            results.put(key, positions.clone());
        }
        positions
    }

    fn note_tier(&self, tier: SearchTier) {
        let counter = match tier {
            SearchTier::Prefix => &self.counters.prefix_hits,
            SearchTier::Substring => &self.counters.substring_hits,
            SearchTier::Linear => &self.counters.linear_scans,
        };
        SearchCounters::bump(counter);
    }
}

/// Load a matching persisted index, or build (and persist) a new one.
fn load_or_build(
    store: &impl KeyValueStore,
    config: &SearchConfig,
    words: &[Word],
    counters: &SearchCounters,
) -> SearchIndex {
    if config.persist_index {
        match cache::load(store, &config.index_cache_key, words) {
            Ok(Ok(index)) => {
                SearchCounters::bump(&counters.index_cache_hits);
                debug!(words = words.len(), "Search index loaded from store");
                return index;
            }
            Ok(Err(miss)) => {
                SearchCounters::bump(&counters.index_cache_misses);
                debug!(?miss, "Persisted search index unusable, rebuilding");
            }
            Err(e) => {
                SearchCounters::bump(&counters.index_cache_misses);
                SearchCounters::bump(&counters.storage_failures);
                warn!(error = %e, "Failed to read persisted search index, rebuilding");
            }
        }
    }

    let start = Instant::now();
    let index = SearchIndex::build(words);
    SearchCounters::bump(&counters.index_builds);
    debug!(
        words = words.len(),
        prefix_keys = index.prefix_key_count(),
        elapsed_us = start.elapsed().as_micros(),
        "Search index built"
    );

    if config.persist_index {
        if let Err(e) = cache::save(store, &config.index_cache_key, &index) {
            SearchCounters::bump(&counters.storage_failures);
            warn!(error = %e, "Failed to persist search index");
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, WordwiseError};
    use crate::store::MemoryStore;
    use crate::types::Difficulty;

    fn words() -> Vec<Word> {
        vec![
            Word::new("apple", "manzana")
                .expect("word")
                .with_part_of_speech(PartOfSpeech::Noun),
            Word::new("apply", "aplicar")
                .expect("word")
                .with_part_of_speech(PartOfSpeech::Verb),
            Word::new("banana", "plátano")
                .expect("word")
                .with_part_of_speech(PartOfSpeech::Noun),
        ]
    }

    fn texts<'a>(words: &[&'a Word]) -> Vec<&'a str> {
        words.iter().map(|w| w.text.as_str()).collect()
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(WordwiseError::Storage("storage disabled".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(WordwiseError::Storage("storage disabled".into()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(WordwiseError::Storage("storage disabled".into()))
        }
    }

    #[test]
    fn apple_apply_banana() {
        let store = MemoryStore::new();
        let search = WordSearch::new(&store, words(), SearchConfig::default());
        assert_eq!(search.query_search("app"), BTreeSet::from([0, 1]));
        assert_eq!(search.query_letter('B'), BTreeSet::from([2]));
        assert_eq!(search.query_part_of_speech(PartOfSpeech::Noun), BTreeSet::from([0, 2]));
        assert_eq!(search.counters().prefix_hits, 1);
    }

    #[test]
    fn second_engine_reuses_persisted_index() {
        let store = MemoryStore::new();
        let first = WordSearch::new(&store, words(), SearchConfig::default());
        assert_eq!(first.counters().index_builds, 1);
        assert_eq!(first.counters().index_cache_misses, 1);

        let second = WordSearch::new(&store, words(), SearchConfig::default());
        assert_eq!(second.counters().index_builds, 0);
        assert_eq!(second.counters().index_cache_hits, 1);
        assert_eq!(second.index(), first.index());
    }

    #[test]
    fn changed_list_never_uses_stale_index() {
        let store = MemoryStore::new();
        let _ = WordSearch::new(&store, words(), SearchConfig::default());

        let mut changed = words();
        changed.push(Word::new("cherry", "cereza").expect("word"));
        let search = WordSearch::new(&store, changed, SearchConfig::default());
        assert_eq!(search.counters().index_builds, 1);
        assert_eq!(search.query_letter('C'), BTreeSet::from([3]));
    }

    #[test]
    fn replace_words_drops_every_cached_result() {
        // Cached results must never outlive the list they came from, for
        // letter filters as much as for search and part-of-speech filters.
        let store = MemoryStore::new();
        let mut search = WordSearch::new(&store, words(), SearchConfig::default());
        let queries = [
            FilterQuery::new().with_letter('B'),
            FilterQuery::new().with_search("ban"),
            FilterQuery::new().with_part_of_speech(PartOfSpeech::Noun),
        ];
        for query in &queries {
            assert!(!search.apply_filters(query).is_empty());
        }

        search.replace_words(vec![
            Word::new("berry", "baya")
                .expect("word")
                .with_part_of_speech(PartOfSpeech::Noun),
        ]);
        assert_eq!(texts(&search.apply_filters(&queries[0])), vec!["berry"]);
        assert!(search.apply_filters(&queries[1]).is_empty());
        assert_eq!(texts(&search.apply_filters(&queries[2])), vec!["berry"]);
        assert_eq!(search.counters().result_cache_hits, 0);
    }

    #[test]
    fn repeated_query_hits_result_cache() {
        let store = MemoryStore::new();
        let mut search = WordSearch::new(&store, words(), SearchConfig::default());
        let query = FilterQuery::new().with_letter('A');
        let first: Vec<String> = search
            .apply_filters(&query)
            .into_iter()
            .map(|w| w.text.clone())
            .collect();
        let second: Vec<String> = search
            .apply_filters(&query)
            .into_iter()
            .map(|w| w.text.clone())
            .collect();
        assert_eq!(first, second);
        assert_eq!(search.counters().result_cache_hits, 1);
        assert_eq!(search.counters().result_cache_misses, 1);
    }

    #[test]
    fn zero_capacity_disables_result_cache() {
        let store = MemoryStore::new();
        let config = SearchConfig {
            result_cache_capacity: 0,
            ..SearchConfig::default()
        };
        let mut search = WordSearch::new(&store, words(), config);
        let query = FilterQuery::new();
        let _ = search.apply_filters(&query);
        let _ = search.apply_filters(&query);
        assert_eq!(search.counters().result_cache_hits, 0);
    }

    #[test]
    fn browse_sorts_and_pages() {
        let store = MemoryStore::new();
        let config = SearchConfig {
            page_size: 2,
            ..SearchConfig::default()
        };
        let mut search = WordSearch::new(&store, words(), config);
        let query = FilterQuery::new().with_difficulty(Difficulty::Medium);

        let page = search.browse(&query, SortKey::Meaning, 1);
        assert_eq!(texts(&page.items), vec!["apply", "apple"]);
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);

        let page = search.browse(&query, SortKey::Meaning, 2);
        assert_eq!(texts(&page.items), vec!["banana"]);
        assert!(search.browse(&query, SortKey::Meaning, 3).items.is_empty());
    }

    #[test]
    fn broken_store_still_searches() {
        let search = WordSearch::new(BrokenStore, words(), SearchConfig::default());
        assert_eq!(search.query_search("apple"), BTreeSet::from([0]));
        let counters = search.counters();
        assert_eq!(counters.index_builds, 1);
        assert_eq!(counters.storage_failures, 2);
    }

    #[test]
    fn corrupt_persisted_index_is_rebuilt() {
        let store = MemoryStore::new();
        store
            .set("vocabularySearchIndex", "definitely not json")
            .expect("seed");
        let search = WordSearch::new(&store, words(), SearchConfig::default());
        assert_eq!(search.counters().index_builds, 1);
        assert_eq!(search.query_letter('A'), BTreeSet::from([0, 1]));
        // The rebuilt index replaced the corrupt entry.
        let reloaded = WordSearch::new(&store, words(), SearchConfig::default());
        assert_eq!(reloaded.counters().index_cache_hits, 1);
    }

    #[test]
    fn persistence_can_be_disabled() {
        let store = MemoryStore::new();
        let config = SearchConfig {
            persist_index: false,
            ..SearchConfig::default()
        };
        let _ = WordSearch::new(&store, words(), config);
        assert!(store.is_empty());
    }
}
