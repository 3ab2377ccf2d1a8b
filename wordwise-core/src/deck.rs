//! Application wiring: one word list, one search engine, one scheduler.
//!
//! A [`Deck`] owns the current word list (inside its [`WordSearch`]) and a
//! [`ReviewScheduler`] over the same store. The store type must be cheaply
//! cloneable (`&MemoryStore`, `Rc<SqliteStore>`, `Arc<...>`) so both halves
//! can hold a handle to it.

use tracing::info;

use crate::clock::Clock;
use crate::config::WordwiseConfig;
use crate::review::{ReviewScheduler, ReviewStats};
use crate::search::WordSearch;
use crate::search::filter::{FilterQuery, Page, SortKey};
use crate::store::KeyValueStore;
use crate::types::{MemoryRecord, Outcome, Word};
use crate::vocabulary::VocabularySource;

/// A study deck: searchable word list plus review progress.
#[derive(Debug)]
pub struct Deck<S, C> {
    search: WordSearch<S>,
    review: ReviewScheduler<S, C>,
}

impl<S: KeyValueStore + Clone, C: Clock> Deck<S, C> {
    /// Build a deck over `words`, sharing `store` between search and review.
    pub fn new(store: S, clock: C, words: Vec<Word>, config: &WordwiseConfig) -> Self {
        let review = ReviewScheduler::new(store.clone(), clock, config.review.clone());
        let search = WordSearch::new(store, words, config.search.clone());
        info!(words = search.words().len(), "Deck ready");
        Self { search, review }
    }

    /// Build a deck from the current list of a vocabulary source.
    pub fn from_source(
        store: S,
        clock: C,
        source: &impl VocabularySource,
        config: &WordwiseConfig,
    ) -> Self {
        Self::new(store, clock, source.words().to_vec(), config)
    }

    /// The current word list.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        self.search.words()
    }

    /// Record a judgment for `word`.
    pub fn judge(&self, word: &str, outcome: Outcome) -> MemoryRecord {
        self.review.record_judgment(word, outcome)
    }

    /// Words of the current list due for review now.
    #[must_use]
    pub fn due(&self) -> Vec<&Word> {
        self.review.due_words(self.review.now(), self.search.words())
    }

    /// Filter, sort and page the current list.
    pub fn browse(&mut self, query: &FilterQuery, sort: SortKey, page: usize) -> Page<&Word> {
        self.search.browse(query, sort, page)
    }

    /// Swap in a new word list. Review progress is keyed by headword and
    /// carries over to words that remain.
    pub fn replace_words(&mut self, words: Vec<Word>) {
        self.search.replace_words(words);
        info!(words = self.search.words().len(), "Deck word list replaced");
    }

    /// Progress over the current list.
    #[must_use]
    pub fn stats(&self) -> ReviewStats {
        self.review.stats(self.review.now(), self.search.words())
    }

    /// Forget all review progress. The word list and index are untouched.
    pub fn reset_progress(&self) {
        self.review.clear_all();
    }

    /// The search engine.
    #[must_use]
    pub fn search(&self) -> &WordSearch<S> {
        &self.search
    }

    /// The scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &ReviewScheduler<S, C> {
        &self.review
    }
}
