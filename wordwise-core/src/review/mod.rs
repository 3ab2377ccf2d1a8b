//! Review scheduling: per-word memory strength and next-review times.
//!
//! Every "knew it" / "didn't know it" judgment moves a word's strength one
//! step up or down and reschedules it from the interval ladder in
//! [`ladder`]. Words never judged have no record and are never due.
//!
//! State lives entirely in the store, under two keys (see [`persisted`]).
//! Each judgment reads both maps, updates one entry and writes both back.
//! That is O(n) in the number of tracked words per judgment, which is fine
//! for vocabularies of a few thousand words.
//!
//! Storage failures never reach the caller: unreadable or malformed maps
//! are treated as empty, rejected writes are logged and counted.

pub mod ladder;
pub mod persisted;

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::ReviewConfig;
use crate::metrics::{ReviewCounters, ReviewSnapshot};
use crate::store::KeyValueStore;
use crate::types::{MemoryRecord, Outcome, Timestamp, Word};

pub use ladder::{INTERVAL_LADDER_DAYS, MASTERED_STRENGTH};
use persisted::{ReviewTimes, StrengthTable};

/// Progress summary over a word list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewStats {
    /// Words in the list with a review record.
    pub tracked: usize,
    /// Words in the list never judged.
    pub unseen: usize,
    /// Tracked words due now.
    pub due: usize,
    /// Tracked words on the top rung of the ladder.
    pub mastered: usize,
    /// Tracked words below the top rung.
    pub learning: usize,
}

/// Tracks memory strength per word and answers "what is due now".
///
/// The store and clock are injected so that several schedulers (or a
/// scheduler and a search engine) can share one store, and tests can drive
/// time by hand.
#[derive(Debug)]
pub struct ReviewScheduler<S, C> {
    store: S,
    clock: C,
    config: ReviewConfig,
    counters: ReviewCounters,
}

impl<S: KeyValueStore, C: Clock> ReviewScheduler<S, C> {
    /// Create a scheduler over `store`, reading time from `clock`.
    #[must_use]
    pub fn new(store: S, clock: C, config: ReviewConfig) -> Self {
        Self {
            store,
            clock,
            config,
            counters: ReviewCounters::default(),
        }
    }

    /// Record a judgment for `word` and reschedule it.
    ///
    /// Known raises strength by one, Unknown lowers it by one (never below
    /// zero). The next review is `now + interval_days(strength)` days. The
    /// returned record is the new state even if persisting it failed; a
    /// write that fails partway leaves the stored record as it was.
    pub fn record_judgment(&self, word: &str, outcome: Outcome) -> MemoryRecord {
        let now = self.clock.now();
        let mut strengths: StrengthTable = self.load(&self.config.strength_key);
        let mut times: ReviewTimes = self.load(&self.config.review_times_key);

        let previous = strengths.get(word).unwrap_or(0);
        let strength = ladder::adjust_strength(previous, outcome);
        let record = ladder::schedule(strength, now);

        // A word with a time but no strength reads as strength zero, so
        // times go first and are restored if the strengths write fails.
        let previous_times = times.clone();
        strengths.set(word, strength);
        times.insert(word.to_string(), record.next_review_at);
        if self.save(&self.config.review_times_key, &times)
            && !self.save(&self.config.strength_key, &strengths)
            && self.save(&self.config.review_times_key, &previous_times)
        {
            debug!(word, "Review times rolled back");
        }

        let counter = match outcome {
            Outcome::Known => &self.counters.known,
            Outcome::Unknown => &self.counters.unknown,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        debug!(
            word,
            ?outcome,
            previous,
            strength,
            next_review_at = %record.next_review_at,
            "Judgment recorded"
        );
        record
    }

    /// Current time according to the injected clock.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Days until the next review for a word of the given strength.
    #[must_use]
    pub fn interval_days(&self, strength: u32) -> u32 {
        ladder::interval_days(strength)
    }

    /// Words from `all_words` whose next review is at or before `now`.
    ///
    /// Records for words no longer in `all_words` are ignored. Words never
    /// judged are never due. Order follows `all_words`, but callers should
    /// treat the result as a set; duplicate headwords appear once.
    #[must_use]
    pub fn due_words<'w>(&self, now: Timestamp, all_words: &'w [Word]) -> Vec<&'w Word> {
        let times: ReviewTimes = self.load(&self.config.review_times_key);
        let mut seen = HashSet::new();
        let mut due = Vec::new();
        for word in all_words {
            let is_due = times.get(&word.text).is_some_and(|at| *at <= now);
            if is_due && seen.insert(word.text.as_str()) {
                due.push(word);
            }
        }
        due
    }

    /// Current record for `word`, if it has ever been judged.
    #[must_use]
    pub fn record(&self, word: &str) -> Option<MemoryRecord> {
        let times: ReviewTimes = self.load(&self.config.review_times_key);
        let next_review_at = *times.get(word)?;
        let strengths: StrengthTable = self.load(&self.config.strength_key);
        Some(MemoryRecord {
            strength: strengths.get(word).unwrap_or(0),
            next_review_at,
        })
    }

    /// Summarise progress over `all_words` at `now`.
    #[must_use]
    pub fn stats(&self, now: Timestamp, all_words: &[Word]) -> ReviewStats {
        let times: ReviewTimes = self.load(&self.config.review_times_key);
        let strengths: StrengthTable = self.load(&self.config.strength_key);

        let mut stats = ReviewStats::default();
        let mut seen = HashSet::new();
        for word in all_words {
            if !seen.insert(word.text.as_str()) {
                continue;
            }
            let Some(at) = times.get(&word.text) else {
                stats.unseen += 1;
                continue;
            };
            stats.tracked += 1;
            if *at <= now {
                stats.due += 1;
            }
            if strengths.get(&word.text).unwrap_or(0) >= MASTERED_STRENGTH {
                stats.mastered += 1;
            } else {
                stats.learning += 1;
            }
        }
        stats
    }

    /// Forget every record. The only way records are ever deleted.
    pub fn clear_all(&self) {
        for key in [&self.config.strength_key, &self.config.review_times_key] {
            if let Err(e) = self.store.remove(key) {
                Self::note_failure(&self.counters.write_failures);
                warn!(key = %key, error = %e, "Failed to clear review data");
            }
        }
        info!("Review progress cleared");
    }

    /// Snapshot of this scheduler's counters.
    #[must_use]
    pub fn counters(&self) -> ReviewSnapshot {
        self.counters.snapshot()
    }

    // ------------------------------------------------------------------
    // Store access
    // ------------------------------------------------------------------

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                Self::note_failure(&self.counters.read_failures);
                warn!(key, error = %e, "Review data unreadable, treating as empty");
                return T::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            Self::note_failure(&self.counters.read_failures);
            warn!(key, error = %e, "Review data malformed, treating as empty");
            T::default()
        })
    }

    /// Whether `value` reached the store.
    fn save<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(crate::WordwiseError::from)
            .and_then(|json| self.store.set(key, &json));
        if let Err(e) = &result {
            Self::note_failure(&self.counters.write_failures);
            warn!(key, error = %e, "Failed to persist review data");
        }
        result.is_ok()
    }

    fn note_failure(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
