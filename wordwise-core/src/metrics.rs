//! Runtime counters for the scheduler and the search engine.
//!
//! Lock-free `AtomicU64` counters, incremented on the hot path and read via
//! snapshots. Tests use them to observe which search tier answered and
//! whether a cache was hit; hosts can export them with `to_prometheus`.

use std::sync::atomic::{AtomicU64, Ordering};

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Counters owned by a [`crate::WordSearch`].
#[derive(Debug)]
pub struct SearchCounters {
    /// Full index builds.
    pub index_builds: AtomicU64,
    /// Persisted index loaded and accepted.
    pub index_cache_hits: AtomicU64,
    /// Persisted index missing, stale or unreadable.
    pub index_cache_misses: AtomicU64,
    /// Filter results served from the result cache.
    pub result_cache_hits: AtomicU64,
    /// Filter results computed.
    pub result_cache_misses: AtomicU64,
    /// Searches answered by an exact prefix key.
    pub prefix_hits: AtomicU64,
    /// Searches answered by the bounded substring scan over prefix keys.
    pub substring_hits: AtomicU64,
    /// Searches that fell through to the linear word scan.
    pub linear_scans: AtomicU64,
    /// Store reads or writes that failed and were skipped.
    pub storage_failures: AtomicU64,
}

impl SearchCounters {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            index_builds: AtomicU64::new(0),
            index_cache_hits: AtomicU64::new(0),
            index_cache_misses: AtomicU64::new(0),
            result_cache_hits: AtomicU64::new(0),
            result_cache_misses: AtomicU64::new(0),
            prefix_hits: AtomicU64::new(0),
            substring_hits: AtomicU64::new(0),
            linear_scans: AtomicU64::new(0),
            storage_failures: AtomicU64::new(0),
        }
    }

    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters.
    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            index_builds: self.index_builds.load(Ordering::Relaxed),
            index_cache_hits: self.index_cache_hits.load(Ordering::Relaxed),
            index_cache_misses: self.index_cache_misses.load(Ordering::Relaxed),
            result_cache_hits: self.result_cache_hits.load(Ordering::Relaxed),
            result_cache_misses: self.result_cache_misses.load(Ordering::Relaxed),
            prefix_hits: self.prefix_hits.load(Ordering::Relaxed),
            substring_hits: self.substring_hits.load(Ordering::Relaxed),
            linear_scans: self.linear_scans.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for SearchCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`SearchCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSnapshot {
    /// Full index builds.
    pub index_builds: u64,
    /// Persisted index accepted.
    pub index_cache_hits: u64,
    /// Persisted index rejected or absent.
    pub index_cache_misses: u64,
    /// Result cache hits.
    pub result_cache_hits: u64,
    /// Result cache misses.
    pub result_cache_misses: u64,
    /// Exact prefix answers.
    pub prefix_hits: u64,
    /// Substring-over-keys answers.
    pub substring_hits: u64,
    /// Linear scans.
    pub linear_scans: u64,
    /// Skipped store failures.
    pub storage_failures: u64,
}

impl SearchSnapshot {
    /// Format as Prometheus-compatible text.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP wordwise_index_builds_total Search index builds\n\
             # TYPE wordwise_index_builds_total counter\n\
             wordwise_index_builds_total {}\n\
             # HELP wordwise_index_cache_total Persisted index lookups\n\
             # TYPE wordwise_index_cache_total counter\n\
             wordwise_index_cache_total{{result=\"hit\"}} {}\n\
             wordwise_index_cache_total{{result=\"miss\"}} {}\n\
             # HELP wordwise_result_cache_total Filter result cache lookups\n\
             # TYPE wordwise_result_cache_total counter\n\
             wordwise_result_cache_total{{result=\"hit\"}} {}\n\
             wordwise_result_cache_total{{result=\"miss\"}} {}\n\
             # HELP wordwise_search_tier_total Searches by answering tier\n\
             # TYPE wordwise_search_tier_total counter\n\
             wordwise_search_tier_total{{tier=\"prefix\"}} {}\n\
             wordwise_search_tier_total{{tier=\"substring\"}} {}\n\
             wordwise_search_tier_total{{tier=\"linear\"}} {}\n\
             # HELP wordwise_search_storage_failures_total Skipped store failures\n\
             # TYPE wordwise_search_storage_failures_total counter\n\
             wordwise_search_storage_failures_total {}\n",
            self.index_builds,
            self.index_cache_hits,
            self.index_cache_misses,
            self.result_cache_hits,
            self.result_cache_misses,
            self.prefix_hits,
            self.substring_hits,
            self.linear_scans,
            self.storage_failures,
        )
    }
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// Counters owned by a [`crate::ReviewScheduler`].
#[derive(Debug, Default)]
pub struct ReviewCounters {
    /// "Known" judgments recorded.
    pub known: AtomicU64,
    /// "Unknown" judgments recorded.
    pub unknown: AtomicU64,
    /// Persisted maps that were unreadable or malformed.
    pub read_failures: AtomicU64,
    /// Writes the store rejected.
    pub write_failures: AtomicU64,
}

impl ReviewCounters {
    /// Snapshot all counters.
    #[must_use]
    pub fn snapshot(&self) -> ReviewSnapshot {
        ReviewSnapshot {
            known: self.known.load(Ordering::Relaxed),
            unknown: self.unknown.load(Ordering::Relaxed),
            read_failures: self.read_failures.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ReviewCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSnapshot {
    /// "Known" judgments.
    pub known: u64,
    /// "Unknown" judgments.
    pub unknown: u64,
    /// Unreadable persisted maps.
    pub read_failures: u64,
    /// Rejected writes.
    pub write_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        assert_eq!(SearchCounters::new().snapshot(), SearchSnapshot::default());
        assert_eq!(ReviewCounters::default().snapshot(), ReviewSnapshot::default());
    }

    #[test]
    fn bump_increments() {
        let counters = SearchCounters::new();
        SearchCounters::bump(&counters.linear_scans);
        SearchCounters::bump(&counters.linear_scans);
        assert_eq!(counters.snapshot().linear_scans, 2);
    }

    #[test]
    fn prometheus_export_format() {
        let snap = SearchSnapshot {
            index_builds: 3,
            prefix_hits: 7,
            ..SearchSnapshot::default()
        };
        let text = snap.to_prometheus();
        assert!(text.contains("wordwise_index_builds_total 3"));
        assert!(text.contains("wordwise_search_tier_total{tier=\"prefix\"} 7"));
    }
}
