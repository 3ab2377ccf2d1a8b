//! Configuration for the wordwise core.
//!
//! Maps directly to `wordwise.toml`. Every field has a default, so an empty
//! file (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordwiseConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Review scheduler settings.
    #[serde(default)]
    pub review: ReviewConfig,
    /// Search, filtering and pagination settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Store backend settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl WordwiseConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `WordwiseError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::WordwiseError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level or `EnvFilter` directive: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Review scheduler settings.
///
/// The interval ladder itself is fixed; only the storage keys are
/// configurable so that existing browser data can be read under its
/// original names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Key of the `[[word, strength], ...]` pair list.
    #[serde(default = "default_strength_key")]
    pub strength_key: String,
    /// Key of the `{word: nextReviewAtMs}` object.
    #[serde(default = "default_review_times_key")]
    pub review_times_key: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            strength_key: default_strength_key(),
            review_times_key: default_review_times_key(),
        }
    }
}

/// Search, filtering and pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of prefix keys scanned by the substring tier.
    #[serde(default = "default_500")]
    pub fuzzy_key_limit: usize,
    /// Words per page.
    #[serde(default = "default_20")]
    pub page_size: usize,
    /// Number of filter results kept in the in-memory result cache.
    /// Zero disables result caching.
    #[serde(default = "default_64")]
    pub result_cache_capacity: usize,
    /// Store key of the serialized index.
    #[serde(default = "default_index_cache_key")]
    pub index_cache_key: String,
    /// Whether to persist the built index to the store between sessions.
    #[serde(default = "default_true")]
    pub persist_index: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_key_limit: 500,
            page_size: 20,
            result_cache_capacity: 64,
            index_cache_key: default_index_cache_key(),
            persist_index: true,
        }
    }
}

/// Store backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Backend: "memory" or "sqlite".
    #[serde(default = "default_sqlite")]
    pub backend: String,
    /// Database file for the sqlite backend.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Use WAL mode for concurrent reads.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
    /// Detect stored-value corruption via checksums.
    #[serde(default = "default_true")]
    pub checksum_enabled: bool,
    /// Byte quota for the memory backend, mimicking browser storage limits.
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            path: default_db_path(),
            wal_mode: true,
            checksum_enabled: true,
            quota_bytes: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (required by serde)
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_sqlite() -> String { "sqlite".to_string() }
fn default_db_path() -> String { "wordwise.db".to_string() }
fn default_strength_key() -> String { "wordMemoryStrength".to_string() }
fn default_review_times_key() -> String { "wordReviewTimes".to_string() }
fn default_index_cache_key() -> String { "vocabularySearchIndex".to_string() }
fn default_20() -> usize { 20 }
fn default_64() -> usize { 64 }
fn default_500() -> usize { 500 }
