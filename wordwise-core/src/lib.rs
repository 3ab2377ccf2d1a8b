//! # Wordwise Core Library
//!
//! The non-UI core of a flashcard vocabulary trainer. Two independent
//! components do the real work:
//!
//! - **Review scheduling**: [`ReviewScheduler`] keeps a per-word memory
//!   strength and derives the next review time from a fixed interval ladder
//!   (1, 3, 7, 14, 30 days).
//! - **Word search**: [`SearchIndex`] maps every lowercase prefix, first
//!   letter and part of speech to word positions; [`WordSearch`] layers
//!   filtering, sorting, pagination and caching on top of it.
//!
//! Both depend only on [`Word`] records from a [`VocabularySource`], a
//! [`KeyValueStore`] and a [`Clock`], all injected at construction. [`Deck`]
//! wires them together for an application.
//!
//! ## Failure policy
//!
//! Storage is best effort. Read and write failures, quota errors and corrupt
//! JSON are logged and treated as missing data; learning is never blocked by
//! a broken store.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod checksum;
pub mod clock;
pub mod config;
pub mod deck;
pub mod error;
pub mod metrics;
pub mod review;
pub mod search;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod vocabulary;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::WordwiseConfig;
pub use deck::Deck;
pub use error::WordwiseError;
pub use review::{ReviewScheduler, ReviewStats};
pub use search::filter::{FilterQuery, Page, Selection, SortKey};
pub use search::index::SearchIndex;
pub use search::WordSearch;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use types::*;
pub use vocabulary::{Vocabulary, VocabularySource};
