//! The vocabulary boundary: where raw word records become validated [`Word`]s.

use serde_json::Value;
use tracing::{debug, warn};

use crate::checksum::Crc32;
use crate::error::{Result, WordwiseError};
use crate::types::Word;

/// Anything that can hand the core its current word list.
pub trait VocabularySource {
    /// The current word list. The core never mutates it.
    fn words(&self) -> &[Word];
}

/// An owned, validated word list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<Word>,
}

impl Vocabulary {
    /// Build from words that are already validated.
    ///
    /// # Errors
    /// Returns [`WordwiseError::InvalidWord`] for the first invalid record.
    pub fn new(words: Vec<Word>) -> Result<Self> {
        for word in &words {
            word.validate()?;
        }
        Ok(Self { words })
    }

    /// Parse a JSON array of word records.
    ///
    /// Records that fail to parse or validate are skipped with a warning,
    /// so one bad entry never hides the rest of the list.
    ///
    /// # Errors
    /// Returns [`WordwiseError::Serialization`] if the document is not a JSON
    /// array.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<Value> = serde_json::from_str(json)?;
        let total = records.len();
        let mut words = Vec::with_capacity(total);

        for (position, record) in records.into_iter().enumerate() {
            let parsed = serde_json::from_value::<Word>(record)
                .map_err(WordwiseError::from)
                .and_then(|word| word.validate().map(|()| word));
            match parsed {
                Ok(word) => words.push(word),
                Err(e) => warn!(position, error = %e, "Skipping invalid vocabulary record"),
            }
        }

        debug!(total, accepted = words.len(), "Vocabulary loaded");
        Ok(Self { words })
    }

    /// Number of words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Take the words out.
    #[must_use]
    pub fn into_words(self) -> Vec<Word> {
        self.words
    }
}

impl VocabularySource for Vocabulary {
    fn words(&self) -> &[Word] {
        &self.words
    }
}

impl VocabularySource for Vec<Word> {
    fn words(&self) -> &[Word] {
        self
    }
}

/// Content hash of a word list.
///
/// Covers every field of every word, in order, so any edit, insertion,
/// removal or reordering changes it. Keys the persisted search index.
#[must_use]
pub fn fingerprint(words: &[Word]) -> u32 {
    const FIELD: &[u8] = &[0x1F];
    const RECORD: &[u8] = &[0x1E];

    let mut hasher = Crc32::new();
    for word in words {
        hasher.update(word.text.as_bytes());
        hasher.update(FIELD);
        hasher.update(word.meaning.as_bytes());
        hasher.update(FIELD);
        if let Some(tag) = word.part_of_speech {
            hasher.update(tag.as_str().as_bytes());
        }
        hasher.update(FIELD);
        if let Some(example) = &word.example {
            hasher.update(example.as_bytes());
        }
        hasher.update(RECORD);
    }
    hasher.finish()
}
