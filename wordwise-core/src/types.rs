//! Core type definitions: words, tags, timestamps and review records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WordwiseError};

// ---------------------------------------------------------------------------
// Words
// ---------------------------------------------------------------------------

/// A vocabulary entry as supplied by the vocabulary source.
///
/// The core never mutates words. `text` keeps its stored case but every
/// lookup compares it case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// The headword. Never empty.
    pub text: String,
    /// Translation or definition.
    pub meaning: String,
    /// Grammatical category, if the source tagged one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<PartOfSpeech>,
    /// Example sentence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl Word {
    /// Create a validated word with no tag and no example.
    ///
    /// # Errors
    /// Returns [`WordwiseError::InvalidWord`] if `text` is blank.
    pub fn new(text: impl Into<String>, meaning: impl Into<String>) -> Result<Self> {
        let word = Self {
            text: text.into(),
            meaning: meaning.into(),
            part_of_speech: None,
            example: None,
        };
        word.validate()?;
        Ok(word)
    }

    /// Attach a part-of-speech tag.
    #[must_use]
    pub fn with_part_of_speech(mut self, tag: PartOfSpeech) -> Self {
        self.part_of_speech = Some(tag);
        self
    }

    /// Attach an example sentence.
    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Check the invariants a record must satisfy before the core accepts it.
    ///
    /// # Errors
    /// Returns [`WordwiseError::InvalidWord`] if `text` is blank.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(WordwiseError::InvalidWord {
                reason: format!("empty headword (meaning: {:?})", self.meaning),
            });
        }
        Ok(())
    }

    /// The word's part of speech, falling back to [`PartOfSpeech::Other`].
    #[must_use]
    pub fn category(&self) -> PartOfSpeech {
        self.part_of_speech.unwrap_or_default()
    }

    /// Difficulty derived from the headword length.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::of(&self.text)
    }

    /// Uppercase first letter of the headword.
    #[must_use]
    pub fn first_letter(&self) -> Option<char> {
        first_letter(&self.text)
    }
}

/// Uppercase form of the first character of `text`.
///
/// Characters whose uppercase form is several characters long (`ß` → `SS`)
/// map to the first of them.
#[must_use]
pub fn first_letter(text: &str) -> Option<char> {
    text.chars().next().and_then(|c| c.to_uppercase().next())
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Grammatical category of a word.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    /// Noun.
    #[serde(alias = "n")]
    Noun,
    /// Verb.
    #[serde(alias = "v", alias = "vt", alias = "vi")]
    Verb,
    /// Adjective.
    #[serde(alias = "adj", alias = "a")]
    Adjective,
    /// Adverb.
    #[serde(alias = "adv")]
    Adverb,
    /// Pronoun.
    #[serde(alias = "pron")]
    Pronoun,
    /// Preposition.
    #[serde(alias = "prep")]
    Preposition,
    /// Conjunction.
    #[serde(alias = "conj")]
    Conjunction,
    /// Interjection.
    #[serde(alias = "int", alias = "interj")]
    Interjection,
    /// Multi-word expression.
    #[serde(alias = "phr")]
    Phrase,
    /// Anything else, including untagged words.
    #[default]
    #[serde(other)]
    Other,
}

impl PartOfSpeech {
    /// Every tag, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Noun,
        Self::Verb,
        Self::Adjective,
        Self::Adverb,
        Self::Pronoun,
        Self::Preposition,
        Self::Conjunction,
        Self::Interjection,
        Self::Phrase,
        Self::Other,
    ];

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Pronoun => "pronoun",
            Self::Preposition => "preposition",
            Self::Conjunction => "conjunction",
            Self::Interjection => "interjection",
            Self::Phrase => "phrase",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartOfSpeech {
    type Err = WordwiseError;

    /// Parses full names and dictionary abbreviations (`n.`, `adj.`, ...).
    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().trim_end_matches('.').to_lowercase();
        let parsed = match tag.as_str() {
            "noun" | "n" => Self::Noun,
            "verb" | "v" | "vt" | "vi" => Self::Verb,
            "adjective" | "adj" | "a" => Self::Adjective,
            "adverb" | "adv" => Self::Adverb,
            "pronoun" | "pron" => Self::Pronoun,
            "preposition" | "prep" => Self::Preposition,
            "conjunction" | "conj" => Self::Conjunction,
            "interjection" | "int" | "interj" => Self::Interjection,
            "phrase" | "phr" => Self::Phrase,
            "other" => Self::Other,
            _ => {
                return Err(WordwiseError::InvalidWord {
                    reason: format!("unknown part of speech {s:?}"),
                });
            }
        };
        Ok(parsed)
    }
}

/// Difficulty bucket computed from headword length in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Four characters or fewer.
    Easy,
    /// Five to seven characters.
    Medium,
    /// More than seven characters.
    Hard,
}

impl Difficulty {
    /// Classify a headword.
    #[must_use]
    pub fn of(text: &str) -> Self {
        match text.chars().count() {
            0..=4 => Self::Easy,
            5..=7 => Self::Medium,
            _ => Self::Hard,
        }
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Absolute point in time, in milliseconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Wrap a raw epoch-millisecond value.
    #[must_use]
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Raw epoch-millisecond value.
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// This timestamp shifted forward by whole days.
    #[must_use]
    pub const fn plus_days(self, days: u32) -> Self {
        Self(self.0.saturating_add(days as i64 * MS_PER_DAY))
    }

    /// Convert to a chrono UTC datetime, if in range.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// A learner's judgment of one flashcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// "I knew it."
    Known,
    /// "I didn't know it."
    Unknown,
}

/// Review state of one word, derived from the persisted maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    /// How well the word is remembered. Zero for a freshly failed word.
    pub strength: u32,
    /// When the word is next due.
    pub next_review_at: Timestamp,
}

impl MemoryRecord {
    /// Whether the word is due at `now`.
    #[must_use]
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_review_at <= now
    }
}
