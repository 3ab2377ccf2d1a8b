//! The review interval ladder.
//!
//! Strength indexes a fixed ladder of day counts; anything past the last
//! rung stays on it:
//!
//! | strength | interval |
//! |----------|----------|
//! | 0        | 1 day    |
//! | 1        | 3 days   |
//! | 2        | 7 days   |
//! | 3        | 14 days  |
//! | 4+       | 30 days  |
//!
//! Existing schedules were written with exactly these breakpoints, so they
//! must not change.

use crate::types::{MemoryRecord, Outcome, Timestamp};

/// Days until the next review, indexed by strength.
pub const INTERVAL_LADDER_DAYS: [u32; 5] = [1, 3, 7, 14, 30];

/// Strength at which a word sits on the top rung.
pub const MASTERED_STRENGTH: u32 = (INTERVAL_LADDER_DAYS.len() - 1) as u32;

/// Days until the next review for a word of the given strength.
#[must_use]
pub fn interval_days(strength: u32) -> u32 {
    let rung = usize::try_from(strength)
        .unwrap_or(usize::MAX)
        .min(INTERVAL_LADDER_DAYS.len() - 1);
    INTERVAL_LADDER_DAYS[rung]
}

/// Strength after a judgment: +1 when known, −1 (floored at 0) when not.
#[must_use]
pub fn adjust_strength(strength: u32, outcome: Outcome) -> u32 {
    match outcome {
        Outcome::Known => strength.saturating_add(1),
        Outcome::Unknown => strength.saturating_sub(1),
    }
}

/// The record a word gets when its strength is set to `strength` at `now`.
#[must_use]
pub fn schedule(strength: u32, now: Timestamp) -> MemoryRecord {
    MemoryRecord {
        strength,
        next_review_at: now.plus_days(interval_days(strength)),
    }
}
