//! Wordwise Benchmark Suite
//!
//! Targets for a 5 000-word vocabulary:
//!   index_build_5000 ............... < 20ms
//!   search_prefix_5000 ............. < 5μs
//!   search_substring_5000 .......... < 200μs
//!   search_linear_5000 ............. < 2ms
//!   apply_filters_letter_pos_5000 .. < 200μs
//!   due_words_5000 ................. < 5ms

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wordwise_core::config::{ReviewConfig, SearchConfig};
use wordwise_core::search::query::query_search;
use wordwise_core::{
    FilterQuery, KeyValueStore, ManualClock, MemoryStore, PartOfSpeech, ReviewScheduler, SearchIndex,
    SortKey, Timestamp, Word, WordSearch,
};

const VOCAB_SIZE: usize = 5_000;
const SEED: u64 = 0x5EED_0F_0D;
const KEY_LIMIT: usize = 500;

fn random_text(rng: &mut StdRng, min: usize, max: usize) -> String {
    let len = rng.gen_range(min..=max);
    (0..len)
        .map(|_| char::from(b'a' + rng.gen_range(0..26u8)))
        .collect()
}

/// Deterministic synthetic vocabulary.
fn make_vocabulary(n: usize) -> Vec<Word> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..n)
        .map(|i| {
            let text = format!("{}{i}", random_text(&mut rng, 3, 9));
            let meaning = format!("{} {}", random_text(&mut rng, 3, 8), random_text(&mut rng, 2, 6));
            let word = Word::new(text, meaning).expect("generated headword is non-empty");
            let tag = PartOfSpeech::ALL[rng.gen_range(0..PartOfSpeech::ALL.len())];
            word.with_part_of_speech(tag)
        })
        .collect()
}

/// Benchmark: full index build (target: < 20ms).
fn bench_index_build(c: &mut Criterion) {
    let words = make_vocabulary(VOCAB_SIZE);
    c.bench_function("index_build_5000", |b| {
        b.iter(|| {
            let index = SearchIndex::build(black_box(&words));
            black_box(index);
        });
    });
}

/// Benchmark: each search tier in isolation.
fn bench_search_tiers(c: &mut Criterion) {
    let words = make_vocabulary(VOCAB_SIZE);
    let index = SearchIndex::build(&words);
    let prefix_term = words[42].text[..2].to_string();
    let substring_term = words[42].text[1..].to_string();
    // Meanings contain a space and headwords never do, so a whole meaning
    // only resolves on the full scan.
    let linear_term = words[42].meaning.clone();

    c.bench_function("search_prefix_5000", |b| {
        b.iter(|| {
            let hits = query_search(&words, Some(&index), black_box(&prefix_term), KEY_LIMIT);
            black_box(hits);
        });
    });

    c.bench_function("search_substring_5000", |b| {
        b.iter(|| {
            let hits = query_search(&words, Some(&index), black_box(&substring_term), KEY_LIMIT);
            black_box(hits);
        });
    });

    c.bench_function("search_linear_5000", |b| {
        b.iter(|| {
            let hits = query_search(&words, Some(&index), black_box(&linear_term), KEY_LIMIT);
            black_box(hits);
        });
    });
}

/// Benchmark: composed filter, uncached (target: < 200μs).
fn bench_apply_filters(c: &mut Criterion) {
    let store = MemoryStore::new();
    let config = SearchConfig {
        result_cache_capacity: 0,
        persist_index: false,
        ..SearchConfig::default()
    };
    let mut search = WordSearch::new(&store, make_vocabulary(VOCAB_SIZE), config);
    let query = FilterQuery::new()
        .with_letter('S')
        .with_part_of_speech(PartOfSpeech::Noun);

    c.bench_function("apply_filters_letter_pos_5000", |b| {
        b.iter(|| {
            let page = search.browse(black_box(&query), SortKey::Text, 1);
            black_box(page.total_items);
        });
    });
}

/// Benchmark: due list over a fully tracked vocabulary (target: < 5ms).
fn bench_due_words(c: &mut Criterion) {
    let words = make_vocabulary(VOCAB_SIZE);
    let store = MemoryStore::new();
    let clock = ManualClock::new(Timestamp::from_millis(0));
    let scheduler = ReviewScheduler::new(&store, &clock, ReviewConfig::default());

    // Seed both maps directly; judging 5 000 words one by one rewrites the
    // whole maps each time.
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut strengths = Vec::with_capacity(words.len());
    let mut times = Vec::with_capacity(words.len());
    for word in &words {
        let strength: u32 = rng.gen_range(0..5);
        let day: i64 = rng.gen_range(0..4);
        strengths.push(format!(r#"["{}",{strength}]"#, word.text));
        times.push(format!(r#""{}":{}"#, word.text, day * 86_400_000));
    }
    store
        .set("wordMemoryStrength", &format!("[{}]", strengths.join(",")))
        .expect("seed strengths");
    store
        .set("wordReviewTimes", &format!("{{{}}}", times.join(",")))
        .expect("seed review times");
    let now = Timestamp::from_millis(0).plus_days(2);

    c.bench_function("due_words_5000", |b| {
        b.iter(|| {
            let due = scheduler.due_words(black_box(now), black_box(&words));
            black_box(due.len());
        });
    });
}

criterion_group!(
    benches,
    bench_index_build,
    bench_search_tiers,
    bench_apply_filters,
    bench_due_words,
);
criterion_main!(benches);
