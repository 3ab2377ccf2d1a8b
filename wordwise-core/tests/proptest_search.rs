//! Property-Based Tests for word search.
//!
//! The index is a pure optimization: every query must answer the same with
//! and without it, must never miss a headword, and cached results must never
//! outlive the word list they were computed from.

use proptest::prelude::*;

use wordwise_core::config::SearchConfig;
use wordwise_core::search::filter::apply_filters;
use wordwise_core::search::query::{query_letter, query_part_of_speech, query_search};
use wordwise_core::{
    Difficulty, FilterQuery, MemoryStore, PartOfSpeech, SearchIndex, Word, WordSearch,
};

const KEY_LIMIT: usize = 500;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_part_of_speech() -> impl Strategy<Value = PartOfSpeech> {
    prop::sample::select(PartOfSpeech::ALL.to_vec())
}

fn arb_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
    ]
}

fn arb_word() -> impl Strategy<Value = Word> {
    (
        "[a-dA-D][a-dA-D]{0,8}",
        "[a-d ]{0,10}",
        prop::option::of(arb_part_of_speech()),
    )
        .prop_map(|(text, meaning, tag)| {
            let word = Word::new(text, meaning).expect("generated headword is non-empty");
            match tag {
                Some(tag) => word.with_part_of_speech(tag),
                None => word,
            }
        })
}

fn arb_words() -> impl Strategy<Value = Vec<Word>> {
    prop::collection::vec(arb_word(), 0..25)
}

fn arb_query() -> impl Strategy<Value = FilterQuery> {
    (
        prop_oneof![
            Just(None::<Result<char, String>>),
            prop::sample::select(vec!['A', 'b', 'C', 'd', 'E']).prop_map(|c| Some(Ok(c))),
            "[a-d]{1,3}".prop_map(|t| Some(Err(t))),
        ],
        prop::option::of(arb_part_of_speech()),
        prop::option::of(arb_difficulty()),
    )
        .prop_map(|(selection, tag, difficulty)| {
            let mut query = FilterQuery::new();
            match selection {
                Some(Ok(letter)) => query.set_letter(Some(letter)),
                Some(Err(term)) => query.set_search(Some(&term)),
                None => {}
            }
            query.set_part_of_speech(tag);
            query.set_difficulty(difficulty);
            query
        })
}

// ---------------------------------------------------------------------------
// Property: no false negatives
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn every_headword_finds_itself(words in arb_words()) {
        let index = SearchIndex::build(&words);
        for (position, word) in words.iter().enumerate() {
            let (indexed, _) = query_search(&words, Some(&index), &word.text, KEY_LIMIT);
            let (scanned, _) = query_search(&words, None, &word.text, KEY_LIMIT);
            prop_assert!(indexed.contains(&position), "indexed search missed {}", word.text);
            prop_assert!(scanned.contains(&position), "linear search missed {}", word.text);
        }
    }

    #[test]
    fn search_agrees_with_and_without_index(words in arb_words(), term in "[a-d ]{0,4}") {
        let index = SearchIndex::build(&words);
        prop_assert_eq!(
            query_search(&words, Some(&index), &term, KEY_LIMIT),
            query_search(&words, None, &term, KEY_LIMIT)
        );
    }
}

// ---------------------------------------------------------------------------
// Property: letter and part-of-speech filters are index-independent
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn letter_filter_is_exact_subset(words in arb_words()) {
        let index = SearchIndex::build(&words);
        let query = FilterQuery::new().with_letter('A');

        let expected: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.text.chars().next().and_then(|c| c.to_uppercase().next()) == Some('A'))
            .map(|(p, _)| p)
            .collect();

        prop_assert_eq!(&apply_filters(&words, Some(&index), &query, KEY_LIMIT), &expected);
        prop_assert_eq!(&apply_filters(&words, None, &query, KEY_LIMIT), &expected);
    }

    #[test]
    fn part_of_speech_buckets_partition_the_list(words in arb_words()) {
        let index = SearchIndex::build(&words);
        let mut total = 0;
        for tag in PartOfSpeech::ALL {
            let indexed = query_part_of_speech(&words, Some(&index), tag);
            prop_assert_eq!(&indexed, &query_part_of_speech(&words, None, tag));
            total += indexed.len();
        }
        prop_assert_eq!(total, words.len());
    }

    #[test]
    fn composed_filters_are_index_independent(words in arb_words(), query in arb_query()) {
        let index = SearchIndex::build(&words);
        prop_assert_eq!(
            apply_filters(&words, Some(&index), &query, KEY_LIMIT),
            apply_filters(&words, None, &query, KEY_LIMIT)
        );
    }
}

// ---------------------------------------------------------------------------
// Property: idempotent build
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn rebuilding_answers_identically(words in arb_words(), term in "[a-d]{1,3}") {
        let first = SearchIndex::build(&words);
        let second = SearchIndex::build(&words);
        prop_assert_eq!(&first, &second);
        for letter in ['A', 'B', 'C', 'D'] {
            prop_assert_eq!(
                query_letter(&words, Some(&first), letter),
                query_letter(&words, Some(&second), letter)
            );
        }
        prop_assert_eq!(
            query_search(&words, Some(&first), &term, KEY_LIMIT),
            query_search(&words, Some(&second), &term, KEY_LIMIT)
        );
    }
}

// ---------------------------------------------------------------------------
// Property: cache must never return stale results for any filter type
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn cached_results_never_stale(
        before in arb_words(),
        after in arb_words(),
        queries in prop::collection::vec(arb_query(), 1..6),
    ) {
        let store = MemoryStore::new();
        let mut search = WordSearch::new(&store, before, SearchConfig::default());
        for query in &queries {
            let _ = search.apply_filters(query);
        }

        search.replace_words(after.clone());
        let fresh_index = SearchIndex::build(&after);
        prop_assert_eq!(search.index(), &fresh_index);

        for query in &queries {
            let expected: Vec<&Word> = apply_filters(&after, None, query, KEY_LIMIT)
                .into_iter()
                .map(|p| &after[p])
                .collect();
            // Twice: once to fill the cache, once to read it back.
            for _ in 0..2 {
                prop_assert_eq!(&search.apply_filters(query), &expected);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property: an index for another list is never trusted
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn index_from_other_list_matches_linear_path(
        indexed in arb_words(),
        words in arb_words(),
        query in arb_query(),
        term in "[a-d]{1,3}",
    ) {
        prop_assume!(indexed.len() != words.len());
        let index = SearchIndex::build(&indexed);

        let filtered = apply_filters(&words, Some(&index), &query, KEY_LIMIT);
        prop_assert!(filtered.iter().all(|&p| p < words.len()));
        prop_assert_eq!(&filtered, &apply_filters(&words, None, &query, KEY_LIMIT));

        let searched = query_search(&words, Some(&index), &term, KEY_LIMIT);
        prop_assert!(searched.0.iter().all(|&p| p < words.len()));
        prop_assert_eq!(searched, query_search(&words, None, &term, KEY_LIMIT));

        for letter in ['A', 'B', 'C', 'D'] {
            prop_assert_eq!(
                query_letter(&words, Some(&index), letter),
                query_letter(&words, None, letter)
            );
        }
        for tag in PartOfSpeech::ALL {
            prop_assert_eq!(
                query_part_of_speech(&words, Some(&index), tag),
                query_part_of_speech(&words, None, tag)
            );
        }
    }
}
