//! End-to-end search tests over a synthetic corpus.
//!
//! The corpus mixes a few hundred generated filler entries with the real
//! words the assertions target, so fuzzy search has to dig its answers out
//! of genuine noise.

use slovar::lexicon::{Stressed, Translation, Word, WordId, Words};
use slovar::search::{is_cyrillic, Dict};

fn entry(id: u64, surface: &str, rank: u64, glosses: &[&str]) -> Word {
    Word {
        id: WordId(id),
        rank,
        word: surface.to_string(),
        lower: surface.to_lowercase(),
        stressed: Stressed::new(surface),
        translations: glosses.iter().map(|g| Translation::new(*g)).collect(),
        ..Word::default()
    }
}

/// A corpus of real targets drowned in deterministic filler words.
fn corpus() -> Words {
    let mut words = vec![
        entry(1, "здравствуйте", 120, &["hello, hi"]),
        entry(2, "спасибо", 80, &["thank you, thanks"]),
        entry(3, "пожалуйста", 95, &["please, you're welcome"]),
        entry(4, "мир", 40, &["world, peace"]),
        entry(5, "привет", 60, &["hi, hey"]),
        entry(6, "до свидания", 150, &["goodbye, bye"]),
        entry(7, "здравие", 5000, &[]),
    ];

    let syllables = [
        "ба", "ве", "го", "ду", "жи", "зо", "ка", "ле", "му", "но", "пы", "ре", "са", "ти",
    ];
    let glosses = [
        "house", "river", "stone", "light", "night", "road", "hand", "voice",
    ];
    let mut id = 100;
    for a in 0..syllables.len() {
        for b in 0..syllables.len() {
            let surface = format!(
                "{}{}{}",
                syllables[a],
                syllables[b],
                syllables[(a + b) % syllables.len()]
            );
            let gloss = glosses[(a * syllables.len() + b) % glosses.len()];
            words.push(entry(id, &surface, 1000 + id, &[gloss]));
            id += 1;
        }
    }

    words.into_iter().collect()
}

#[test]
fn cyrillic_boundary_cases() {
    assert!(is_cyrillic("здравствуйте"));
    assert!(!is_cyrillic("hello"));
    // Exactly half Cyrillic code points classifies as Cyrillic.
    assert!(is_cyrillic("даok"));
    assert!(is_cyrillic("да ok"));
}

#[test]
fn russian_fuzzy_finds_misspelled_greeting() {
    let dict = Dict::new(corpus());
    let (results, cyrillic) = dict.search_fuzzy("драствуте", true, 10);
    assert!(cyrillic);
    assert!(!results.is_empty());
    assert_eq!(results[0].word, "здравствуйте");
    assert!(results.len() <= 10);
}

#[test]
fn english_fuzzy_finds_misspelled_phrase() {
    let dict = Dict::new(corpus());
    let (results, cyrillic) = dict.search_fuzzy("thnk you", true, 10);
    assert!(!cyrillic);
    assert!(!results.is_empty());
    assert_eq!(results[0].word, "спасибо");
}

#[test]
fn exact_search_with_fuzzy_fallback_policy() {
    let dict = Dict::new(corpus());

    // The composing layer's policy: exact first, fuzzy on empty.
    let query = "драствуте";
    let (exact, _) = dict.search(query, true, 10);
    assert!(exact.is_empty());
    let (fuzzy, _) = dict.search_fuzzy(query, true, 10);
    assert_eq!(fuzzy[0].word, "здравствуйте");
}

#[test]
fn exact_english_ranks_primary_phrases_first() {
    let dict = Dict::new(corpus());
    let (results, _) = dict.search("hi", true, 10);
    assert_eq!(results[0].word, "привет");
    assert!(results.iter().any(|w| w.word == "здравствуйте"));
}

#[test]
fn untranslated_entries_are_filtered_on_request() {
    let dict = Dict::new(corpus());
    let (with, _) = dict.search("здрав", true, 0);
    assert!(with.iter().any(|w| w.word == "здравие"));
    let (without, _) = dict.search("здрав", false, 0);
    assert!(without.iter().all(|w| w.word != "здравие"));
}

#[test]
fn truncation_caps_results() {
    let dict = Dict::new(corpus());

    let (results, _) = dict.search_fuzzy("баве", true, 5);
    assert!(results.len() <= 5);

    let (results, _) = dict.search("а", true, 0);
    assert!(results.len() <= 1000);
}

#[test]
fn results_never_repeat_a_word() {
    let dict = Dict::new(corpus());
    let (results, _) = dict.search_fuzzy("you", true, 0);
    let mut ids: Vec<u64> = results.iter().map(|w| w.id.0).collect();
    let before = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), before);
}

#[test]
fn ranking_respects_rank_on_score_ties() {
    let mut words = vec![
        entry(1, "мирка", 500, &["a"]),
        entry(2, "мирок", 100, &["b"]),
        entry(3, "мирно", 300, &["c"]),
    ];
    // All three at equal distance from the query; rank must break the tie.
    words.rotate_left(1);
    let dict = Dict::new(words.into_iter().collect());
    let (results, _) = dict.search("мир", true, 0);
    let surfaces: Vec<&str> = results.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(surfaces, vec!["мирок", "мирно", "мирка"]);
}
