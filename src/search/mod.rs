//! The dictionary search facade.
//!
//! [`Dict`] owns the read-only word collection and routes queries to the
//! Russian or English search path based on a Cyrillic code-point count.
//! Exact search scans surface forms (Russian) or translation phrase maps
//! (English); fuzzy search runs the bigram index first and re-ranks the
//! surviving candidates by Levenshtein distance.
//!
//! Both fuzzy indices are built lazily on first use through [`OnceLock`],
//! so a `Dict` is cheap to construct and safe to share across threads:
//! exactly one build happens per index, and every later reader observes
//! the same index without locking.
//!
//! No operation fails; the absence of matches is an empty result.

use std::collections::hash_map::Entry;
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;

use crate::lexicon::{Word, WordId, Words};
use crate::ngram::NgramIndex;

mod results;

pub use results::{Hit, Hits, INVERSE_SCORE};

/// N-gram window length shared by both fuzzy indices.
const GRAM_LEN: usize = 2;

/// Queries longer than this many bytes are clipped before searching.
const QUERY_MAX_BYTES: usize = 255;

/// Upper bound on the candidate pool handed to Levenshtein re-ranking.
const LEVENSHTEIN_POOL: usize = 500;

/// The lazily-built index over Russian surface forms, one entry per word.
struct SurfaceIndex {
    words: Vec<Arc<Word>>,
    index: NgramIndex,
}

/// The lazily-built index over English translation phrases, one entry per
/// (word, phrase) pair; a word appears once for each distinct phrase any of
/// its glosses lists.
struct PhraseIndex {
    entries: Vec<(Arc<Word>, String)>,
    index: NgramIndex,
}

/// Classify a query as Cyrillic.
///
/// Counts code points in the Cyrillic block (U+0400–U+04FF); the query is
/// Cyrillic when at least half its code points qualify. A query of exactly
/// half Cyrillic code points is classified Cyrillic (integer division).
///
/// # Example
///
/// ```rust
/// use slovar::search::is_cyrillic;
///
/// assert!(is_cyrillic("привет"));
/// assert!(!is_cyrillic("hello"));
/// assert!(is_cyrillic("да ok"));
/// ```
pub fn is_cyrillic(text: &str) -> bool {
    let mut total = 0usize;
    let mut cyrillic = 0usize;
    for c in text.chars() {
        total += 1;
        if ('\u{0400}'..='\u{04FF}').contains(&c) {
            cyrillic += 1;
        }
    }
    cyrillic >= total / 2
}

/// Clip a query to [`QUERY_MAX_BYTES`], never splitting a code point.
fn clip(query: &str) -> &str {
    if query.len() <= QUERY_MAX_BYTES {
        return query;
    }
    let mut end = QUERY_MAX_BYTES;
    while !query.is_char_boundary(end) {
        end -= 1;
    }
    &query[..end]
}

/// Minimum n-gram score a fuzzy candidate must reach, proportional to the
/// query length in code points.
fn fuzzy_threshold(query: &str, divisor: usize) -> u8 {
    let t = query.chars().count() / divisor;
    t.clamp(1, u8::MAX as usize) as u8
}

/// The dictionary search service.
///
/// Holds the full word collection, immutable after construction, plus the
/// two lazily-built fuzzy indices.
pub struct Dict {
    words: Words,
    russian: OnceLock<SurfaceIndex>,
    english: OnceLock<PhraseIndex>,
}

impl Dict {
    /// Wrap an already-loaded word collection.
    pub fn new(words: Words) -> Self {
        Self {
            words,
            russian: OnceLock::new(),
            english: OnceLock::new(),
        }
    }

    /// The underlying word collection.
    pub fn words(&self) -> &Words {
        &self.words
    }

    /// Build (at most once) and return the Russian fuzzy index.
    fn russian_index(&self) -> &SurfaceIndex {
        self.russian.get_or_init(|| {
            let words: Vec<Arc<Word>> = self.words.iter().map(Arc::clone).collect();
            let index = NgramIndex::new(GRAM_LEN, words.iter().map(|w| w.lower.as_str()));
            SurfaceIndex { words, index }
        })
    }

    /// Build (at most once) and return the English fuzzy index.
    fn english_index(&self) -> &PhraseIndex {
        self.english.get_or_init(|| {
            let mut entries = Vec::with_capacity(self.words.len());
            for word in self.words.iter() {
                for translation in &word.translations {
                    for phrase in translation.phrases() {
                        entries.push((Arc::clone(word), phrase.to_string()));
                    }
                }
            }
            let index = NgramIndex::new(GRAM_LEN, entries.iter().map(|(_, p)| p.as_str()));
            PhraseIndex { entries, index }
        })
    }

    /// Exact search, routed by [`is_cyrillic`].
    ///
    /// Returns up to `max` entries (0 meaning the default cap) and whether
    /// the query was classified Cyrillic. `include_untranslated` only
    /// affects the Russian path; English matches carry a translation by
    /// construction.
    pub fn search(
        &self,
        query: &str,
        include_untranslated: bool,
        max: usize,
    ) -> (Vec<Arc<Word>>, bool) {
        if is_cyrillic(query) {
            (self.search_russian(query, include_untranslated, max), true)
        } else {
            (self.search_english(query, max), false)
        }
    }

    /// Fuzzy search, routed by [`is_cyrillic`].
    pub fn search_fuzzy(
        &self,
        query: &str,
        include_untranslated: bool,
        max: usize,
    ) -> (Vec<Arc<Word>>, bool) {
        if is_cyrillic(query) {
            (
                self.search_russian_fuzzy(query, include_untranslated, max),
                true,
            )
        } else {
            (self.search_english_fuzzy(query, max), false)
        }
    }

    /// Exact Russian search: substring containment over lowercased surface
    /// forms, scored by inverse Levenshtein distance to the query.
    pub fn search_russian(
        &self,
        query: &str,
        include_untranslated: bool,
        max: usize,
    ) -> Vec<Arc<Word>> {
        let query = clip(query);
        let needle = query.to_lowercase();

        let mut results = Hits::new();
        for word in self.words.iter() {
            if !include_untranslated && !word.has_translations() {
                continue;
            }
            if word.lower.contains(&needle) {
                let mut hit = Hit::new(Arc::clone(word), 0);
                hit.levenshtein(query);
                results.push(hit);
            }
        }

        results.sort();
        results.into_words(max)
    }

    /// Exact English search: a word matches when any of its glosses lists
    /// the query as a phrase; earlier phrases score higher.
    pub fn search_english(&self, query: &str, max: usize) -> Vec<Arc<Word>> {
        let needle = clip(query).to_lowercase();

        let mut results = Hits::new();
        for word in self.words.iter() {
            if let Some(position) = word.translation_position(&needle) {
                results.push(Hit::new(Arc::clone(word), INVERSE_SCORE - position as i64));
            }
        }

        results.sort();
        results.into_words(max)
    }

    /// Fuzzy Russian search: bigram candidates above a length-proportional
    /// threshold, re-ranked by Levenshtein distance to the surface form.
    pub fn search_russian_fuzzy(
        &self,
        query: &str,
        include_untranslated: bool,
        max: usize,
    ) -> Vec<Arc<Word>> {
        let query = clip(query);
        let threshold = fuzzy_threshold(query, 5);
        let surface = self.russian_index();

        let mut pool = Hits::new();
        surface.index.search(&query.to_lowercase(), |position, score, _low, _high| {
            if score >= threshold {
                pool.push(Hit::new(Arc::clone(&surface.words[position]), score as i64));
            }
        });

        pool = cap_pool(pool, max);

        let mut results = Hits::with_capacity(pool.len());
        for mut hit in pool {
            if !include_untranslated && !hit.word.has_translations() {
                continue;
            }
            hit.levenshtein(query);
            results.push(hit);
        }

        results.sort();
        results.into_words(max)
    }

    /// Fuzzy English search over translation phrases.
    ///
    /// Candidates are re-ranked against the specific phrase that matched,
    /// then collapsed to the single best-scoring hit per word so no entry
    /// appears twice.
    pub fn search_english_fuzzy(&self, query: &str, max: usize) -> Vec<Arc<Word>> {
        let query = clip(query);
        let threshold = fuzzy_threshold(query, 3);
        let phrases = self.english_index();

        let mut pool = Hits::new();
        phrases.index.search(&query.to_lowercase(), |position, score, _low, _high| {
            if score >= threshold {
                let (word, phrase) = &phrases.entries[position];
                pool.push(Hit::with_match(
                    Arc::clone(word),
                    phrase.clone(),
                    score as i64,
                ));
            }
        });

        pool = cap_pool(pool, max);

        let mut best: FxHashMap<WordId, Hit> = FxHashMap::default();
        for mut hit in pool {
            hit.levenshtein(query);
            match best.entry(hit.word.id) {
                Entry::Occupied(mut slot) => {
                    if hit.score > slot.get().score {
                        slot.insert(hit);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(hit);
                }
            }
        }

        let mut results: Hits = best.into_values().collect();
        results.sort();
        results.into_words(max)
    }
}

/// Bound the candidate pool before the expensive re-ranking stage, keeping
/// the best n-gram scores.
fn cap_pool(mut pool: Hits, max: usize) -> Hits {
    let cap = LEVENSHTEIN_POOL.max(2 * max);
    if pool.len() > cap {
        pool.sort();
        pool.truncate(cap);
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{Stressed, Translation};

    fn word(id: u64, surface: &str, rank: u64, glosses: &[&str]) -> Word {
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

    fn sample() -> Dict {
        let words: Words = [
            word(1, "здравствуйте", 120, &["hello, hi"]),
            word(2, "спасибо", 80, &["thank you, thanks"]),
            word(3, "пожалуйста", 95, &["please, you're welcome"]),
            word(4, "мир", 40, &["world, peace"]),
            word(5, "мирный", 300, &["peaceful"]),
            word(6, "привет", 60, &["hi, hey"]),
            word(7, "здравие", 5000, &[]),
        ]
        .into_iter()
        .collect();
        Dict::new(words)
    }

    #[test]
    fn cyrillic_classification() {
        assert!(is_cyrillic("мир"));
        assert!(!is_cyrillic("world"));
        assert!(is_cyrillic(""));
        // Exactly half the code points are Cyrillic: classified Cyrillic.
        assert!(is_cyrillic("миab"));
        assert!(is_cyrillic("ми ab"));
        assert!(!is_cyrillic("миabc"));
    }

    #[test]
    fn exact_russian_containment() {
        let dict = sample();
        let (results, cyrillic) = dict.search("мир", true, 0);
        assert!(cyrillic);
        let surfaces: Vec<&str> = results.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(surfaces, vec!["мир", "мирный"]);
    }

    #[test]
    fn exact_russian_untranslated_filter() {
        let dict = sample();
        let (with, _) = dict.search("здрав", true, 0);
        assert_eq!(with.len(), 2);
        let (without, _) = dict.search("здрав", false, 0);
        assert_eq!(without.len(), 1);
        assert_eq!(without[0].word, "здравствуйте");
    }

    #[test]
    fn exact_english_phrase_position() {
        let dict = sample();
        let (results, cyrillic) = dict.search("peace", true, 0);
        assert!(!cyrillic);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].word, "мир");

        // "hi" is the primary phrase of привет and secondary of здравствуйте.
        let (results, _) = dict.search("hi", true, 0);
        let surfaces: Vec<&str> = results.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(surfaces, vec!["привет", "здравствуйте"]);
    }

    #[test]
    fn fuzzy_russian_finds_misspelling() {
        let dict = sample();
        let (results, cyrillic) = dict.search_fuzzy("драствуте", true, 10);
        assert!(cyrillic);
        assert!(!results.is_empty());
        assert_eq!(results[0].word, "здравствуйте");
    }

    #[test]
    fn fuzzy_english_finds_misspelling() {
        let dict = sample();
        let (results, cyrillic) = dict.search_fuzzy("thnk you", true, 10);
        assert!(!cyrillic);
        assert!(!results.is_empty());
        assert_eq!(results[0].word, "спасибо");
    }

    #[test]
    fn fuzzy_english_deduplicates_words() {
        let dict = sample();
        let (results, _) = dict.search_fuzzy("you", true, 0);
        let mut ids: Vec<WordId> = results.iter().map(|w| w.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), results.len());
    }

    #[test]
    fn empty_and_degenerate_queries() {
        let dict = sample();
        let (results, cyrillic) = dict.search_fuzzy("", true, 10);
        assert!(cyrillic);
        assert!(results.is_empty());

        let (results, _) = dict.search("zzzz", true, 10);
        assert!(results.is_empty());
    }

    #[test]
    fn long_queries_are_clipped() {
        let dict = sample();
        let long: String = std::iter::repeat('ж').take(400).collect();
        // 400 two-byte code points; clipping must land on a boundary.
        let (results, cyrillic) = dict.search_fuzzy(&long, true, 10);
        assert!(cyrillic);
        assert!(results.len() <= 10);

        let (results, _) = dict.search(&long, true, 10);
        assert!(results.is_empty());
    }

    #[test]
    fn lazy_index_is_built_once() {
        let dict = sample();
        let first = dict.russian_index() as *const SurfaceIndex;
        dict.search_russian_fuzzy("мир", true, 10);
        let second = dict.russian_index() as *const SurfaceIndex;
        assert_eq!(first, second);

        let first = dict.english_index() as *const PhraseIndex;
        dict.search_english_fuzzy("world", 10);
        let second = dict.english_index() as *const PhraseIndex;
        assert_eq!(first, second);
    }

    #[test]
    fn ranking_is_a_total_order() {
        let dict = sample();
        let query = "мир";
        let (results, _) = dict.search_fuzzy(query, true, 0);
        assert!(results.len() >= 2);

        // Reconstruct the re-ranked scores and verify the (score desc,
        // rank asc, surface asc) tuple strictly decreases.
        for pair in results.windows(2) {
            let a = (
                -(crate::distance::distance(&pair[0].word, query) as i64),
                std::cmp::Reverse(pair[0].rank),
                std::cmp::Reverse(pair[0].word.clone()),
            );
            let b = (
                -(crate::distance::distance(&pair[1].word, query) as i64),
                std::cmp::Reverse(pair[1].rank),
                std::cmp::Reverse(pair[1].word.clone()),
            );
            assert!(a > b, "results out of order: {} before {}", pair[0].word, pair[1].word);
        }
    }
}
