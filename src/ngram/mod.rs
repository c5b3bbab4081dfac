//! Character n-gram inverted index for approximate matching.
//!
//! The index maps fixed-length character windows (bigrams in this crate's
//! usage) to the positions of the source strings containing them. A query
//! is tokenized the same way as the corpus; each matching gram credits the
//! items it occurs in, and the resulting per-item scores are handed to a
//! caller-supplied callback together with the observed score range, leaving
//! the inclusion policy to the caller.
//!
//! Scores saturate at [`u8::MAX`]. Within a single gram's posting list an
//! item is credited at most once; a gram occurring several times in the
//! query credits on every occurrence. There is no length bias.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Characters stripped from the edges of input before tokenization.
const EDGE_PUNCTUATION: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*', '=', '.', '/', ','];

/// A write-once inverted index from character n-grams to item positions.
///
/// Built from an immutable snapshot of source strings; rebuilding is not
/// supported.
///
/// # Example
///
/// ```rust
/// use slovar::ngram::NgramIndex;
///
/// let index = NgramIndex::new(2, ["мир", "мирный", "world"]);
/// let mut best = None;
/// index.search("мир", |item, score, _low, high| {
///     if score == high {
///         best.get_or_insert(item);
///     }
/// });
/// assert_eq!(best, Some(0));
/// ```
pub struct NgramIndex {
    gram_len: usize,
    items: usize,
    postings: FxHashMap<String, Vec<u32>>,
}

impl NgramIndex {
    /// Build an index over `items` with windows of `gram_len` characters.
    ///
    /// A `gram_len` below 2 is clamped to 2. Item positions follow the
    /// iteration order of `items`.
    pub fn new<I, S>(gram_len: usize, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let gram_len = gram_len.max(2);
        let mut postings: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        let mut items_seen = 0usize;

        for (position, item) in items.into_iter().enumerate() {
            items_seen = position + 1;
            for gram in grams(gram_len, item.as_ref()) {
                postings.entry(gram).or_default().push(position as u32);
            }
        }

        Self {
            gram_len,
            items: items_seen,
            postings,
        }
    }

    /// Number of items the index was built over.
    pub fn len(&self) -> usize {
        self.items
    }

    /// True if the index was built over zero items.
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Score every item against `query` and report each one.
    ///
    /// `observe` is invoked exactly once per indexed item with
    /// `(position, score, min_observed, max_observed)`, zero-scored items
    /// included. A query that tokenizes to no grams yields all-zero scores.
    pub fn search<F>(&self, query: &str, mut observe: F)
    where
        F: FnMut(usize, u8, u8, u8),
    {
        if self.items == 0 {
            return;
        }

        let mut scores = vec![0u8; self.items];
        let mut credited: FxHashSet<u32> = FxHashSet::default();

        for gram in grams(self.gram_len, query) {
            let Some(list) = self.postings.get(&gram) else {
                continue;
            };
            credited.clear();
            for &position in list {
                if credited.insert(position) {
                    let score = &mut scores[position as usize];
                    *score = score.saturating_add(1);
                }
            }
        }

        let mut low = u8::MAX;
        let mut high = 0u8;
        for &score in &scores {
            low = low.min(score);
            high = high.max(score);
        }

        for (position, &score) in scores.iter().enumerate() {
            observe(position, score, low, high);
        }
    }
}

/// Tokenize `text` into grams: lowercase, trim edge punctuation, split on
/// whitespace, drop one-character tokens, keep tokens no longer than
/// `gram_len` whole, emit sliding character windows otherwise.
fn grams(gram_len: usize, text: &str) -> Vec<String> {
    let lowered = text.trim().to_lowercase();
    let stripped = lowered.trim_matches(|c: char| EDGE_PUNCTUATION.contains(&c));

    let mut out = Vec::with_capacity(stripped.len());
    for token in stripped.split_whitespace() {
        let chars: SmallVec<[char; 32]> = token.chars().collect();
        if chars.len() < 2 {
            continue;
        }
        if chars.len() <= gram_len {
            out.push(token.to_string());
            continue;
        }
        for window in chars.windows(gram_len) {
            out.push(window.iter().collect());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tokens_kept_whole() {
        assert_eq!(grams(2, "ok"), vec!["ok"]);
        assert_eq!(grams(2, "a"), Vec::<String>::new());
        assert_eq!(grams(3, "так"), vec!["так"]);
    }

    #[test]
    fn windows_are_character_based() {
        assert_eq!(grams(2, "мир"), vec!["ми", "ир"]);
        assert_eq!(grams(2, "Друг, привет!"), vec!["др", "ру", "уг", "г,", "пр", "ри", "ив", "ве", "ет"]);
    }

    #[test]
    fn edge_punctuation_stripped() {
        assert_eq!(grams(2, "...thanks,"), vec!["th", "ha", "an", "nk", "ks"]);
    }

    #[test]
    fn scores_and_range() {
        let index = NgramIndex::new(2, ["short fuzzy word", "long fuzzy word"]);
        let mut seen = 0;
        index.search("short fuzy wod", |item, score, low, high| {
            seen += 1;
            match item {
                0 => {
                    assert_eq!(score, high);
                    assert!(score >= 5);
                }
                1 => {
                    assert_eq!(score, low);
                    assert_ne!(score, high);
                }
                _ => unreachable!(),
            }
        });
        assert_eq!(seen, 2);
    }

    #[test]
    fn repeated_query_grams_accumulate() {
        let long: String = std::iter::repeat('a').take(300).collect();
        let index = NgramIndex::new(2, ["short fuzzy word".to_string(), format!("long {long}")]);

        let query: String = std::iter::repeat('a').take(28).collect();
        index.search(&query, |item, score, _low, high| match item {
            0 => assert_eq!(score, 0),
            1 => {
                assert_eq!(score, high);
                assert!(score >= 10);
            }
            _ => unreachable!(),
        });

        // Enough repeated grams to saturate the counter.
        let query: String = std::iter::repeat('a').take(260).collect();
        index.search(&query, |item, score, _low, _high| {
            if item == 1 {
                assert_eq!(score, 255);
            }
        });
    }

    #[test]
    fn substring_queries_score_their_item() {
        let items = ["здравствуйте", "спасибо", "пожалуйста"];
        let index = NgramIndex::new(2, items);
        for (expect, item) in items.iter().enumerate() {
            let sub: String = item.chars().skip(1).take(5).collect();
            let mut reported = false;
            index.search(&sub, |position, score, _low, _high| {
                if position == expect {
                    reported = true;
                    assert!(score > 0);
                }
            });
            assert!(reported);
        }
    }

    #[test]
    fn degenerate_queries() {
        let index = NgramIndex::new(2, ["мир"]);
        index.search("", |_item, score, low, high| {
            assert_eq!((score, low, high), (0, 0, 0));
        });
        index.search("!!!", |_item, score, _low, _high| assert_eq!(score, 0));

        let empty = NgramIndex::new(2, Vec::<String>::new());
        assert!(empty.is_empty());
        empty.search("мир", |_, _, _, _| panic!("no items to observe"));
    }
}
