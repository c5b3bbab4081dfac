//! Scored, sortable search candidates.

use std::sync::Arc;

use crate::distance::distance;
use crate::lexicon::Word;

/// Sentinel that inverse scores are subtracted from, so that a smaller
/// distance always yields a larger score without underflowing for any
/// realistic string length.
pub const INVERSE_SCORE: i64 = (1 << 31) - 1;

/// Default result cap applied when a caller requests no limit.
pub(crate) const RESULT_CAP: usize = 1000;

/// One scored candidate.
///
/// The score's meaning depends on the search mode: an n-gram overlap count
/// for fuzzy candidates, an inverse Levenshtein distance after re-ranking,
/// or an inverse phrase position for exact English matches.
#[derive(Debug, Clone)]
pub struct Hit {
    /// The candidate entry.
    pub word: Arc<Word>,
    /// The English phrase that matched, for phrase-level candidates.
    pub matched: Option<String>,
    /// Current score; larger is better.
    pub score: i64,
}

impl Hit {
    /// Candidate scored against its Russian surface form.
    pub fn new(word: Arc<Word>, score: i64) -> Self {
        Self {
            word,
            matched: None,
            score,
        }
    }

    /// Candidate that matched a specific English phrase.
    pub fn with_match(word: Arc<Word>, matched: String, score: i64) -> Self {
        Self {
            word,
            matched: Some(matched),
            score,
        }
    }

    /// Re-score to the inverse Levenshtein distance between the query and
    /// the matched phrase, falling back to the surface form.
    pub fn levenshtein(&mut self, query: &str) {
        let subject = self.matched.as_deref().unwrap_or(&self.word.word);
        self.score = INVERSE_SCORE - distance(subject, query) as i64;
    }
}

/// A collection of scored candidates with a strict total order.
#[derive(Debug, Default)]
pub struct Hits(Vec<Hit>);

impl Hits {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty collection with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Add a candidate.
    pub fn push(&mut self, hit: Hit) {
        self.0.push(hit);
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop all but the first `len` candidates.
    pub fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }

    /// Sort by score descending, then corpus rank ascending, then surface
    /// form. The tuple makes the order total and the output deterministic.
    pub fn sort(&mut self) {
        self.0.sort_unstable_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.word.rank.cmp(&b.word.rank))
                .then_with(|| a.word.word.cmp(&b.word.word))
        });
    }

    /// Project the top `max` candidates back to their entries.
    ///
    /// `max == 0` means "no limit requested" and applies the default cap
    /// of 1000.
    pub fn into_words(self, max: usize) -> Vec<Arc<Word>> {
        let max = if max == 0 { RESULT_CAP } else { max };
        self.0.into_iter().take(max).map(|hit| hit.word).collect()
    }
}

impl IntoIterator for Hits {
    type Item = Hit;
    type IntoIter = std::vec::IntoIter<Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Hit> for Hits {
    fn from_iter<I: IntoIterator<Item = Hit>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{Stressed, WordId};

    fn hit(id: u64, surface: &str, rank: u64, score: i64) -> Hit {
        Hit::new(
            Arc::new(Word {
                id: WordId(id),
                rank,
                word: surface.to_string(),
                lower: surface.to_lowercase(),
                stressed: Stressed::new(surface),
                ..Word::default()
            }),
            score,
        )
    }

    #[test]
    fn order_is_score_then_rank_then_surface() {
        let mut hits = Hits::new();
        hits.push(hit(1, "б", 5, 10));
        hits.push(hit(2, "а", 5, 10));
        hits.push(hit(3, "в", 1, 10));
        hits.push(hit(4, "г", 9, 20));
        hits.sort();

        let words = hits.into_words(0);
        let surfaces: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(surfaces, vec!["г", "в", "а", "б"]);
    }

    #[test]
    fn levenshtein_prefers_matched_phrase() {
        let mut h = hit(1, "спасибо", 1, 0);
        h.matched = Some("thank you".to_string());
        h.levenshtein("thnk you");
        assert_eq!(h.score, INVERSE_SCORE - 1);

        let mut h = hit(1, "спасибо", 1, 0);
        h.levenshtein("спасибо");
        assert_eq!(h.score, INVERSE_SCORE);
    }

    #[test]
    fn zero_max_caps_at_default() {
        let mut hits = Hits::new();
        for i in 0..1500 {
            hits.push(hit(i, "слово", i, 0));
        }
        assert_eq!(hits.into_words(0).len(), RESULT_CAP);

        let mut hits = Hits::new();
        for i in 0..5 {
            hits.push(hit(i, "слово", i, 0));
        }
        assert_eq!(hits.into_words(3).len(), 3);
        let mut hits = Hits::new();
        hits.push(hit(1, "слово", 1, 0));
        assert_eq!(hits.into_words(10).len(), 1);
    }
}
