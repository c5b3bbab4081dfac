//! The in-memory dictionary data model.
//!
//! A [`Word`] is one dictionary entry: a lowercase-normalized Cyrillic
//! surface form, its stressed display form, frequency rank, word-class and
//! proficiency tags, an optional derived-from edge to another entry, owned
//! English [`Translation`]s and opaque grammar payloads. [`Words`] is the
//! id-keyed collection the search layer consumes; it is established once at
//! load time and treated as read-only afterwards, so it can be shared across
//! concurrent readers without locking.

use std::fmt;
use std::sync::{Arc, OnceLock};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

mod stress;

pub use stress::{split_stressed, Stress, Stressed, StressedList, STRESS_MARK, STRESS_MARK_ALT};

/// Stable numeric identifier of a dictionary entry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WordId(pub u64);

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Word-class tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordKind {
    /// Anything without a more specific class.
    #[default]
    Other,
    /// Adjective.
    Adjective,
    /// Adverb.
    Adverb,
    /// Multi-word expression.
    Expression,
    /// Noun.
    Noun,
    /// Verb.
    Verb,
}

impl WordKind {
    /// Parse the dataset tag, defaulting to [`WordKind::Other`].
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "adjective" => Self::Adjective,
            "adverb" => Self::Adverb,
            "expression" => Self::Expression,
            "noun" => Self::Noun,
            "verb" => Self::Verb,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for WordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Other => "n/a",
            Self::Adjective => "adj.",
            Self::Adverb => "adv.",
            Self::Expression => "expr",
            Self::Noun => "noun",
            Self::Verb => "verb",
        };
        write!(f, "{label}")
    }
}

/// CEFR language-proficiency level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum LanguageLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl LanguageLevel {
    /// Parse the dataset tag; unknown levels map to `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "A1" => Some(Self::A1),
            "A2" => Some(Self::A2),
            "B1" => Some(Self::B1),
            "B2" => Some(Self::B2),
            "C1" => Some(Self::C1),
            "C2" => Some(Self::C2),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        };
        write!(f, "{label}")
    }
}

/// Grammatical gender of a noun or adjective form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Neuter.
    Neuter,
    /// Feminine.
    Feminine,
    /// Masculine.
    Masculine,
    /// Plural-only forms.
    Plural,
}

impl Gender {
    /// Parse the dataset tag (`n`/`f`/`m`/`pl`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "n" => Some(Self::Neuter),
            "f" => Some(Self::Feminine),
            "m" => Some(Self::Masculine),
            "pl" => Some(Self::Plural),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Neuter => "neuter",
            Self::Feminine => "feminine",
            Self::Masculine => "masculine",
            Self::Plural => "plural",
        };
        write!(f, "{label}")
    }
}

/// Verb aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aspect {
    /// Usable as either aspect.
    Both,
    /// Imperfective.
    Imperfective,
    /// Perfective.
    Perfective,
}

impl Aspect {
    /// Parse the dataset tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "both" => Some(Self::Both),
            "imperfective" => Some(Self::Imperfective),
            "perfective" => Some(Self::Perfective),
            _ => None,
        }
    }
}

/// Declension table of one noun or adjective form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Declension {
    pub nom: StressedList,
    pub gen: StressedList,
    pub dat: StressedList,
    pub acc: StressedList,
    pub inst: StressedList,
    pub prep: StressedList,
}

impl Declension {
    /// True if every case list is empty.
    pub fn is_empty(&self) -> bool {
        self.nom.is_empty()
            && self.gen.is_empty()
            && self.dat.is_empty()
            && self.acc.is_empty()
            && self.inst.is_empty()
            && self.prep.is_empty()
    }
}

/// Noun metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NounInfo {
    /// Grammatical gender, when tagged.
    pub gender: Option<Gender>,
    /// The noun only exists in the singular.
    pub singular_only: bool,
    /// The noun only exists in the plural.
    pub plural_only: bool,
}

/// Adjective forms for one gender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjGenderInfo {
    /// Which gender this block describes.
    pub gender: Gender,
    /// Short forms.
    pub short: StressedList,
    /// Declension table, shared between entries that reference it.
    pub declension: Option<Arc<Declension>>,
}

/// Adjective metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjInfo {
    /// Comparative forms.
    pub comparative: StressedList,
    /// Superlative forms.
    pub superlative: StressedList,
    /// Masculine forms.
    pub masculine: Option<AdjGenderInfo>,
    /// Feminine forms.
    pub feminine: Option<AdjGenderInfo>,
    /// Neuter forms.
    pub neuter: Option<AdjGenderInfo>,
    /// Plural forms.
    pub plural: Option<AdjGenderInfo>,
}

/// Present-tense conjugation table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Conjugation {
    pub sg1: Stressed,
    pub sg2: Stressed,
    pub sg3: Stressed,
    pub pl1: Stressed,
    pub pl2: Stressed,
    pub pl3: Stressed,
}

/// Verb metadata. Participle cross-references point at other entries by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbInfo {
    /// Aspect, when tagged.
    pub aspect: Option<Aspect>,
    /// Singular imperative.
    pub imperative_sg: Stressed,
    /// Plural imperative.
    pub imperative_pl: Stressed,
    /// Masculine past tense.
    pub past_m: Stressed,
    /// Feminine past tense.
    pub past_f: Stressed,
    /// Neuter past tense.
    pub past_n: Stressed,
    /// Plural past tense.
    pub past_pl: Stressed,
    /// Present-tense conjugation, shared between entries that reference it.
    pub conjugation: Option<Arc<Conjugation>>,
    /// Active present participle.
    pub active_present: Option<WordId>,
    /// Active past participle.
    pub active_past: Option<WordId>,
    /// Passive present participle.
    pub passive_present: Option<WordId>,
    /// Passive past participle.
    pub passive_past: Option<WordId>,
}

/// One English gloss of a word: a comma-separated list of synonymous
/// phrases with optional usage note and example sentence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Translation {
    /// Comma-separated synonymous English phrases.
    pub text: String,
    /// Usage note.
    pub usage: Option<String>,
    /// Example sentence in Russian.
    pub example: Option<String>,
    /// Translation of the example sentence.
    pub example_translation: Option<String>,

    // Built on first use, immutable afterwards. Not serialized; a
    // deserialized snapshot rebuilds it lazily like a fresh one.
    #[serde(skip)]
    phrases: OnceLock<FxHashMap<String, usize>>,
}

impl Translation {
    /// Create a translation from its phrase list text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The phrase membership map, built once under the lock on first use.
    ///
    /// Keys are the lowercased, trimmed comma-separated phrases of `text`;
    /// values their ordinal position in the original list. The first
    /// occurrence of a duplicated phrase wins.
    fn phrase_map(&self) -> &FxHashMap<String, usize> {
        self.phrases.get_or_init(|| {
            let mut map = FxHashMap::default();
            for (position, part) in self.text.split(',').enumerate() {
                map.entry(part.trim().to_lowercase()).or_insert(position);
            }
            map
        })
    }

    /// Position of `phrase` (already lowercased) in this gloss, if present.
    pub fn phrase_position(&self, phrase: &str) -> Option<usize> {
        self.phrase_map().get(phrase).copied()
    }

    /// The distinct lowercased phrases of this gloss, in no specific order.
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrase_map().keys().map(String::as_str)
    }
}

impl PartialEq for Translation {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.usage == other.usage
            && self.example == other.example
            && self.example_translation == other.example_translation
    }
}

impl Eq for Translation {}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// One dictionary entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Stable identifier assigned at dataset build time.
    pub id: WordId,
    /// Frequency rank; lower means more common. Zero when unranked.
    pub rank: u64,
    /// Plain lowercase-normalized Cyrillic spelling.
    pub word: String,
    /// Cached lowercase form used for containment search. Precomputed at
    /// load, never mutated.
    pub lower: String,
    /// Spelling annotated with stress marks, for display only.
    pub stressed: Stressed,
    /// Entry this word derives from, as a navigational edge.
    pub derived_from: Option<WordId>,
    /// English glosses, owned by this entry.
    pub translations: Vec<Translation>,
    /// Word-class tag.
    pub kind: WordKind,
    /// Proficiency level, when tagged.
    pub level: Option<LanguageLevel>,
    /// Noun payload; opaque to search.
    pub noun: Option<NounInfo>,
    /// Adjective payload; opaque to search.
    pub adj: Option<AdjInfo>,
    /// Verb payload; opaque to search.
    pub verb: Option<VerbInfo>,
}

impl Word {
    /// True if the entry carries at least one translation.
    pub fn has_translations(&self) -> bool {
        !self.translations.is_empty()
    }

    /// Smallest phrase ordinal of `query` across all translations.
    ///
    /// `query` must already be lowercased. Returns `None` when no gloss
    /// lists the phrase.
    pub fn translation_position(&self, query: &str) -> Option<usize> {
        self.translations
            .iter()
            .filter_map(|t| t.phrase_position(query))
            .min()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.stressed, self.kind)
    }
}

/// The id-keyed, read-only collection of all dictionary entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Words {
    map: FxHashMap<WordId, Arc<Word>>,
}

impl Words {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous entry with the same id.
    pub fn insert(&mut self, word: Word) {
        self.map.insert(word.id, Arc::new(word));
    }

    /// Look up an entry by id.
    pub fn get(&self, id: WordId) -> Option<&Arc<Word>> {
        self.map.get(&id)
    }

    /// Iterate over all entries in no specific order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Word>> {
        self.map.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if the collection holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The chain of entries `word` derives from, nearest first.
    ///
    /// Walks `derived_from` edges iteratively with a visited set, so a
    /// malformed dataset with a cycle terminates instead of recursing.
    pub fn derived_chain(&self, word: &Word) -> Vec<Arc<Word>> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(word.id);

        let mut next = word.derived_from;
        while let Some(id) = next {
            if !seen.insert(id) {
                break;
            }
            match self.get(id) {
                Some(parent) => {
                    chain.push(Arc::clone(parent));
                    next = parent.derived_from;
                }
                None => break,
            }
        }

        chain
    }
}

impl FromIterator<Word> for Words {
    fn from_iter<I: IntoIterator<Item = Word>>(iter: I) -> Self {
        let mut words = Self::new();
        for word in iter {
            words.insert(word);
        }
        words
    }
}
