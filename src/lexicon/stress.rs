//! Stress-mark handling for Russian surface forms.
//!
//! The dataset annotates lexical stress with a combining acute accent
//! (U+0301) placed after the stressed vowel; an ASCII apostrophe is accepted
//! as an alternative mark. Stress is display-only payload and never takes
//! part in search matching.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The combining acute accent used to render stress.
pub const STRESS_MARK: char = '\u{0301}';

/// Alternative stress mark accepted in the dataset.
pub const STRESS_MARK_ALT: char = '\'';

/// A spelling annotated with stress marks, e.g. `здра'вствуйте`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stressed(String);

/// A single word split around its stressed character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stress {
    /// Characters before the stressed one.
    pub prefix: String,
    /// The stressed character, if the word carries a mark.
    pub stress: Option<char>,
    /// Characters after the stressed one.
    pub suffix: String,
}

impl Stressed {
    /// Wrap an annotated spelling.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The raw annotated form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if there is no annotated form at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The spelling with all stress marks removed.
    pub fn unstressed(&self) -> String {
        self.0
            .chars()
            .filter(|&c| c != STRESS_MARK && c != STRESS_MARK_ALT)
            .collect()
    }

    /// Split the form into per-word [`Stress`] segments.
    pub fn parse(&self) -> Vec<Stress> {
        self.0.split_whitespace().map(parse_word).collect()
    }
}

impl fmt::Display for Stressed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<String> = self.parse().iter().map(Stress::to_string).collect();
        write!(f, "{}", words.join(" "))
    }
}

impl fmt::Display for Stress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stress {
            Some(c) => write!(f, "{}{}{}{}", self.prefix, c, STRESS_MARK, self.suffix),
            None => write!(f, "{}", self.prefix),
        }
    }
}

/// Split one word around its first stress mark.
///
/// A mark at position zero has no preceding character to attach to and is
/// ignored, matching the dataset's occasional stray annotation.
fn parse_word(word: &str) -> Stress {
    let mut prefix: Vec<char> = Vec::with_capacity(word.len());
    let mut stress = None;
    let mut suffix = String::new();

    for (i, c) in word.chars().enumerate() {
        if stress.is_none() && (c == STRESS_MARK || c == STRESS_MARK_ALT) {
            if i == 0 {
                continue;
            }
            stress = prefix.pop();
            continue;
        }
        if stress.is_none() {
            prefix.push(c);
        } else {
            suffix.push(c);
        }
    }

    Stress {
        prefix: prefix.into_iter().collect(),
        stress,
        suffix,
    }
}

/// A list of annotated forms, e.g. the comparative variants of an adjective.
pub type StressedList = Vec<Stressed>;

/// Split a `;`/`,`-separated field into a [`StressedList`].
pub fn split_stressed(s: &str) -> StressedList {
    s.split([';', ','])
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(Stressed::new)
        .collect()
}
