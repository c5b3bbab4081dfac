//! Edit-distance computation and alignment.
//!
//! This module provides the Levenshtein distance between two strings and
//! the reconstruction of a full edit script (the per-character alignment
//! realizing that distance). Both operate on Unicode code points rather
//! than bytes, which matters for Cyrillic input.
//!
//! `distance` uses the space-optimized two-row dynamic program; `edit_script`
//! keeps the full matrix so the alignment can be backtracked.

use std::fmt;

use smallvec::SmallVec;

type Chars = SmallVec<[char; 32]>;

/// Compute the Levenshtein distance between two strings.
///
/// The minimum number of single-character insertions, deletions and
/// substitutions required to transform `source` into `target`. Total for
/// any pair of finite strings, including empty ones.
///
/// # Example
///
/// ```rust
/// use slovar::distance::distance;
///
/// assert_eq!(distance("kitten", "sitting"), 3);
/// assert_eq!(distance("здравствуйте", "драствуте"), 3);
/// assert_eq!(distance("", "abc"), 3);
/// ```
pub fn distance(source: &str, target: &str) -> usize {
    let s: Chars = source.chars().collect();
    let t: Chars = target.chars().collect();

    let m = s.len();
    let n = t.len();
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev_row = vec![0usize; n + 1];
    let mut curr_row = vec![0usize; n + 1];

    for (j, cell) in prev_row.iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=m {
        curr_row[0] = i;

        for j in 1..=n {
            let cost = usize::from(s[i - 1] != t[j - 1]);

            curr_row[j] = (prev_row[j] + 1) // deletion
                .min(curr_row[j - 1] + 1) // insertion
                .min(prev_row[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[n]
}

/// The kind of a single alignment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Character is unchanged between source and target.
    Keep,
    /// Character was inserted from the target.
    Add,
    /// Character was deleted from the source.
    Delete,
    /// Source character was substituted by a target character.
    Change,
}

/// One step of an edit script.
///
/// Carries the target character for `Keep`, `Add` and `Change` steps and
/// the source character for `Delete` steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    /// Alignment step kind.
    pub kind: EditKind,
    /// The character this step concerns.
    pub ch: char,
}

impl Edit {
    fn tag(&self) -> char {
        match self.kind {
            EditKind::Keep => '=',
            EditKind::Add => '+',
            EditKind::Delete => '-',
            EditKind::Change => '~',
        }
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ch)
    }
}

/// An ordered alignment between two strings.
///
/// Steps are ordered left-to-right over the target string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditScript(Vec<Edit>);

impl EditScript {
    /// The individual alignment steps.
    pub fn edits(&self) -> &[Edit] {
        &self.0
    }

    /// True iff the script contains any non-`Keep` step.
    pub fn has_edits(&self) -> bool {
        self.0.iter().any(|e| e.kind != EditKind::Keep)
    }

    /// Render as a space-joined diff, e.g. `+a =b ~c -d`.
    pub fn diff_string(&self) -> String {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}{}", e.tag(), e.ch))
            .collect();
        parts.join(" ")
    }
}

impl fmt::Display for EditScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

impl IntoIterator for EditScript {
    type Item = Edit;
    type IntoIter = std::vec::IntoIter<Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Reconstruct the minimal edit script transforming `source` into `target`.
///
/// Backtracks the full distance matrix. Where several parent transitions
/// carry equal minimal cost, insertion is preferred over deletion, and
/// deletion over substitution; the diagonal is taken whenever it is not
/// strictly worse. This makes the output deterministic.
///
/// # Example
///
/// ```rust
/// use slovar::distance::edit_script;
///
/// let script = edit_script("go russian", "go russian");
/// assert!(!script.has_edits());
/// ```
pub fn edit_script(source: &str, target: &str) -> EditScript {
    let s: Chars = source.chars().collect();
    let t: Chars = target.chars().collect();
    let d = matrix(&s, &t);
    let stride = t.len() + 1;

    let mut edits = Vec::with_capacity(s.len().max(t.len()));
    let (mut i, mut j) = (s.len(), t.len());

    while i != 0 || j != 0 {
        if i == 0 {
            edits.push(Edit { kind: EditKind::Add, ch: t[j - 1] });
            j -= 1;
            continue;
        }
        if j == 0 {
            edits.push(Edit { kind: EditKind::Delete, ch: s[i - 1] });
            i -= 1;
            continue;
        }
        if s[i - 1] == t[j - 1] {
            edits.push(Edit { kind: EditKind::Keep, ch: t[j - 1] });
            i -= 1;
            j -= 1;
            continue;
        }

        let ins = d[i * stride + (j - 1)];
        let del = d[(i - 1) * stride + j];
        let sub = d[(i - 1) * stride + (j - 1)];

        if ins < del && ins <= sub {
            edits.push(Edit { kind: EditKind::Add, ch: t[j - 1] });
            j -= 1;
        } else if del <= sub {
            edits.push(Edit { kind: EditKind::Delete, ch: s[i - 1] });
            i -= 1;
        } else {
            edits.push(Edit { kind: EditKind::Change, ch: t[j - 1] });
            i -= 1;
            j -= 1;
        }
    }

    edits.reverse();
    EditScript(edits)
}

/// Full `(|s|+1) x (|t|+1)` distance matrix, row-major with stride `|t|+1`.
fn matrix(s: &[char], t: &[char]) -> Vec<usize> {
    let stride = t.len() + 1;
    let mut d = vec![0usize; (s.len() + 1) * stride];

    for i in 1..=s.len() {
        d[i * stride] = i;
    }
    for j in 1..=t.len() {
        d[j] = j;
    }

    for j in 1..=t.len() {
        for i in 1..=s.len() {
            let cost = usize::from(s[i - 1] != t[j - 1]);

            d[i * stride + j] = (d[(i - 1) * stride + j] + 1)
                .min(d[i * stride + (j - 1)] + 1)
                .min(d[(i - 1) * stride + (j - 1)] + cost);
        }
    }

    d
}
