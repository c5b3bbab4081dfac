//! OpenRussian dataset ingestion.
//!
//! Decodes the tab-separated dump files (`words.csv`, `translations.csv`
//! and the grammar tables) into row structs and merges them into a linked
//! [`Words`] collection. The dump uses literal tabs with no quoting, so
//! rows are plain line splits; the header row is skipped, short rows are
//! padded with empty fields, and duplicate ids are rejected.
//!
//! # Format
//!
//! ```text
//! id  position  bare  accented  derived_from  rank  disabled  audio  usage  ...
//! 1   1         и     и         0             1     0         ...
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::lexicon::{
    split_stressed, AdjGenderInfo, AdjInfo, Aspect, Conjugation, Declension, Gender,
    LanguageLevel, NounInfo, Stressed, Translation, VerbInfo, Word, WordId, WordKind, Words,
};

/// Errors produced while decoding a dump.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error while reading a dump file.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    /// A numeric field failed to parse.
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// The offending field content.
        value: String,
    },
    /// The same id appeared twice in one file.
    #[error("line {line}: duplicate {table} id {id}")]
    Duplicate {
        /// 1-based line number.
        line: usize,
        /// Which table the duplicate was found in.
        table: &'static str,
        /// The duplicated id.
        id: u64,
    },
}

/// A row of `words.csv`.
#[derive(Debug, Clone, Default)]
pub struct WordRow {
    /// Entry id.
    pub id: WordId,
    /// Bare spelling.
    pub word: String,
    /// Accented spelling; falls back to the bare one when absent.
    pub stressed: Stressed,
    /// Root entry id; zero when underived.
    pub derived_from: u64,
    /// Frequency rank.
    pub rank: u64,
    /// Word-class tag.
    pub kind: WordKind,
    /// Proficiency level.
    pub level: Option<LanguageLevel>,
}

/// A row of `translations.csv` (English rows only).
#[derive(Debug, Clone, Default)]
pub struct TranslationRow {
    /// Translation id.
    pub id: u64,
    /// Entry the gloss belongs to.
    pub word: WordId,
    /// Comma-separated phrases.
    pub text: String,
    /// Example sentence.
    pub example: String,
    /// Example translation.
    pub example_translation: String,
    /// Usage note.
    pub usage: String,
}

/// A row of `nouns.csv`.
#[derive(Debug, Clone, Default)]
pub struct NounRow {
    /// Entry id.
    pub id: WordId,
    /// Gender tag.
    pub gender: Option<Gender>,
    /// Singular-only flag.
    pub singular_only: bool,
    /// Plural-only flag.
    pub plural_only: bool,
    /// Singular declension id.
    pub declension_singular: u64,
    /// Plural declension id.
    pub declension_plural: u64,
}

/// A row of `adjectives.csv`.
#[derive(Debug, Clone, Default)]
pub struct AdjectiveRow {
    /// Entry id.
    pub id: WordId,
    /// Comparative forms.
    pub comparative: Vec<Stressed>,
    /// Superlative forms.
    pub superlative: Vec<Stressed>,
    /// Short forms, m/f/n/pl.
    pub short: [Vec<Stressed>; 4],
    /// Declension ids, m/f/n/pl.
    pub declensions: [u64; 4],
}

/// A row of `declensions.csv`.
#[derive(Debug, Clone, Default)]
pub struct DeclensionRow {
    /// Declension id.
    pub id: u64,
    /// The table itself.
    pub declension: Declension,
}

/// A row of `verbs.csv`.
#[derive(Debug, Clone, Default)]
pub struct VerbRow {
    /// Entry id.
    pub id: WordId,
    /// Aspect tag.
    pub aspect: Option<Aspect>,
    /// Imperatives and past forms.
    pub imperative_sg: Stressed,
    /// Plural imperative.
    pub imperative_pl: Stressed,
    /// Masculine past.
    pub past_m: Stressed,
    /// Feminine past.
    pub past_f: Stressed,
    /// Neuter past.
    pub past_n: Stressed,
    /// Plural past.
    pub past_pl: Stressed,
    /// Conjugation id.
    pub conjugation: u64,
    /// Participle entry ids: active present/past, passive present/past.
    pub participles: [u64; 4],
}

/// A row of `conjugations.csv`.
#[derive(Debug, Clone, Default)]
pub struct ConjugationRow {
    /// Conjugation id.
    pub id: u64,
    /// The table itself.
    pub conjugation: Conjugation,
}

/// Run `row` for every non-empty line, with fields split on tabs.
fn rows<R: BufRead>(
    reader: R,
    mut row: impl FnMut(usize, &[&str]) -> Result<(), IngestError>,
) -> Result<(), IngestError> {
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        row(index + 1, &fields)?;
    }
    Ok(())
}

/// Field accessor padding short rows with empty strings.
fn field<'a>(fields: &[&'a str], index: usize) -> &'a str {
    fields.get(index).copied().unwrap_or("")
}

/// Parse a numeric field; optional fields treat empty as zero.
fn number(line: usize, value: &str, optional: bool) -> Result<u64, IngestError> {
    if optional && value.is_empty() {
        return Ok(0);
    }
    value.parse().map_err(|_| IngestError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}

/// Some strings are optional all the way into the data model.
fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Decode `words.csv`. Rows flagged as disabled (column 6) are skipped.
pub fn decode_words<R: BufRead>(reader: R) -> Result<FxHashMap<WordId, WordRow>, IngestError> {
    let mut words = FxHashMap::default();
    rows(reader, |line, fields| {
        if line == 1 {
            return Ok(());
        }
        if field(fields, 6) == "1" {
            return Ok(());
        }

        let id = WordId(number(line, field(fields, 0), false)?);
        let word = field(fields, 2).to_string();
        let mut stressed = Stressed::new(field(fields, 3));
        if stressed.is_empty() {
            stressed = Stressed::new(word.clone());
        }

        let row = WordRow {
            id,
            word,
            stressed,
            derived_from: number(line, field(fields, 4), true)?,
            rank: number(line, field(fields, 5), true)?,
            kind: WordKind::parse(field(fields, 11)),
            level: LanguageLevel::parse(field(fields, 12)),
        };

        if words.insert(id, row).is_some() {
            return Err(IngestError::Duplicate {
                line,
                table: "word",
                id: id.0,
            });
        }
        Ok(())
    })?;

    Ok(words)
}

/// Decode `translations.csv`, keeping English rows only.
pub fn decode_translations<R: BufRead>(reader: R) -> Result<Vec<TranslationRow>, IngestError> {
    let mut translations = Vec::new();
    let mut seen = FxHashMap::default();
    rows(reader, |line, fields| {
        if line == 1 || field(fields, 1) != "en" {
            return Ok(());
        }

        let id = number(line, field(fields, 0), false)?;
        if seen.insert(id, ()).is_some() {
            return Err(IngestError::Duplicate {
                line,
                table: "translation",
                id,
            });
        }

        translations.push(TranslationRow {
            id,
            word: WordId(number(line, field(fields, 2), true)?),
            text: field(fields, 4).to_string(),
            example: field(fields, 5).to_string(),
            example_translation: field(fields, 6).to_string(),
            usage: field(fields, 7).to_string(),
        });
        Ok(())
    })?;

    Ok(translations)
}

/// Decode `nouns.csv`.
pub fn decode_nouns<R: BufRead>(reader: R) -> Result<FxHashMap<WordId, NounRow>, IngestError> {
    let mut nouns = FxHashMap::default();
    rows(reader, |line, fields| {
        if line == 1 {
            return Ok(());
        }

        let id = WordId(number(line, field(fields, 0), false)?);
        let row = NounRow {
            id,
            gender: Gender::parse(field(fields, 1)),
            singular_only: field(fields, 5) == "1",
            plural_only: field(fields, 6) == "1",
            declension_singular: number(line, field(fields, 7), true)?,
            declension_plural: number(line, field(fields, 8), true)?,
        };

        if nouns.insert(id, row).is_some() {
            return Err(IngestError::Duplicate {
                line,
                table: "noun",
                id: id.0,
            });
        }
        Ok(())
    })?;

    Ok(nouns)
}

/// Decode `adjectives.csv`.
pub fn decode_adjectives<R: BufRead>(
    reader: R,
) -> Result<FxHashMap<WordId, AdjectiveRow>, IngestError> {
    let mut adjectives = FxHashMap::default();
    rows(reader, |line, fields| {
        if line == 1 {
            return Ok(());
        }

        let id = WordId(number(line, field(fields, 0), false)?);
        let mut declensions = [0u64; 4];
        for (slot, index) in declensions.iter_mut().zip([8, 9, 10, 11]) {
            *slot = number(line, field(fields, index), true).unwrap_or(0);
        }
        let short = [
            split_stressed(field(fields, 4)),
            split_stressed(field(fields, 5)),
            split_stressed(field(fields, 6)),
            split_stressed(field(fields, 7)),
        ];

        let row = AdjectiveRow {
            id,
            comparative: split_stressed(field(fields, 2)),
            superlative: split_stressed(field(fields, 3)),
            short,
            declensions,
        };

        if adjectives.insert(id, row).is_some() {
            return Err(IngestError::Duplicate {
                line,
                table: "adjective",
                id: id.0,
            });
        }
        Ok(())
    })?;

    Ok(adjectives)
}

/// Decode `declensions.csv`.
pub fn decode_declensions<R: BufRead>(
    reader: R,
) -> Result<FxHashMap<u64, DeclensionRow>, IngestError> {
    let mut declensions = FxHashMap::default();
    rows(reader, |line, fields| {
        if line == 1 {
            return Ok(());
        }

        let id = number(line, field(fields, 0), false)?;
        let row = DeclensionRow {
            id,
            declension: Declension {
                nom: split_stressed(field(fields, 2)),
                gen: split_stressed(field(fields, 3)),
                dat: split_stressed(field(fields, 4)),
                acc: split_stressed(field(fields, 5)),
                inst: split_stressed(field(fields, 6)),
                prep: split_stressed(field(fields, 7)),
            },
        };

        if declensions.insert(id, row).is_some() {
            return Err(IngestError::Duplicate {
                line,
                table: "declension",
                id,
            });
        }
        Ok(())
    })?;

    Ok(declensions)
}

/// Decode `verbs.csv`.
pub fn decode_verbs<R: BufRead>(reader: R) -> Result<FxHashMap<WordId, VerbRow>, IngestError> {
    let mut verbs = FxHashMap::default();
    rows(reader, |line, fields| {
        if line == 1 {
            return Ok(());
        }

        let id = WordId(number(line, field(fields, 0), false)?);
        let mut participles = [0u64; 4];
        for (slot, index) in participles.iter_mut().zip([10, 11, 12, 13]) {
            *slot = number(line, field(fields, index), true).unwrap_or(0);
        }

        let row = VerbRow {
            id,
            aspect: Aspect::parse(field(fields, 1)),
            imperative_sg: Stressed::new(field(fields, 3).trim()),
            imperative_pl: Stressed::new(field(fields, 4).trim()),
            past_m: Stressed::new(field(fields, 5).trim()),
            past_f: Stressed::new(field(fields, 6).trim()),
            past_n: Stressed::new(field(fields, 7).trim()),
            past_pl: Stressed::new(field(fields, 8).trim()),
            conjugation: number(line, field(fields, 9), true).unwrap_or(0),
            participles,
        };

        if verbs.insert(id, row).is_some() {
            return Err(IngestError::Duplicate {
                line,
                table: "verb",
                id: id.0,
            });
        }
        Ok(())
    })?;

    Ok(verbs)
}

/// Decode `conjugations.csv`.
pub fn decode_conjugations<R: BufRead>(
    reader: R,
) -> Result<FxHashMap<u64, ConjugationRow>, IngestError> {
    let mut conjugations = FxHashMap::default();
    rows(reader, |line, fields| {
        if line == 1 {
            return Ok(());
        }

        let id = number(line, field(fields, 0), false)?;
        let row = ConjugationRow {
            id,
            conjugation: Conjugation {
                sg1: Stressed::new(field(fields, 2)),
                sg2: Stressed::new(field(fields, 3)),
                sg3: Stressed::new(field(fields, 4)),
                pl1: Stressed::new(field(fields, 5)),
                pl2: Stressed::new(field(fields, 6)),
                pl3: Stressed::new(field(fields, 7)),
            },
        };

        if conjugations.insert(id, row).is_some() {
            return Err(IngestError::Duplicate {
                line,
                table: "conjugation",
                id,
            });
        }
        Ok(())
    })?;

    Ok(conjugations)
}

/// Merge decoded rows into a linked [`Words`] collection.
///
/// Derived-from and participle edges pointing at unknown ids become `None`;
/// translations of unknown words are dropped; all-empty declension tables
/// are omitted.
pub fn merge(
    word_rows: FxHashMap<WordId, WordRow>,
    translation_rows: Vec<TranslationRow>,
    noun_rows: FxHashMap<WordId, NounRow>,
    adjective_rows: FxHashMap<WordId, AdjectiveRow>,
    declension_rows: FxHashMap<u64, DeclensionRow>,
    verb_rows: FxHashMap<WordId, VerbRow>,
    conjugation_rows: FxHashMap<u64, ConjugationRow>,
) -> Words {
    let conjugations: FxHashMap<u64, Arc<Conjugation>> = conjugation_rows
        .into_iter()
        .map(|(id, row)| (id, Arc::new(row.conjugation)))
        .collect();

    let declensions: FxHashMap<u64, Arc<Declension>> = declension_rows
        .into_iter()
        .filter(|(_, row)| !row.declension.is_empty())
        .map(|(id, row)| (id, Arc::new(row.declension)))
        .collect();

    let known = |id: u64| -> Option<WordId> {
        let id = WordId(id);
        (id.0 != 0 && word_rows.contains_key(&id)).then_some(id)
    };

    let adj_gender = |gender: Gender, short: &[Stressed], declension: u64| -> Option<AdjGenderInfo> {
        let declension = declensions.get(&declension).cloned();
        (!short.is_empty() || declension.is_some()).then(|| AdjGenderInfo {
            gender,
            short: short.to_vec(),
            declension,
        })
    };

    let mut words = Words::new();
    let mut glosses: FxHashMap<WordId, Vec<Translation>> = FxHashMap::default();
    for row in translation_rows {
        if !word_rows.contains_key(&row.word) {
            continue;
        }
        let mut translation = Translation::new(row.text);
        translation.usage = optional(&row.usage);
        translation.example = optional(&row.example);
        translation.example_translation = optional(&row.example_translation);
        glosses.entry(row.word).or_default().push(translation);
    }

    for (id, row) in &word_rows {
        let noun = noun_rows.get(id).map(|n| NounInfo {
            gender: n.gender,
            singular_only: n.singular_only,
            plural_only: n.plural_only,
        });

        let adj = adjective_rows.get(id).map(|a| AdjInfo {
            comparative: a.comparative.clone(),
            superlative: a.superlative.clone(),
            masculine: adj_gender(Gender::Masculine, &a.short[0], a.declensions[0]),
            feminine: adj_gender(Gender::Feminine, &a.short[1], a.declensions[1]),
            neuter: adj_gender(Gender::Neuter, &a.short[2], a.declensions[2]),
            plural: adj_gender(Gender::Plural, &a.short[3], a.declensions[3]),
        });

        let verb = verb_rows.get(id).map(|v| VerbInfo {
            aspect: v.aspect,
            imperative_sg: v.imperative_sg.clone(),
            imperative_pl: v.imperative_pl.clone(),
            past_m: v.past_m.clone(),
            past_f: v.past_f.clone(),
            past_n: v.past_n.clone(),
            past_pl: v.past_pl.clone(),
            conjugation: conjugations.get(&v.conjugation).cloned(),
            active_present: known(v.participles[0]),
            active_past: known(v.participles[1]),
            passive_present: known(v.participles[2]),
            passive_past: known(v.participles[3]),
        });

        words.insert(Word {
            id: *id,
            rank: row.rank,
            word: row.word.clone(),
            lower: row.word.to_lowercase(),
            stressed: row.stressed.clone(),
            derived_from: known(row.derived_from),
            translations: glosses.remove(id).unwrap_or_default(),
            kind: row.kind,
            level: row.level,
            noun,
            adj,
            verb,
        });
    }

    words
}

/// File names of the seven dump tables.
const WORDS_FILE: &str = "words.csv";
const TRANSLATIONS_FILE: &str = "translations.csv";
const GRAMMAR_FILES: [&str; 5] = [
    "nouns.csv",
    "adjectives.csv",
    "declensions.csv",
    "verbs.csv",
    "conjugations.csv",
];

fn open(dir: &Path, name: &str) -> Result<BufReader<File>, IngestError> {
    Ok(BufReader::new(File::open(dir.join(name))?))
}

/// Load a full dump directory into a linked [`Words`] collection.
///
/// `words.csv` and `translations.csv` are required; the grammar tables are
/// treated as empty when absent.
pub fn load_dump(dir: &Path) -> Result<Words, IngestError> {
    let word_rows = decode_words(open(dir, WORDS_FILE)?)?;
    let translation_rows = decode_translations(open(dir, TRANSLATIONS_FILE)?)?;
    debug!(
        "decoded {} words, {} translations",
        word_rows.len(),
        translation_rows.len()
    );

    let mut grammar_present = [false; 5];
    for (present, name) in grammar_present.iter_mut().zip(GRAMMAR_FILES) {
        *present = dir.join(name).exists();
        if !*present {
            debug!("{name} absent, treating as empty");
        }
    }

    let nouns = if grammar_present[0] {
        decode_nouns(open(dir, GRAMMAR_FILES[0])?)?
    } else {
        FxHashMap::default()
    };
    let adjectives = if grammar_present[1] {
        decode_adjectives(open(dir, GRAMMAR_FILES[1])?)?
    } else {
        FxHashMap::default()
    };
    let declensions = if grammar_present[2] {
        decode_declensions(open(dir, GRAMMAR_FILES[2])?)?
    } else {
        FxHashMap::default()
    };
    let verbs = if grammar_present[3] {
        decode_verbs(open(dir, GRAMMAR_FILES[3])?)?
    } else {
        FxHashMap::default()
    };
    let conjugations = if grammar_present[4] {
        decode_conjugations(open(dir, GRAMMAR_FILES[4])?)?
    } else {
        FxHashMap::default()
    };

    let words = merge(
        word_rows,
        translation_rows,
        nouns,
        adjectives,
        declensions,
        verbs,
        conjugations,
    );
    info!("loaded {} dictionary entries from {}", words.len(), dir.display());

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS_TSV: &str = "\
id\tposition\tbare\taccented\tderived_from\trank\tdisabled\taudio\tusage\ta\tb\ttype\tlevel\tc
1\t1\tписать\tписа'ть\t\t10\t\t\t\t\t\tverb\tA1\t
2\t2\tнаписать\tнаписа'ть\t1\t20\t\t\t\t\t\tverb\tA2\t
3\t3\tхлам\t\t\t9000\t1\t\t\t\t\tnoun\t\t
4\t4\tмир\tми'р\t\t5\t\t\t\t\t\tnoun\tA1\t";

    const TRANSLATIONS_TSV: &str = "\
id\tlang\tword_id\tposition\ttl\texample\texample_tl\tinfo
1\ten\t1\t1\tto write, to pen\tя пишу\tI write\t
2\tde\t1\t1\tschreiben\t\t\t
3\ten\t4\t1\tworld, peace\t\t\tcommon
4\ten\t99\t1\torphan\t\t\t";

    #[test]
    fn words_rows_decode() {
        let words = decode_words(WORDS_TSV.as_bytes()).unwrap();
        assert_eq!(words.len(), 3, "disabled row must be skipped");

        let row = &words[&WordId(2)];
        assert_eq!(row.word, "написать");
        assert_eq!(row.derived_from, 1);
        assert_eq!(row.rank, 20);
        assert_eq!(row.kind, WordKind::Verb);
        assert_eq!(row.level, Some(LanguageLevel::A2));
    }

    #[test]
    fn missing_accent_falls_back_to_bare() {
        let tsv = "h\n5\t1\tдом\t\t\t\t\t\t\t\t\tnoun\t\t";
        let words = decode_words(tsv.as_bytes()).unwrap();
        assert_eq!(words[&WordId(5)].stressed.as_str(), "дом");
    }

    #[test]
    fn duplicate_word_id_rejected() {
        let tsv = "h\n1\t\tа\t\t\t\t\t\t\t\t\t\t\t\n1\t\tб\t\t\t\t\t\t\t\t\t\t\t";
        assert!(matches!(
            decode_words(tsv.as_bytes()),
            Err(IngestError::Duplicate { table: "word", .. })
        ));
    }

    #[test]
    fn bad_number_is_an_error() {
        let tsv = "h\nnot-a-number\t\tа\t\t\t\t\t\t\t\t\t\t\t";
        assert!(matches!(
            decode_words(tsv.as_bytes()),
            Err(IngestError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn non_english_translations_skipped() {
        let rows = decode_translations(TRANSLATIONS_TSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.id != 2));
    }

    #[test]
    fn merge_links_everything() {
        let words = merge(
            decode_words(WORDS_TSV.as_bytes()).unwrap(),
            decode_translations(TRANSLATIONS_TSV.as_bytes()).unwrap(),
            FxHashMap::default(),
            FxHashMap::default(),
            FxHashMap::default(),
            FxHashMap::default(),
            FxHashMap::default(),
        );

        assert_eq!(words.len(), 3);

        let derived = words.get(WordId(2)).unwrap();
        assert_eq!(derived.derived_from, Some(WordId(1)));
        assert_eq!(words.derived_chain(derived)[0].id, WordId(1));

        let root = words.get(WordId(1)).unwrap();
        assert_eq!(root.translations.len(), 1);
        assert_eq!(root.translations[0].text, "to write, to pen");
        assert_eq!(root.translations[0].example.as_deref(), Some("я пишу"));
        assert_eq!(root.translation_position("to pen"), Some(1));

        let mir = words.get(WordId(4)).unwrap();
        assert_eq!(mir.translations[0].usage.as_deref(), Some("common"));
        assert_eq!(mir.lower, "мир");
    }
}
