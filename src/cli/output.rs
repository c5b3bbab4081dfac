//! Terminal rendering of search results.

use colored::Colorize;

use crate::lexicon::{Gender, Word, Words};

/// Gender symbol used next to noun entries.
fn gender_symbol(gender: Option<Gender>) -> &'static str {
    match gender {
        Some(Gender::Neuter) => "⚲",
        Some(Gender::Feminine) => "♀",
        Some(Gender::Masculine) => "♂",
        _ => "?",
    }
}

/// The stressed surface form with the stressed vowel highlighted.
fn stressed_form(word: &Word) -> String {
    let mut out = String::new();
    let segments = word.stressed.parse();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&segment.prefix.green().to_string());
        if let Some(stress) = segment.stress {
            out.push_str(&stress.to_string().yellow().bold().to_string());
        }
        out.push_str(&segment.suffix.green().to_string());
    }
    out
}

/// Render one entry with its translations to stdout.
pub fn print_word(words: &Words, word: &Word) {
    let mut header = stressed_form(word);

    if let Some(noun) = &word.noun {
        header.push(' ');
        header.push_str(gender_symbol(noun.gender));
    }
    header.push(' ');
    header.push_str(&word.kind.to_string());
    if let Some(level) = word.level {
        header.push(' ');
        header.push_str(&level.to_string().dimmed().to_string());
    }

    let chain = words.derived_chain(word);
    if !chain.is_empty() {
        let path: Vec<&str> = chain.iter().map(|w| w.word.as_str()).collect();
        header.push_str(&format!(" [{}]", path.join(" > ")));
    }

    println!("{header}");

    for translation in &word.translations {
        println!("  {}", translation.text);
        if let Some(usage) = &translation.usage {
            println!("  {}", usage.red());
        }
        if let Some(example) = &translation.example {
            println!("  {example}");
            if let Some(example_translation) = &translation.example_translation {
                println!("  {example_translation}");
            }
        }
    }
}
