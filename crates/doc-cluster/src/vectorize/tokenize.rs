//! Tokenization, stop-word filtering and stemming.

use crate::error::Result;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::io::BufRead;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").unwrap());
static STEMMER: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::English));

/// Load a stop-word list, one word per line.
pub fn load_stopwords<R: BufRead>(reader: R) -> Result<HashSet<String>> {
    let mut words = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.insert(word.to_string());
        }
    }
    Ok(words)
}

/// Lowercase `text`, split it into ASCII alphanumeric runs, drop
/// stop-words, and stem what remains.
///
/// Stop-words are matched before stemming, so the list holds surface forms
/// while feature dictionaries hold stems.
pub fn tokenize(text: &str, stopwords: &HashSet<String>) -> Vec<String> {
    let lowered = text.to_ascii_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !stopwords.contains(*token))
        .map(|token| STEMMER.stem(token).into_owned())
        .collect()
}
