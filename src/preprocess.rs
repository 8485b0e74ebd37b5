//! Text cleanup ahead of dictionary lookups, plus a coarse language guess.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref NON_WORD_RUN: Regex = Regex::new(r"[^A-Za-z']+").unwrap();
    // Words glued together by extraction, e.g. "HarrySaid"
    static ref CAMEL_JOIN: Regex = Regex::new(r"([a-z])([A-Z])").unwrap();
}

/// Typographic characters folded to their ASCII counterparts.
const CHAR_FOLDS: &[(char, char)] = &[
    ('\u{2019}', '\''),
    ('\u{2018}', '\''),
    ('\u{2014}', '-'),
    ('\u{2013}', '-'),
];

/// Reduce extracted text to space-separated word candidates.
///
/// Ligatures and other compatibility forms are expanded (NFKC), curly
/// quotes and dashes are folded to ASCII, everything outside `[A-Za-z']`
/// becomes a space, camel-case joins are split, and all-caps tokens of
/// three or more characters (running headers, shouting) are dropped.
pub fn prepare_for_spellcheck(text: &str) -> String {
    let folded: String = text
        .nfkc()
        .map(|c| {
            CHAR_FOLDS
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .collect();

    let spaced = NON_WORD_RUN.replace_all(&folded, " ");
    let split = CAMEL_JOIN.replace_all(&spaced, "$1 $2");

    split
        .split_whitespace()
        .filter(|token| !(token.len() >= 3 && is_all_caps(token)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// At least one letter, and every letter uppercase.
fn is_all_caps(token: &str) -> bool {
    let mut letters = token.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

/// Result of [`guess_language`].
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageGuess {
    pub code: &'static str,
    pub name: &'static str,
    pub confidence: f64,
    pub reliable: bool,
}

/// Detect the dominant language of `text`, if there is enough of it.
pub fn guess_language(text: &str) -> Option<LanguageGuess> {
    whatlang::detect(text).map(|info| LanguageGuess {
        code: info.lang().code(),
        name: info.lang().eng_name(),
        confidence: info.confidence(),
        reliable: info.is_reliable(),
    })
}
