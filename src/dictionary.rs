//! Dictionary lookup for non-English token detection.
//!
//! The lookup is injected through the [`Lexicon`] trait. [`Dictionary`]
//! loads a Hunspell dictionary through zspell and can be supplemented by a
//! plain word list (one word per line) for names and invented words the
//! Hunspell list does not carry.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};
use zspell::Dictionary as HunspellDictionary;

use crate::error::{Error, Result};
use crate::wordcount::{FrequencyTable, count_words};

/// File name of the optional supplementary word list.
pub const WORDLIST_FILE: &str = "words.txt";

/// "Is this a recognized word" predicate.
pub trait Lexicon {
    fn is_known(&self, word: &str) -> bool;
}

impl Lexicon for HashSet<String> {
    fn is_known(&self, word: &str) -> bool {
        self.contains(word)
    }
}

impl<L: Lexicon + ?Sized> Lexicon for &L {
    fn is_known(&self, word: &str) -> bool {
        (**self).is_known(word)
    }
}

/// Hunspell dictionary plus an optional plain word list.
pub struct Dictionary {
    hunspell: Option<HunspellDictionary>,
    wordlist: HashSet<String>,
}

impl Dictionary {
    /// Load `<name>.aff`/`<name>.dic` and `words.txt` from `dict_dir`.
    ///
    /// Either source may be missing, but not both.
    pub fn load(dict_dir: &Path, name: &str) -> Result<Self> {
        if !dict_dir.is_dir() {
            return Err(Error::Dictionary(format!(
                "dictionary directory not found: {}",
                dict_dir.display()
            )));
        }

        let dict = Self {
            hunspell: load_hunspell(dict_dir, name),
            wordlist: load_wordlist(&dict_dir.join(WORDLIST_FILE)),
        };

        if dict.hunspell.is_none() && dict.wordlist.is_empty() {
            return Err(Error::Dictionary(format!(
                "no usable dictionary in {} (expected {name}.aff/{name}.dic or {WORDLIST_FILE})",
                dict_dir.display()
            )));
        }

        info!("{}", dict.stats());
        Ok(dict)
    }

    /// Dictionary backed by a word list only.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hunspell: None,
            wordlist: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Check the word as given, then lowercased.
    pub fn check(&self, word: &str) -> bool {
        if self.check_exact(word) {
            return true;
        }
        let lower = word.to_lowercase();
        lower != word && self.check_exact(&lower)
    }

    fn check_exact(&self, word: &str) -> bool {
        if let Some(ref d) = self.hunspell {
            if d.check_word(word) {
                return true;
            }
        }
        self.wordlist.contains(word)
    }

    pub fn stats(&self) -> String {
        format!(
            "Dictionary loaded: hunspell={}, wordlist={} words",
            self.hunspell.is_some(),
            self.wordlist.len()
        )
    }
}

impl Lexicon for Dictionary {
    fn is_known(&self, word: &str) -> bool {
        self.check(word)
    }
}

fn load_wordlist(path: &Path) -> HashSet<String> {
    if !path.exists() {
        debug!("Word list not found: {}", path.display());
        return HashSet::new();
    }

    match fs::read_to_string(path) {
        Ok(content) => {
            let words: HashSet<String> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_lowercase)
                .collect();
            debug!("Loaded word list {}: {} words", path.display(), words.len());
            words
        }
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            HashSet::new()
        }
    }
}

fn load_hunspell(dict_dir: &Path, name: &str) -> Option<HunspellDictionary> {
    let aff_path = dict_dir.join(format!("{name}.aff"));
    let dic_path = dict_dir.join(format!("{name}.dic"));

    if !aff_path.exists() || !dic_path.exists() {
        warn!("Hunspell dictionary not found: {name}");
        return None;
    }

    let aff_content = match fs::read_to_string(&aff_path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {name}.aff: {e}");
            return None;
        }
    };

    let dic_content = match fs::read_to_string(&dic_path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {name}.dic: {e}");
            return None;
        }
    };

    match zspell::builder()
        .config_str(&aff_content)
        .dict_str(&dic_content)
        .build()
    {
        Ok(dict) => {
            debug!("Loaded Hunspell dictionary: {name}");
            Some(dict)
        }
        Err(e) => {
            warn!("Failed to build dictionary {name}: {e}");
            None
        }
    }
}

/// Tokens seen at least `min_count` times that `lexicon` does not know.
pub fn non_english_tokens<L>(table: &FrequencyTable, min_count: u64, lexicon: &L) -> FrequencyTable
where
    L: Lexicon + ?Sized,
{
    table.filter(|token, count| count >= min_count && !lexicon.is_known(token))
}

/// Word-count `text`, then keep the frequent unrecognized tokens.
pub fn detect_non_english<L>(
    text: &str,
    min_count: u64,
    lexicon: &L,
    parallelism: Option<usize>,
) -> Result<FrequencyTable>
where
    L: Lexicon + ?Sized,
{
    let counts = count_words(text, parallelism)?;
    let flagged = non_english_tokens(&counts, min_count, lexicon);
    debug!(
        distinct = counts.len(),
        flagged = flagged.len(),
        min_count,
        "filtered unrecognized tokens"
    );
    Ok(flagged)
}
