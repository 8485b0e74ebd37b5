//! Chunked MapReduce word count.
//!
//! Text is split into lines, the lines are partitioned into contiguous
//! chunks, every chunk is mapped to `(token, 1)` pairs on a rayon pool, and
//! the pairs are folded into a single [`FrequencyTable`]. The fold is a sum
//! keyed by token, so the result does not depend on chunk boundaries or on
//! the order in which workers finish.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use lazy_static::lazy_static;
use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};

/// Upper bound for the pool size when the caller does not pick one.
pub const MAX_DEFAULT_PARALLELISM: usize = 8;

lazy_static! {
    // Word-constituent characters: ASCII letters and the ASCII apostrophe
    static ref WORD_PATTERN: Regex = Regex::new(r"[A-Za-z']+").unwrap();
}

/// Token -> occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `increment` to the count of `token`, starting unseen tokens at zero.
    pub fn add(&mut self, token: impl Into<String>, increment: u64) {
        *self.counts.entry(token.into()).or_insert(0) += increment;
    }

    pub fn get(&self, token: &str) -> Option<u64> {
        self.counts.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(token, count)| (token.as_str(), *count))
    }

    /// Fold another table into this one.
    pub fn merge(&mut self, other: FrequencyTable) {
        for (token, count) in other.counts {
            self.add(token, count);
        }
    }

    /// Sub-table of the entries matching `keep`.
    pub fn filter<F>(&self, mut keep: F) -> FrequencyTable
    where
        F: FnMut(&str, u64) -> bool,
    {
        self.iter()
            .filter(|(token, count)| keep(token, *count))
            .map(|(token, count)| (token.to_string(), count))
            .collect()
    }

    /// Entries by descending count, ties by ascending token.
    /// `None` returns every entry.
    pub fn most_common(&self, limit: Option<usize>) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        entries
    }
}

impl FromIterator<(String, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        shuffle(iter)
    }
}

impl<'a> FromIterator<(&'a str, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(token, count)| (token.to_string(), count))
            .collect()
    }
}

/// Raw tokens of a line: maximal runs of `[A-Za-z']`, case preserved.
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    WORD_PATTERN.find_iter(line).map(|m| m.as_str())
}

/// Lowercase a raw token and strip apostrophes from its ends.
///
/// Returns `None` when nothing is left, or when the token is a lone
/// apostrophe (ASCII or typographic).
pub fn normalize(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();
    let word = lower.trim_matches('\'');
    if word.is_empty() || word == "'" || word == "\u{2019}" {
        return None;
    }
    Some(word.to_string())
}

/// Map one chunk to `(token, 1)` pairs, one pair per occurrence.
pub fn map_chunk<S: AsRef<str>>(lines: &[S]) -> Vec<(String, u64)> {
    lines
        .iter()
        .flat_map(|line| tokenize(line.as_ref()))
        .filter_map(normalize)
        .map(|word| (word, 1))
        .collect()
}

/// Partition `items` into contiguous chunks of `max(1, len / n)` items.
///
/// The last chunk holds the remainder, so more than `n` chunks come back
/// when `len` is not a multiple of the chunk size. Empty input yields no
/// chunks.
pub fn chunkify<T>(items: &[T], n: usize) -> Vec<&[T]> {
    let size = (items.len() / n.max(1)).max(1);
    items.chunks(size).collect()
}

/// Sum `(token, increment)` pairs into a table.
pub fn shuffle<I>(pairs: I) -> FrequencyTable
where
    I: IntoIterator<Item = (String, u64)>,
{
    let mut table = FrequencyTable::new();
    for (token, increment) in pairs {
        table.add(token, increment);
    }
    table
}

/// Pool size for `available` parallel units: capped at
/// [`MAX_DEFAULT_PARALLELISM`] and never below one.
pub fn default_parallelism(available: usize) -> usize {
    available.clamp(1, MAX_DEFAULT_PARALLELISM)
}

/// Effective pool size. `None` and `Some(0)` fall back to the host's
/// available parallelism.
pub fn resolve_parallelism(requested: Option<usize>) -> usize {
    match requested {
        Some(n) if n > 0 => n,
        _ => {
            let available = thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            default_parallelism(available)
        }
    }
}

/// Count normalized words in `text` with a pool of `parallelism` workers.
///
/// Blank lines are kept and simply contribute nothing. The pool lives for
/// this call only. A worker panic fails the whole count.
pub fn count_words(text: &str, parallelism: Option<usize>) -> Result<FrequencyTable> {
    let lines: Vec<&str> = text.lines().collect();
    let workers = resolve_parallelism(parallelism);
    let chunks = chunkify(&lines, workers);

    debug!(
        lines = lines.len(),
        workers,
        chunks = chunks.len(),
        "partitioned text for word count"
    );

    let partials = map_in_pool(&chunks, workers, |chunk| map_chunk(*chunk))?;
    Ok(shuffle(partials.into_iter().flatten()))
}

fn map_in_pool<T, R, F>(chunks: &[T], workers: usize, mapper: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("wordcount-{i}"))
        .build()?;

    panic::catch_unwind(AssertUnwindSafe(|| {
        pool.install(|| chunks.par_iter().map(&mapper).collect())
    }))
    .map_err(|payload| Error::WorkerPanicked(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
