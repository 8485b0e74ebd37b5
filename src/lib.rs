//! Page-range word counting and non-English token detection for PDF books.
//!
//! Two page ranges are pulled from a PDF. The first is word-counted with a
//! chunked, rayon-backed MapReduce; the second is cleaned up, counted the
//! same way, and filtered down to frequent tokens an injected dictionary
//! does not recognise.

pub mod config;
pub mod dictionary;
pub mod error;
pub mod pdf;
pub mod pipeline;
pub mod preprocess;
pub mod report;
pub mod wordcount;

#[cfg(feature = "python")]
mod python;

pub use dictionary::{Dictionary, Lexicon, detect_non_english, non_english_tokens};
pub use error::{Error, Result};
pub use wordcount::{FrequencyTable, count_words};
