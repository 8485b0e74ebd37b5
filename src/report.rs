//! Text and CSV artifacts, and the console tables.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

pub const FILE1_TEXT: &str = "file1.txt";
pub const FILE2_TEXT: &str = "file2.txt";
pub const ALL_WORDS_CSV: &str = "file1_wordcount_all.csv";
pub const NON_ENGLISH_CSV: &str = "file2_nonenglish.csv";

/// `file1_wordcount_top<N>.csv`
pub fn top_words_csv(top_n: usize) -> String {
    format!("file1_wordcount_top{top_n}.csv")
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Write `text` verbatim as UTF-8.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| Error::io(path, e))?;
    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// Write a two-column CSV: `header` row, then one `token,count` row per entry.
///
/// Fields are not quoted; tokens never contain commas.
pub fn write_counts_csv(path: &Path, header: &str, rows: &[(&str, u64)]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{header}").map_err(|e| Error::io(path, e))?;
    for (token, count) in rows {
        writeln!(out, "{token},{count}").map_err(|e| Error::io(path, e))?;
    }
    out.flush().map_err(|e| Error::io(path, e))?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// One `{token:20} {count:5}` line per entry.
pub fn render_table(rows: &[(&str, u64)]) -> String {
    let mut out = String::new();
    for (token, count) in rows {
        let _ = writeln!(out, "{token:20} {count:5}");
    }
    out
}
