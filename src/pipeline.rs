//! The batch run: extract both page ranges, count, flag, write artifacts.

use std::fmt::Write as _;
use std::path::PathBuf;

use tracing::info;

use crate::config::{RunConfig, book_title};
use crate::dictionary::{Lexicon, detect_non_english};
use crate::error::Result;
use crate::pdf::{PageRange, PageSource, extract_pages};
use crate::preprocess::{LanguageGuess, guess_language, prepare_for_spellcheck};
use crate::report::{
    ALL_WORDS_CSV, FILE1_TEXT, FILE2_TEXT, NON_ENGLISH_CSV, ensure_dir, render_table,
    top_words_csv, write_counts_csv, write_text,
};
use crate::wordcount::{FrequencyTable, count_words};

#[derive(Debug)]
pub struct RunSummary {
    pub top_n: usize,
    pub word_counts: FrequencyTable,
    pub non_english: FrequencyTable,
    pub language: Option<LanguageGuess>,
    pub artifacts: Vec<PathBuf>,
}

/// `[DOB]` and `[Pages]` lines describing the derived parameters.
pub fn render_header(config: &RunConfig) -> String {
    let book = config.book_number();
    let title = book_title(book).unwrap_or("unknown title");
    format!(
        "[DOB] {} => Book {book} ({title})\n[Pages] file1: {} | file2: {}",
        config.birth_date,
        config.word_count_range(),
        config.non_english_range(),
    )
}

impl RunSummary {
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "\n=== Word Count (Top {}) - {FILE1_TEXT} ===", self.top_n);
        out.push_str(&render_table(&self.word_counts.most_common(Some(self.top_n))));
        let _ = writeln!(
            out,
            "({} tokens, {} distinct)",
            self.word_counts.total(),
            self.word_counts.len()
        );

        let _ = writeln!(out, "\n=== Non-English Tokens - {FILE2_TEXT} ===");
        out.push_str(&render_table(&self.non_english.most_common(None)));
        if let Some(lang) = &self.language {
            let _ = writeln!(
                out,
                "(detected language: {} [{}], confidence {:.2}{})",
                lang.name,
                lang.code,
                lang.confidence,
                if lang.reliable { "" } else { ", unreliable" }
            );
        }
        out
    }
}

/// Run every step against an already opened document and dictionary.
pub fn run<S, L>(config: &RunConfig, source: &S, lexicon: &L) -> Result<RunSummary>
where
    S: PageSource + ?Sized,
    L: Lexicon + ?Sized,
{
    config.validate()?;
    ensure_dir(&config.out_dir)?;

    let file1 = extract_region(source, config.word_count_range(), config.offset)?;
    let file2 = extract_region(source, config.non_english_range(), config.offset)?;

    let file1_path = config.out_dir.join(FILE1_TEXT);
    let file2_path = config.out_dir.join(FILE2_TEXT);
    write_text(&file1_path, &file1)?;
    write_text(&file2_path, &file2)?;

    let word_counts = count_words(&file1, config.parallelism)?;
    info!(
        tokens = word_counts.total(),
        distinct = word_counts.len(),
        "counted words in {FILE1_TEXT}"
    );

    let cleaned = prepare_for_spellcheck(&file2);
    let language = guess_language(&cleaned);
    let non_english = detect_non_english(&cleaned, config.min_count, lexicon, config.parallelism)?;
    info!(flagged = non_english.len(), "checked {FILE2_TEXT} against dictionary");

    let top_path = config.out_dir.join(top_words_csv(config.top_n));
    let all_path = config.out_dir.join(ALL_WORDS_CSV);
    let non_english_path = config.out_dir.join(NON_ENGLISH_CSV);
    write_counts_csv(
        &top_path,
        "word,count",
        &word_counts.most_common(Some(config.top_n)),
    )?;
    write_counts_csv(&all_path, "word,count", &word_counts.most_common(None))?;
    write_counts_csv(&non_english_path, "token,count", &non_english.most_common(None))?;

    Ok(RunSummary {
        top_n: config.top_n,
        word_counts,
        non_english,
        language,
        artifacts: vec![file1_path, file2_path, top_path, all_path, non_english_path],
    })
}

fn extract_region<S>(source: &S, range: PageRange, offset: i64) -> Result<String>
where
    S: PageSource + ?Sized,
{
    info!("Extracting pages {range} (offset {offset})");
    extract_pages(source, range, offset)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;

    use super::*;
    use crate::config::BirthDate;
    use crate::error::Error;

    const PAGE_2: &str = "The Other Minister\nHarry said, Harry said.";
    const PAGE_3: &str = "CHAPTER TWO\nSpinner\u{2019}s End, said Snape.";
    const PAGE_102: &str = "Snape said nothing. Snape's wand.";

    // DOB 01/02/2001: region 1 is printed pages 2-3, region 2 is 101-102
    fn config(out_dir: PathBuf) -> RunConfig {
        RunConfig {
            out_dir,
            birth_date: BirthDate::new(1, 2, 2001).unwrap(),
            span: 2,
            top_n: 2,
            parallelism: Some(2),
            ..RunConfig::default()
        }
    }

    fn book(pages: usize) -> Vec<String> {
        let mut book: Vec<String> = (1..=pages).map(|n| format!("page {n}")).collect();
        book[1] = PAGE_2.to_string();
        book[2] = PAGE_3.to_string();
        if pages > 101 {
            book[100] = PAGE_3.to_string();
            book[101] = PAGE_102.to_string();
        }
        book
    }

    fn lexicon() -> HashSet<String> {
        ["the", "other", "minister", "said", "end", "nothing", "wand"]
            .iter()
            .map(|w| w.to_string())
            .collect()
    }

    #[test]
    fn test_run_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let source = book(120);

        let summary = run(&config(out.clone()), &source[..], &lexicon()).unwrap();

        assert_eq!(summary.word_counts.get("said"), Some(3));
        assert_eq!(summary.word_counts.get("harry"), Some(2));
        assert_eq!(summary.word_counts.get("chapter"), Some(1));

        // All-caps heading is dropped before the dictionary check
        let expected: FrequencyTable = [("snape", 2u64)].into_iter().collect();
        assert_eq!(summary.non_english, expected);

        assert_eq!(
            fs::read_to_string(out.join(FILE1_TEXT)).unwrap(),
            format!("{PAGE_2}\n{PAGE_3}")
        );
        assert_eq!(
            fs::read_to_string(out.join(FILE2_TEXT)).unwrap(),
            format!("{PAGE_3}\n{PAGE_102}")
        );
        assert_eq!(
            fs::read_to_string(out.join("file1_wordcount_top2.csv")).unwrap(),
            "word,count\nsaid,3\nharry,2\n"
        );
        assert_eq!(
            fs::read_to_string(out.join(NON_ENGLISH_CSV)).unwrap(),
            "token,count\nsnape,2\n"
        );
        let all = fs::read_to_string(out.join(ALL_WORDS_CSV)).unwrap();
        assert_eq!(all.lines().count(), summary.word_counts.len() + 1);

        assert_eq!(summary.artifacts.len(), 5);
        assert!(summary.artifacts.iter().all(|p| p.exists()));

        let rendered = summary.render();
        assert!(rendered.contains("=== Word Count (Top 2)"));
        assert!(rendered.contains(&format!("{:20} {:5}", "snape", 2)));
    }

    #[test]
    fn test_run_fails_on_out_of_range_pages() {
        let dir = tempfile::tempdir().unwrap();
        let source = book(12);
        let err = run(&config(dir.path().join("out")), &source[..], &lexicon()).unwrap_err();
        assert!(matches!(err, Error::PageOutOfRange { printed: 101, .. }));
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            min_count: 0,
            ..config(dir.path().join("out"))
        };
        let err = run(&config, &book(120)[..], &lexicon()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_render_header() {
        let header = render_header(&RunConfig::default());
        assert_eq!(
            header,
            "[DOB] 11/11/2002 => Book 6 (Half-Blood Prince)\n[Pages] file1: 11-20 | file2: 102-111"
        );
    }
}
