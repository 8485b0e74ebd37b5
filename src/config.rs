//! Run parameters and the date-of-birth derivation of book and page ranges.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::pdf::PageRange;

pub const DEFAULT_PDF_PATH: &str = "half-blood-prince.pdf";
pub const DEFAULT_OUT_DIR: &str = "./out";
pub const DEFAULT_DICT_DIR: &str = "./dictionaries";
pub const DEFAULT_DICT_NAME: &str = "en_US";
pub const DEFAULT_BIRTH_DATE: &str = "11/11/2002";
/// Offset between printed pages and PDF page indices.
pub const DEFAULT_OFFSET: i64 = 0;
/// Pages per extracted region.
pub const SPAN: u32 = 10;
pub const DEFAULT_TOP_N: usize = 40;
pub const DEFAULT_MIN_COUNT: u64 = 2;

const BOOK_TITLES: [&str; 7] = [
    "Philosopher's Stone",
    "Chamber of Secrets",
    "Prisoner of Azkaban",
    "Goblet of Fire",
    "Order of the Phoenix",
    "Half-Blood Prince",
    "Deathly Hallows",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDate {
    pub month: u32,
    pub day: u32,
    pub year: u32,
}

impl BirthDate {
    pub fn new(month: u32, day: u32, year: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::Config(format!("month out of range: {month}")));
        }
        if !(1..=31).contains(&day) {
            return Err(Error::Config(format!("day out of range: {day}")));
        }
        Ok(Self { month, day, year })
    }
}

impl FromStr for BirthDate {
    type Err = Error;

    /// Parses `MM/DD/YYYY`.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        let [month, day, year] = parts.as_slice() else {
            return Err(Error::Config(format!("expected MM/DD/YYYY, got {s:?}")));
        };
        BirthDate::new(
            parse_field(month, "month")?,
            parse_field(day, "day")?,
            parse_field(year, "year")?,
        )
    }
}

fn parse_field(field: &str, name: &str) -> Result<u32> {
    field
        .parse::<u32>()
        .map_err(|e| Error::Config(format!("invalid {name} {field:?}: {e}")))
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.month, self.day, self.year)
    }
}

/// Months up to July pick their own number; later months halve, rounding up.
pub fn book_number(month: u32) -> u32 {
    if month >= 8 { month.div_ceil(2) } else { month }
}

pub fn book_title(number: u32) -> Option<&'static str> {
    let index = usize::try_from(number.checked_sub(1)?).ok()?;
    BOOK_TITLES.get(index).copied()
}

/// Region 1 starts at the birth day.
pub fn word_count_range(dob: &BirthDate, span: u32) -> PageRange {
    PageRange::new(dob.day, span)
}

/// Region 2 starts at `1` followed by the two-digit year, e.g. 2002 -> 102.
pub fn non_english_range(dob: &BirthDate, span: u32) -> PageRange {
    PageRange::new(100 + dob.year % 100, span)
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub pdf_path: PathBuf,
    pub offset: i64,
    pub out_dir: PathBuf,
    pub birth_date: BirthDate,
    pub span: u32,
    pub top_n: usize,
    pub min_count: u64,
    pub dict_dir: PathBuf,
    pub dict_name: String,
    pub parallelism: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pdf_path: PathBuf::from(DEFAULT_PDF_PATH),
            offset: DEFAULT_OFFSET,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            birth_date: BirthDate {
                month: 11,
                day: 11,
                year: 2002,
            },
            span: SPAN,
            top_n: DEFAULT_TOP_N,
            min_count: DEFAULT_MIN_COUNT,
            dict_dir: PathBuf::from(DEFAULT_DICT_DIR),
            dict_name: DEFAULT_DICT_NAME.to_string(),
            parallelism: None,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.span == 0 {
            return Err(Error::Config("span must be at least 1".to_string()));
        }
        for range in [self.word_count_range(), self.non_english_range()] {
            if range.checked_end().is_none() {
                return Err(Error::Config(format!(
                    "page range starting at {} with span {} runs past the last page number",
                    range.start, range.span
                )));
            }
        }
        if self.min_count == 0 {
            return Err(Error::Config("min count must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn book_number(&self) -> u32 {
        book_number(self.birth_date.month)
    }

    pub fn word_count_range(&self) -> PageRange {
        word_count_range(&self.birth_date, self.span)
    }

    pub fn non_english_range(&self) -> PageRange {
        non_english_range(&self.birth_date, self.span)
    }
}
