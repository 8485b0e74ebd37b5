use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hp_wordcount::config::{
    BirthDate, DEFAULT_BIRTH_DATE, DEFAULT_DICT_DIR, DEFAULT_DICT_NAME, DEFAULT_MIN_COUNT,
    DEFAULT_OFFSET, DEFAULT_OUT_DIR, DEFAULT_PDF_PATH, DEFAULT_TOP_N, RunConfig, SPAN,
};
use hp_wordcount::dictionary::Dictionary;
use hp_wordcount::pdf::PdfDocument;
use hp_wordcount::pipeline::{self, render_header};

#[derive(Parser, Debug)]
#[command(name = "hp-wordcount")]
#[command(about = "Word-count one page range of a PDF and flag non-English tokens in another")]
struct Args {
    /// Input PDF
    #[arg(long, default_value = DEFAULT_PDF_PATH)]
    pdf: PathBuf,

    /// Offset between printed page numbers and PDF page indices
    #[arg(long, default_value_t = DEFAULT_OFFSET, allow_negative_numbers = true)]
    offset: i64,

    /// Output directory for text and CSV files
    #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// Date of birth (MM/DD/YYYY) used to derive the book and page ranges
    #[arg(long, default_value = DEFAULT_BIRTH_DATE)]
    dob: BirthDate,

    /// Pages per range
    #[arg(long, default_value_t = SPAN)]
    span: u32,

    /// Number of words in the top-N table
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Minimum occurrences before an unknown token is reported
    #[arg(long, default_value_t = DEFAULT_MIN_COUNT)]
    min_count: u64,

    /// Directory holding <dict-name>.aff/.dic and an optional words.txt
    #[arg(long, default_value = DEFAULT_DICT_DIR)]
    dict_dir: PathBuf,

    /// Hunspell dictionary name
    #[arg(long, default_value = DEFAULT_DICT_NAME)]
    dict_name: String,

    /// Worker count (default: available cores, at most 8)
    #[arg(short = 'j', long)]
    processes: Option<usize>,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        RunConfig {
            pdf_path: args.pdf,
            offset: args.offset,
            out_dir: args.out_dir,
            birth_date: args.dob,
            span: args.span,
            top_n: args.top,
            min_count: args.min_count,
            dict_dir: args.dict_dir,
            dict_name: args.dict_name,
            parallelism: args.processes,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let config = RunConfig::from(Args::parse());
    println!("{}", render_header(&config));

    let pdf = PdfDocument::open(&config.pdf_path)
        .with_context(|| format!("Failed to open {}", config.pdf_path.display()))?;
    let dictionary = Dictionary::load(&config.dict_dir, &config.dict_name)
        .context("Failed to load dictionary")?;

    let summary = pipeline::run(&config, &pdf, &dictionary)
        .with_context(|| format!("Failed to process {}", pdf.path().display()))?;
    print!("{}", summary.render());

    for path in &summary.artifacts {
        info!("Wrote {}", path.display());
    }
    Ok(())
}
