use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load PDF {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    #[error("Page {printed} (index {index}) is outside the document ({page_count} pages)")]
    PageOutOfRange {
        printed: u32,
        index: i64,
        page_count: usize,
    },

    #[error("Failed to extract text from page index {index}: {message}")]
    Extraction { index: usize, message: String },

    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Word count worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
