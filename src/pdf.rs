//! Page-range text extraction.
//!
//! Printed page numbers (as they appear in the book) are mapped to
//! zero-based document indices with a configurable offset.

use std::fmt;
use std::path::{Path, PathBuf};

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// A document that yields text per zero-based page index.
pub trait PageSource {
    fn page_count(&self) -> usize;

    fn page_text(&self, index: usize) -> Result<String>;
}

impl<S: AsRef<str>> PageSource for [S] {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        self.get(index)
            .map(|page| page.as_ref().to_string())
            .ok_or(Error::Extraction {
                index,
                message: "no such page".to_string(),
            })
    }
}

/// PDF file loaded with lopdf.
pub struct PdfDocument {
    path: PathBuf,
    doc: Document,
    page_numbers: Vec<u32>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let doc = Document::load(path).map_err(|e| Error::Pdf {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        debug!("Opened {:?}: {} pages", path, page_numbers.len());

        Ok(Self {
            path: path.to_path_buf(),
            doc,
            page_numbers,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let page_number = *self.page_numbers.get(index).ok_or(Error::Extraction {
            index,
            message: "no such page".to_string(),
        })?;
        self.doc
            .extract_text(&[page_number])
            .map_err(|e| Error::Extraction {
                index,
                message: e.to_string(),
            })
    }
}

/// Inclusive range of printed page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub span: u32,
}

impl PageRange {
    pub fn new(start: u32, span: u32) -> Self {
        Self { start, span }
    }

    /// Last printed page (inclusive), saturating at `u32::MAX`.
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.span.saturating_sub(1))
    }

    /// Last printed page, or `None` when the range runs past `u32::MAX`.
    pub fn checked_end(&self) -> Option<u32> {
        self.start.checked_add(self.span.saturating_sub(1))
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> {
        (self.start..=self.end()).take(self.span as usize)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end())
    }
}

/// Document index of a printed page: `(printed - 1) + offset`.
pub fn page_index(printed: u32, offset: i64) -> i64 {
    i64::from(printed) - 1 + offset
}

/// Newline-joined text of every page in `range`.
///
/// A page outside the document is an error. A page whose text cannot be
/// extracted contributes an empty string.
pub fn extract_pages<S>(source: &S, range: PageRange, offset: i64) -> Result<String>
where
    S: PageSource + ?Sized,
{
    let page_count = source.page_count();
    let mut texts = Vec::with_capacity((range.span as usize).min(page_count));

    for printed in range.pages() {
        let index = page_index(printed, offset);
        let valid = usize::try_from(index).ok().filter(|i| *i < page_count);
        let Some(index) = valid else {
            return Err(Error::PageOutOfRange {
                printed,
                index,
                page_count,
            });
        };

        match source.page_text(index) {
            Ok(text) => texts.push(text),
            Err(e) => {
                warn!("Page {printed} yielded no text: {e}");
                texts.push(String::new());
            }
        }
    }

    debug!("Extracted pages {range}: {} chars", texts.iter().map(String::len).sum::<usize>());
    Ok(texts.join("\n"))
}

#[cfg(test)]
mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    use super::*;

    struct FlakyBook {
        pages: Vec<Option<&'static str>>,
    }

    impl PageSource for FlakyBook {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_text(&self, index: usize) -> Result<String> {
            self.pages[index]
                .map(str::to_string)
                .ok_or(Error::Extraction {
                    index,
                    message: "garbled content stream".to_string(),
                })
        }
    }

    #[test]
    fn test_page_range() {
        let range = PageRange::new(11, 10);
        assert_eq!(range.end(), 20);
        assert_eq!(range.pages().count(), 10);
        assert_eq!(range.to_string(), "11-20");
    }

    #[test]
    fn test_extract_pages_joins_with_newlines() {
        let pages = ["one", "two", "three", "four"];
        let text = extract_pages(&pages[..], PageRange::new(2, 2), 0).unwrap();
        assert_eq!(text, "two\nthree");
    }

    #[test]
    fn test_extract_pages_applies_offset() {
        let pages = ["cover", "title", "one", "two"];
        let text = extract_pages(&pages[..], PageRange::new(1, 2), 2).unwrap();
        assert_eq!(text, "one\ntwo");
    }

    #[test]
    fn test_failed_page_contributes_empty_string() {
        let book = FlakyBook {
            pages: vec![Some("a"), None, Some("c")],
        };
        let text = extract_pages(&book, PageRange::new(1, 3), 0).unwrap();
        assert_eq!(text, "a\n\nc");
    }

    #[test]
    fn test_out_of_range_is_fatal() {
        let pages = ["one", "two"];
        let err = extract_pages(&pages[..], PageRange::new(2, 2), 0).unwrap_err();
        assert!(matches!(
            err,
            Error::PageOutOfRange {
                printed: 3,
                index: 2,
                page_count: 2
            }
        ));

        let err = extract_pages(&pages[..], PageRange::new(1, 1), -1).unwrap_err();
        assert!(matches!(err, Error::PageOutOfRange { index: -1, .. }));
    }

    #[test]
    fn test_huge_span_stops_at_first_missing_page() {
        let pages = ["one", "two"];
        let err = extract_pages(&pages[..], PageRange::new(5, u32::MAX), 0).unwrap_err();
        assert!(matches!(err, Error::PageOutOfRange { printed: 5, .. }));

        let range = PageRange::new(5, u32::MAX);
        assert_eq!(range.end(), u32::MAX);
        assert_eq!(range.checked_end(), None);
        assert_eq!(PageRange::new(u32::MAX, 1).pages().collect::<Vec<_>>(), vec![u32::MAX]);
        assert_eq!(PageRange::new(3, 0).pages().count(), 0);
    }

    fn write_test_pdf(path: &Path, pages: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_pdf_document_extracts_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.pdf");
        write_test_pdf(&path, &["Owl post", "Wand shop"]);

        let pdf = PdfDocument::open(&path).unwrap();
        assert_eq!(pdf.path(), path.as_path());
        assert_eq!(pdf.page_count(), 2);
        assert!(pdf.page_text(0).unwrap().contains("Owl post"));
        assert!(pdf.page_text(1).unwrap().contains("Wand shop"));
        assert!(matches!(pdf.page_text(2), Err(Error::Extraction { index: 2, .. })));

        let text = extract_pages(&pdf, PageRange::new(1, 2), 0).unwrap();
        let owl = text.find("Owl post").unwrap();
        let wand = text.find("Wand shop").unwrap();
        assert!(owl < wand);

        let err = extract_pages(&pdf, PageRange::new(2, 2), 0).unwrap_err();
        assert!(matches!(err, Error::PageOutOfRange { printed: 3, page_count: 2, .. }));
    }

    #[test]
    fn test_open_missing_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let result = PdfDocument::open(&dir.path().join("missing.pdf"));
        assert!(matches!(result, Err(Error::Pdf { .. })));
    }
}
