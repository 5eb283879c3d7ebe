use std::path::Path;

use anyhow::{Context, Result};
use lopdf::Document;
use tracing::debug;

/// Opens documents for page-by-page text extraction.
pub trait DocumentBackend {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PageSource + 'a>>;
}

/// An opened document. Dropping it releases the underlying parse.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Plain text of the page at zero-based `index`.
    fn page_text(&self, index: usize) -> Result<String>;
}

/// Production backend built on `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

struct LopdfDocument {
    document: Document,
    page_numbers: Vec<u32>,
}

impl DocumentBackend for LopdfBackend {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PageSource + 'a>> {
        let document = Document::load(path)
            .with_context(|| format!("failed to load PDF {}", path.display()))?;
        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();

        debug!(path = %path.display(), pages = page_numbers.len(), "opened PDF");

        Ok(Box::new(LopdfDocument {
            document,
            page_numbers,
        }))
    }
}

impl PageSource for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let page_number = *self
            .page_numbers
            .get(index)
            .with_context(|| format!("page index {index} out of range"))?;

        self.document
            .extract_text(&[page_number])
            .with_context(|| format!("failed to extract text from page {page_number}"))
    }
}
