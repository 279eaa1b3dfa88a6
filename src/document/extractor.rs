//! PDF text extraction
//!
//! Pages are read in their stored order. A page whose text cannot be
//! extracted (scanned images, unsupported fonts) contributes an empty string
//! instead of failing the whole document.

use std::path::Path;

use lopdf::Document;

use super::error::{ExtractionError, Result};

/// Separator placed between consecutive page texts
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Per-page text of one PDF
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    pages: Vec<String>,
}

impl ExtractedDocument {
    pub fn from_pages(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Page texts in page order
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All page texts joined by [`PAGE_SEPARATOR`]
    pub fn text(&self) -> String {
        self.pages.join(PAGE_SEPARATOR)
    }
}

/// Decode PDF bytes and extract the text of every page.
pub fn extract_document(pdf_bytes: &[u8]) -> Result<ExtractedDocument> {
    let doc = Document::load_mem(pdf_bytes)?;

    let pages: Vec<String> = doc
        .get_pages()
        .into_keys()
        .map(|page_num| match doc.extract_text(&[page_num]) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("No text extracted from page {}: {}", page_num, e);
                String::new()
            }
        })
        .collect();

    tracing::info!(
        "Extracted {} page(s), {} chars",
        pages.len(),
        pages.iter().map(|p| p.chars().count()).sum::<usize>()
    );

    Ok(ExtractedDocument::from_pages(pages))
}

/// Read a PDF from disk and extract the text of every page.
pub fn extract_document_from_path<P: AsRef<Path>>(path: P) -> Result<ExtractedDocument> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());
    extract_document(&bytes)
}
