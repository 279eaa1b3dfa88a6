//! Document Module
//!
//! Turns uploaded PDF bytes into the text blob the segmenter scans.

mod error;
mod extractor;

pub use error::ExtractionError;
pub use extractor::{
    ExtractedDocument, PAGE_SEPARATOR, extract_document, extract_document_from_path,
};

#[cfg(test)]
pub(crate) use extractor::fixtures;

use crate::utils::truncate_chars;

/// Number of characters shown when previewing extracted text
pub const DEFAULT_PREVIEW_CHARS: usize = 2000;

/// First `max_chars` characters of the extracted text, for display.
pub fn preview(text: &str, max_chars: usize) -> &str {
    truncate_chars(text, max_chars)
}
