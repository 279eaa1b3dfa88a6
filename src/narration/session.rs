//! One narration run over a single uploaded document

use std::path::Path;
use std::time::Duration;

use super::{Assembler, NarrationSettings};
use crate::document::{self, ExtractedDocument};
use crate::error::NarrationError;
use crate::segmenter::{QaPair, Segmenter};
use crate::tts::{AudioFormat, SpeechSynthesizer};

/// Base name of the exported file, without extension
pub const EXPORT_BASENAME: &str = "entrevista_2vozes";

/// Extracted text and its QA pairs, ready for preview or generation
#[derive(Debug, Clone)]
pub struct NarrationSession {
    text: String,
    page_count: usize,
    pairs: Vec<QaPair>,
}

impl NarrationSession {
    /// Extract and segment an uploaded PDF.
    pub fn from_pdf(pdf_bytes: &[u8], segmenter: &Segmenter) -> Result<Self, NarrationError> {
        let document = document::extract_document(pdf_bytes)?;
        Ok(Self::from_document(&document, segmenter))
    }

    /// Read, extract, and segment a PDF on disk.
    pub fn from_path(path: &Path, segmenter: &Segmenter) -> Result<Self, NarrationError> {
        let document = document::extract_document_from_path(path)?;
        Ok(Self::from_document(&document, segmenter))
    }

    pub fn from_document(document: &ExtractedDocument, segmenter: &Segmenter) -> Self {
        let mut session = Self::from_text(document.text(), segmenter);
        session.page_count = document.page_count();
        session
    }

    pub fn from_text(text: impl Into<String>, segmenter: &Segmenter) -> Self {
        let text = text.into();
        let pairs = segmenter.segment(&text);
        tracing::info!("Found {} question/answer pair(s)", pairs.len());
        Self {
            text,
            page_count: 0,
            pairs,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// First `max_chars` characters of the extracted text
    pub fn preview(&self, max_chars: usize) -> &str {
        document::preview(&self.text, max_chars)
    }

    pub fn pairs(&self) -> &[QaPair] {
        &self.pairs
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Synthesize, assemble, and encode the narration.
    pub async fn generate<S: SpeechSynthesizer>(
        &self,
        assembler: &Assembler<S>,
        settings: &NarrationSettings,
    ) -> Result<NarrationExport, NarrationError> {
        let track = assembler.assemble(&self.pairs, settings).await?;
        let bytes = track.export(settings.format)?;
        tracing::info!(
            "Exported {} bytes as {}",
            bytes.len(),
            settings.format.mime_type()
        );
        Ok(NarrationExport {
            bytes,
            format: settings.format,
            duration: track.duration(),
        })
    }
}

/// Encoded narration, ready to save or stream
#[derive(Debug, Clone)]
pub struct NarrationExport {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
    pub duration: Duration,
}

impl NarrationExport {
    /// `entrevista_2vozes.<ext>`
    pub fn file_name(&self) -> String {
        format!("{}.{}", EXPORT_BASENAME, self.format.extension())
    }

    /// `audio/<ext>`
    pub fn mime_type(&self) -> String {
        self.format.mime_type()
    }
}
