//! QA Segmenter
//!
//! Splits extracted text into ordered question/answer pairs. A block starts
//! at a question marker ("Pergunta"), its question body runs to the first
//! answer marker ("Resposta"), and the answer body runs to the next question
//! marker followed by `:` or whitespace, or to the end of the text. Matching
//! is case-insensitive. Malformed input never fails; it yields fewer pairs.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// One question/answer unit, both sides trimmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Marker words delimiting questions and answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    /// Word that opens a question (default: "Pergunta")
    #[serde(default = "default_question_marker")]
    pub question: String,

    /// Word that opens an answer (default: "Resposta")
    #[serde(default = "default_answer_marker")]
    pub answer: String,
}

fn default_question_marker() -> String {
    "Pergunta".to_string()
}

fn default_answer_marker() -> String {
    "Resposta".to_string()
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            question: default_question_marker(),
            answer: default_answer_marker(),
        }
    }
}

/// Compiled marker scanner
#[derive(Debug, Clone)]
pub struct Segmenter {
    question: Regex,
    answer: Regex,
    /// Question marker followed by `:` or whitespace; ends an answer body
    boundary: Regex,
}

impl Segmenter {
    pub fn new(markers: &Markers) -> Result<Self, regex::Error> {
        let q = regex::escape(&markers.question);
        let a = regex::escape(&markers.answer);
        Ok(Self {
            question: case_insensitive(&q)?,
            answer: case_insensitive(&a)?,
            boundary: case_insensitive(&format!(r"{}[:\s\x1C-\x1F]", q))?,
        })
    }

    /// Scan `text` and return every pair in order of appearance.
    pub fn segment(&self, text: &str) -> Vec<QaPair> {
        let mut pairs = Vec::new();
        let mut cursor = 0;

        while let Some(q) = self.question.find_at(text, cursor) {
            let question_start = skip_separators(text, q.end());

            // No answer marker anywhere ahead: nothing more can match.
            let Some(a) = self.answer.find_at(text, question_start) else {
                break;
            };

            let answer_start = skip_separators(text, a.end());
            let answer_end = self
                .boundary
                .find_at(text, answer_start)
                .map_or(text.len(), |m| m.start());

            pairs.push(QaPair::new(
                text[question_start..a.start()].trim_matches(is_space),
                text[answer_start..answer_end].trim_matches(is_space),
            ));

            // Empty markers would otherwise stall on a zero-width match.
            if answer_end >= text.len() || answer_end <= cursor {
                break;
            }
            cursor = answer_end;
        }

        tracing::debug!("Segmented {} QA pair(s)", pairs.len());
        pairs
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        // Escaped literal markers always compile.
        Self::new(&Markers::default()).expect("default markers are valid patterns")
    }
}

/// Parse `text` with the default Portuguese markers.
pub fn parse_qa(text: &str) -> Vec<QaPair> {
    Segmenter::default().segment(text)
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Unicode whitespace plus the ASCII information separators (U+001C..U+001F)
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Advance past a run of `:` and whitespace starting at byte `pos`.
fn skip_separators(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|&(_, c)| c != ':' && !is_space(c))
        .map_or(text.len(), |(offset, _)| pos + offset)
}
