//! Span detection module
//!
//! Every extractor implements [`SpanExtractor`]: it scans a [`Document`]
//! and proposes [`CandidateSpan`]s with ready-made replacement text,
//! skipping anything that overlaps spans accepted by earlier passes.

pub mod address;
pub mod department;
pub mod entity;
pub mod identifier;
pub mod learned;
pub mod money;
pub mod patterns;
pub mod project;
pub mod regex;
pub mod tech;
pub mod title;

use crate::anonymization::annotator::Annotation;
use crate::anonymization::anonymizer::HashVault;
use crate::anonymization::models::{CandidateSpan, ExtractorKind, SpanSet};
use std::collections::HashSet;

pub use address::AddressSplitter;
pub use department::DepartmentExtractor;
pub use entity::NlpEntityExtractor;
pub use identifier::IdentifierExtractor;
pub use learned::LearnedChunkExtractor;
pub use money::MoneyExtractor;
pub use patterns::PatternLibrary;
pub use project::ProjectExtractor;
pub use regex::PatternExtractor;
pub use tech::TechStackExtractor;
pub use title::{TitleSplit, TitleSuffixSplitter};

/// Trait for span extractor implementations
pub trait SpanExtractor: Send + Sync {
    /// Which variant this extractor is
    fn kind(&self) -> ExtractorKind;

    /// Propose candidate spans not overlapping `accepted`, ordered by start
    fn extract(
        &self,
        doc: &Document<'_>,
        accepted: &SpanSet,
        vault: &mut HashVault,
    ) -> Vec<CandidateSpan>;
}

/// One document under anonymization, with code-point/byte offset conversion
#[derive(Debug, Clone)]
pub struct Document<'a> {
    text: &'a str,
    /// Byte offset of every char, plus the total length
    boundaries: Vec<usize>,
    annotation: Option<&'a Annotation>,
    known_texts: Option<&'a HashSet<String>>,
}

impl<'a> Document<'a> {
    /// Wrap plain text without annotation
    pub fn new(text: &'a str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self {
            text,
            boundaries,
            annotation: None,
            known_texts: None,
        }
    }

    /// Attach the collaborator's annotation
    pub fn with_annotation(mut self, annotation: &'a Annotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Attach the learned known-text set
    pub fn with_known_texts(mut self, known_texts: &'a HashSet<String>) -> Self {
        self.known_texts = Some(known_texts);
        self
    }

    /// Raw text
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Annotation, if any
    pub fn annotation(&self) -> Option<&'a Annotation> {
        self.annotation
    }

    /// Known-text set, if any
    pub fn known_texts(&self) -> Option<&'a HashSet<String>> {
        self.known_texts
    }

    /// Length in code points
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Code-point offset of a byte offset on a char boundary
    pub fn char_offset(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }

    /// Byte offset of a code-point offset
    pub fn byte_offset(&self, char_idx: usize) -> usize {
        self.boundaries[char_idx.min(self.char_len())]
    }

    /// Code-point span of a byte range
    pub fn char_span(&self, byte_start: usize, byte_end: usize) -> (usize, usize) {
        (self.char_offset(byte_start), self.char_offset(byte_end))
    }

    /// Text of a code-point span
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.byte_offset(start)..self.byte_offset(end)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_conversion() {
        let doc = Document::new("電話：03");
        assert_eq!(doc.char_len(), 5);
        assert_eq!(doc.byte_offset(3), 9);
        assert_eq!(doc.char_offset(9), 3);
        assert_eq!(doc.char_span(9, 11), (3, 5));
        assert_eq!(doc.slice(3, 5), "03");
        assert_eq!(doc.slice(0, 2), "電話");
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new("");
        assert_eq!(doc.char_len(), 0);
        assert_eq!(doc.slice(0, 0), "");
    }
}
