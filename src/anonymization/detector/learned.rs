//! Learned noun-chunk pass
//!
//! Redacts every noun chunk whose text was recorded by earlier `learn`
//! calls, which catches recurring codenames that no pattern or entity
//! label covers.

use super::{Document, SpanExtractor, TitleSuffixSplitter};
use crate::anonymization::anonymizer::HashVault;
use crate::anonymization::models::{CandidateSpan, ExtractorKind, SpanSet};

/// Learned noun-chunk pass
#[derive(Debug, Clone)]
pub struct LearnedChunkExtractor {
    titles: TitleSuffixSplitter,
}

impl LearnedChunkExtractor {
    /// Create a new learned-chunk pass
    pub fn new(titles: TitleSuffixSplitter) -> Self {
        Self { titles }
    }
}

impl SpanExtractor for LearnedChunkExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::LearnedChunk
    }

    fn extract(
        &self,
        doc: &Document<'_>,
        accepted: &SpanSet,
        vault: &mut HashVault,
    ) -> Vec<CandidateSpan> {
        let (Some(annotation), Some(known)) = (doc.annotation(), doc.known_texts()) else {
            return Vec::new();
        };
        if known.is_empty() {
            return Vec::new();
        }

        let mut claimed = accepted.clone();
        let mut spans = Vec::new();

        for chunk in &annotation.noun_chunks {
            let (start, end) = (chunk.start_char, chunk.end_char);
            if start >= end || end > doc.char_len() || !known.contains(&chunk.text) {
                continue;
            }
            if !claimed.claim(start, end) {
                continue;
            }

            let split = self.titles.split(doc.slice(start, end));
            spans.push(CandidateSpan::new(start, end, split.replacement(vault), self.kind()));
        }

        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::annotator::{Annotation, NounChunk};
    use crate::anonymization::detector::PatternLibrary;
    use std::collections::HashSet;

    fn extractor() -> LearnedChunkExtractor {
        let library = PatternLibrary::default_library().unwrap();
        LearnedChunkExtractor::new(TitleSuffixSplitter::new(&library))
    }

    fn chunk(start: usize, end: usize, text: &str) -> NounChunk {
        NounChunk {
            start_char: start,
            end_char: end,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_known_chunk_is_redacted() {
        let text = "ブルーオーシャン計画を再開";
        let annotation = Annotation {
            noun_chunks: vec![chunk(0, 10, "ブルーオーシャン計画")],
            ..Annotation::default()
        };
        let known: HashSet<String> = ["ブルーオーシャン計画".to_string()].into();
        let doc = Document::new(text)
            .with_annotation(&annotation)
            .with_known_texts(&known);
        let mut vault = HashVault::new();

        let spans = extractor().extract(&doc, &SpanSet::new(), &mut vault);
        assert_eq!(spans.len(), 1);
        assert_eq!(vault.reverse(&spans[0].replacement), Some("ブルーオーシャン計画"));
    }

    #[test]
    fn test_unknown_chunk_is_kept() {
        let annotation = Annotation {
            noun_chunks: vec![chunk(0, 2, "会議")],
            ..Annotation::default()
        };
        let known: HashSet<String> = ["別件".to_string()].into();
        let doc = Document::new("会議")
            .with_annotation(&annotation)
            .with_known_texts(&known);

        let spans = extractor().extract(&doc, &SpanSet::new(), &mut HashVault::new());
        assert!(spans.is_empty());
    }
}
