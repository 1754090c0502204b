//! Regex category extractor
//!
//! Redacts every match of the library's unstructured categories (email,
//! phone, URL, date, time, percent, duration and any user category) as a
//! single token. ID, LICENSE and MONEY are left to their dedicated
//! extractors.

use super::patterns::STRUCTURED_LABELS;
use super::{Document, PatternLibrary, SpanExtractor};
use crate::anonymization::anonymizer::HashVault;
use crate::anonymization::models::{CandidateSpan, ExtractorKind, SpanSet};
use std::sync::Arc;

/// Regex category extractor
pub struct PatternExtractor {
    library: Arc<PatternLibrary>,
}

impl PatternExtractor {
    /// Create a new extractor over a shared library
    pub fn new(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    /// All raw category matches as `(start, end, label)` in code points
    pub fn matches(&self, doc: &Document<'_>) -> Vec<(usize, usize, String)> {
        let mut found = Vec::new();

        for pattern in self.library.category_patterns() {
            if STRUCTURED_LABELS.contains(&pattern.label.as_str()) {
                continue;
            }
            for matched in pattern.regex.find_iter(doc.text()) {
                if matched.as_str().is_empty() {
                    continue;
                }
                let (start, end) = doc.char_span(matched.start(), matched.end());
                found.push((start, end, pattern.label.clone()));
            }
        }

        // Leftmost first, longest first among equal starts
        found.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
        found
    }
}

impl SpanExtractor for PatternExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Pattern
    }

    fn extract(
        &self,
        doc: &Document<'_>,
        accepted: &SpanSet,
        vault: &mut HashVault,
    ) -> Vec<CandidateSpan> {
        let mut claimed = accepted.clone();
        let mut spans = Vec::new();

        for (start, end, label) in self.matches(doc) {
            if !claimed.claim(start, end) {
                continue;
            }
            tracing::trace!(label = %label, start, end, "Category match");
            let token = vault.hash(doc.slice(start, end));
            spans.push(CandidateSpan::new(start, end, token, self.kind()));
        }

        spans
    }
}
