//! Project name extractor
//!
//! Templates are evaluated in library order, so bracketed and quoted
//! forms claim their span before the bare `Project X` templates see it.

use super::{Document, PatternLibrary, SpanExtractor};
use crate::anonymization::anonymizer::HashVault;
use crate::anonymization::models::{CandidateSpan, ExtractorKind, SpanSet};
use regex::Regex;

/// Project name extractor
#[derive(Debug, Clone)]
pub struct ProjectExtractor {
    templates: Vec<Regex>,
}

impl ProjectExtractor {
    /// Create a new extractor from the library's project templates
    pub fn new(library: &PatternLibrary) -> Self {
        Self {
            templates: library.project_templates().to_vec(),
        }
    }

    /// Non-overlapping template matches in code points
    pub fn find_projects(&self, doc: &Document<'_>, accepted: &SpanSet) -> Vec<(usize, usize)> {
        let mut claimed = accepted.clone();
        let mut found = Vec::new();

        for template in &self.templates {
            for matched in template.find_iter(doc.text()) {
                let (start, end) = doc.char_span(matched.start(), matched.end());
                if start < end && claimed.claim(start, end) {
                    found.push((start, end));
                }
            }
        }

        found.sort_unstable();
        found
    }
}

impl SpanExtractor for ProjectExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Project
    }

    fn extract(
        &self,
        doc: &Document<'_>,
        accepted: &SpanSet,
        vault: &mut HashVault,
    ) -> Vec<CandidateSpan> {
        self.find_projects(doc, accepted)
            .into_iter()
            .map(|(start, end)| {
                let token = vault.hash(doc.slice(start, end));
                CandidateSpan::new(start, end, token, self.kind())
            })
            .collect()
    }
}
