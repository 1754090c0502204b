//! Department name extractor

use super::{Document, PatternLibrary, SpanExtractor};
use crate::anonymization::anonymizer::HashVault;
use crate::anonymization::models::{CandidateSpan, ExtractorKind, SpanSet};

/// Matches generated `[prefix]core suffix` department names, longest first
#[derive(Debug, Clone)]
pub struct DepartmentExtractor {
    names: Vec<String>,
}

impl DepartmentExtractor {
    /// Create a new extractor from the library's department vocabulary
    pub fn new(library: &PatternLibrary) -> Self {
        Self {
            names: library.department_names().to_vec(),
        }
    }

    /// Non-overlapping name matches in code points
    pub fn find_names(&self, doc: &Document<'_>, accepted: &SpanSet) -> Vec<(usize, usize)> {
        let mut claimed = accepted.clone();
        let mut found = Vec::new();

        for name in &self.names {
            for (byte_start, matched) in doc.text().match_indices(name.as_str()) {
                let (start, end) = doc.char_span(byte_start, byte_start + matched.len());
                if claimed.claim(start, end) {
                    found.push((start, end));
                }
            }
        }

        found.sort_unstable();
        found
    }
}

impl SpanExtractor for DepartmentExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Department
    }

    fn extract(
        &self,
        doc: &Document<'_>,
        accepted: &SpanSet,
        vault: &mut HashVault,
    ) -> Vec<CandidateSpan> {
        self.find_names(doc, accepted)
            .into_iter()
            .map(|(start, end)| {
                let token = vault.hash(doc.slice(start, end));
                CandidateSpan::new(start, end, token, self.kind())
            })
            .collect()
    }
}
