//! Technology stack extractor
//!
//! Compound names are scanned first, then single terms, each list longest
//! first. Matching is case-insensitive and bounded by ASCII word
//! characters only, so a term directly followed by Japanese text
//! (`Pythonで`) still matches while `Gopher` does not match `Go`.

use super::{Document, PatternLibrary, SpanExtractor};
use crate::anonymization::anonymizer::HashVault;
use crate::anonymization::models::{CandidateSpan, ExtractorKind, SpanSet};
use crate::domain::Result;
use fancy_regex::Regex;

/// Technology stack extractor
#[derive(Debug, Clone)]
pub struct TechStackExtractor {
    /// Compound patterns followed by single-term patterns
    patterns: Vec<Regex>,
}

impl TechStackExtractor {
    /// Compile the library's technology vocabulary
    pub fn new(library: &PatternLibrary) -> Result<Self> {
        let patterns = library
            .compound_tech()
            .iter()
            .chain(library.tech_terms())
            .map(|source| bounded(source))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Non-overlapping term matches in code points, in discovery order
    pub fn find_terms(&self, doc: &Document<'_>, accepted: &SpanSet) -> Vec<(usize, usize)> {
        let mut claimed = accepted.clone();
        let mut found = Vec::new();

        for pattern in &self.patterns {
            for matched in pattern.find_iter(doc.text()) {
                let matched = match matched {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::debug!(error = %e, "Technology pattern backtrack limit hit");
                        break;
                    }
                };
                let (start, end) = doc.char_span(matched.start(), matched.end());
                if start < end && claimed.claim(start, end) {
                    found.push((start, end));
                }
            }
        }

        found
    }
}

impl SpanExtractor for TechStackExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::TechStack
    }

    fn extract(
        &self,
        doc: &Document<'_>,
        accepted: &SpanSet,
        vault: &mut HashVault,
    ) -> Vec<CandidateSpan> {
        let mut found = self.find_terms(doc, accepted);
        found.sort_unstable();

        found
            .into_iter()
            .map(|(start, end)| {
                let token = vault.hash(doc.slice(start, end));
                CandidateSpan::new(start, end, token, self.kind())
            })
            .collect()
    }
}

fn bounded(source: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"(?i)(?<![A-Za-z0-9_])(?:{source})(?![A-Za-z0-9_])"
    ))?)
}
