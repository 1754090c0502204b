//! Identifier and license number extractor
//!
//! Matches `(第)?digits(号)?` with at least five digits. Only the digit
//! run is hashed; `第` and `号` stay literal around the token.

use super::{Document, SpanExtractor};
use crate::anonymization::anonymizer::HashVault;
use crate::anonymization::models::{CandidateSpan, ExtractorKind, SpanSet};
use crate::domain::Result;
use regex::Regex;

const IDENTIFIER_PATTERN: &str = r"(?P<prefix>第)?(?P<number>\d{5,})(?P<suffix>号)?";

/// Numeric identifier extractor
#[derive(Debug, Clone)]
pub struct IdentifierExtractor {
    pattern: Regex,
}

impl IdentifierExtractor {
    /// Create a new identifier extractor
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(IDENTIFIER_PATTERN)?,
        })
    }
}

impl SpanExtractor for IdentifierExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Identifier
    }

    fn extract(
        &self,
        doc: &Document<'_>,
        accepted: &SpanSet,
        vault: &mut HashVault,
    ) -> Vec<CandidateSpan> {
        let mut claimed = accepted.clone();
        let mut spans = Vec::new();

        for caps in self.pattern.captures_iter(doc.text()) {
            let Some(whole) = caps.get(0) else { continue };
            let (start, end) = doc.char_span(whole.start(), whole.end());
            if !claimed.claim(start, end) {
                continue;
            }

            let mut replacement = String::new();
            if let Some(prefix) = caps.name("prefix") {
                replacement.push_str(prefix.as_str());
            }
            if let Some(number) = caps.name("number") {
                replacement.push_str(&vault.hash(number.as_str()));
            }
            if let Some(suffix) = caps.name("suffix") {
                replacement.push_str(suffix.as_str());
            }

            spans.push(CandidateSpan::new(start, end, replacement, self.kind()));
        }

        spans
    }
}
