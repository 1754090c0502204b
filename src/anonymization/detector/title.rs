//! Title and honorific suffix splitting

use super::{Document, PatternLibrary, SpanExtractor};
use crate::anonymization::anonymizer::HashVault;
use crate::anonymization::models::{CandidateSpan, ExtractorKind, SpanSet};

/// Outcome of testing an entity text for a trailing title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleSplit<'a> {
    /// Whether a title variant was found
    pub matched: bool,
    /// Text to hash
    pub base: &'a str,
    /// Literal suffix kept in the output
    pub suffix: &'a str,
}

impl<'a> TitleSplit<'a> {
    /// Replacement text: hashed base followed by the literal suffix
    pub fn replacement(&self, vault: &mut HashVault) -> String {
        let mut replacement = vault.hash(self.base);
        replacement.push_str(self.suffix);
        replacement
    }
}

/// Splits a trailing title, honorific or role word off an entity text
#[derive(Debug, Clone)]
pub struct TitleSuffixSplitter {
    /// Variants (plain, parenthesized, comma-suffixed ASCII), longest first
    variants: Vec<String>,
}

impl TitleSuffixSplitter {
    /// Create a new splitter from the library's title variants
    pub fn new(library: &PatternLibrary) -> Self {
        Self {
            variants: library.title_suffixes().to_vec(),
        }
    }

    /// Split `text` at the longest trailing title variant
    ///
    /// A variant covering the whole text is not a match, since it would
    /// leave nothing to hash.
    pub fn split<'a>(&self, text: &'a str) -> TitleSplit<'a> {
        for variant in &self.variants {
            if text.len() > variant.len() && text.ends_with(variant.as_str()) {
                let cut = text.len() - variant.len();
                return TitleSplit {
                    matched: true,
                    base: &text[..cut],
                    suffix: &text[cut..],
                };
            }
        }

        TitleSplit {
            matched: false,
            base: text,
            suffix: "",
        }
    }
}

impl SpanExtractor for TitleSuffixSplitter {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::TitleSuffix
    }

    fn extract(
        &self,
        doc: &Document<'_>,
        accepted: &SpanSet,
        vault: &mut HashVault,
    ) -> Vec<CandidateSpan> {
        let end = doc.char_len();
        let split = self.split(doc.text());
        if !split.matched || !accepted.is_available(0, end) {
            return Vec::new();
        }

        vec![CandidateSpan::new(0, end, split.replacement(vault), self.kind())]
    }
}
