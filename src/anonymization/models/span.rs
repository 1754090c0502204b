//! Span data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The extractor variants that can propose candidate spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Numeric identifiers and license numbers (`第12345号`)
    Identifier,
    /// Regex categories: email, phone, URL, date, time, percent, duration
    Pattern,
    /// Money amounts with format-preserving separators
    Money,
    /// Programming languages, frameworks, vendors and protocols
    TechStack,
    /// Department names built from prefix/core/suffix vocabularies
    Department,
    /// Project names in brackets, quotes or bare templates
    Project,
    /// Address decomposition into administrative fragments
    Address,
    /// Entity text with a literal title or honorific suffix
    TitleSuffix,
    /// Entities recognized by the annotation collaborator
    NlpEntity,
    /// Noun chunks whose text was learned from earlier documents
    LearnedChunk,
}

impl ExtractorKind {
    /// Get the configuration name of the extractor
    pub fn label(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Pattern => "pattern",
            Self::Money => "money",
            Self::TechStack => "tech_stack",
            Self::Department => "department",
            Self::Project => "project",
            Self::Address => "address",
            Self::TitleSuffix => "title_suffix",
            Self::NlpEntity => "nlp_entity",
            Self::LearnedChunk => "learned_chunk",
        }
    }

    /// Default pass priority used by the pipeline
    pub fn default_order() -> Vec<ExtractorKind> {
        vec![
            Self::Identifier,
            Self::Pattern,
            Self::Money,
            Self::TechStack,
            Self::Department,
            Self::Project,
            Self::NlpEntity,
            Self::LearnedChunk,
        ]
    }
}

impl FromStr for ExtractorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identifier" => Ok(Self::Identifier),
            "pattern" => Ok(Self::Pattern),
            "money" => Ok(Self::Money),
            "tech_stack" => Ok(Self::TechStack),
            "department" => Ok(Self::Department),
            "project" => Ok(Self::Project),
            "address" => Ok(Self::Address),
            "title_suffix" => Ok(Self::TitleSuffix),
            "nlp_entity" => Ok(Self::NlpEntity),
            "learned_chunk" => Ok(Self::LearnedChunk),
            other => Err(format!("Unknown extractor '{other}'")),
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A proposed replacement over code-point offsets `[start, end)` of the original document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSpan {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Ready-made replacement text
    pub replacement: String,
    /// Extractor that proposed the span
    pub kind: ExtractorKind,
}

impl CandidateSpan {
    /// Create a new candidate span
    pub fn new(start: usize, end: usize, replacement: impl Into<String>, kind: ExtractorKind) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
            kind,
        }
    }

    /// Length in code points
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no characters
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether two half-open spans share at least one position
    pub fn overlaps(&self, other: &CandidateSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Set of occupied `[start, end)` ranges used for overlap checks
#[derive(Debug, Clone, Default)]
pub struct SpanSet {
    ranges: Vec<(usize, usize)>,
}

impl SpanSet {
    /// Create an empty span set
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `[start, end)` does not overlap any recorded range
    pub fn is_available(&self, start: usize, end: usize) -> bool {
        self.ranges.iter().all(|&(s, e)| end <= s || start >= e)
    }

    /// Record a range as occupied
    pub fn insert(&mut self, start: usize, end: usize) {
        self.ranges.push((start, end));
    }

    /// Record the range only if it is available; returns whether it was recorded
    pub fn claim(&mut self, start: usize, end: usize) -> bool {
        if self.is_available(start, end) {
            self.insert(start, end);
            true
        } else {
            false
        }
    }

    /// Number of recorded ranges
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether no range has been recorded
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Result of anonymizing one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizedText {
    /// Anonymized text (the input unchanged in dry-run mode)
    pub text: String,
    /// Accepted spans, ordered descending by start
    pub spans: Vec<CandidateSpan>,
    /// Whether the spans were only detected, not applied
    pub dry_run: bool,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of anonymization
    pub timestamp: DateTime<Utc>,
    /// Accepted span counts by extractor
    pub stats_by_kind: HashMap<ExtractorKind, usize>,
}

impl AnonymizedText {
    /// Create a new anonymization result
    pub fn new(text: String, spans: Vec<CandidateSpan>, dry_run: bool, processing_time_ms: u64) -> Self {
        let mut stats_by_kind = HashMap::new();
        for span in &spans {
            *stats_by_kind.entry(span.kind).or_insert(0) += 1;
        }

        Self {
            text,
            spans,
            dry_run,
            processing_time_ms,
            timestamp: Utc::now(),
            stats_by_kind,
        }
    }

    /// Get total number of accepted spans
    pub fn total_spans(&self) -> usize {
        self.spans.len()
    }

    /// Check if anything was redacted
    pub fn has_spans(&self) -> bool {
        !self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_set_overlap_rules() {
        let mut set = SpanSet::new();
        set.insert(5, 10);

        assert!(set.is_available(0, 5));
        assert!(set.is_available(10, 12));
        assert!(!set.is_available(4, 6));
        assert!(!set.is_available(9, 11));
        assert!(!set.is_available(6, 8));
        assert!(!set.is_available(0, 20));
    }

    #[test]
    fn test_span_set_claim() {
        let mut set = SpanSet::new();
        assert!(set.claim(0, 3));
        assert!(!set.claim(2, 4));
        assert!(set.claim(3, 4));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_stats_by_kind() {
        let spans = vec![
            CandidateSpan::new(0, 2, "<<00000000>>", ExtractorKind::Money),
            CandidateSpan::new(4, 6, "<<11111111>>", ExtractorKind::Money),
            CandidateSpan::new(8, 9, "<<22222222>>", ExtractorKind::Department),
        ];
        let result = AnonymizedText::new("text".to_string(), spans, false, 3);

        assert_eq!(result.total_spans(), 3);
        assert_eq!(result.stats_by_kind[&ExtractorKind::Money], 2);
        assert_eq!(result.stats_by_kind[&ExtractorKind::Department], 1);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ExtractorKind::TechStack).unwrap();
        assert_eq!(json, "\"tech_stack\"");
        let kind: ExtractorKind = serde_json::from_str("\"learned_chunk\"").unwrap();
        assert_eq!(kind, ExtractorKind::LearnedChunk);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(" Money ".parse::<ExtractorKind>(), Ok(ExtractorKind::Money));
        for kind in ExtractorKind::default_order() {
            assert_eq!(kind.label().parse::<ExtractorKind>(), Ok(kind));
        }
        assert!("ocr".parse::<ExtractorKind>().is_err());
    }
}
