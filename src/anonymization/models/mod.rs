//! Data models shared by the extractors, resolver and pipeline

pub mod pattern;
pub mod span;

pub use pattern::EntityPattern;
pub use span::{AnonymizedText, CandidateSpan, ExtractorKind, SpanSet};
