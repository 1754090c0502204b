//! Annotator entity pass
//!
//! Redacts the entities the annotation collaborator recognized with a
//! target label. A trailing title is split off and kept literal; address
//! entities that contain a unit word are decomposed into fragments.

use super::{AddressSplitter, Document, SpanExtractor, TitleSuffixSplitter};
use crate::anonymization::anonymizer::HashVault;
use crate::anonymization::models::{CandidateSpan, ExtractorKind, SpanSet};
use std::collections::HashSet;

/// Entity pass over the document's annotation
#[derive(Debug, Clone)]
pub struct NlpEntityExtractor {
    target_labels: HashSet<String>,
    address_labels: HashSet<String>,
    address: AddressSplitter,
    titles: TitleSuffixSplitter,
}

impl NlpEntityExtractor {
    /// Create a new entity pass
    pub fn new<T, A>(
        target_labels: T,
        address_labels: A,
        address: AddressSplitter,
        titles: TitleSuffixSplitter,
    ) -> Self
    where
        T: IntoIterator<Item = String>,
        A: IntoIterator<Item = String>,
    {
        Self {
            target_labels: target_labels.into_iter().collect(),
            address_labels: address_labels.into_iter().collect(),
            address,
            titles,
        }
    }

    /// Whether entities with this label are redacted
    pub fn is_target(&self, label: &str) -> bool {
        self.target_labels.contains(label)
    }
}

impl SpanExtractor for NlpEntityExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::NlpEntity
    }

    fn extract(
        &self,
        doc: &Document<'_>,
        accepted: &SpanSet,
        vault: &mut HashVault,
    ) -> Vec<CandidateSpan> {
        let Some(annotation) = doc.annotation() else {
            return Vec::new();
        };

        let mut claimed = accepted.clone();
        let mut spans = Vec::new();

        for entity in &annotation.entities {
            if !self.is_target(&entity.label) {
                continue;
            }
            let (start, end) = (entity.start_char, entity.end_char);
            if start >= end || end > doc.char_len() || !claimed.claim(start, end) {
                continue;
            }

            let text = doc.slice(start, end);
            let split = self.titles.split(text);

            if self.address_labels.contains(&entity.label) && self.address.contains_unit(text) {
                for (frag_start, frag_end, token) in self.address.split(split.base, vault) {
                    spans.push(CandidateSpan::new(
                        start + frag_start,
                        start + frag_end,
                        token,
                        self.kind(),
                    ));
                }
            } else {
                spans.push(CandidateSpan::new(
                    start,
                    end,
                    split.replacement(vault),
                    self.kind(),
                ));
            }
        }

        spans.sort_by_key(|span| span.start);
        spans
    }
}
