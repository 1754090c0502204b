//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that runs the span
//! detection cascade over one document at a time, resolves conflicts,
//! substitutes tokens and reverses them again.
//!
//! # Architecture
//!
//! The engine coordinates four components:
//! - **Annotator**: tokens, entity spans and noun chunks from an NLP collaborator
//! - **Extractor passes**: one [`SpanExtractor`] per configured [`ExtractorKind`]
//! - **Hash vault**: deterministic plaintext/token mapping used for decoding
//! - **Learning store**: literals learned from earlier documents
//!
//! # Examples
//!
//! ```no_run
//! use hitoku::anonymization::{AnonymizationEngine, AnonymizationConfig};
//! use hitoku::anonymization::annotator::LexiconAnnotator;
//!
//! # fn example() -> hitoku::Result<()> {
//! let annotator = LexiconAnnotator::new([("山田太郎社長", "PERSON")]);
//! let mut engine = AnonymizationEngine::new(AnonymizationConfig::default(), Box::new(annotator))?;
//!
//! let anonymized = engine.anonymize("山田太郎社長の電話：03-1234-5678")?;
//! assert!(anonymized.contains("社長"));
//! assert_eq!(engine.decode(&anonymized), "山田太郎社長の電話：03-1234-5678");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    annotator::{Annotation, Annotator},
    anonymizer::{apply_spans, decode_tokens, redaction::count_tokens, resolve, HashVault},
    config::AnonymizationConfig,
    detector::{
        AddressSplitter, DepartmentExtractor, Document, IdentifierExtractor,
        LearnedChunkExtractor, MoneyExtractor, NlpEntityExtractor, PatternExtractor,
        PatternLibrary, ProjectExtractor, SpanExtractor, TechStackExtractor, TitleSuffixSplitter,
    },
    learning::LearningStore,
    models::{AnonymizedText, ExtractorKind, SpanSet},
    report::{CacheSizes, Statistics},
};
use crate::domain::{HitokuError, Result};
use crate::{log_error_with_context, log_pass_complete};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

/// Main anonymization engine
///
/// Owns the mutable state shared by sequential calls: the hash vault and
/// the learning store. Every mutating operation takes `&mut self`, so a
/// single engine is used by one caller at a time; concurrent workers each
/// get their own engine.
///
/// # Examples
///
/// ```no_run
/// use hitoku::anonymization::{AnonymizationEngine, AnonymizationConfig};
/// use hitoku::anonymization::annotator::LexiconAnnotator;
/// use hitoku::anonymization::models::ExtractorKind;
///
/// # fn example() -> hitoku::Result<()> {
/// let mut config = AnonymizationConfig::default();
/// config.pass_order = vec![ExtractorKind::Pattern, ExtractorKind::Money];
///
/// let engine = AnonymizationEngine::new(config, Box::new(LexiconAnnotator::default()))?;
/// assert_eq!(engine.pass_order().len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    annotator: Box<dyn Annotator>,
    library: Arc<PatternLibrary>,
    passes: Vec<Box<dyn SpanExtractor>>,
    target_labels: HashSet<String>,
    tech: TechStackExtractor,
    departments: DepartmentExtractor,
    projects: ProjectExtractor,
    vault: HashVault,
    store: LearningStore,
}

impl AnonymizationEngine {
    /// Create a new anonymization engine
    ///
    /// Validates the configuration, compiles the pattern library (the
    /// built-in one, extended by `pattern_library` when set) and builds one
    /// extractor per entry of `pass_order`.
    ///
    /// # Arguments
    ///
    /// * `config` - Anonymization configuration
    /// * `annotator` - NLP collaborator used by `learn` and `anonymize`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - The pattern library cannot be read or contains an invalid regex
    pub fn new(config: AnonymizationConfig, annotator: Box<dyn Annotator>) -> Result<Self> {
        Self::with_vault(config, annotator, HashVault::new())
    }

    /// Create an engine around an existing vault, e.g. one with a custom digest
    pub fn with_vault(
        config: AnonymizationConfig,
        annotator: Box<dyn Annotator>,
        vault: HashVault,
    ) -> Result<Self> {
        config.validate().map_err(|e| {
            HitokuError::Configuration(format!("Invalid anonymization configuration: {e:#}"))
        })?;

        let library = match config.pattern_library {
            Some(ref path) => PatternLibrary::with_overlay(path)?,
            None => PatternLibrary::default_library()?,
        };
        let library = Arc::new(library);

        let passes = config
            .pass_order
            .iter()
            .map(|&kind| build_pass(kind, &library, &config))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            passes = ?config.pass_order,
            target_labels = config.target_labels.len(),
            dry_run = config.dry_run,
            "Anonymization engine created"
        );

        Ok(Self {
            target_labels: config.target_labels.iter().cloned().collect(),
            tech: TechStackExtractor::new(&library)?,
            departments: DepartmentExtractor::new(&library),
            projects: ProjectExtractor::new(&library),
            store: LearningStore::new(config.context_window),
            config,
            annotator,
            library,
            passes,
            vault,
        })
    }

    /// Learn sensitive literals from a document without anonymizing it
    ///
    /// Records every annotated entity with a target label (with root-token
    /// features and context), every regex category match, technology term,
    /// department and project name, and each `known` literal whose
    /// occurrence lines up with token boundaries. Later `anonymize` calls
    /// redact noun chunks whose text was learned here.
    ///
    /// # Errors
    ///
    /// Returns [`HitokuError::Validation`] if a `known` entry has an empty
    /// label, or [`HitokuError::Annotation`] if the annotator fails.
    pub fn learn(&mut self, text: &str, known: Option<&HashMap<String, String>>) -> Result<()> {
        let unlabeled = known
            .into_iter()
            .flatten()
            .filter(|(_, label)| label.trim().is_empty())
            .count();
        if unlabeled > 0 {
            return Err(HitokuError::Validation(format!(
                "{unlabeled} known entities have an empty label"
            )));
        }

        let start = Instant::now();
        let annotation = self.annotate(text)?;
        let doc = Document::new(text);
        let before = self.store.known_len();

        for entity in &annotation.entities {
            if !self.target_labels.contains(&entity.label) {
                continue;
            }
            if entity.start_char >= entity.end_char || entity.end_char > doc.char_len() {
                continue;
            }
            let entity_text = doc.slice(entity.start_char, entity.end_char);
            self.store.record_entity(
                &annotation,
                entity.start_token,
                entity.end_token,
                entity.root,
                entity_text,
                &entity.label,
            );
        }

        for pattern in self.library.category_patterns() {
            for matched in pattern.regex.find_iter(text) {
                self.store.add_known(matched.as_str());
            }
        }

        let unclaimed = SpanSet::new();
        let discovered = self
            .tech
            .find_terms(&doc, &unclaimed)
            .into_iter()
            .chain(self.departments.find_names(&doc, &unclaimed))
            .chain(self.projects.find_projects(&doc, &unclaimed));
        for (span_start, span_end) in discovered {
            self.store.add_known(doc.slice(span_start, span_end));
        }

        if let Some(known) = known {
            self.learn_known(&doc, &annotation, known);
        }

        tracing::info!(
            learned = self.store.known_len() - before,
            known_total = self.store.known_len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Learned from document"
        );

        Ok(())
    }

    /// Record caller-supplied literals that align with token boundaries
    fn learn_known(
        &mut self,
        doc: &Document<'_>,
        annotation: &Annotation,
        known: &HashMap<String, String>,
    ) {
        let mut literals: Vec<(&String, &String)> = known.iter().collect();
        literals.sort();

        for (literal, label) in literals {
            if literal.is_empty() {
                continue;
            }
            for (byte_start, matched) in doc.text().match_indices(literal.as_str()) {
                let (start, end) = doc.char_span(byte_start, byte_start + matched.len());
                let Some((start_token, end_token)) = annotation.char_span(start, end) else {
                    tracing::debug!(start, end, "Known literal does not align with tokens");
                    continue;
                };
                let root = annotation
                    .root_of(start_token, end_token)
                    .unwrap_or(end_token - 1);
                self.store
                    .record_entity(annotation, start_token, end_token, root, literal, label);
            }
        }
    }

    /// Anonymize a document, returning only the text
    ///
    /// # Errors
    ///
    /// Returns [`HitokuError::Annotation`] if the annotator fails.
    pub fn anonymize(&mut self, text: &str) -> Result<String> {
        self.anonymize_with_report(text).map(|result| result.text)
    }

    /// Anonymize a document and report the accepted spans
    ///
    /// # Behavior
    ///
    /// 1. Annotates the document once
    /// 2. Runs every pass in `pass_order`; each pass skips spans overlapping
    ///    spans proposed by earlier passes
    /// 3. Resolves the pooled candidates to a non-overlapping set
    /// 4. Substitutes back to front, unless in dry-run mode
    ///
    /// In dry-run mode the returned text is the input unchanged, but the
    /// tokens of the reported spans are still recorded in the vault.
    ///
    /// # Errors
    ///
    /// Returns [`HitokuError::Annotation`] if the annotator fails.
    pub fn anonymize_with_report(&mut self, text: &str) -> Result<AnonymizedText> {
        let start = Instant::now();
        let annotation = self.annotate(text)?;
        let doc = Document::new(text)
            .with_annotation(&annotation)
            .with_known_texts(self.store.known_texts());

        let mut accepted = SpanSet::new();
        let mut pool = Vec::new();

        for pass in &self.passes {
            let pass_start = Instant::now();
            let spans = pass.extract(&doc, &accepted, &mut self.vault);
            for span in &spans {
                accepted.insert(span.start, span.end);
            }
            log_pass_complete!(pass.kind(), spans.len(), pass_start.elapsed());
            pool.extend(spans);
        }

        let candidates = pool.len();
        let spans = resolve(pool);
        let output = if self.config.dry_run {
            text.to_string()
        } else {
            apply_spans(text, &spans)
        };

        let processing_time = start.elapsed().as_millis() as u64;
        tracing::info!(
            chars = doc.char_len(),
            candidates,
            accepted = spans.len(),
            dry_run = self.config.dry_run,
            duration_ms = processing_time,
            "Document anonymized"
        );

        Ok(AnonymizedText::new(
            output,
            spans,
            self.config.dry_run,
            processing_time,
        ))
    }

    /// Restore every token this engine issued; unknown tokens stay verbatim
    pub fn decode(&self, text: &str) -> String {
        let decoded = decode_tokens(text, &self.vault);
        tracing::info!(
            tokens = count_tokens(text),
            remaining = count_tokens(&decoded),
            "Document decoded"
        );
        decoded
    }

    /// Snapshot of the vault and learning store
    pub fn statistics(&self) -> Statistics {
        Statistics {
            total_entities: self.vault.len(),
            unique_hashes: self.vault.unique_tokens(),
            learned_patterns: self.store.pattern_counts(),
            learned_entities: self.store.known_len(),
            entity_types: self.config.target_labels.clone(),
            cache_size: CacheSizes {
                hash_cache: self.vault.len(),
                reverse_cache: self.vault.reverse_len(),
                entity_texts: self.store.known_len(),
            },
        }
    }

    /// Learned entity texts grouped by label
    pub fn entity_mapping(&self) -> BTreeMap<String, Vec<String>> {
        self.store.entity_mapping()
    }

    /// Forget every token and everything learned
    ///
    /// Tokens issued before the call can no longer be decoded.
    pub fn clear_cache(&mut self) {
        self.vault.clear();
        self.store.clear();
        tracing::info!("Anonymization caches cleared");
    }

    /// Check if in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Configured pass order
    pub fn pass_order(&self) -> &[ExtractorKind] {
        &self.config.pass_order
    }

    /// Active configuration
    pub fn config(&self) -> &AnonymizationConfig {
        &self.config
    }

    /// Hash vault
    pub fn vault(&self) -> &HashVault {
        &self.vault
    }

    /// Learning store
    pub fn learning_store(&self) -> &LearningStore {
        &self.store
    }

    fn annotate(&self, text: &str) -> Result<Annotation> {
        self.annotator.annotate(text).map_err(|e| {
            let error = HitokuError::annotation(e);
            log_error_with_context!(&error, "Failed to annotate document");
            error
        })
    }
}

/// Build the extractor for one pass
fn build_pass(
    kind: ExtractorKind,
    library: &Arc<PatternLibrary>,
    config: &AnonymizationConfig,
) -> Result<Box<dyn SpanExtractor>> {
    let pass: Box<dyn SpanExtractor> = match kind {
        ExtractorKind::Identifier => Box::new(IdentifierExtractor::new()?),
        ExtractorKind::Pattern => Box::new(PatternExtractor::new(Arc::clone(library))),
        ExtractorKind::Money => Box::new(MoneyExtractor::new()?),
        ExtractorKind::TechStack => Box::new(TechStackExtractor::new(library)?),
        ExtractorKind::Department => Box::new(DepartmentExtractor::new(library)),
        ExtractorKind::Project => Box::new(ProjectExtractor::new(library)),
        ExtractorKind::Address => Box::new(AddressSplitter::new(library)),
        ExtractorKind::TitleSuffix => Box::new(TitleSuffixSplitter::new(library)),
        ExtractorKind::NlpEntity => Box::new(NlpEntityExtractor::new(
            config.target_labels.iter().cloned(),
            config.address_labels.iter().cloned(),
            AddressSplitter::new(library),
            TitleSuffixSplitter::new(library),
        )),
        ExtractorKind::LearnedChunk => {
            Box::new(LearnedChunkExtractor::new(TitleSuffixSplitter::new(library)))
        }
    };
    Ok(pass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::annotator::LexiconAnnotator;

    struct FailingAnnotator;

    impl Annotator for FailingAnnotator {
        fn annotate(&self, _text: &str) -> anyhow::Result<Annotation> {
            Err(anyhow::anyhow!("model not loaded"))
        }
    }

    fn engine() -> AnonymizationEngine {
        AnonymizationEngine::new(
            AnonymizationConfig::default(),
            Box::new(LexiconAnnotator::default()),
        )
        .unwrap()
    }

    #[test]
    fn test_engine_creation() {
        let engine = engine();
        assert_eq!(engine.pass_order(), ExtractorKind::default_order().as_slice());
        assert!(!engine.is_dry_run());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnonymizationConfig {
            pass_order: Vec::new(),
            ..Default::default()
        };
        let result = AnonymizationEngine::new(config, Box::new(LexiconAnnotator::default()));
        assert!(matches!(result, Err(HitokuError::Configuration(_))));
    }

    #[test]
    fn test_phone_becomes_single_token() {
        let mut engine = engine();
        let anonymized = engine.anonymize("電話：03-1234-5678").unwrap();

        assert!(anonymized.starts_with("電話：<<"));
        assert_eq!(count_tokens(&anonymized), 1);
        assert_eq!(anonymized.chars().count(), 3 + 12);
        assert_eq!(engine.decode(&anonymized), "電話：03-1234-5678");
    }

    #[test]
    fn test_dry_run_mode() {
        let config = AnonymizationConfig {
            dry_run: true,
            ..Default::default()
        };
        let mut engine =
            AnonymizationEngine::new(config, Box::new(LexiconAnnotator::default())).unwrap();

        let result = engine.anonymize_with_report("技術開発部").unwrap();
        assert!(result.dry_run);
        assert_eq!(result.text, "技術開発部");
        assert_eq!(result.stats_by_kind[&ExtractorKind::Department], 1);
    }

    #[test]
    fn test_annotation_failure_propagates() {
        let mut engine = AnonymizationEngine::new(
            AnonymizationConfig::default(),
            Box::new(FailingAnnotator),
        )
        .unwrap();

        let err = engine.anonymize("山田").unwrap_err();
        assert!(matches!(err, HitokuError::Annotation(ref msg) if msg.contains("model not loaded")));
        assert!(engine.learn("山田", None).is_err());
    }

    #[test]
    fn test_learn_rejects_empty_known_label() {
        let mut engine = engine();
        let known = HashMap::from([
            ("佐藤花子".to_string(), "PERSON".to_string()),
            ("CloudHub-X".to_string(), " ".to_string()),
        ]);

        let err = engine.learn("佐藤花子がCloudHub-Xを担当", Some(&known)).unwrap_err();
        assert!(matches!(err, HitokuError::Validation(ref msg) if !msg.contains("CloudHub-X")));
        assert_eq!(engine.learning_store().known_len(), 0);
    }

    #[test]
    fn test_clear_cache_forgets_tokens() {
        let mut engine = engine();
        let anonymized = engine.anonymize("技術開発部").unwrap();
        assert_eq!(engine.statistics().total_entities, 1);

        engine.clear_cache();
        assert_eq!(engine.statistics().total_entities, 0);
        assert_eq!(engine.decode(&anonymized), anonymized);
    }
}
