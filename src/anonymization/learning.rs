//! Cross-document learning store
//!
//! Keeps the literals considered sensitive by earlier `learn` calls (the
//! known-text set consulted by the learned-chunk pass) together with the
//! labelled patterns and root-token features behind them. All state is in
//! memory and scoped to one engine.

use crate::anonymization::annotator::{Annotation, Token};
use crate::anonymization::models::EntityPattern;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

fn bracket_regex() -> &'static Regex {
    static BRACKET: OnceLock<Regex> = OnceLock::new();
    BRACKET.get_or_init(|| {
        Regex::new(r"^[\(［｢「].*?[\)］｣」]").expect("bracket pattern is a valid literal")
    })
}

/// Learned patterns by label plus the known-text set
#[derive(Debug, Clone, Default)]
pub struct LearningStore {
    learned: BTreeMap<String, Vec<EntityPattern>>,
    known_texts: HashSet<String>,
    context_window: usize,
}

impl LearningStore {
    /// Create an empty store recording `context_window` tokens on each side
    pub fn new(context_window: usize) -> Self {
        Self {
            context_window,
            ..Self::default()
        }
    }

    /// Record a labelled entity covering tokens `[start_token, end_token)`
    pub fn record_entity(
        &mut self,
        annotation: &Annotation,
        start_token: usize,
        end_token: usize,
        root: usize,
        text: &str,
        label: &str,
    ) {
        let Some(root_token) = annotation.tokens.get(root) else {
            return;
        };

        self.known_texts.insert(text.to_string());
        self.learned
            .entry(label.to_string())
            .or_default()
            .push(EntityPattern {
                text: text.to_string(),
                label: label.to_string(),
                pos: root_token.pos.clone(),
                features: token_features(root_token),
                context: annotation.context(start_token, end_token, self.context_window),
            });
    }

    /// Record an unlabelled literal
    pub fn add_known(&mut self, text: &str) {
        if !text.is_empty() {
            self.known_texts.insert(text.to_string());
        }
    }

    /// Every literal learned so far
    pub fn known_texts(&self) -> &HashSet<String> {
        &self.known_texts
    }

    /// Whether a literal was learned
    pub fn is_known(&self, text: &str) -> bool {
        self.known_texts.contains(text)
    }

    /// Learned patterns by label
    pub fn learned(&self) -> &BTreeMap<String, Vec<EntityPattern>> {
        &self.learned
    }

    /// Number of learned patterns per label
    pub fn pattern_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for pattern in self.learned.values().flatten() {
            *counts.entry(pattern.label.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Learned pattern texts per label, in learning order
    pub fn entity_mapping(&self) -> BTreeMap<String, Vec<String>> {
        let mut mapping: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for pattern in self.learned.values().flatten() {
            mapping
                .entry(pattern.label.clone())
                .or_default()
                .push(pattern.text.clone());
        }
        mapping
    }

    /// Number of known literals
    pub fn known_len(&self) -> usize {
        self.known_texts.len()
    }

    /// Forget everything learned
    pub fn clear(&mut self) {
        self.learned.clear();
        self.known_texts.clear();
    }
}

/// Morphological features of a token, as recorded on learned patterns
pub fn token_features(token: &Token) -> BTreeMap<String, String> {
    let text = token.text.as_str();
    let non_empty = !text.is_empty();

    let is_alpha = non_empty && text.chars().all(char::is_alphabetic);
    let is_digit = non_empty && text.chars().all(char::is_numeric);
    let like_num = non_empty
        && text.chars().any(char::is_numeric)
        && text
            .chars()
            .all(|c| c.is_numeric() || matches!(c, ',' | '.' | '，' | '．'));

    let features = [
        ("pos", token.pos.clone()),
        ("tag", token.tag.clone()),
        ("dep", token.dep.clone()),
        ("shape", token.shape.clone()),
        ("is_alpha", is_alpha.to_string()),
        ("is_ascii", text.is_ascii().to_string()),
        ("is_digit", is_digit.to_string()),
        ("like_num", like_num.to_string()),
        ("is_title", is_title(text).to_string()),
        ("is_bracket", bracket_regex().is_match(text).to_string()),
        ("has_number", text.chars().any(|c| c.is_ascii_digit()).to_string()),
        ("length", text.chars().count().to_string()),
    ];

    features
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Title case: every cased word starts uppercase and continues lowercase
fn is_title(text: &str) -> bool {
    let mut saw_cased = false;
    let mut previous_cased = false;

    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            saw_cased = true;
            previous_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            saw_cased = true;
            previous_cased = true;
        } else {
            previous_cased = false;
        }
    }

    saw_cased
}
