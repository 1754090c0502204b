//! Annotation collaborator interface
//!
//! Tokenization, part-of-speech tags, entity spans and noun chunks come
//! from an external NLP engine. The pipeline only depends on the
//! [`Annotator`] trait; [`LexiconAnnotator`] is a dictionary-driven
//! implementation that needs no model.
//!
//! All offsets are code-point offsets into the annotated text.

pub mod lexicon;

pub use lexicon::LexiconAnnotator;

use serde::{Deserialize, Serialize};

/// Trait for annotation engine implementations
pub trait Annotator: Send + Sync {
    /// Annotate one document
    ///
    /// Errors are opaque to the pipeline and are propagated to the caller.
    fn annotate(&self, text: &str) -> anyhow::Result<Annotation>;
}

/// A single token with morphological features
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text
    pub text: String,
    /// Code-point offset of the first character
    pub idx: usize,
    /// Coarse part of speech (NOUN, PROPN, ...)
    pub pos: String,
    /// Fine-grained tag
    pub tag: String,
    /// Dependency relation to the head
    pub dep: String,
    /// Orthographic shape (Xxxxx, dddd, ...)
    pub shape: String,
    /// Index of the syntactic head; equals the token's own index for roots
    pub head: usize,
}

impl Token {
    /// Code-point offset one past the last character
    pub fn end(&self) -> usize {
        self.idx + self.text.chars().count()
    }
}

/// A labelled entity span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Start offset (inclusive)
    pub start_char: usize,
    /// End offset (exclusive)
    pub end_char: usize,
    /// Index of the first token
    pub start_token: usize,
    /// Index one past the last token
    pub end_token: usize,
    /// Entity label (ORG, PERSON, GPE, ...)
    pub label: String,
    /// Index of the root token
    pub root: usize,
}

/// A base noun phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NounChunk {
    /// Start offset (inclusive)
    pub start_char: usize,
    /// End offset (exclusive)
    pub end_char: usize,
    /// Chunk text
    pub text: String,
}

/// Everything the annotation engine reports for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Tokens in document order
    pub tokens: Vec<Token>,
    /// Entity spans in document order
    pub entities: Vec<EntitySpan>,
    /// Noun chunks in document order
    pub noun_chunks: Vec<NounChunk>,
}

impl Annotation {
    /// Token index range exactly covering `[start_char, end_char)`, if token boundaries align
    pub fn char_span(&self, start_char: usize, end_char: usize) -> Option<(usize, usize)> {
        let first = self.tokens.iter().position(|t| t.idx == start_char)?;
        let last = self.tokens.iter().position(|t| t.end() == end_char)?;
        (first <= last).then_some((first, last + 1))
    }

    /// Root token of a token range: the first token whose head lies outside it
    pub fn root_of(&self, start_token: usize, end_token: usize) -> Option<usize> {
        let end_token = end_token.min(self.tokens.len());
        if start_token >= end_token {
            return None;
        }
        (start_token..end_token)
            .find(|&i| {
                let head = self.tokens[i].head;
                head == i || head < start_token || head >= end_token
            })
            .or(Some(end_token - 1))
    }

    /// Texts of up to `window` tokens on each side of a token range
    pub fn context(&self, start_token: usize, end_token: usize, window: usize) -> Vec<String> {
        let start = start_token.saturating_sub(window);
        let end = (end_token + window).min(self.tokens.len());
        (start..end)
            .filter(|&i| i < start_token || i >= end_token)
            .map(|i| self.tokens[i].text.clone())
            .collect()
    }
}
