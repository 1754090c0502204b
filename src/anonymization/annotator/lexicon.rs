//! Dictionary-driven annotator
//!
//! Tokenizes by script runs (Kanji, Hiragana, Katakana, Latin, digits),
//! recognizes entities from a literal lexicon, and reports maximal runs of
//! contiguous content tokens as noun chunks.

use super::{Annotation, Annotator, EntitySpan, NounChunk, Token};
use crate::domain::{HitokuError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Kanji,
    Hiragana,
    Katakana,
    Latin,
    Digit,
    Space,
    Symbol,
}

impl Script {
    fn of(c: char) -> Self {
        match c {
            '\u{3041}'..='\u{309F}' => Script::Hiragana,
            '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
                Script::Katakana
            }
            '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '々' | '〆' => Script::Kanji,
            '0'..='9' | '０'..='９' => Script::Digit,
            c if c.is_whitespace() => Script::Space,
            c if c.is_alphabetic() => Script::Latin,
            _ => Script::Symbol,
        }
    }

    fn pos(self) -> &'static str {
        match self {
            Script::Kanji | Script::Katakana => "NOUN",
            Script::Latin => "PROPN",
            Script::Digit => "NUM",
            Script::Hiragana => "ADP",
            Script::Space => "SPACE",
            Script::Symbol => "PUNCT",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Script::Kanji => "kanji",
            Script::Hiragana => "hiragana",
            Script::Katakana => "katakana",
            Script::Latin => "latin",
            Script::Digit => "digit",
            Script::Space => "space",
            Script::Symbol => "symbol",
        }
    }

    fn is_content(self) -> bool {
        matches!(
            self,
            Script::Kanji | Script::Katakana | Script::Latin | Script::Digit
        )
    }
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Annotator backed by a literal `{text -> label}` lexicon
#[derive(Debug, Clone, Default)]
pub struct LexiconAnnotator {
    /// Entries sorted longest literal first
    entries: Vec<(Vec<char>, String)>,
}

impl LexiconAnnotator {
    /// Create an annotator from `(literal, label)` pairs
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries: Vec<(Vec<char>, String)> = entries
            .into_iter()
            .map(|(k, v)| (k.into().chars().collect(), v.into()))
            .filter(|(k, _): &(Vec<char>, String)| !k.is_empty())
            .collect();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { entries }
    }

    /// Parse a lexicon from TOML (`[entries]` table of literal = label)
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: LexiconFile = toml::from_str(content)?;
        Ok(Self::new(file.entries))
    }

    /// Load a lexicon file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HitokuError::Annotation(format!("Failed to load lexicon {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Number of lexicon entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lexicon is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn tokenize(chars: &[char]) -> (Vec<Token>, Vec<Script>) {
        let mut tokens = Vec::new();
        let mut scripts = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let script = Script::of(chars[i]);
            let mut j = i + 1;
            if script != Script::Symbol {
                while j < chars.len() && Script::of(chars[j]) == script {
                    j += 1;
                }
            }
            if script != Script::Space {
                let text: String = chars[i..j].iter().collect();
                let index = tokens.len();
                tokens.push(Token {
                    shape: shape_of(&text),
                    text,
                    idx: i,
                    pos: script.pos().to_string(),
                    tag: script.tag().to_string(),
                    dep: "dep".to_string(),
                    head: index,
                });
                scripts.push(script);
            }
            i = j;
        }

        (tokens, scripts)
    }

    /// Groups contiguous content tokens; the last token of a group heads the others
    fn chunk(chars: &[char], tokens: &mut [Token], scripts: &[Script]) -> Vec<NounChunk> {
        let mut chunks = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            if !scripts[i].is_content() {
                i += 1;
                continue;
            }
            let mut j = i + 1;
            while j < tokens.len() && scripts[j].is_content() && tokens[j].idx == tokens[j - 1].end() {
                j += 1;
            }
            for k in i..j - 1 {
                tokens[k].head = j - 1;
                tokens[k].dep = "compound".to_string();
            }
            tokens[j - 1].dep = "ROOT".to_string();

            let (start, end) = (tokens[i].idx, tokens[j - 1].end());
            chunks.push(NounChunk {
                start_char: start,
                end_char: end,
                text: chars[start..end].iter().collect(),
            });
            i = j;
        }

        chunks
    }

    fn find_entities(&self, chars: &[char], annotation: &Annotation) -> Vec<EntitySpan> {
        let mut taken = vec![false; chars.len()];
        let mut found = Vec::new();

        for (literal, label) in &self.entries {
            let width = literal.len();
            if width > chars.len() {
                continue;
            }
            let mut start = 0;
            while start + width <= chars.len() {
                let end = start + width;
                if chars[start..end] == literal[..] && !taken[start..end].iter().any(|&t| t) {
                    taken[start..end].iter_mut().for_each(|t| *t = true);
                    found.push((start, end, label.clone()));
                    start = end;
                } else {
                    start += 1;
                }
            }
        }

        found.sort_by_key(|(start, _, _)| *start);
        found
            .into_iter()
            .filter_map(|(start, end, label)| {
                let start_token = annotation.tokens.iter().position(|t| t.end() > start)?;
                let end_token = annotation
                    .tokens
                    .iter()
                    .rposition(|t| t.idx < end)
                    .map(|i| i + 1)?;
                if start_token >= end_token {
                    return None;
                }
                let root = annotation.root_of(start_token, end_token)?;
                Some(EntitySpan {
                    start_char: start,
                    end_char: end,
                    start_token,
                    end_token,
                    label,
                    root,
                })
            })
            .collect()
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, text: &str) -> anyhow::Result<Annotation> {
        let chars: Vec<char> = text.chars().collect();
        let (mut tokens, scripts) = Self::tokenize(&chars);
        let noun_chunks = Self::chunk(&chars, &mut tokens, &scripts);

        let mut annotation = Annotation {
            tokens,
            entities: Vec::new(),
            noun_chunks,
        };
        annotation.entities = self.find_entities(&chars, &annotation);
        Ok(annotation)
    }
}

/// Orthographic shape: X for uppercase, x for lowercase, d for digits, runs capped at four
pub fn shape_of(text: &str) -> String {
    let mut shape = String::new();
    let mut last = None;
    let mut run = 0;

    for c in text.chars() {
        let mapped = if c.is_uppercase() {
            'X'
        } else if c.is_lowercase() {
            'x'
        } else if c.is_numeric() {
            'd'
        } else if c.is_alphabetic() {
            'x'
        } else {
            c
        };

        if Some(mapped) == last {
            run += 1;
        } else {
            last = Some(mapped);
            run = 1;
        }
        if run <= 4 {
            shape.push(mapped);
        }
    }

    shape
}
