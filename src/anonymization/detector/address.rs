//! Address decomposition
//!
//! An address is split into contiguous fragments that re-tile the input:
//! numeric blocks (`1-2-3`, `5番地`, `三番`) first, then runs cut after each
//! administrative unit word (`都`, `区`, `丁目`, `ビル`, ...). Every fragment
//! is hashed separately so the prefecture/ward/block structure survives as
//! individually decodable tokens.

use super::{Document, PatternLibrary, SpanExtractor};
use crate::anonymization::anonymizer::HashVault;
use crate::anonymization::models::{CandidateSpan, ExtractorKind, SpanSet};
use regex::Regex;

/// Splits address text into hashed fragments
#[derive(Debug, Clone)]
pub struct AddressSplitter {
    /// Unit words, longest first
    units: Vec<Vec<char>>,
    numbers: Vec<Regex>,
}

impl AddressSplitter {
    /// Create a new splitter from the library's address tables
    pub fn new(library: &PatternLibrary) -> Self {
        let mut units: Vec<Vec<char>> = library
            .address_units()
            .iter()
            .map(|unit| unit.chars().collect())
            .collect();
        units.sort_by(|a, b| b.len().cmp(&a.len()));

        Self {
            units,
            numbers: library.address_numbers().to_vec(),
        }
    }

    /// Whether `text` contains any administrative unit word
    pub fn contains_unit(&self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        self.units
            .iter()
            .any(|unit| chars.windows(unit.len()).any(|w| w == unit.as_slice()))
    }

    /// Fragment boundaries `(start, end)` in code points, ordered and contiguous
    pub fn fragments(&self, text: &str) -> Vec<(usize, usize)> {
        let doc = Document::new(text);
        let chars: Vec<char> = text.chars().collect();

        let mut consumed = SpanSet::new();
        let mut blocks = Vec::new();
        for pattern in &self.numbers {
            for matched in pattern.find_iter(text) {
                let (start, end) = doc.char_span(matched.start(), matched.end());
                if start < end && consumed.claim(start, end) {
                    blocks.push((start, end));
                }
            }
        }
        blocks.sort_unstable();

        let mut fragments = Vec::new();
        let mut blocks = blocks.into_iter().peekable();
        let mut buffer_start = 0;
        let mut i = 0;

        while i < chars.len() {
            if let Some(&(block_start, block_end)) = blocks.peek() {
                if i == block_start {
                    if buffer_start < i {
                        fragments.push((buffer_start, i));
                    }
                    fragments.push((block_start, block_end));
                    blocks.next();
                    i = block_end;
                    buffer_start = block_end;
                    continue;
                }
            }

            i += 1;
            if let Some(unit_len) = self.unit_suffix(&chars[buffer_start..i]) {
                // A bare unit word (東, 南) is not a fragment on its own
                if i - buffer_start > unit_len {
                    fragments.push((buffer_start, i));
                    buffer_start = i;
                }
            }
        }

        if buffer_start < chars.len() {
            fragments.push((buffer_start, chars.len()));
        }

        fragments
    }

    /// Hash every fragment of `text`; offsets are local to `text`
    pub fn split(&self, text: &str, vault: &mut HashVault) -> Vec<(usize, usize, String)> {
        let doc = Document::new(text);
        self.fragments(text)
            .into_iter()
            .map(|(start, end)| (start, end, vault.hash(doc.slice(start, end))))
            .collect()
    }

    /// Length of the longest unit word the buffer ends with
    fn unit_suffix(&self, buffer: &[char]) -> Option<usize> {
        self.units
            .iter()
            .find(|unit| buffer.ends_with(unit))
            .map(|unit| unit.len())
    }
}

impl SpanExtractor for AddressSplitter {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Address
    }

    fn extract(
        &self,
        doc: &Document<'_>,
        accepted: &SpanSet,
        vault: &mut HashVault,
    ) -> Vec<CandidateSpan> {
        self.split(doc.text(), vault)
            .into_iter()
            .filter(|(start, end, _)| accepted.is_available(*start, *end))
            .map(|(start, end, token)| CandidateSpan::new(start, end, token, self.kind()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter() -> AddressSplitter {
        AddressSplitter::new(&PatternLibrary::default_library().unwrap())
    }

    fn pieces(text: &str) -> Vec<String> {
        let doc = Document::new(text);
        splitter()
            .fragments(text)
            .into_iter()
            .map(|(s, e)| doc.slice(s, e).to_string())
            .collect()
    }

    #[test]
    fn test_prefecture_and_ward_are_separate() {
        assert_eq!(pieces("東京都渋谷区"), vec!["東京都", "渋谷区"]);
    }

    #[test]
    fn test_numeric_block_and_building() {
        assert_eq!(
            pieces("東京都渋谷区神南1-2-3 ABCビル"),
            vec!["東京都", "渋谷区", "神南", "1-2-3", " ABCビル"]
        );
    }

    #[test]
    fn test_kanji_block_units() {
        assert_eq!(
            pieces("大阪府大阪市北区梅田三丁目5番"),
            vec!["大阪府", "大阪市", "北区", "梅田三丁目", "5番"]
        );
    }

    #[test]
    fn test_fragments_retile_input() {
        let text = "神奈川県横浜市中区山下町1番地 山下タワー5F";
        let fragments = splitter().fragments(text);
        assert_eq!(fragments.first().map(|f| f.0), Some(0));
        assert_eq!(fragments.last().map(|f| f.1), Some(text.chars().count()));
        for pair in fragments.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn test_split_hashes_every_fragment() {
        let mut vault = HashVault::new();
        let parts = splitter().split("東京都渋谷区", &mut vault);
        assert_eq!(parts.len(), 2);
        assert_eq!(vault.reverse(&parts[0].2), Some("東京都"));
        assert_eq!(vault.reverse(&parts[1].2), Some("渋谷区"));
    }

    #[test]
    fn test_contains_unit() {
        let splitter = splitter();
        assert!(splitter.contains_unit("渋谷区"));
        assert!(!splitter.contains_unit("山田太郎"));
    }
}
