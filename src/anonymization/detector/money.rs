//! Money amount extractor
//!
//! Keeps approximation prefixes, currency glyphs, unit words, qualifiers
//! and thousands separators literal; only the digit content becomes
//! opaque. Each separator-free digit group is hashed separately so that
//! every token in the restored amount stays decodable.

use super::{Document, SpanExtractor};
use crate::anonymization::anonymizer::HashVault;
use crate::anonymization::models::{CandidateSpan, ExtractorKind, SpanSet};
use crate::domain::Result;
use regex::Regex;

const MONEY_PATTERN: &str = concat!(
    r"(?P<prefix>約|およそ|概算で)?",
    r"(?P<currency>[¥￥])?",
    r"(?P<amount>(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)",
    r"(?P<unit>兆円|億円|万円|円)?",
    r"(?P<qualifier>程度|ほど|前後|以上|以下|未満|超)?",
);

/// Thousands separator
pub const SEPARATOR: char = ',';

/// Money extractor
#[derive(Debug, Clone)]
pub struct MoneyExtractor {
    pattern: Regex,
}

impl MoneyExtractor {
    /// Create a new money extractor
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(MONEY_PATTERN)?,
        })
    }
}

impl SpanExtractor for MoneyExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Money
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
            let (Some(whole), Some(amount)) = (caps.get(0), caps.name("amount")) else {
                continue;
            };
            let (start, end) = doc.char_span(whole.start(), whole.end());
            if !claimed.claim(start, end) {
                continue;
            }

            let mut replacement = String::new();
            for group in ["prefix", "currency"] {
                if let Some(m) = caps.name(group) {
                    replacement.push_str(m.as_str());
                }
            }
            replacement.push_str(&hash_amount(amount.as_str(), vault));
            for group in ["unit", "qualifier"] {
                if let Some(m) = caps.name(group) {
                    replacement.push_str(m.as_str());
                }
            }

            spans.push(CandidateSpan::new(start, end, replacement, self.kind()));
        }

        spans
    }
}

/// Hash the digit groups of `amount` and put the separators back where they were
pub fn hash_amount(amount: &str, vault: &mut HashVault) -> String {
    let groups: Vec<&str> = amount.split(SEPARATOR).collect();
    let hashed: Vec<String> = groups.iter().map(|group| vault.hash(group)).collect();

    let positions: Vec<usize> = separator_positions(amount)
        .into_iter()
        .map(|pos| hashed_position(&groups, &hashed, pos))
        .collect();

    restore_format(&hashed.concat(), &positions)
}

/// Map a separator-free digit position onto the concatenated tokens
fn hashed_position(groups: &[&str], hashed: &[String], pos: usize) -> usize {
    let mut original = 0;
    let mut mapped = 0;
    for (group, token) in groups.iter().zip(hashed) {
        if original >= pos {
            break;
        }
        original += group.chars().count();
        mapped += token.chars().count();
    }
    mapped
}

/// Separator positions of `amount`, counted in separator-free characters
pub fn separator_positions(amount: &str) -> Vec<usize> {
    let mut digits = 0;
    let mut positions = Vec::new();
    for c in amount.chars() {
        if c == SEPARATOR {
            positions.push(digits);
        } else {
            digits += 1;
        }
    }
    positions
}

/// Insert a separator at each separator-free position, left to right
///
/// Every insertion shifts the following positions by one, so an offset
/// accumulates as separators are placed.
pub fn restore_format(bare: &str, positions: &[usize]) -> String {
    let mut chars: Vec<char> = bare.chars().collect();
    let mut offset = 0;
    for &pos in positions {
        let at = pos + offset;
        if at < chars.len() {
            chars.insert(at, SEPARATOR);
            offset += 1;
        }
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::anonymizer::tokenization::TOKEN_PATTERN;
    use test_case::test_case;

    fn run(text: &str) -> (Vec<CandidateSpan>, HashVault) {
        let extractor = MoneyExtractor::new().unwrap();
        let mut vault = HashVault::new();
        let spans = extractor.extract(&Document::new(text), &SpanSet::new(), &mut vault);
        (spans, vault)
    }

    #[test]
    fn test_restore_format_places_separators() {
        assert_eq!(separator_positions("1,234,567"), vec![1, 4]);
        assert_eq!(restore_format("7654321", &[1, 4]), "7,654,321");
        assert_eq!(restore_format("12345", &[]), "12345");
    }

    #[test]
    fn test_separators_follow_hashed_group_widths() {
        let mut vault = HashVault::new();
        let hashed = hash_amount("1,234,567", &mut vault);

        let expected = ["1", "234", "567"]
            .iter()
            .map(|group| vault.hash(group))
            .collect::<Vec<_>>()
            .join(",");
        assert_eq!(hashed, expected);

        let commas: Vec<usize> = hashed
            .chars()
            .enumerate()
            .filter(|(_, c)| *c == SEPARATOR)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(commas, vec![12, 25]);
    }

    #[test]
    fn test_format_preserved_for_yen_amount() {
        let (spans, vault) = run("¥1,234,567円");
        assert_eq!(spans.len(), 1);
        let replacement = &spans[0].replacement;

        assert!(replacement.starts_with('¥'));
        assert!(replacement.ends_with('円'));
        assert_eq!(replacement.matches(',').count(), 2);
        assert!(!replacement.contains("234"));

        let token = Regex::new(TOKEN_PATTERN).unwrap();
        let restored = token.replace_all(replacement, |caps: &regex::Captures| {
            vault.reverse(&caps[0]).unwrap_or_default().to_string()
        });
        assert_eq!(restored, "¥1,234,567円");
    }

    #[test_case("約￥50,000,000円", "約￥", "円" ; "approximate prefix")]
    #[test_case("10億円以上", "", "億円以上" ; "unit and qualifier")]
    #[test_case("およそ3.5万円程度", "およそ", "万円程度" ; "decimal amount")]
    fn test_literal_groups_are_kept(text: &str, head: &str, tail: &str) {
        let (spans, _) = run(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, text.chars().count());
        assert!(spans[0].replacement.starts_with(head));
        assert!(spans[0].replacement.ends_with(tail));
    }

    #[test]
    fn test_bare_amount_is_single_token() {
        let (spans, vault) = run("50000");
        assert_eq!(spans.len(), 1);
        assert_eq!(vault.reverse(&spans[0].replacement), Some("50000"));
    }
}
