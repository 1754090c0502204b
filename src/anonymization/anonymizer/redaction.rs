//! Span substitution and token decoding

use super::tokenization::{HashVault, TOKEN_PATTERN};
use crate::anonymization::detector::Document;
use crate::anonymization::models::CandidateSpan;
use regex::Regex;
use std::sync::OnceLock;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is a valid literal"))
}

/// Replace each span of `text` with its replacement
///
/// `spans` must be pairwise disjoint and ordered descending by start, as
/// produced by the resolver, so earlier offsets stay valid while later
/// ones are rewritten.
pub fn apply_spans(text: &str, spans: &[CandidateSpan]) -> String {
    let doc = Document::new(text);
    let mut output = text.to_string();

    for span in spans {
        let range = doc.byte_offset(span.start)..doc.byte_offset(span.end);
        output.replace_range(range, &span.replacement);
    }

    output
}

/// Replace every token the vault knows with its plaintext, last token first
///
/// Tokens without a vault entry are left verbatim.
pub fn decode_tokens(text: &str, vault: &HashVault) -> String {
    let found: Vec<_> = token_regex().find_iter(text).collect();
    let mut output = text.to_string();

    for matched in found.iter().rev() {
        if let Some(plaintext) = vault.reverse(matched.as_str()) {
            output.replace_range(matched.range(), plaintext);
        }
    }

    output
}

/// Count the token-shaped substrings of `text`
pub fn count_tokens(text: &str) -> usize {
    token_regex().find_iter(text).count()
}
