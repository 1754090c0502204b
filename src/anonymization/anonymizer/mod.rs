//! Substitution and reversal
//!
//! The vault issues tokens, the resolver picks the spans that survive and
//! redaction rewrites or restores the text.

pub mod redaction;
pub mod resolver;
pub mod tokenization;

pub use redaction::{apply_spans, decode_tokens};
pub use resolver::resolve;
pub use tokenization::{
    HashVault, TokenDigest, TruncatedSha256, TOKEN_CLOSE, TOKEN_HEX_WIDTH, TOKEN_OPEN,
    TOKEN_PATTERN,
};
