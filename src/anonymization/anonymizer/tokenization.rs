//! Reversible hash tokenization
//!
//! The [`HashVault`] replaces a plaintext with a short opaque token of the
//! form `<<xxxxxxxx>>` (8 lowercase hex characters of a truncated digest)
//! and remembers the reverse mapping so the token can be decoded later.

use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Opening delimiter of a redaction token
pub const TOKEN_OPEN: &str = "<<";

/// Closing delimiter of a redaction token
pub const TOKEN_CLOSE: &str = ">>";

/// Number of hex characters kept from the digest
pub const TOKEN_HEX_WIDTH: usize = 8;

/// Regex source matching exactly one redaction token
pub const TOKEN_PATTERN: &str = r"<<[0-9a-f]{8}>>";

/// Produces the truncated hex digest wrapped into a token
pub trait TokenDigest: Send + Sync {
    /// Return exactly [`TOKEN_HEX_WIDTH`] lowercase hex characters for `plaintext`
    fn digest(&self, plaintext: &str) -> String;
}

/// SHA-256 over the UTF-8 bytes, truncated to the first 8 hex characters
#[derive(Debug, Clone, Copy, Default)]
pub struct TruncatedSha256;

impl TokenDigest for TruncatedSha256 {
    fn digest(&self, plaintext: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        let hex = format!("{:x}", hasher.finalize());
        hex[..TOKEN_HEX_WIDTH].to_string()
    }
}

/// Deterministic, memoized, bidirectional plaintext/token mapping
///
/// Hashing the same plaintext twice yields the same token for the lifetime
/// of the vault. Two distinct plaintexts whose truncated digests collide
/// share one token; the reverse table then keeps only the most recently
/// hashed plaintext and decoding the earlier one yields the later one.
pub struct HashVault {
    digest: Box<dyn TokenDigest>,
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl HashVault {
    /// Create a vault using truncated SHA-256
    pub fn new() -> Self {
        Self::with_digest(Box::new(TruncatedSha256))
    }

    /// Create a vault with a custom digest
    pub fn with_digest(digest: Box<dyn TokenDigest>) -> Self {
        Self {
            digest,
            forward: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Wrap a hex digest into the token wire format
    pub fn wrap(hex: &str) -> String {
        format!("{TOKEN_OPEN}{hex}{TOKEN_CLOSE}")
    }

    /// Return the token for `plaintext`, computing and recording it on first use
    pub fn hash(&mut self, plaintext: &str) -> String {
        if let Some(token) = self.forward.get(plaintext) {
            return token.clone();
        }

        let token = Self::wrap(&self.digest.digest(plaintext));

        if let Some(previous) = self.reverse.get(&token) {
            if previous != plaintext {
                tracing::warn!(
                    token = %token,
                    "Truncated digest collision, reverse mapping overwritten"
                );
            }
        }

        self.forward.insert(plaintext.to_string(), token.clone());
        self.reverse.insert(token.clone(), plaintext.to_string());
        token
    }

    /// Look up the plaintext last hashed to `token`
    pub fn reverse(&self, token: &str) -> Option<&str> {
        self.reverse.get(token).map(String::as_str)
    }

    /// Look up an already computed token without hashing
    pub fn token_for(&self, plaintext: &str) -> Option<&str> {
        self.forward.get(plaintext).map(String::as_str)
    }

    /// Number of distinct plaintexts hashed
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether nothing has been hashed yet
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Number of distinct tokens handed out
    pub fn unique_tokens(&self) -> usize {
        self.forward.values().collect::<HashSet<_>>().len()
    }

    /// Number of entries in the reverse table
    pub fn reverse_len(&self) -> usize {
        self.reverse.len()
    }

    /// Forget every mapping
    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }
}

impl Default for HashVault {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashVault")
            .field("forward", &self.forward.len())
            .field("reverse", &self.reverse.len())
            .finish()
    }
}
