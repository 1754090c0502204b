//! Engine statistics reporting
//!
//! A point-in-time snapshot of the vault and learning store, printable for
//! the console or serializable as JSON. Never contains plaintext.

use crate::domain::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of an engine's internal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Distinct plaintexts hashed
    pub total_entities: usize,

    /// Distinct tokens handed out (lower than `total_entities` on collision)
    pub unique_hashes: usize,

    /// Learned pattern count per label
    pub learned_patterns: BTreeMap<String, usize>,

    /// Size of the known-text set
    pub learned_entities: usize,

    /// Entity labels treated as sensitive
    pub entity_types: Vec<String>,

    /// Internal table sizes
    pub cache_size: CacheSizes,
}

/// Sizes of the internal lookup tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheSizes {
    /// Forward plaintext-to-token entries
    pub hash_cache: usize,

    /// Reverse token-to-plaintext entries
    pub reverse_cache: usize,

    /// Known-text entries
    pub entity_texts: usize,
}

impl Statistics {
    /// Whether a truncated digest collision has happened
    pub fn has_collisions(&self) -> bool {
        self.unique_hashes < self.total_entities
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Format statistics for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str("  ANONYMIZATION STATISTICS\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Hashed entities:   {}\n", self.total_entities));
        output.push_str(&format!("  Unique hashes:     {}\n", self.unique_hashes));
        output.push_str(&format!("  Learned entities:  {}\n", self.learned_entities));

        if !self.learned_patterns.is_empty() {
            output.push_str("\n  Learned patterns by label:\n");
            for (label, count) in &self.learned_patterns {
                output.push_str(&format!("    {label:<12} {count}\n"));
            }
        }

        output.push_str(&format!(
            "\n  Cache: hash={} reverse={} known={}\n",
            self.cache_size.hash_cache, self.cache_size.reverse_cache, self.cache_size.entity_texts
        ));

        if self.has_collisions() {
            output.push_str("\n  ⚠ Truncated digest collision detected; some tokens decode to a later plaintext\n");
        }

        output
    }
}
