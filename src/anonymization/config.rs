//! Anonymization configuration

use crate::anonymization::models::ExtractorKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Entity labels redacted by default
pub const DEFAULT_TARGET_LABELS: [&str; 21] = [
    "ORG", "PERSON", "LOC", "GPE", "PRODUCT", "FACILITY", "EMAIL", "PHONE", "URL", "DATE",
    "TIME", "MONEY", "PERCENT", "ID", "LICENSE", "TECH", "PROJECT", "DEPT", "BRANCH", "SYSTEM",
    "DURATION",
];

/// Entity labels routed to the address splitter by default
pub const DEFAULT_ADDRESS_LABELS: [&str; 2] = ["GPE", "LOC"];

/// Anonymization pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Dry-run mode (detect but don't substitute)
    #[serde(default)]
    pub dry_run: bool,

    /// Extractor passes in priority order
    #[serde(default = "default_pass_order")]
    pub pass_order: Vec<ExtractorKind>,

    /// Entity labels treated as sensitive
    #[serde(default = "default_target_labels")]
    pub target_labels: Vec<String>,

    /// Entity labels decomposed by the address splitter
    #[serde(default = "default_address_labels")]
    pub address_labels: Vec<String>,

    /// Context tokens recorded on each side of a learned entity
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Path to a pattern library TOML file extending the built-in one
    pub pattern_library: Option<PathBuf>,
}

fn default_pass_order() -> Vec<ExtractorKind> {
    ExtractorKind::default_order()
}

fn default_target_labels() -> Vec<String> {
    DEFAULT_TARGET_LABELS.iter().map(|s| s.to_string()).collect()
}

fn default_address_labels() -> Vec<String> {
    DEFAULT_ADDRESS_LABELS.iter().map(|s| s.to_string()).collect()
}

fn default_context_window() -> usize {
    2
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            pass_order: default_pass_order(),
            target_labels: default_target_labels(),
            address_labels: default_address_labels(),
            context_window: default_context_window(),
            pattern_library: None,
        }
    }
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.pass_order.is_empty() {
            anyhow::bail!("pass_order must name at least one extractor");
        }

        let mut seen = HashSet::new();
        for kind in &self.pass_order {
            if !seen.insert(kind) {
                anyhow::bail!("Extractor '{}' appears more than once in pass_order", kind);
            }
        }

        if self.target_labels.iter().any(|label| label.trim().is_empty()) {
            anyhow::bail!("target_labels must not contain empty labels");
        }

        if self.context_window > 32 {
            anyhow::bail!(
                "context_window must be at most 32, got {}",
                self.context_window
            );
        }

        // Validate pattern library path if specified
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("HITOKU_ANONYMIZATION_DRY_RUN") {
            self.dry_run = val
                .parse()
                .context("Invalid HITOKU_ANONYMIZATION_DRY_RUN value")?;
        }

        if let Ok(val) = std::env::var("HITOKU_ANONYMIZATION_PASS_ORDER") {
            self.pass_order = split_list(&val)
                .map(|name| name.parse::<ExtractorKind>().map_err(anyhow::Error::msg))
                .collect::<Result<Vec<_>>>()
                .context("Invalid HITOKU_ANONYMIZATION_PASS_ORDER value")?;
        }

        if let Ok(val) = std::env::var("HITOKU_ANONYMIZATION_TARGET_LABELS") {
            self.target_labels = split_list(&val).map(str::to_string).collect();
        }

        if let Ok(val) = std::env::var("HITOKU_ANONYMIZATION_ADDRESS_LABELS") {
            self.address_labels = split_list(&val).map(str::to_string).collect();
        }

        if let Ok(val) = std::env::var("HITOKU_ANONYMIZATION_CONTEXT_WINDOW") {
            self.context_window = val
                .parse()
                .context("Invalid HITOKU_ANONYMIZATION_CONTEXT_WINDOW value")?;
        }

        if let Ok(val) = std::env::var("HITOKU_ANONYMIZATION_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        Ok(())
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}
