//! Learned entity pattern model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sensitive literal observed during learning, with the morphology of its root token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPattern {
    /// Literal text of the entity
    pub text: String,
    /// Entity label (ORG, PERSON, ...)
    pub label: String,
    /// Part of speech of the root token
    pub pos: String,
    /// Morphological features of the root token
    pub features: BTreeMap<String, String>,
    /// Surrounding token texts, left context first
    pub context: Vec<String>,
}
