//! Pattern library for span detection
//!
//! Static vocabularies and regex tables for every entity category. The
//! built-in library is embedded from `patterns/ja_business.toml`; a user
//! library with the same shape extends it.

use crate::domain::{HitokuError, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Labels whose regex tables are consumed by dedicated structural extractors
pub const STRUCTURED_LABELS: [&str; 3] = ["ID", "LICENSE", "MONEY"];

/// Raw library definition as written in TOML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatternSpec {
    /// Regex sources by category label
    pub categories: BTreeMap<String, Vec<String>>,
    /// Technology vocabulary
    pub tech: TechSpec,
    /// Department morphology
    pub department: DepartmentSpec,
    /// Project name templates
    pub projects: ProjectSpec,
    /// Address units and numeric blocks
    pub address: AddressSpec,
    /// Title and honorific suffixes
    pub titles: TitleSpec,
}

/// Technology vocabulary definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TechSpec {
    /// Multi-word compound names (regex sources)
    pub compound: Vec<String>,
    /// Single terms (regex sources)
    pub terms: Vec<String>,
}

/// Department morphology definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DepartmentSpec {
    /// Optional leading words (第一, グローバル, ...)
    pub prefixes: Vec<String>,
    /// Functional cores (開発, 営業, ...)
    pub cores: Vec<String>,
    /// Organizational suffixes (部, 課, ...)
    pub suffixes: Vec<String>,
}

/// Project template definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectSpec {
    /// Regex templates in priority order
    pub templates: Vec<String>,
}

/// Address definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddressSpec {
    /// Administrative unit words
    pub units: Vec<String>,
    /// Numeric block regexes in priority order
    pub number_patterns: Vec<String>,
}

/// Title suffix definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TitleSpec {
    /// Plain title and honorific words
    pub suffixes: Vec<String>,
}

impl PatternSpec {
    /// Parse a library definition from TOML
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            HitokuError::Configuration(format!("Failed to parse pattern library TOML: {e}"))
        })
    }

    /// Append every list of `other` to this definition
    pub fn merge(&mut self, other: PatternSpec) {
        for (label, patterns) in other.categories {
            self.categories.entry(label).or_default().extend(patterns);
        }
        self.tech.compound.extend(other.tech.compound);
        self.tech.terms.extend(other.tech.terms);
        self.department.prefixes.extend(other.department.prefixes);
        self.department.cores.extend(other.department.cores);
        self.department.suffixes.extend(other.department.suffixes);
        self.projects.templates.extend(other.projects.templates);
        self.address.units.extend(other.address.units);
        self.address.number_patterns.extend(other.address.number_patterns);
        self.titles.suffixes.extend(other.titles.suffixes);
    }
}

/// Compiled regex with its category label
#[derive(Debug, Clone)]
pub struct CategoryPattern {
    /// Category label (EMAIL, PHONE, ...)
    pub label: String,
    /// Compiled regex
    pub regex: Regex,
}

/// Compiled, immutable pattern library
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    categories: Vec<CategoryPattern>,
    compound_tech: Vec<String>,
    tech_terms: Vec<String>,
    department_names: Vec<String>,
    project_templates: Vec<Regex>,
    address_units: Vec<String>,
    address_numbers: Vec<Regex>,
    title_suffixes: Vec<String>,
}

impl PatternLibrary {
    /// Create the built-in library
    pub fn default_library() -> Result<Self> {
        Self::from_spec(Self::default_spec()?)
    }

    /// Built-in library definition
    pub fn default_spec() -> Result<PatternSpec> {
        let default_toml = include_str!("../../../../patterns/ja_business.toml");
        PatternSpec::from_toml(default_toml)
    }

    /// Create a library from TOML content replacing the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        Self::from_spec(PatternSpec::from_toml(content)?)
    }

    /// Create the built-in library extended by a user TOML file
    pub fn with_overlay<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            HitokuError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.display()
            ))
        })?;

        let mut spec = Self::default_spec()?;
        spec.merge(PatternSpec::from_toml(&content)?);
        Self::from_spec(spec)
    }

    /// Compile a library definition
    pub fn from_spec(spec: PatternSpec) -> Result<Self> {
        let mut categories = Vec::new();
        for (label, sources) in &spec.categories {
            for source in sources {
                categories.push(CategoryPattern {
                    label: label.clone(),
                    regex: compile(source, label)?,
                });
            }
        }

        let project_templates = spec
            .projects
            .templates
            .iter()
            .map(|source| compile(source, "project"))
            .collect::<Result<Vec<_>>>()?;

        let address_numbers = spec
            .address
            .number_patterns
            .iter()
            .map(|source| compile(source, "address"))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            categories,
            compound_tech: longest_first(spec.tech.compound),
            tech_terms: longest_first(spec.tech.terms),
            department_names: department_names(&spec.department),
            project_templates,
            address_units: dedup(spec.address.units),
            address_numbers,
            title_suffixes: title_variants(&spec.titles.suffixes),
        })
    }

    /// Every regex category pattern
    pub fn category_patterns(&self) -> &[CategoryPattern] {
        &self.categories
    }

    /// Patterns for one category label
    pub fn patterns_for_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a CategoryPattern> {
        self.categories.iter().filter(move |p| p.label == label)
    }

    /// Compound technology names, longest source first
    pub fn compound_tech(&self) -> &[String] {
        &self.compound_tech
    }

    /// Single technology terms, longest source first
    pub fn tech_terms(&self) -> &[String] {
        &self.tech_terms
    }

    /// Every generated department name, longest first
    pub fn department_names(&self) -> &[String] {
        &self.department_names
    }

    /// Project templates in priority order
    pub fn project_templates(&self) -> &[Regex] {
        &self.project_templates
    }

    /// Administrative address units
    pub fn address_units(&self) -> &[String] {
        &self.address_units
    }

    /// Numeric address block patterns in priority order
    pub fn address_numbers(&self) -> &[Regex] {
        &self.address_numbers
    }

    /// Title suffix variants, longest first
    pub fn title_suffixes(&self) -> &[String] {
        &self.title_suffixes
    }
}

fn compile(source: &str, name: &str) -> Result<Regex> {
    Regex::new(source)
        .map_err(|e| HitokuError::Pattern(format!("Invalid regex in '{name}': {source}: {e}")))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| !item.is_empty() && seen.insert(item.clone()))
        .collect()
}

fn longest_first(items: Vec<String>) -> Vec<String> {
    let mut items = dedup(items);
    items.sort_by(|a, b| char_len(b).cmp(&char_len(a)));
    items
}

/// `prefix + core + suffix` for every prefix, plus `core + suffix`
fn department_names(spec: &DepartmentSpec) -> Vec<String> {
    let mut names = Vec::new();
    for core in &spec.cores {
        for suffix in &spec.suffixes {
            for prefix in &spec.prefixes {
                names.push(format!("{prefix}{core}{suffix}"));
            }
            names.push(format!("{core}{suffix}"));
        }
    }
    longest_first(names)
}

/// Plain, parenthesized and (for ASCII titles) comma-suffixed variants
fn title_variants(titles: &[String]) -> Vec<String> {
    let mut variants = Vec::new();
    for title in titles {
        variants.push(title.clone());
        variants.push(format!("({title})"));
        variants.push(format!("（{title}）"));
        if title.is_ascii() {
            variants.push(format!("{title},"));
        }
    }
    longest_first(variants)
}
