use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    fs,
    hash::Hash,
    path::Path,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, invalid_catalog};

pub mod preset;
pub mod strategy;

pub use preset::PresetDimension;
pub use strategy::StrategyDimension;

/// Category tag that matches every sector.
pub const UNIVERSAL_CATEGORY: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceRule {
    Sector,
    SectorAndOccasion,
    Universal,
}

/// One attribute-dimension set. The engine, tracker, selectors and scorer are
/// generic over it so the preset and strategy layers share one implementation.
pub trait Dimension:
    Copy + Ord + Eq + Hash + fmt::Debug + Send + Sync + 'static
{
    const ALL: &'static [Self];
    const LAYER: &'static str;
    /// Dimension whose descriptor becomes `CreativeSelection::reference`.
    const REFERENCE: Self;

    fn label(self) -> &'static str;
    /// Distinct large prime fed to `hash_to_index`.
    fn salt(self) -> u64;
    fn default_minimum_viable(self) -> usize;
    fn relevance(self) -> RelevanceRule;
    /// Weights of one set sum to 100.
    fn similarity_weight(self) -> u32;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|dimension| dimension.label().eq_ignore_ascii_case(label.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub name: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub descriptor: String,
}

impl AttributeEntry {
    pub fn new(
        name: impl Into<String>,
        categories: impl IntoIterator<Item = impl Into<String>>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            categories: categories.into_iter().map(Into::into).collect(),
            descriptor: descriptor.into(),
        }
    }

    pub fn is_universal(&self) -> bool {
        self.categories
            .iter()
            .any(|category| category.trim().eq_ignore_ascii_case(UNIVERSAL_CATEGORY))
    }

    /// Case-insensitive substring match of any category against any tag.
    pub fn matches_any(&self, tags: &[String]) -> bool {
        if self.is_universal() {
            return true;
        }
        self.categories.iter().any(|category| {
            let category = category.to_lowercase();
            tags.iter()
                .any(|tag| !tag.is_empty() && category.contains(&tag.to_lowercase()))
        })
    }
}

#[derive(Debug, Clone)]
pub struct AttributeCatalog<D: Dimension> {
    dimensions: BTreeMap<D, Vec<AttributeEntry>>,
}

impl<D: Dimension> AttributeCatalog<D> {
    pub fn from_entries(
        mut dimensions: BTreeMap<D, Vec<AttributeEntry>>,
    ) -> Result<Self, EngineError> {
        for dimension in D::ALL {
            let entries = dimensions.entry(*dimension).or_default();
            validate_dimension(*dimension, entries)?;
        }
        Ok(Self { dimensions })
    }

    pub fn entries(&self, dimension: D) -> &[AttributeEntry] {
        self.dimensions
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self, dimension: D) -> usize {
        self.entries(dimension).len()
    }

    pub fn find(&self, dimension: D, name: &str) -> Option<&AttributeEntry> {
        self.entries(dimension).iter().find(|entry| entry.name == name)
    }

    /// Parses a JSON document keyed by dimension label, e.g.
    /// `{"style": [{"name": "...", "categories": ["food"], "descriptor": "..."}], ...}`.
    pub fn from_json_str(text: &str) -> Result<Self, EngineError> {
        let document: Value = serde_json::from_str(text)
            .map_err(|err| invalid_catalog(format!("catalog is not valid JSON: {err}")))?;
        let Value::Object(mut object) = document else {
            return Err(invalid_catalog("catalog document must be a JSON object"));
        };

        let mut dimensions = BTreeMap::new();
        for dimension in D::ALL {
            let key = object
                .keys()
                .find(|key| key.eq_ignore_ascii_case(dimension.label()))
                .cloned()
                .ok_or_else(|| {
                    invalid_catalog(format!(
                        "catalog is missing dimension '{}'",
                        dimension.label()
                    ))
                })?;
            let raw = object.remove(&key).unwrap_or(Value::Null);
            let entries: Vec<AttributeEntry> = serde_json::from_value(raw).map_err(|err| {
                invalid_catalog(format!(
                    "dimension '{}' has malformed entries: {err}",
                    dimension.label()
                ))
            })?;
            dimensions.insert(*dimension, entries);
        }

        Self::from_entries(dimensions)
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = fs::read_to_string(path).map_err(|err| {
            invalid_catalog(format!("failed to read catalog {}: {err}", path.display()))
        })?;
        Self::from_json_str(&text)
    }
}

fn validate_dimension<D: Dimension>(
    dimension: D,
    entries: &[AttributeEntry],
) -> Result<(), EngineError> {
    if entries.is_empty() {
        return Err(invalid_catalog(format!(
            "dimension '{}' has no entries",
            dimension.label()
        )));
    }

    let mut seen = BTreeSet::new();
    for entry in entries {
        if entry.name.trim().is_empty() {
            return Err(invalid_catalog(format!(
                "dimension '{}' contains an entry with an empty name",
                dimension.label()
            )));
        }
        if entry.categories.is_empty()
            || entry
                .categories
                .iter()
                .any(|category| category.trim().is_empty())
        {
            return Err(invalid_catalog(format!(
                "entry '{}' in dimension '{}' needs at least one non-empty category",
                entry.name,
                dimension.label()
            )));
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(invalid_catalog(format!(
                "duplicate entry '{}' in dimension '{}'",
                entry.name,
                dimension.label()
            )));
        }
    }

    Ok(())
}

pub(crate) fn build_entries(rows: &[(&str, &[&str], &str)]) -> Vec<AttributeEntry> {
    rows.iter()
        .map(|(name, categories, descriptor)| {
            AttributeEntry::new(*name, categories.iter().copied(), *descriptor)
        })
        .collect()
}
