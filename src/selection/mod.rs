use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use crate::{
    catalog::{AttributeEntry, Dimension},
    error::{EngineError, invariant_violation},
};

pub mod assisted;
pub mod contract;
pub mod deterministic;
pub mod hash;

pub use assisted::{AssistedContext, AssistedSelector, AssistedSettings};
pub use contract::{ParsedSelection, SoftFailure};
pub use deterministic::select_deterministic;
pub use hash::{derive_seed, hash_to_index};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSource {
    Assisted { justification: Option<String> },
    Deterministic { seed: u64 },
}

impl SelectionSource {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Assisted { .. } => "assisted",
            Self::Deterministic { .. } => "deterministic",
        }
    }
}

/// One chosen entry per dimension. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreativeSelection<D: Dimension> {
    choices: BTreeMap<D, AttributeEntry>,
    reference: String,
    source: SelectionSource,
}

impl<D: Dimension> CreativeSelection<D> {
    pub fn new(
        choices: BTreeMap<D, AttributeEntry>,
        source: SelectionSource,
    ) -> Result<Self, EngineError> {
        for dimension in D::ALL {
            if !choices.contains_key(dimension) {
                return Err(invariant_violation(format!(
                    "selection is missing dimension '{}'",
                    dimension.label()
                )));
            }
        }
        let reference = choices
            .get(&D::REFERENCE)
            .map(|entry| entry.descriptor.clone())
            .unwrap_or_default();

        Ok(Self {
            choices,
            reference,
            source,
        })
    }

    pub fn choice(&self, dimension: D) -> Option<&AttributeEntry> {
        self.choices.get(&dimension)
    }

    pub fn name(&self, dimension: D) -> &str {
        self.choices
            .get(&dimension)
            .map(|entry| entry.name.as_str())
            .unwrap_or_default()
    }

    pub fn choices(&self) -> impl Iterator<Item = (D, &AttributeEntry)> {
        self.choices.iter().map(|(dimension, entry)| (*dimension, entry))
    }

    /// Descriptor of the reference dimension's entry.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn source(&self) -> &SelectionSource {
        &self.source
    }

    pub fn to_json(&self) -> Value {
        let mut choices = Map::new();
        for (dimension, entry) in &self.choices {
            choices.insert(dimension.label().to_string(), Value::from(entry.name.clone()));
        }
        let source = match &self.source {
            SelectionSource::Assisted { justification } => json!({
                "path": "assisted",
                "justification": justification,
            }),
            SelectionSource::Deterministic { seed } => json!({
                "path": "deterministic",
                "seed": seed,
            }),
        };

        json!({
            "layer": D::LAYER,
            "choices": choices,
            "reference": self.reference,
            "source": source,
        })
    }
}
