use std::{
    collections::{BTreeMap, BTreeSet},
    marker::PhantomData,
};

use serde::{Deserialize, Serialize};

use crate::{catalog::Dimension, selection::CreativeSelection};

pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default = "default_lookback")]
    pub lookback: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lookback: default_lookback(),
        }
    }
}

fn default_lookback() -> usize {
    10
}

/// Per-scope summary of the recorded selections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityStats {
    pub total_selections: usize,
    pub average_score: f64,
    /// Distinct names per dimension label.
    pub unique_names: BTreeMap<&'static str, usize>,
}

/// Weighted-similarity diversity metric. Observational only; never gates selection.
#[derive(Debug, Clone, Copy)]
pub struct DiversityScorer<D: Dimension> {
    lookback: usize,
    _dimensions: PhantomData<D>,
}

impl<D: Dimension> Default for DiversityScorer<D> {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl<D: Dimension> DiversityScorer<D> {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            lookback: config.lookback.max(1),
            _dimensions: PhantomData,
        }
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Sum of the weights of every dimension whose names match.
    pub fn similarity(&self, left: &CreativeSelection<D>, right: &CreativeSelection<D>) -> u32 {
        D::ALL
            .iter()
            .filter(|dimension| left.name(**dimension) == right.name(**dimension))
            .map(|dimension| dimension.similarity_weight())
            .sum()
    }

    /// `100 - mean similarity` against the last `lookback` entries of `history`,
    /// clamped to [0, 100] and rounded to two decimals. Empty history scores 100.
    pub fn score(&self, candidate: &CreativeSelection<D>, history: &[CreativeSelection<D>]) -> f64 {
        let start = history.len().saturating_sub(self.lookback);
        let recent = &history[start..];
        if recent.is_empty() {
            return MAX_SCORE;
        }

        let total: u32 = recent
            .iter()
            .map(|prior| self.similarity(candidate, prior))
            .sum();
        let average = f64::from(total) / recent.len() as f64;
        round_two_decimals((MAX_SCORE - average).clamp(0.0, MAX_SCORE))
    }

    /// Score of each entry against its predecessors.
    pub fn score_sequence(&self, history: &[CreativeSelection<D>]) -> Vec<f64> {
        (0..history.len())
            .map(|index| self.score(&history[index], &history[..index]))
            .collect()
    }

    pub fn stats(&self, history: &[CreativeSelection<D>]) -> DiversityStats {
        let scores = self.score_sequence(history);
        let average_score = if scores.is_empty() {
            0.0
        } else {
            round_two_decimals(scores.iter().sum::<f64>() / scores.len() as f64)
        };
        let unique_names = D::ALL
            .iter()
            .map(|dimension| {
                let names: BTreeSet<&str> = history
                    .iter()
                    .map(|selection| selection.name(*dimension))
                    .collect();
                (dimension.label(), names.len())
            })
            .collect();

        DiversityStats {
            total_selections: history.len(),
            average_score,
            unique_names,
        }
    }
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
