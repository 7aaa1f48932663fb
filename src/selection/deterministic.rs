use std::{collections::BTreeMap, num::NonZeroUsize};

use crate::{
    catalog::Dimension,
    error::{EngineError, invariant_violation},
    recency::ScopeHistory,
    relevance::FilteredSet,
    selection::{CreativeSelection, SelectionSource, hash::hash_to_index},
    telemetry::{self, EngineTelemetryEvent, EngineTelemetryHook},
};

/// Seeded pick of one entry per dimension from the pool left after recency
/// exclusion, recorded into `history`. Same seed and same history state give the
/// same selection.
pub fn select_deterministic<D: Dimension>(
    set: &FilteredSet<D>,
    history: &mut ScopeHistory<D>,
    seed: u64,
    telemetry: Option<&EngineTelemetryHook>,
) -> Result<CreativeSelection<D>, EngineError> {
    let mut choices = BTreeMap::new();

    for dimension in D::ALL {
        let candidates = history.candidates_excluding(*dimension, set.pool(*dimension));
        if let Some(remaining) = candidates.exhausted_with {
            tracing::info!(
                target: "selection",
                layer = D::LAYER,
                scope = %history.scope(),
                dimension = dimension.label(),
                remaining = remaining,
                "recency_window_exhausted_reset"
            );
            telemetry::emit(
                telemetry,
                EngineTelemetryEvent::RecencyExhausted {
                    layer: D::LAYER,
                    scope: history.scope().to_string(),
                    dimension: dimension.label(),
                    remaining,
                },
            );
        }

        let modulus = NonZeroUsize::new(candidates.entries.len()).ok_or_else(|| {
            invariant_violation(format!(
                "dimension '{}' has no candidates after all fallbacks",
                dimension.label()
            ))
        })?;
        let index = hash_to_index(seed, dimension.salt(), modulus);
        let chosen = candidates.entries[index].clone();
        choices.insert(*dimension, chosen);
    }

    let selection = CreativeSelection::new(choices, SelectionSource::Deterministic { seed })?;
    history.record_selection(&selection);

    tracing::debug!(
        target: "selection",
        layer = D::LAYER,
        scope = %history.scope(),
        seed = seed,
        reference = D::REFERENCE.label(),
        chosen = selection.name(D::REFERENCE),
        "deterministic_selection"
    );

    Ok(selection)
}
