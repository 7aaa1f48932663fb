use std::sync::Arc;

use crate::observability::metrics;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineTelemetryEvent {
    RelevanceDegraded {
        layer: &'static str,
        dimension: &'static str,
        sector: String,
    },
    RecencyExhausted {
        layer: &'static str,
        scope: String,
        dimension: &'static str,
        remaining: usize,
    },
    AssistedSoftFailure {
        layer: &'static str,
        scope: String,
        reason: String,
    },
    SelectionCompleted {
        layer: &'static str,
        scope: String,
        path: &'static str,
        diversity_score: f64,
    },
    ScopeEvicted {
        layer: &'static str,
        scope: String,
    },
}

pub type EngineTelemetryHook = Arc<dyn Fn(EngineTelemetryEvent) + Send + Sync>;

/// Fans an event out to the metrics recorder and the optional hook.
pub fn emit(hook: Option<&EngineTelemetryHook>, event: EngineTelemetryEvent) {
    match &event {
        EngineTelemetryEvent::RelevanceDegraded { layer, dimension, .. } => {
            metrics::record_relevance_degraded(*layer, *dimension);
        }
        EngineTelemetryEvent::RecencyExhausted { layer, dimension, .. } => {
            metrics::record_recency_exhausted(*layer, *dimension);
        }
        EngineTelemetryEvent::AssistedSoftFailure { layer, .. } => {
            metrics::record_assisted_soft_failure(*layer);
        }
        EngineTelemetryEvent::SelectionCompleted {
            layer,
            path,
            diversity_score,
            ..
        } => {
            metrics::record_selection(*layer, *path, *diversity_score);
        }
        EngineTelemetryEvent::ScopeEvicted { layer, .. } => {
            metrics::record_scope_evicted(*layer);
        }
    }

    if let Some(hook) = hook {
        hook(event);
    }
}
