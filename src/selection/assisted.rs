use std::{collections::BTreeMap, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    catalog::Dimension,
    error::EngineError,
    reasoning::{ReasoningPort, ReasoningRequest},
    recency::ScopeHistory,
    relevance::FilteredSet,
    selection::{
        CreativeSelection, SelectionSource,
        contract::{self, ParsedSelection, SoftFailure},
        deterministic::select_deterministic,
    },
    telemetry::{self, EngineTelemetryEvent, EngineTelemetryHook},
};

/// Free-text descriptive fields handed to the reasoning service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistedContext {
    pub brand: String,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub campaign_objective: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

impl AssistedContext {
    pub fn new(brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            ..Self::default()
        }
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn with_campaign_objective(mut self, objective: impl Into<String>) -> Self {
        self.campaign_objective = Some(objective.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistedSettings {
    pub timeout: Duration,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for AssistedSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5_000),
            max_output_tokens: 500,
            temperature: 0.8,
        }
    }
}

/// Asks the reasoning service for indices once, and falls back to the seeded
/// selector on any failure. Only invariant violations escape.
#[derive(Clone, Default)]
pub struct AssistedSelector {
    port: Option<Arc<dyn ReasoningPort>>,
    settings: AssistedSettings,
    telemetry: Option<EngineTelemetryHook>,
}

impl AssistedSelector {
    pub fn new(port: Arc<dyn ReasoningPort>, settings: AssistedSettings) -> Self {
        Self {
            port: Some(port),
            settings,
            telemetry: None,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_telemetry(mut self, hook: EngineTelemetryHook) -> Self {
        self.telemetry = Some(hook);
        self
    }

    pub async fn select<D: Dimension>(
        &self,
        set: &FilteredSet<D>,
        context: &AssistedContext,
        history: &mut ScopeHistory<D>,
        post_index: u64,
        fallback_seed: u64,
    ) -> Result<CreativeSelection<D>, EngineError> {
        match self.attempt(set, context, history, post_index, fallback_seed).await {
            Ok(parsed) => {
                let choices = parsed
                    .indices
                    .iter()
                    .map(|(dimension, index)| {
                        (*dimension, set.pool(*dimension)[*index].clone())
                    })
                    .collect();
                let selection = CreativeSelection::new(
                    choices,
                    SelectionSource::Assisted {
                        justification: parsed.justification,
                    },
                )?;
                history.record_selection(&selection);
                tracing::info!(
                    target: "selection",
                    layer = D::LAYER,
                    scope = %history.scope(),
                    chosen = selection.name(D::REFERENCE),
                    "assisted_selection_accepted"
                );
                Ok(selection)
            }
            Err(SoftFailure::Disabled) => {
                tracing::debug!(
                    target: "selection",
                    layer = D::LAYER,
                    scope = %history.scope(),
                    "assisted_disabled_deterministic"
                );
                select_deterministic(set, history, fallback_seed, self.telemetry.as_ref())
            }
            Err(failure) => {
                tracing::warn!(
                    target: "selection",
                    layer = D::LAYER,
                    scope = %history.scope(),
                    reason = failure.reason(),
                    error = %failure,
                    "assisted_soft_failure_fallback"
                );
                telemetry::emit(
                    self.telemetry.as_ref(),
                    EngineTelemetryEvent::AssistedSoftFailure {
                        layer: D::LAYER,
                        scope: history.scope().to_string(),
                        reason: failure.reason().to_string(),
                    },
                );
                select_deterministic(set, history, fallback_seed, self.telemetry.as_ref())
            }
        }
    }

    async fn attempt<D: Dimension>(
        &self,
        set: &FilteredSet<D>,
        context: &AssistedContext,
        history: &ScopeHistory<D>,
        post_index: u64,
        seed: u64,
    ) -> Result<ParsedSelection<D>, SoftFailure> {
        let Some(port) = self.port.as_ref() else {
            return Err(SoftFailure::Disabled);
        };

        let recent: BTreeMap<D, Vec<String>> = D::ALL
            .iter()
            .map(|dimension| (*dimension, history.window(*dimension)))
            .collect();
        let request = ReasoningRequest {
            request_id: Uuid::now_v7().to_string(),
            system_prompt: contract::system_prompt(),
            user_prompt: contract::build_user_prompt(set, context, &recent, post_index),
            max_output_tokens: self.settings.max_output_tokens,
            temperature: self.settings.temperature,
            seed: Some(seed),
        };
        tracing::debug!(
            target: "selection",
            layer = D::LAYER,
            request_id = %request.request_id,
            prompt_chars = request.user_prompt.len(),
            "assisted_request_started"
        );

        let reply = match tokio::time::timeout(self.settings.timeout, port.complete(request)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => return Err(SoftFailure::Service(err.to_string())),
            Err(_) => {
                return Err(SoftFailure::Timeout {
                    timeout_ms: self.settings.timeout.as_millis() as u64,
                });
            }
        };

        contract::parse_selection(&reply, set)
    }
}
