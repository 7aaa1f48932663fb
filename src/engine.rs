use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{
    catalog::{AttributeCatalog, Dimension},
    error::{EngineError, invalid_request},
    reasoning::ReasoningPort,
    recency::{RecencyConfig, RecencyTracker, SelectionScope},
    relevance::{FilteredSet, RelevanceFilter, RelevanceQuery, RelevanceTables},
    scoring::{DiversityScorer, DiversityStats, ScoringConfig},
    selection::{
        AssistedContext, AssistedSelector, AssistedSettings, CreativeSelection, derive_seed,
        hash::normalize_seed, select_deterministic,
    },
    telemetry::{self, EngineTelemetryEvent, EngineTelemetryHook},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSettings {
    #[serde(default)]
    pub recency: RecencyConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// One `select_creative_attributes` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    pub sector: String,
    pub usage_occasions: Vec<String>,
    pub scope_id: String,
    pub brand_id: Option<String>,
    pub seed: Option<u64>,
    pub post_index: u64,
    pub objective: Option<String>,
    pub assisted_context: Option<AssistedContext>,
}

impl SelectionRequest {
    pub fn new(sector: impl Into<String>, usage_occasions: &[&str], scope_id: impl Into<String>) -> Self {
        Self {
            sector: sector.into(),
            usage_occasions: usage_occasions.iter().map(|value| value.to_string()).collect(),
            scope_id: scope_id.into(),
            ..Self::default()
        }
    }

    pub fn with_brand(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_post_index(mut self, post_index: u64) -> Self {
        self.post_index = post_index;
        self
    }

    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = Some(objective.into());
        self
    }

    pub fn with_assisted_context(mut self, context: AssistedContext) -> Self {
        self.assisted_context = Some(context);
        self
    }

    pub fn scope(&self) -> SelectionScope {
        let scope = SelectionScope::new(self.scope_id.trim());
        match &self.brand_id {
            Some(brand_id) if !brand_id.trim().is_empty() => scope.with_brand(brand_id.trim()),
            _ => scope,
        }
    }

    fn query(&self) -> RelevanceQuery {
        RelevanceQuery {
            sector: self.sector.clone(),
            occasions: self.usage_occasions.clone(),
            objective: self.objective.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSelection<D: Dimension> {
    pub selection: CreativeSelection<D>,
    /// Diversity against the scope's history before this selection was recorded.
    pub diversity_score: f64,
}

impl<D: Dimension> ScoredSelection<D> {
    pub fn to_json(&self) -> Value {
        let mut value = self.selection.to_json();
        value["diversity_score"] = json!(self.diversity_score);
        value
    }
}

/// Facade over filter, recency store, selectors and scorer for one dimension set.
pub struct CreativeEngine<D: Dimension> {
    catalog: Arc<AttributeCatalog<D>>,
    tables: Arc<RelevanceTables>,
    filter: RelevanceFilter<D>,
    tracker: RecencyTracker<D>,
    assisted: AssistedSelector,
    scorer: DiversityScorer<D>,
    telemetry: Option<EngineTelemetryHook>,
}

impl<D: Dimension> CreativeEngine<D> {
    pub fn new(catalog: AttributeCatalog<D>, settings: EngineSettings) -> Self {
        let catalog = Arc::new(catalog);
        let tables = Arc::new(RelevanceTables::builtin());
        Self {
            filter: RelevanceFilter::new(Arc::clone(&catalog), Arc::clone(&tables)),
            catalog,
            tables,
            tracker: RecencyTracker::new(settings.recency),
            assisted: AssistedSelector::disabled(),
            scorer: DiversityScorer::new(settings.scoring),
            telemetry: None,
        }
    }

    pub fn with_tables(mut self, tables: RelevanceTables) -> Self {
        self.tables = Arc::new(tables);
        self.rebuild_filter();
        self
    }

    pub fn with_reasoner(mut self, port: Arc<dyn ReasoningPort>, settings: AssistedSettings) -> Self {
        self.assisted = AssistedSelector::new(port, settings);
        if let Some(hook) = &self.telemetry {
            self.assisted = self.assisted.with_telemetry(Arc::clone(hook));
        }
        self
    }

    pub fn with_telemetry(mut self, hook: EngineTelemetryHook) -> Self {
        self.tracker = self.tracker.with_telemetry(Arc::clone(&hook));
        self.assisted = self.assisted.with_telemetry(Arc::clone(&hook));
        self.telemetry = Some(hook);
        self.rebuild_filter();
        self
    }

    fn rebuild_filter(&mut self) {
        let filter = RelevanceFilter::new(Arc::clone(&self.catalog), Arc::clone(&self.tables));
        self.filter = match &self.telemetry {
            Some(hook) => filter.with_telemetry(Arc::clone(hook)),
            None => filter,
        };
    }

    pub fn catalog(&self) -> &AttributeCatalog<D> {
        &self.catalog
    }

    pub fn tracker(&self) -> &RecencyTracker<D> {
        &self.tracker
    }

    pub fn filter(&self, query: &RelevanceQuery) -> FilteredSet<D> {
        self.filter.filter(query)
    }

    /// Total unless the catalog is broken or the scope id is empty.
    pub async fn select_creative_attributes(
        &self,
        request: SelectionRequest,
    ) -> Result<ScoredSelection<D>, EngineError> {
        if request.scope_id.trim().is_empty() {
            return Err(invalid_request("scope id cannot be empty"));
        }

        let scope = request.scope();
        let set = self.filter.filter(&request.query());
        let seed = match request.seed {
            Some(seed) => normalize_seed(seed),
            None => derive_seed(&scope, request.post_index, now_millis()),
        };

        let history = self.tracker.scope(&scope).await;
        let mut history = history.lock().await;
        let prior: Vec<CreativeSelection<D>> = history.recent_selections().cloned().collect();

        let selection = match &request.assisted_context {
            Some(context) => {
                self.assisted
                    .select(&set, context, &mut history, request.post_index, seed)
                    .await?
            }
            None => select_deterministic(&set, &mut history, seed, self.telemetry.as_ref())?,
        };
        drop(history);

        let diversity_score = self.scorer.score(&selection, &prior);
        let path = selection.source().path();
        tracing::info!(
            target: "engine",
            layer = D::LAYER,
            scope = %scope,
            path = path,
            post_index = request.post_index,
            reference = selection.name(D::REFERENCE),
            diversity_score = diversity_score,
            "selection_completed"
        );
        telemetry::emit(
            self.telemetry.as_ref(),
            EngineTelemetryEvent::SelectionCompleted {
                layer: D::LAYER,
                scope: scope.to_string(),
                path,
                diversity_score,
            },
        );

        Ok(ScoredSelection {
            selection,
            diversity_score,
        })
    }

    pub async fn reset_scope(&self, scope: &SelectionScope) -> bool {
        self.tracker.reset_scope(scope).await
    }

    pub async fn reset_calendar(&self, calendar_id: &str) -> usize {
        self.tracker.reset_calendar(calendar_id).await
    }

    pub async fn diversity_stats(&self, scope: &SelectionScope) -> DiversityStats {
        let history = self.tracker.recent_selections(scope).await;
        self.scorer.stats(&history)
    }

    pub async fn window(&self, scope: &SelectionScope, dimension: D) -> Vec<String> {
        self.tracker.window(scope, dimension).await
    }
}

fn now_millis() -> u64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    u64::try_from(nanos / 1_000_000).unwrap_or_default()
}
