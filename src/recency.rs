use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    fmt,
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    catalog::{AttributeEntry, Dimension},
    selection::CreativeSelection,
    telemetry::{self, EngineTelemetryEvent, EngineTelemetryHook},
};

/// Independent unit of recency state: one calendar, optionally refined by brand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectionScope {
    pub calendar_id: String,
    pub brand_id: Option<String>,
}

impl SelectionScope {
    pub fn new(calendar_id: impl Into<String>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            brand_id: None,
        }
    }

    pub fn with_brand(mut self, brand_id: impl Into<String>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }
}

impl fmt::Display for SelectionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.brand_id {
            Some(brand_id) => write!(f, "{}/{}", self.calendar_id, brand_id),
            None => write!(f, "{}", self.calendar_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecencyConfig {
    #[serde(default = "default_window")]
    pub window: usize,
    /// Overrides keyed by dimension label, case-insensitive.
    #[serde(default)]
    pub minimum_viable: BTreeMap<String, usize>,
    #[serde(default = "default_max_scopes")]
    pub max_scopes: usize,
    #[serde(default = "default_selection_log")]
    pub selection_log: usize,
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            minimum_viable: BTreeMap::new(),
            max_scopes: default_max_scopes(),
            selection_log: default_selection_log(),
        }
    }
}

impl RecencyConfig {
    pub fn minimum_viable_for<D: Dimension>(&self, dimension: D) -> usize {
        self.minimum_viable
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(dimension.label()))
            .map(|(_, count)| *count)
            .unwrap_or_else(|| dimension.default_minimum_viable())
    }
}

fn default_window() -> usize {
    15
}

fn default_max_scopes() -> usize {
    1024
}

fn default_selection_log() -> usize {
    50
}

/// FIFO of the last `width` names chosen for one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecencyWindow {
    width: usize,
    names: VecDeque<String>,
}

impl RecencyWindow {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            names: VecDeque::with_capacity(width),
        }
    }

    pub fn push(&mut self, name: impl Into<String>) {
        if self.width == 0 {
            return;
        }
        while self.names.len() >= self.width {
            self.names.pop_front();
        }
        self.names.push_back(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Result of excluding windowed names from a pool.
#[derive(Debug)]
pub struct Candidates<'a> {
    pub entries: Vec<&'a AttributeEntry>,
    /// Set when the window was cleared; holds how many candidates were left.
    pub exhausted_with: Option<usize>,
}

/// All recency state of one scope.
#[derive(Debug)]
pub struct ScopeHistory<D: Dimension> {
    scope: SelectionScope,
    windows: BTreeMap<D, RecencyWindow>,
    minimum_viable: BTreeMap<D, usize>,
    log: VecDeque<CreativeSelection<D>>,
    log_capacity: usize,
}

impl<D: Dimension> ScopeHistory<D> {
    pub fn new(scope: SelectionScope, config: &RecencyConfig) -> Self {
        Self {
            scope,
            windows: D::ALL
                .iter()
                .map(|dimension| (*dimension, RecencyWindow::new(config.window)))
                .collect(),
            minimum_viable: D::ALL
                .iter()
                .map(|dimension| (*dimension, config.minimum_viable_for(*dimension)))
                .collect(),
            log: VecDeque::new(),
            log_capacity: config.selection_log,
        }
    }

    pub fn scope(&self) -> &SelectionScope {
        &self.scope
    }

    pub fn is_excluded(&self, dimension: D, name: &str) -> bool {
        self.windows
            .get(&dimension)
            .is_some_and(|window| window.contains(name))
    }

    /// Pool minus windowed names. When fewer than the minimum viable count would
    /// remain, the dimension's window is cleared and the whole pool is returned.
    pub fn candidates_excluding<'a>(
        &mut self,
        dimension: D,
        pool: &'a [AttributeEntry],
    ) -> Candidates<'a> {
        let remaining: Vec<&AttributeEntry> = pool
            .iter()
            .filter(|entry| !self.is_excluded(dimension, &entry.name))
            .collect();
        let minimum = self
            .minimum_viable
            .get(&dimension)
            .copied()
            .unwrap_or_else(|| dimension.default_minimum_viable());

        if remaining.len() >= minimum {
            return Candidates {
                entries: remaining,
                exhausted_with: None,
            };
        }

        if let Some(window) = self.windows.get_mut(&dimension) {
            window.clear();
        }
        Candidates {
            entries: pool.iter().collect(),
            exhausted_with: Some(remaining.len()),
        }
    }

    pub fn record(&mut self, dimension: D, name: &str) {
        if let Some(window) = self.windows.get_mut(&dimension) {
            window.push(name);
        }
    }

    /// Records every chosen name and appends the selection to the bounded log.
    pub fn record_selection(&mut self, selection: &CreativeSelection<D>) {
        for (dimension, entry) in selection.choices() {
            self.record(dimension, &entry.name);
        }
        if self.log_capacity == 0 {
            return;
        }
        while self.log.len() >= self.log_capacity {
            self.log.pop_front();
        }
        self.log.push_back(selection.clone());
    }

    pub fn window(&self, dimension: D) -> Vec<String> {
        self.windows
            .get(&dimension)
            .map(|window| window.names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn window_len(&self, dimension: D) -> usize {
        self.windows.get(&dimension).map_or(0, RecencyWindow::len)
    }

    pub fn recent_selections(&self) -> impl Iterator<Item = &CreativeSelection<D>> {
        self.log.iter()
    }

    pub fn clear(&mut self) {
        for window in self.windows.values_mut() {
            window.clear();
        }
        self.log.clear();
    }
}

pub type SharedScopeHistory<D> = Arc<Mutex<ScopeHistory<D>>>;

struct ScopeSlot<D: Dimension> {
    history: SharedScopeHistory<D>,
    last_used: u64,
}

struct ScopeMap<D: Dimension> {
    slots: HashMap<SelectionScope, ScopeSlot<D>>,
    clock: u64,
}

/// Owned store of per-scope histories. The map lock is held only to look up or
/// insert a slot; each scope then has its own lock, so selections on the same
/// scope serialize while distinct scopes proceed in parallel.
pub struct RecencyTracker<D: Dimension> {
    config: RecencyConfig,
    scopes: Mutex<ScopeMap<D>>,
    telemetry: Option<EngineTelemetryHook>,
}

impl<D: Dimension> RecencyTracker<D> {
    pub fn new(config: RecencyConfig) -> Self {
        Self {
            config,
            scopes: Mutex::new(ScopeMap {
                slots: HashMap::new(),
                clock: 0,
            }),
            telemetry: None,
        }
    }

    pub fn with_telemetry(mut self, hook: EngineTelemetryHook) -> Self {
        self.telemetry = Some(hook);
        self
    }

    pub fn config(&self) -> &RecencyConfig {
        &self.config
    }

    /// Returns the scope's history, creating it on first touch and evicting the
    /// least recently used scope when the store is full.
    pub async fn scope(&self, scope: &SelectionScope) -> SharedScopeHistory<D> {
        let mut evicted = Vec::new();
        let history = {
            let mut map = self.scopes.lock().await;
            map.clock += 1;
            let now = map.clock;

            let history = match map.slots.get_mut(scope) {
                Some(slot) => {
                    slot.last_used = now;
                    Arc::clone(&slot.history)
                }
                None => {
                    let history = Arc::new(Mutex::new(ScopeHistory::new(
                        scope.clone(),
                        &self.config,
                    )));
                    map.slots.insert(
                        scope.clone(),
                        ScopeSlot {
                            history: Arc::clone(&history),
                            last_used: now,
                        },
                    );
                    history
                }
            };

            let capacity = self.config.max_scopes.max(1);
            while map.slots.len() > capacity {
                let Some(oldest) = map
                    .slots
                    .iter()
                    .filter(|(key, _)| *key != scope)
                    .min_by_key(|(_, slot)| slot.last_used)
                    .map(|(key, _)| key.clone())
                else {
                    break;
                };
                map.slots.remove(&oldest);
                evicted.push(oldest);
            }

            history
        };

        for scope in evicted {
            tracing::info!(
                target: "recency",
                layer = D::LAYER,
                scope = %scope,
                "scope_evicted"
            );
            telemetry::emit(
                self.telemetry.as_ref(),
                EngineTelemetryEvent::ScopeEvicted {
                    layer: D::LAYER,
                    scope: scope.to_string(),
                },
            );
        }

        history
    }

    async fn existing(&self, scope: &SelectionScope) -> Option<SharedScopeHistory<D>> {
        let map = self.scopes.lock().await;
        map.slots.get(scope).map(|slot| Arc::clone(&slot.history))
    }

    pub async fn is_excluded(&self, scope: &SelectionScope, dimension: D, name: &str) -> bool {
        match self.existing(scope).await {
            Some(history) => history.lock().await.is_excluded(dimension, name),
            None => false,
        }
    }

    pub async fn candidates_excluding(
        &self,
        scope: &SelectionScope,
        dimension: D,
        pool: &[AttributeEntry],
    ) -> Vec<AttributeEntry> {
        let history = self.scope(scope).await;
        let mut history = history.lock().await;
        history
            .candidates_excluding(dimension, pool)
            .entries
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn record(&self, scope: &SelectionScope, dimension: D, name: &str) {
        let history = self.scope(scope).await;
        history.lock().await.record(dimension, name);
    }

    /// Drops the scope's state. Returns whether the scope existed.
    pub async fn reset_scope(&self, scope: &SelectionScope) -> bool {
        let removed = {
            let mut map = self.scopes.lock().await;
            map.slots.remove(scope)
        };
        match removed {
            Some(slot) => {
                slot.history.lock().await.clear();
                tracing::info!(
                    target: "recency",
                    layer = D::LAYER,
                    scope = %scope,
                    "scope_reset"
                );
                true
            }
            None => false,
        }
    }

    /// Resets every scope of one calendar, whatever its brand refinement.
    pub async fn reset_calendar(&self, calendar_id: &str) -> usize {
        let removed: Vec<ScopeSlot<D>> = {
            let mut map = self.scopes.lock().await;
            let keys: Vec<SelectionScope> = map
                .slots
                .keys()
                .filter(|scope| scope.calendar_id == calendar_id)
                .cloned()
                .collect();
            keys.iter()
                .filter_map(|key| map.slots.remove(key))
                .collect()
        };
        for slot in &removed {
            slot.history.lock().await.clear();
        }
        removed.len()
    }

    pub async fn window(&self, scope: &SelectionScope, dimension: D) -> Vec<String> {
        match self.existing(scope).await {
            Some(history) => history.lock().await.window(dimension),
            None => Vec::new(),
        }
    }

    pub async fn recent_selections(&self, scope: &SelectionScope) -> Vec<CreativeSelection<D>> {
        match self.existing(scope).await {
            Some(history) => history.lock().await.recent_selections().cloned().collect(),
            None => Vec::new(),
        }
    }

    pub async fn scope_count(&self) -> usize {
        self.scopes.lock().await.slots.len()
    }
}
