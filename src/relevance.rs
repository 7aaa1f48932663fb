use std::{collections::BTreeMap, sync::Arc};

use crate::{
    catalog::{AttributeCatalog, AttributeEntry, Dimension, RelevanceRule},
    error::{EngineError, invalid_catalog, invariant_violation},
    telemetry::{self, EngineTelemetryEvent, EngineTelemetryHook},
};

pub const DEFAULT_SECTOR_KEY: &str = "default";

/// Lookup tables that turn free-text sector, occasion and objective labels into
/// category tags. Sector rows are ordered: the first alias found in a label wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevanceTables {
    sectors: Vec<(String, Vec<String>)>,
    occasions: BTreeMap<String, Vec<String>>,
    objectives: BTreeMap<String, Vec<String>>,
}

impl RelevanceTables {
    pub fn new(
        sectors: Vec<(String, Vec<String>)>,
        occasions: BTreeMap<String, Vec<String>>,
        objectives: BTreeMap<String, Vec<String>>,
    ) -> Result<Self, EngineError> {
        let sectors: Vec<(String, Vec<String>)> = sectors
            .into_iter()
            .map(|(key, tags)| (normalize(&key), normalize_all(tags)))
            .collect();
        if !sectors.iter().any(|(key, _)| key == DEFAULT_SECTOR_KEY) {
            return Err(invalid_catalog(
                "sector table must contain a 'default' entry",
            ));
        }

        Ok(Self {
            sectors,
            occasions: occasions
                .into_iter()
                .map(|(key, tags)| (normalize(&key), normalize_all(tags)))
                .collect(),
            objectives: objectives
                .into_iter()
                .map(|(key, tags)| (normalize(&key), normalize_all(tags)))
                .collect(),
        })
    }

    pub fn builtin() -> Self {
        Self {
            sectors: rows_to_vec(SECTOR_ROWS),
            occasions: rows_to_vec(OCCASION_ROWS).into_iter().collect(),
            objectives: rows_to_vec(OBJECTIVE_ROWS).into_iter().collect(),
        }
    }

    /// Exact key, then the first alias found as a whole word inside the label,
    /// then `default`.
    pub fn sector_tags(&self, sector: &str) -> &[String] {
        self.resolve_sector(sector)
            .map(|(_, tags)| tags.as_slice())
            .unwrap_or_else(|| self.default_tags())
    }

    pub fn is_known_sector(&self, sector: &str) -> bool {
        self.resolve_sector(sector).is_some()
    }

    fn resolve_sector(&self, sector: &str) -> Option<&(String, Vec<String>)> {
        let wanted = normalize(sector);
        let mut named = self
            .sectors
            .iter()
            .filter(|(key, _)| key != DEFAULT_SECTOR_KEY);
        named
            .clone()
            .find(|(key, _)| *key == wanted)
            .or_else(|| named.find(|(key, _)| contains_word(&wanted, key)))
    }

    /// Unknown occasions contribute their own label as a tag.
    pub fn occasion_tags(&self, occasions: &[String]) -> Vec<String> {
        let mut tags = Vec::new();
        for occasion in occasions {
            let key = normalize(occasion);
            if key.is_empty() {
                continue;
            }
            match self.occasions.get(&key) {
                Some(mapped) => extend_unique(&mut tags, mapped),
                None => extend_unique(&mut tags, std::slice::from_ref(&key)),
            }
        }
        tags
    }

    pub fn objective_tags(&self, objective: Option<&str>) -> &[String] {
        objective
            .and_then(|objective| self.objectives.get(&normalize(objective)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn default_tags(&self) -> &[String] {
        self.sectors
            .iter()
            .find(|(key, _)| key == DEFAULT_SECTOR_KEY)
            .map(|(_, tags)| tags.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for RelevanceTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevanceQuery {
    pub sector: String,
    pub occasions: Vec<String>,
    pub objective: Option<String>,
}

impl RelevanceQuery {
    pub fn new(sector: impl Into<String>, occasions: &[&str]) -> Self {
        Self {
            sector: sector.into(),
            occasions: occasions.iter().map(|value| value.to_string()).collect(),
            objective: None,
        }
    }

    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = Some(objective.into());
        self
    }
}

/// Per-request candidate pools, one non-empty sequence per dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredSet<D: Dimension> {
    pools: BTreeMap<D, Vec<AttributeEntry>>,
    degraded: Vec<D>,
}

impl<D: Dimension> FilteredSet<D> {
    pub fn new(pools: BTreeMap<D, Vec<AttributeEntry>>) -> Result<Self, EngineError> {
        for dimension in D::ALL {
            if pools.get(dimension).is_none_or(Vec::is_empty) {
                return Err(invariant_violation(format!(
                    "filtered set has no candidates for dimension '{}'",
                    dimension.label()
                )));
            }
        }
        Ok(Self {
            pools,
            degraded: Vec::new(),
        })
    }

    /// Whole catalog, unfiltered.
    pub fn unfiltered(catalog: &AttributeCatalog<D>) -> Result<Self, EngineError> {
        Self::new(
            D::ALL
                .iter()
                .map(|dimension| (*dimension, catalog.entries(*dimension).to_vec()))
                .collect(),
        )
    }

    pub fn pool(&self, dimension: D) -> &[AttributeEntry] {
        self.pools
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self, dimension: D) -> usize {
        self.pool(dimension).len()
    }

    /// Dimensions that fell back to the unfiltered catalog.
    pub fn degraded(&self) -> &[D] {
        &self.degraded
    }
}

pub struct RelevanceFilter<D: Dimension> {
    catalog: Arc<AttributeCatalog<D>>,
    tables: Arc<RelevanceTables>,
    telemetry: Option<EngineTelemetryHook>,
}

impl<D: Dimension> RelevanceFilter<D> {
    pub fn new(catalog: Arc<AttributeCatalog<D>>, tables: Arc<RelevanceTables>) -> Self {
        Self {
            catalog,
            tables,
            telemetry: None,
        }
    }

    pub fn with_telemetry(mut self, hook: EngineTelemetryHook) -> Self {
        self.telemetry = Some(hook);
        self
    }

    pub fn catalog(&self) -> &AttributeCatalog<D> {
        &self.catalog
    }

    pub fn filter(&self, query: &RelevanceQuery) -> FilteredSet<D> {
        let sector_tags = self.tables.sector_tags(&query.sector).to_vec();
        let occasion_tags = self.tables.occasion_tags(&query.occasions);
        let objective_tags = self.tables.objective_tags(query.objective.as_deref());

        if !self.tables.is_known_sector(&query.sector) {
            tracing::debug!(
                target: "relevance",
                sector = %query.sector,
                "sector_unmapped_using_default"
            );
        }

        let mut pools = BTreeMap::new();
        let mut degraded = Vec::new();
        for dimension in D::ALL {
            let entries = self.catalog.entries(*dimension);
            let retained: Vec<AttributeEntry> = match dimension.relevance() {
                RelevanceRule::Universal => entries.to_vec(),
                RelevanceRule::Sector => {
                    let mut tags = sector_tags.clone();
                    if *dimension == D::REFERENCE {
                        extend_unique(&mut tags, objective_tags);
                    }
                    retain_matching(entries, &tags)
                }
                RelevanceRule::SectorAndOccasion => entries
                    .iter()
                    .filter(|entry| {
                        entry.matches_any(&sector_tags) || entry.matches_any(&occasion_tags)
                    })
                    .cloned()
                    .collect(),
            };

            if retained.is_empty() {
                degraded.push(*dimension);
                tracing::warn!(
                    target: "relevance",
                    layer = D::LAYER,
                    dimension = dimension.label(),
                    sector = %query.sector,
                    "relevance_degraded_unfiltered_fallback"
                );
                telemetry::emit(
                    self.telemetry.as_ref(),
                    EngineTelemetryEvent::RelevanceDegraded {
                        layer: D::LAYER,
                        dimension: dimension.label(),
                        sector: query.sector.clone(),
                    },
                );
                pools.insert(*dimension, entries.to_vec());
            } else {
                pools.insert(*dimension, retained);
            }
        }

        tracing::debug!(
            target: "relevance",
            layer = D::LAYER,
            sector = %query.sector,
            occasions = query.occasions.len(),
            degraded = degraded.len(),
            "relevance_filtered"
        );

        FilteredSet { pools, degraded }
    }
}

fn retain_matching(entries: &[AttributeEntry], tags: &[String]) -> Vec<AttributeEntry> {
    entries
        .iter()
        .filter(|entry| entry.matches_any(tags))
        .cloned()
        .collect()
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(index, _)| {
        let before = haystack[..index].chars().next_back();
        let after = haystack[index + needle.len()..].chars().next();
        before.is_none_or(|c| !c.is_alphanumeric()) && after.is_none_or(|c| !c.is_alphanumeric())
    })
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn normalize_all(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .map(|value| normalize(value))
        .filter(|value| !value.is_empty())
        .collect()
}

fn extend_unique(target: &mut Vec<String>, values: &[String]) {
    for value in values {
        if !target.contains(value) {
            target.push(value.clone());
        }
    }
}

type TableRow = (&'static str, &'static [&'static str]);

fn rows_to_vec(rows: &[TableRow]) -> Vec<(String, Vec<String>)> {
    rows.iter()
        .map(|(key, tags)| {
            (
                key.to_string(),
                tags.iter().map(|tag| tag.to_string()).collect(),
            )
        })
        .collect()
}

const BEVERAGE_TAGS: &[&str] = &[
    "beverage",
    "food",
    "lifestyle",
    "sport",
    "sustainability",
    "studio",
    "flatlay",
];
const FOOD_TAGS: &[&str] = &["food", "beverage", "lifestyle", "studio", "flatlay", "nature"];
const BEAUTY_TAGS: &[&str] = &["beauty", "cosmetic", "wellness", "studio", "minimal"];
const FASHION_TAGS: &[&str] = &["fashion", "luxury", "lifestyle", "editorial"];
const TECH_TAGS: &[&str] = &["tech", "innovation", "work", "studio", "minimal"];
const WELLNESS_TAGS: &[&str] = &["wellness", "beauty", "lifestyle", "sport"];
const HEALTH_TAGS: &[&str] = &["health", "wellness", "clinical", "beauty"];

const SECTOR_ROWS: &[TableRow] = &[
    ("beverage", BEVERAGE_TAGS),
    ("beverages", BEVERAGE_TAGS),
    ("drinks", BEVERAGE_TAGS),
    ("boissons", BEVERAGE_TAGS),
    ("food", FOOD_TAGS),
    ("agroalimentaire", FOOD_TAGS),
    ("fmcg", FOOD_TAGS),
    ("biens de consommation", FOOD_TAGS),
    ("restaurant", FOOD_TAGS),
    ("retail", &["food", "lifestyle", "studio", "flatlay"]),
    ("cosmetic", BEAUTY_TAGS),
    ("beauty", BEAUTY_TAGS),
    ("beauté", BEAUTY_TAGS),
    ("chimie", HEALTH_TAGS),
    ("pharmaceutique", HEALTH_TAGS),
    ("pharma", HEALTH_TAGS),
    ("santé", HEALTH_TAGS),
    ("health", HEALTH_TAGS),
    ("fashion", FASHION_TAGS),
    ("mode", FASHION_TAGS),
    ("luxury", &["luxury", "fashion", "studio"]),
    ("luxe", &["luxury", "fashion", "studio"]),
    ("artisanat", &["fashion", "craft", "heritage", "documentary"]),
    ("tech", TECH_TAGS),
    ("informatique", TECH_TAGS),
    ("technologies", TECH_TAGS),
    ("technology", TECH_TAGS),
    ("télécommunications", TECH_TAGS),
    ("communication", &["tech", "social", "lifestyle", "editorial"]),
    ("wellness", WELLNESS_TAGS),
    ("bien-être", WELLNESS_TAGS),
    ("sport", &["sport", "wellness", "beverage", "outdoor"]),
    ("lifestyle", &["lifestyle", "wellness", "home", "documentary"]),
    ("automotive", &["automotive", "tech", "luxury"]),
    ("automobile", &["automotive", "tech", "luxury"]),
    ("finance", &["finance", "corporate", "documentary", "work"]),
    ("banque", &["finance", "corporate", "documentary", "work"]),
    (DEFAULT_SECTOR_KEY, &["lifestyle", "studio", "documentary"]),
];

const OCCASION_ROWS: &[TableRow] = &[
    ("breakfast", &["breakfast", "morning", "brunch", "coffee"]),
    ("brunch", &["brunch", "breakfast", "morning"]),
    ("refreshment", &["refreshment", "summer", "sport", "outdoor"]),
    ("lunch", &["meal", "midday", "family"]),
    ("dinner", &["dinner", "evening", "gourmet", "meal"]),
    ("snack", &["snack", "on-the-go", "treat"]),
    ("party", &["celebration", "evening", "party"]),
    ("celebration", &["celebration", "evening", "party"]),
    ("workout", &["sport", "workout", "refreshment"]),
    ("relaxation", &["relaxation", "evening", "wellness"]),
    ("work", &["work", "office", "energy"]),
    ("travel", &["travel", "on-the-go"]),
    ("skincare", &["morning", "wellness", "beauty"]),
];

const OBJECTIVE_ROWS: &[TableRow] = &[
    ("awareness", &["cinematic", "editorial", "documentary"]),
    ("engagement", &["lifestyle", "flatlay"]),
    ("consideration", &["documentary", "craft"]),
    ("conversion", &["studio", "packshot"]),
    ("loyalty", &["lifestyle", "heritage"]),
    ("launch", &["studio", "innovation", "experimental"]),
];
