use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::{Date, Month};

use crate::{
    catalog::{Dimension, StrategyDimension},
    engine::{CreativeEngine, SelectionRequest},
    error::EngineError,
    recency::SelectionScope,
    selection::{AssistedContext, CreativeSelection, SelectionSource, derive_seed, hash_to_index},
};

pub const ANGLE_SALT: u64 = 7963;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Northern-hemisphere meteorological seasons.
    pub fn from_month(month: Month) -> Self {
        match month {
            Month::March | Month::April | Month::May => Self::Spring,
            Month::June | Month::July | Month::August => Self::Summer,
            Month::September | Month::October | Month::November => Self::Autumn,
            Month::December | Month::January | Month::February => Self::Winter,
        }
    }

    fn adjustment(self) -> &'static str {
        match self {
            Self::Spring => "Fresh renewal energy, optimistic brightness",
            Self::Summer => "Vibrant warmth, joyful abundance",
            Self::Autumn => "Cozy comfort, rich authenticity",
            Self::Winter => "Intimate warmth, sophisticated elegance",
        }
    }
}

/// Everything the strategist knows about one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyContext {
    pub calendar_id: String,
    pub post_index: u64,
    pub total_posts: u64,
    pub sector: String,
    pub usage_occasions: Vec<String>,
    pub brand_values: Vec<String>,
    pub product_benefits: Vec<String>,
    pub has_products: bool,
    pub platform: String,
    pub country: String,
    pub scheduled_date: Date,
    pub season: Option<Season>,
    pub seed: Option<u64>,
    pub objective: Option<String>,
    pub assisted_context: Option<AssistedContext>,
}

impl StrategyContext {
    pub fn season(&self) -> Season {
        self.season
            .unwrap_or_else(|| Season::from_month(self.scheduled_date.month()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualStrategy {
    pub concept: String,
    pub mood: String,
    pub setting: String,
    pub lighting_style: String,
    pub photography_style: String,
    pub composition: String,
    pub product_integration: String,
    pub cultural_context: String,
    pub unique_angle: String,
    pub diversity_score: f64,
    pub selection: CreativeSelection<StrategyDimension>,
}

impl VisualStrategy {
    pub fn to_json(&self) -> Value {
        json!({
            "layer": "strategy",
            "concept": self.concept,
            "mood": self.mood,
            "setting": self.setting,
            "lighting_style": self.lighting_style,
            "photography_style": self.photography_style,
            "composition": self.composition,
            "product_integration": self.product_integration,
            "cultural_context": self.cultural_context,
            "unique_angle": self.unique_angle,
            "diversity_score": self.diversity_score,
            "path": self.selection.source().path(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDiversityStats {
    pub total_strategies: usize,
    pub average_diversity_score: f64,
    pub unique_concepts: usize,
    pub unique_styles: usize,
}

/// Rich per-post layer built on the strategy-dimension engine. History is kept per
/// calendar.
pub struct VisualStrategist {
    engine: CreativeEngine<StrategyDimension>,
}

impl VisualStrategist {
    pub fn new(engine: CreativeEngine<StrategyDimension>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &CreativeEngine<StrategyDimension> {
        &self.engine
    }

    pub async fn generate(&self, context: &StrategyContext) -> Result<VisualStrategy, EngineError> {
        tracing::info!(
            target: "strategist",
            calendar_id = %context.calendar_id,
            post = context.post_index + 1,
            total_posts = context.total_posts,
            "strategy_generation_started"
        );

        let mut request = SelectionRequest {
            sector: context.sector.clone(),
            usage_occasions: context.usage_occasions.clone(),
            scope_id: context.calendar_id.clone(),
            brand_id: None,
            seed: context.seed,
            post_index: context.post_index,
            objective: context.objective.clone(),
            assisted_context: None,
        };
        if let Some(assisted) = &context.assisted_context {
            request = request.with_assisted_context(assisted.clone());
        }
        let scored = self.engine.select_creative_attributes(request).await?;
        let selection = scored.selection;

        let concept = selection.name(StrategyDimension::Concept).to_string();
        let angle_seed = match selection.source() {
            SelectionSource::Deterministic { seed } => *seed,
            SelectionSource::Assisted { .. } => derive_seed(
                &SelectionScope::new(context.calendar_id.as_str()),
                context.post_index,
                0,
            ),
        };

        let strategy = VisualStrategy {
            mood: seasonal_mood(context.season(), &concept),
            setting: selection.name(StrategyDimension::Setting).to_string(),
            lighting_style: selection.name(StrategyDimension::Lighting).to_string(),
            photography_style: selection.name(StrategyDimension::PhotographyStyle).to_string(),
            composition: selection.name(StrategyDimension::Composition).to_string(),
            product_integration: product_integration(context.has_products, &context.platform),
            cultural_context: cultural_context(&context.country).to_string(),
            unique_angle: unique_angle(
                &context.brand_values,
                &context.product_benefits,
                context.has_products,
                angle_seed,
            ),
            diversity_score: scored.diversity_score,
            concept,
            selection,
        };

        tracing::info!(
            target: "strategist",
            calendar_id = %context.calendar_id,
            concept = %strategy.concept,
            diversity_score = strategy.diversity_score,
            "strategy_generated"
        );
        Ok(strategy)
    }

    pub async fn reset_calendar(&self, calendar_id: &str) -> bool {
        let removed = self.engine.reset_calendar(calendar_id).await > 0;
        tracing::info!(
            target: "strategist",
            calendar_id = %calendar_id,
            removed = removed,
            "calendar_strategies_reset"
        );
        removed
    }

    pub async fn calendar_stats(&self, calendar_id: &str) -> CalendarDiversityStats {
        let stats = self
            .engine
            .diversity_stats(&SelectionScope::new(calendar_id))
            .await;
        let unique = |dimension: StrategyDimension| {
            stats
                .unique_names
                .get(dimension.label())
                .copied()
                .unwrap_or_default()
        };

        CalendarDiversityStats {
            total_strategies: stats.total_selections,
            average_diversity_score: stats.average_score.round(),
            unique_concepts: unique(StrategyDimension::Concept),
            unique_styles: unique(StrategyDimension::PhotographyStyle),
        }
    }
}

pub fn seasonal_mood(season: Season, concept: &str) -> String {
    let concept = concept.to_lowercase();
    let base = if concept.contains("morning") {
        "Morning ritual energy"
    } else if concept.contains("family") || concept.contains("sharing") {
        "Shared moment warmth"
    } else if concept.contains("indulg") || concept.contains("gourmet") {
        "Indulgent pleasure"
    } else {
        "Authentic lifestyle moment"
    };
    format!("{base}, {}", season.adjustment())
}

pub fn cultural_context(country: &str) -> &'static str {
    match country.trim().to_lowercase().as_str() {
        "france" => "French lifestyle authenticity, artisanal heritage",
        "algeria" | "algérie" => "Algerian hospitality, Mediterranean lifestyle",
        "tunisia" | "tunisie" => "Tunisian elegance, coastal sophistication",
        "canada" => "Canadian natural lifestyle, multicultural harmony",
        "belgium" | "belgique" => "Belgian craftsmanship, European refinement",
        "switzerland" | "suisse" => "Swiss precision, alpine purity",
        _ => "International lifestyle, universal appeal",
    }
}

pub fn product_integration(has_products: bool, platform: &str) -> String {
    if !has_products {
        return "Brand presence through environment and mood, 20% visual weight".to_string();
    }
    match platform.trim().to_lowercase().as_str() {
        "instagram" => "40% frame occupation, natural lifestyle placement",
        "facebook" => "35% frame occupation, social context integration",
        "linkedin" => "30% frame occupation, professional environment",
        "tiktok" => "45% frame occupation, dynamic interaction",
        "twitter" | "x" => "35% frame occupation, clear product visibility",
        _ => "40% frame occupation, natural placement",
    }
    .to_string()
}

pub fn unique_angle(
    brand_values: &[String],
    product_benefits: &[String],
    has_products: bool,
    seed: u64,
) -> String {
    let values = if brand_values.is_empty() {
        "quality, authenticity".to_string()
    } else {
        brand_values.join(", ")
    };
    let benefits = if !has_products {
        "premium experience".to_string()
    } else if product_benefits.is_empty() {
        "premium quality".to_string()
    } else {
        product_benefits
            .iter()
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };

    let angles = [
        format!("Authentic {values} vs artificial perfection"),
        format!("Real {benefits} vs marketing promises"),
        "Genuine lifestyle integration vs staged photography".to_string(),
        format!("Natural {values} vs forced positioning"),
        format!("Honest {benefits} vs exaggerated claims"),
    ];
    let index = NonZeroUsize::new(angles.len())
        .map(|modulus| hash_to_index(seed, ANGLE_SALT, modulus))
        .unwrap_or_default();
    angles[index].clone()
}
