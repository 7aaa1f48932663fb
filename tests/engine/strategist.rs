use std::collections::BTreeSet;

use time::{Date, Month};

use atelier::{
    catalog::strategy::builtin_strategy_catalog,
    engine::{CreativeEngine, EngineSettings},
    strategist::{Season, StrategyContext, VisualStrategist},
};

fn strategist() -> VisualStrategist {
    VisualStrategist::new(CreativeEngine::new(
        builtin_strategy_catalog().expect("builtin catalog should load"),
        EngineSettings::default(),
    ))
}

fn context(calendar_id: &str, post_index: u64) -> StrategyContext {
    StrategyContext {
        calendar_id: calendar_id.to_string(),
        post_index,
        total_posts: 12,
        sector: "Agroalimentaire et boissons".to_string(),
        usage_occasions: vec!["breakfast".to_string()],
        brand_values: vec!["authenticity".to_string(), "freshness".to_string()],
        product_benefits: vec!["vitamin C".to_string()],
        has_products: true,
        platform: "instagram".to_string(),
        country: "France".to_string(),
        scheduled_date: Date::from_calendar_date(2026, Month::July, 14)
            .expect("valid calendar date"),
        season: None,
        seed: None,
        objective: None,
        assisted_context: None,
    }
}

#[tokio::test]
async fn given_calendar_when_generating_then_concepts_do_not_repeat_inside_the_window() {
    let strategist = strategist();

    let mut concepts = Vec::new();
    for post_index in 0..12 {
        let strategy = strategist
            .generate(&context("cal-1", post_index))
            .await
            .expect("strategy should be generated");
        concepts.push(strategy.concept);
    }

    assert_eq!(concepts.iter().collect::<BTreeSet<_>>().len(), 12);
    let stats = strategist.calendar_stats("cal-1").await;
    assert_eq!(stats.total_strategies, 12);
    assert_eq!(stats.unique_concepts, 12);
    assert!(stats.unique_styles >= 5);
}

#[tokio::test]
async fn given_summer_date_when_generating_then_mood_and_context_follow_inputs() {
    let strategist = strategist();

    let strategy = strategist
        .generate(&context("cal-1", 0))
        .await
        .expect("strategy should be generated");

    assert!(strategy.mood.ends_with("Vibrant warmth, joyful abundance"));
    assert_eq!(
        strategy.cultural_context,
        "French lifestyle authenticity, artisanal heritage"
    );
    assert_eq!(
        strategy.product_integration,
        "40% frame occupation, natural lifestyle placement"
    );
    assert_eq!(strategy.diversity_score, 100.0);
    assert_eq!(strategy.to_json()["path"], "deterministic");
}

#[tokio::test]
async fn given_explicit_season_then_it_overrides_the_scheduled_month() {
    let strategist = strategist();
    let mut context = context("cal-1", 0);
    context.season = Some(Season::Winter);

    let strategy = strategist
        .generate(&context)
        .await
        .expect("strategy should be generated");

    assert!(strategy.mood.ends_with("Intimate warmth, sophisticated elegance"));
}

#[tokio::test]
async fn given_calendar_reset_then_stats_are_cleared() {
    let strategist = strategist();
    strategist
        .generate(&context("cal-1", 0))
        .await
        .expect("strategy should be generated");

    assert!(strategist.reset_calendar("cal-1").await);
    assert!(!strategist.reset_calendar("cal-1").await);
    assert_eq!(strategist.calendar_stats("cal-1").await.total_strategies, 0);
}

#[tokio::test]
async fn given_same_seed_on_fresh_calendars_then_strategies_match() {
    let strategist = strategist();
    let mut first = context("cal-a", 3);
    first.seed = Some(2024);
    let mut second = context("cal-b", 3);
    second.seed = Some(2024);

    let left = strategist.generate(&first).await.expect("strategy");
    let right = strategist.generate(&second).await.expect("strategy");

    assert_eq!(left.concept, right.concept);
    assert_eq!(left.photography_style, right.photography_style);
    assert_eq!(left.unique_angle, right.unique_angle);
}
