use std::collections::{BTreeMap, BTreeSet};

use atelier::{
    catalog::PresetDimension,
    engine::{CreativeEngine, EngineSettings, SelectionRequest},
    error::EngineErrorKind,
    recency::SelectionScope,
};

use crate::{preset_engine, uniform_catalog};

async fn run_calendar(
    engine: &CreativeEngine<PresetDimension>,
    scope_id: &str,
    posts: u64,
) -> Vec<BTreeMap<PresetDimension, String>> {
    let mut picks = Vec::new();
    for post_index in 0..posts {
        let scored = engine
            .select_creative_attributes(
                SelectionRequest::new("beverage", &["breakfast", "refreshment"], scope_id)
                    .with_post_index(post_index),
            )
            .await
            .expect("selection should succeed");
        picks.push(
            scored
                .selection
                .choices()
                .map(|(dimension, entry)| (dimension, entry.name.clone()))
                .collect(),
        );
    }
    picks
}

fn distinct(picks: &[BTreeMap<PresetDimension, String>], dimension: PresetDimension) -> usize {
    picks
        .iter()
        .map(|pick| pick[&dimension].as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

#[tokio::test]
async fn given_beverage_calendar_of_fifteen_posts_then_styles_and_contexts_vary() {
    let engine = preset_engine();

    let picks = run_calendar(&engine, "cal-1", 15).await;

    assert!(distinct(&picks, PresetDimension::Style) >= 5);
    assert!(distinct(&picks, PresetDimension::Context) >= 12);
}

#[tokio::test]
async fn given_ten_posts_then_no_style_appears_more_than_four_times() {
    let engine = preset_engine();

    let picks = run_calendar(&engine, "cal-1", 10).await;

    assert!(distinct(&picks, PresetDimension::Style) >= 8);
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for pick in &picks {
        *counts.entry(pick[&PresetDimension::Style].as_str()).or_default() += 1;
    }
    assert!(counts.values().all(|count| *count <= 4));
}

#[tokio::test]
async fn given_two_calendars_then_recency_state_is_independent() {
    let engine = preset_engine();

    run_calendar(&engine, "cal-1", 6).await;
    let cal_2_before = engine
        .window(&SelectionScope::new("cal-2"), PresetDimension::Style)
        .await;
    run_calendar(&engine, "cal-2", 3).await;

    assert!(cal_2_before.is_empty());
    assert_eq!(
        engine
            .window(&SelectionScope::new("cal-1"), PresetDimension::Style)
            .await
            .len(),
        6
    );
    assert_eq!(
        engine
            .window(&SelectionScope::new("cal-2"), PresetDimension::Style)
            .await
            .len(),
        3
    );
}

#[tokio::test]
async fn given_one_calendar_reset_then_the_other_calendar_next_pick_is_unchanged() {
    async fn next_cal_2_style(reset_cal_1: bool) -> String {
        let engine = preset_engine();
        for (scope_id, posts) in [("cal-1", 6u64), ("cal-2", 4)] {
            for post_index in 0..posts {
                engine
                    .select_creative_attributes(
                        SelectionRequest::new("beverage", &["breakfast"], scope_id)
                            .with_seed(100 + post_index)
                            .with_post_index(post_index),
                    )
                    .await
                    .expect("selection should succeed");
            }
        }
        if reset_cal_1 {
            assert!(engine.reset_scope(&SelectionScope::new("cal-1")).await);
            assert!(
                engine
                    .window(&SelectionScope::new("cal-1"), PresetDimension::Style)
                    .await
                    .is_empty()
            );
        }
        let scored = engine
            .select_creative_attributes(
                SelectionRequest::new("beverage", &[], "cal-2")
                    .with_seed(999)
                    .with_post_index(4),
            )
            .await
            .expect("selection should succeed");
        scored.selection.name(PresetDimension::Style).to_string()
    }

    let untouched = next_cal_2_style(false).await;
    let after_reset = next_cal_2_style(true).await;

    assert_eq!(untouched, after_reset);
}

#[tokio::test]
async fn given_more_posts_than_window_then_window_holds_at_most_window_names() {
    let engine = preset_engine();

    run_calendar(&engine, "cal-1", 20).await;

    let window = engine
        .window(&SelectionScope::new("cal-1"), PresetDimension::Style)
        .await;
    assert_eq!(window.len(), 15);
    assert_eq!(window.iter().collect::<BTreeSet<_>>().len(), 15);
}

#[tokio::test]
async fn given_same_seed_and_fresh_scopes_then_selections_match() {
    let engine = preset_engine();

    let first = engine
        .select_creative_attributes(SelectionRequest::new("beverage", &[], "cal-a").with_seed(4242))
        .await
        .expect("selection should succeed");
    let second = engine
        .select_creative_attributes(SelectionRequest::new("beverage", &[], "cal-b").with_seed(4242))
        .await
        .expect("selection should succeed");

    assert_eq!(first.selection, second.selection);
    assert_eq!(first.diversity_score, 100.0);
}

#[tokio::test]
async fn given_reset_calendar_then_next_selection_starts_from_empty_history() {
    let engine = preset_engine();
    run_calendar(&engine, "cal-1", 4).await;

    assert_eq!(engine.reset_calendar("cal-1").await, 1);

    let stats = engine.diversity_stats(&SelectionScope::new("cal-1")).await;
    assert_eq!(stats.total_selections, 0);
    let scored = engine
        .select_creative_attributes(SelectionRequest::new("beverage", &[], "cal-1"))
        .await
        .expect("selection should succeed");
    assert_eq!(scored.diversity_score, 100.0);
}

#[tokio::test]
async fn given_calendar_history_then_stats_summarise_it() {
    let engine = preset_engine();
    run_calendar(&engine, "cal-1", 8).await;

    let stats = engine.diversity_stats(&SelectionScope::new("cal-1")).await;

    assert_eq!(stats.total_selections, 8);
    assert_eq!(stats.unique_names["Style"], 8);
    assert!(stats.average_score > 50.0 && stats.average_score <= 100.0);
}

#[tokio::test]
async fn given_brand_refinement_then_brand_scopes_do_not_share_history() {
    let engine = CreativeEngine::new(uniform_catalog(20), EngineSettings::default());

    for brand in ["brand-a", "brand-b"] {
        engine
            .select_creative_attributes(
                SelectionRequest::new("beverage", &[], "cal-1")
                    .with_brand(brand)
                    .with_seed(9),
            )
            .await
            .expect("selection should succeed");
    }

    let brand_a = SelectionScope::new("cal-1").with_brand("brand-a");
    let brand_b = SelectionScope::new("cal-1").with_brand("brand-b");
    assert_eq!(
        engine.window(&brand_a, PresetDimension::Style).await,
        engine.window(&brand_b, PresetDimension::Style).await
    );
    assert_eq!(engine.reset_calendar("cal-1").await, 2);
}

#[tokio::test]
async fn given_blank_scope_id_then_request_is_rejected() {
    let engine = preset_engine();

    let err = engine
        .select_creative_attributes(SelectionRequest::new("beverage", &[], "   "))
        .await
        .expect_err("blank scope must be rejected");

    assert_eq!(err.kind, EngineErrorKind::InvalidRequest);
}

#[tokio::test]
async fn given_scored_selection_then_json_carries_choices_and_path() {
    let engine = preset_engine();

    let scored = engine
        .select_creative_attributes(SelectionRequest::new("beverage", &[], "cal-1").with_seed(11))
        .await
        .expect("selection should succeed");
    let value = scored.to_json();

    assert_eq!(value["layer"], "preset");
    assert_eq!(value["source"]["path"], "deterministic");
    assert_eq!(value["source"]["seed"], 11);
    assert_eq!(value["diversity_score"], 100.0);
    for label in ["Style", "Palette", "Framework", "Context", "Lighting"] {
        assert!(value["choices"][label].is_string(), "{label} missing");
    }
}
