use std::collections::BTreeSet;

use atelier::{
    catalog::{Dimension, PresetDimension},
    engine::{CreativeEngine, EngineSettings, SelectionRequest},
    recency::{RecencyConfig, ScopeHistory, SelectionScope},
    relevance::FilteredSet,
    selection::{SelectionSource, select_deterministic},
    telemetry::EngineTelemetryEvent,
};

use crate::{capture_hook, uniform_catalog};

fn history(window: usize) -> ScopeHistory<PresetDimension> {
    ScopeHistory::new(
        SelectionScope::new("cal-1"),
        &RecencyConfig {
            window,
            ..RecencyConfig::default()
        },
    )
}

#[test]
fn given_same_seed_and_fresh_history_then_selection_is_identical() {
    let set = FilteredSet::unfiltered(&uniform_catalog(20)).expect("set should be valid");

    let first = select_deterministic(&set, &mut history(15), 123_456, None)
        .expect("selection should succeed");
    let second = select_deterministic(&set, &mut history(15), 123_456, None)
        .expect("selection should succeed");

    assert_eq!(first, second);
    assert_eq!(first.source(), &SelectionSource::Deterministic { seed: 123_456 });
}

#[test]
fn given_selection_then_every_dimension_is_filled_and_recorded() {
    let set = FilteredSet::unfiltered(&uniform_catalog(20)).expect("set should be valid");
    let mut history = history(15);

    let selection =
        select_deterministic(&set, &mut history, 42, None).expect("selection should succeed");

    for dimension in PresetDimension::ALL {
        let name = selection.name(*dimension);
        assert!(name.starts_with(dimension.label()));
        assert!(history.is_excluded(*dimension, name));
    }
    let style = selection
        .choice(PresetDimension::Style)
        .expect("style should be chosen");
    assert_eq!(selection.reference(), style.descriptor);
    assert_eq!(history.recent_selections().count(), 1);
}

#[test]
fn given_window_fifteen_when_selecting_repeatedly_then_no_name_repeats_inside_the_window() {
    let set = FilteredSet::unfiltered(&uniform_catalog(20)).expect("set should be valid");
    let mut history = history(15);

    let mut styles = Vec::new();
    for seed in 0..15u64 {
        let selection = select_deterministic(&set, &mut history, seed * 7 + 1, None)
            .expect("selection should succeed");
        styles.push(selection.name(PresetDimension::Style).to_string());
    }

    let unique: BTreeSet<&String> = styles.iter().collect();
    assert_eq!(unique.len(), 15);
    assert_eq!(history.window_len(PresetDimension::Style), 15);
}

#[test]
fn given_small_pool_when_window_exhausts_it_then_selection_still_succeeds_and_reports_reset() {
    let set = FilteredSet::unfiltered(&uniform_catalog(4)).expect("set should be valid");
    let mut history = history(15);
    let (hook, events) = capture_hook();

    for seed in 0..12u64 {
        select_deterministic(&set, &mut history, seed, Some(&hook))
            .expect("selection should never starve");
    }

    let events = events.lock().expect("events lock");
    assert!(events.iter().any(|event| matches!(
        event,
        EngineTelemetryEvent::RecencyExhausted { dimension: "Style", .. }
    )));
    assert!(history.window_len(PresetDimension::Style) < 4);
}

#[test]
fn given_single_entry_pool_then_that_entry_is_always_chosen() {
    let set = FilteredSet::unfiltered(&uniform_catalog(1)).expect("set should be valid");
    let mut history = history(15);

    for seed in [0, 1, 99, u64::from(u32::MAX)] {
        let selection =
            select_deterministic(&set, &mut history, seed, None).expect("selection should succeed");
        assert_eq!(selection.name(PresetDimension::Lighting), "Lighting-0");
    }
}

#[tokio::test]
async fn given_zero_seed_then_dimensions_do_not_all_land_on_the_first_entry() {
    let mut picks = Vec::new();
    for seed in [0, 1u64 << 32] {
        let engine = CreativeEngine::new(uniform_catalog(20), EngineSettings::default());
        let scored = engine
            .select_creative_attributes(SelectionRequest::new("beverage", &[], "cal-1").with_seed(seed))
            .await
            .expect("selection should succeed");
        let names: Vec<String> = PresetDimension::ALL
            .iter()
            .map(|dimension| scored.selection.name(*dimension).to_string())
            .collect();
        assert!(
            names.iter().any(|name| !name.ends_with("-0")),
            "seed {seed} picked {names:?}"
        );
        assert_ne!(
            scored.selection.source(),
            &SelectionSource::Deterministic { seed: 0 }
        );
        picks.push(names);
    }

    assert_eq!(picks[0], picks[1]);
}
