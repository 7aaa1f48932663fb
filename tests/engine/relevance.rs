use std::{collections::BTreeMap, sync::Arc};

use atelier::{
    catalog::{
        AttributeCatalog, AttributeEntry, Dimension, PresetDimension, StrategyDimension,
        preset::builtin_preset_catalog, strategy::builtin_strategy_catalog,
    },
    engine::{CreativeEngine, EngineSettings},
    relevance::{RelevanceFilter, RelevanceQuery, RelevanceTables},
    telemetry::EngineTelemetryEvent,
};

use crate::capture_hook;

fn preset_filter() -> RelevanceFilter<PresetDimension> {
    RelevanceFilter::new(
        Arc::new(builtin_preset_catalog().expect("builtin catalog should load")),
        Arc::new(RelevanceTables::builtin()),
    )
}

#[test]
fn given_beverage_sector_when_filtering_then_styles_are_beverage_relevant() {
    let filter = preset_filter();

    let set = filter.filter(&RelevanceQuery::new("beverage", &["breakfast", "refreshment"]));

    assert!(set.degraded().is_empty());
    assert!(set.len(PresetDimension::Style) >= 16);
    assert!(set.len(PresetDimension::Style) < filter.catalog().len(PresetDimension::Style));
    assert!(
        set.pool(PresetDimension::Style)
            .iter()
            .all(|entry| entry.name != "Human-Centered AI Narrative"
                && entry.name != "Electric Mobility Future")
    );
    assert!(set.len(PresetDimension::Context) >= 16);
}

#[test]
fn given_universal_dimensions_when_filtering_then_pools_are_the_full_catalog() {
    let filter = preset_filter();

    let set = filter.filter(&RelevanceQuery::new("Mode et Luxe", &[]));

    for dimension in [
        PresetDimension::Palette,
        PresetDimension::Framework,
        PresetDimension::Lighting,
    ] {
        assert_eq!(set.pool(dimension), filter.catalog().entries(dimension));
    }
}

#[test]
fn given_unknown_sector_when_filtering_then_default_tags_still_yield_candidates() {
    let filter = preset_filter();

    let set = filter.filter(&RelevanceQuery::new("underwater basket weaving", &["moonlight"]));

    for dimension in PresetDimension::ALL {
        assert!(set.len(*dimension) > 0, "{} pool is empty", dimension.label());
    }
}

#[test]
fn given_no_matching_entries_when_filtering_then_dimension_falls_back_and_reports_degradation() {
    let mut dimensions: BTreeMap<PresetDimension, Vec<AttributeEntry>> = PresetDimension::ALL
        .iter()
        .map(|dimension| {
            (
                *dimension,
                vec![
                    AttributeEntry::new(format!("{}-a", dimension.label()), ["all"], ""),
                    AttributeEntry::new(format!("{}-b", dimension.label()), ["all"], ""),
                ],
            )
        })
        .collect();
    dimensions.insert(
        PresetDimension::Style,
        vec![
            AttributeEntry::new("Circuit Macro", ["tech-innovation"], ""),
            AttributeEntry::new("Server Hall", ["tech-innovation"], ""),
        ],
    );
    let catalog = AttributeCatalog::from_entries(dimensions).expect("catalog should be valid");
    let (hook, events) = capture_hook();
    let filter = RelevanceFilter::new(Arc::new(catalog), Arc::new(RelevanceTables::builtin()))
        .with_telemetry(hook);

    let set = filter.filter(&RelevanceQuery::new("beverage", &[]));

    assert_eq!(set.degraded(), &[PresetDimension::Style]);
    assert_eq!(set.len(PresetDimension::Style), 2);
    let events = events.lock().expect("events lock");
    assert!(events.iter().any(|event| matches!(
        event,
        EngineTelemetryEvent::RelevanceDegraded { dimension: "Style", sector, .. } if sector == "beverage"
    )));
}

#[test]
fn given_objective_when_filtering_then_reference_pool_widens() {
    let filter = RelevanceFilter::new(
        Arc::new(builtin_strategy_catalog().expect("builtin catalog should load")),
        Arc::new(RelevanceTables::builtin()),
    );

    let plain = filter.filter(&RelevanceQuery::new("tech", &[]));
    let with_objective = filter.filter(&RelevanceQuery::new("tech", &[]).with_objective("awareness"));

    assert!(
        with_objective.len(StrategyDimension::PhotographyStyle)
            >= plain.len(StrategyDimension::PhotographyStyle)
    );
    assert_eq!(
        with_objective.len(StrategyDimension::Concept),
        plain.len(StrategyDimension::Concept)
    );
}

#[test]
fn given_occasion_only_match_when_filtering_then_context_entry_is_kept() {
    let mut dimensions: BTreeMap<PresetDimension, Vec<AttributeEntry>> = PresetDimension::ALL
        .iter()
        .map(|dimension| {
            (
                *dimension,
                vec![AttributeEntry::new(format!("{}-a", dimension.label()), ["all"], "")],
            )
        })
        .collect();
    dimensions.insert(
        PresetDimension::Context,
        vec![
            AttributeEntry::new("Sunrise Terrace", ["morning"], ""),
            AttributeEntry::new("Boardroom", ["corporate"], ""),
        ],
    );
    let filter = RelevanceFilter::new(
        Arc::new(AttributeCatalog::from_entries(dimensions).expect("catalog should be valid")),
        Arc::new(RelevanceTables::builtin()),
    );

    let set = filter.filter(&RelevanceQuery::new("beverage", &["breakfast"]));

    let names: Vec<&str> = set
        .pool(PresetDimension::Context)
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(names, vec!["Sunrise Terrace"]);
}

#[test]
fn given_custom_tables_on_engine_then_sector_resolves_through_them() {
    let dimensions = PresetDimension::ALL
        .iter()
        .map(|dimension| {
            let entries = (0..3)
                .flat_map(|index| {
                    [
                        AttributeEntry::new(format!("{}-pets-{index}", dimension.label()), ["pets"], ""),
                        AttributeEntry::new(format!("{}-tech-{index}", dimension.label()), ["tech"], ""),
                    ]
                })
                .collect();
            (*dimension, entries)
        })
        .collect::<BTreeMap<_, _>>();
    let catalog = AttributeCatalog::from_entries(dimensions).expect("catalog should be valid");
    let tables = RelevanceTables::new(
        vec![
            ("default".to_string(), vec!["tech".to_string()]),
            ("Animalerie".to_string(), vec!["pets".to_string()]),
        ],
        BTreeMap::new(),
        BTreeMap::new(),
    )
    .expect("tables should be valid");
    let engine = CreativeEngine::new(catalog, EngineSettings::default()).with_tables(tables);

    let pets = engine.filter(&RelevanceQuery::new("animalerie", &[]));
    let fallback = engine.filter(&RelevanceQuery::new("aerospace", &[]));

    assert_eq!(pets.len(PresetDimension::Style), 3);
    assert!(
        pets.pool(PresetDimension::Style)
            .iter()
            .all(|entry| entry.name.contains("-pets-"))
    );
    assert!(
        fallback
            .pool(PresetDimension::Style)
            .iter()
            .all(|entry| entry.name.contains("-tech-"))
    );
    assert!(pets.degraded().is_empty());
}
