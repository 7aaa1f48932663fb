mod assisted;
mod calendar;
mod deterministic;
mod properties;
mod relevance;
mod strategist;

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use atelier::{
    catalog::{AttributeCatalog, AttributeEntry, Dimension, PresetDimension},
    engine::{CreativeEngine, EngineSettings},
    telemetry::{EngineTelemetryEvent, EngineTelemetryHook},
};

/// Catalog with `per_dimension` universal entries named `<Label>-<i>`.
fn uniform_catalog(per_dimension: usize) -> AttributeCatalog<PresetDimension> {
    let dimensions = PresetDimension::ALL
        .iter()
        .map(|dimension| {
            let entries = (0..per_dimension)
                .map(|index| {
                    AttributeEntry::new(
                        format!("{}-{index}", dimension.label()),
                        ["all"],
                        format!("{} option {index}", dimension.label()),
                    )
                })
                .collect();
            (*dimension, entries)
        })
        .collect::<BTreeMap<_, _>>();
    AttributeCatalog::from_entries(dimensions).expect("uniform catalog should be valid")
}

fn preset_engine() -> CreativeEngine<PresetDimension> {
    CreativeEngine::new(
        atelier::catalog::preset::builtin_preset_catalog().expect("builtin catalog should load"),
        EngineSettings::default(),
    )
}

fn capture_hook() -> (EngineTelemetryHook, Arc<Mutex<Vec<EngineTelemetryEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let hook: EngineTelemetryHook = Arc::new(move |event| {
        sink.lock().expect("event sink lock").push(event);
    });
    (hook, events)
}
