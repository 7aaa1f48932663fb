use std::{num::NonZeroUsize, sync::Arc};

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

use atelier::{
    catalog::{
        Dimension, PresetDimension, StrategyDimension, preset::builtin_preset_catalog,
        strategy::builtin_strategy_catalog,
    },
    recency::{RecencyConfig, ScopeHistory, SelectionScope},
    relevance::{FilteredSet, RelevanceFilter, RelevanceQuery, RelevanceTables},
    scoring::DiversityScorer,
    selection::{hash_to_index, select_deterministic},
};

use crate::uniform_catalog;

fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("beverage".to_string()),
        Just("Mode et Luxe".to_string()),
        Just("Informatique".to_string()),
        Just(String::new()),
        "[a-zA-Zéè -]{0,24}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn hash_index_stays_inside_modulus(seed in any::<u32>(), salt in 1u64..10_000, modulus in 1usize..500) {
        let modulus = NonZeroUsize::new(modulus).expect("range starts at one");
        prop_assert!(hash_to_index(u64::from(seed), salt, modulus) < modulus.get());
    }

    #[test]
    fn any_sector_and_occasions_yield_a_complete_preset_selection(
        sector in arb_label(),
        occasions in prop::collection::vec(arb_label(), 0..4),
        seeds in prop::collection::vec(any::<u32>(), 1..30),
    ) {
        let filter = RelevanceFilter::new(
            Arc::new(builtin_preset_catalog().expect("builtin catalog should load")),
            Arc::new(RelevanceTables::builtin()),
        );
        let occasions: Vec<&str> = occasions.iter().map(String::as_str).collect();
        let set = filter.filter(&RelevanceQuery::new(sector, &occasions));
        let mut history = ScopeHistory::new(SelectionScope::new("cal-prop"), &RecencyConfig::default());

        for seed in seeds {
            let selection = select_deterministic(&set, &mut history, u64::from(seed), None);
            prop_assert!(selection.is_ok());
            let selection = selection.expect("checked above");
            for dimension in PresetDimension::ALL {
                let name = selection.name(*dimension);
                prop_assert!(set.pool(*dimension).iter().any(|entry| entry.name == name));
            }
        }
    }

    #[test]
    fn any_sector_yields_a_complete_strategy_selection(
        sector in arb_label(),
        objective in prop::option::of(arb_label()),
        seed in any::<u32>(),
    ) {
        let filter = RelevanceFilter::new(
            Arc::new(builtin_strategy_catalog().expect("builtin catalog should load")),
            Arc::new(RelevanceTables::builtin()),
        );
        let mut query = RelevanceQuery::new(sector, &[]);
        query.objective = objective;
        let set = filter.filter(&query);
        let mut history = ScopeHistory::new(SelectionScope::new("cal-prop"), &RecencyConfig::default());

        let selection = select_deterministic(&set, &mut history, u64::from(seed), None);
        prop_assert!(selection.is_ok());
        for dimension in StrategyDimension::ALL {
            prop_assert!(set.len(*dimension) > 0);
        }
    }

    #[test]
    fn window_length_is_min_of_selections_and_width(window in 1usize..=15, selections in 0usize..30) {
        let set = FilteredSet::unfiltered(&uniform_catalog(40)).expect("set should be valid");
        let mut history = ScopeHistory::new(
            SelectionScope::new("cal-prop"),
            &RecencyConfig { window, ..RecencyConfig::default() },
        );

        for seed in 0..selections {
            select_deterministic(&set, &mut history, seed as u64, None).expect("selection should succeed");
        }

        for dimension in PresetDimension::ALL {
            prop_assert_eq!(history.window_len(*dimension), selections.min(window));
        }
    }

    #[test]
    fn diversity_score_stays_within_bounds(seeds in prop::collection::vec(any::<u32>(), 1..20)) {
        let set = FilteredSet::unfiltered(&uniform_catalog(3)).expect("set should be valid");
        let mut history = ScopeHistory::new(SelectionScope::new("cal-prop"), &RecencyConfig::default());
        let scorer = DiversityScorer::<PresetDimension>::default();

        let mut selections = Vec::new();
        for seed in seeds {
            selections.push(
                select_deterministic(&set, &mut history, u64::from(seed), None)
                    .expect("selection should succeed"),
            );
        }

        for score in scorer.score_sequence(&selections) {
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }
}
