//! End-to-end generation tests.

use std::collections::BTreeSet;

use combo_variants::catalog::sample::*;
use combo_variants::catalog::{Card, Catalog, Combo, Feature, FeatureOfCard};
use combo_variants::core::{CardId, ComboId, EngineConfig, FeatureId, FeatureOfCardId, GraphError};
use combo_variants::generator::{VariantGenerator, VariantId};
use combo_variants::variants::Multiset;

fn run(config: EngineConfig) -> combo_variants::GenerationReport {
    VariantGenerator::new(&sample_catalog(), config).unwrap().run()
}

// =============================================================================
// Whole Run Tests
// =============================================================================

#[test]
fn test_sample_run_counts() {
    for (limit, expected) in [(1, 0), (3, 2), (4, 4), (5, 5)] {
        let report = run(EngineConfig::default().with_card_limit(limit));
        assert!(report.is_complete());
        assert_eq!(report.variants.len(), expected, "card_limit = {limit}");
        assert_eq!(report.stats.variants as usize, expected);
    }
}

#[test]
fn test_run_is_deterministic() {
    let first = run(EngineConfig::default());
    let second = run(EngineConfig::default());
    assert_eq!(
        first.variants.values().collect::<Vec<_>>(),
        second.variants.values().collect::<Vec<_>>()
    );
}

#[test]
fn test_definitions_match_closure() {
    let generator = VariantGenerator::new(&sample_catalog(), EngineConfig::default()).unwrap();
    let report = generator.run();

    for (id, definition) in &report.variants {
        assert_eq!(id, &definition.id);
        let mut closed = generator.graph().close(&definition.cards, &definition.templates);
        closed.generated_by = definition.generated_by.clone();
        assert_eq!(&closed, definition);
        assert!(!definition.generated_by.is_empty());
        assert!(definition.generated_by.is_subset(&definition.needed_combos));
    }
}

#[test]
fn test_variant_ids_are_canonical() {
    let report = run(EngineConfig::default());
    let id = VariantId::new(&Multiset::from_items([C3, C1, C2]), &Multiset::single(T1, 1));
    assert_eq!(id.to_string(), "1-2-3--1");

    let definition = &report.variants[&id];
    assert_eq!(definition.needed_combos, BTreeSet::from([B1, B2]));
    assert_eq!(definition.generated_by, BTreeSet::from([B2]));
}

// =============================================================================
// Merge Tests
// =============================================================================

/// Two generators reachable from the same two cards.
fn twin_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.register_card(Card::new(CardId::new(1), "Left"));
    catalog.register_card(Card::new(CardId::new(2), "Right"));
    catalog.register_feature(Feature::new(FeatureId::new(1), "Loop"));
    catalog.register_feature(Feature::new(FeatureId::new(2), "Win"));
    catalog.register_feature_of_card(FeatureOfCard::new(
        FeatureOfCardId::new(1),
        CardId::new(2),
        FeatureId::new(1),
    ));
    catalog.register_combo(
        Combo::new(ComboId::new(1), "Pair")
            .with_card(CardId::new(1))
            .with_card(CardId::new(2))
            .produces(FeatureId::new(1)),
    );
    catalog.register_combo(
        Combo::new(ComboId::new(2), "Payoff")
            .with_card(CardId::new(1))
            .needs(FeatureId::new(1), 1)
            .produces(FeatureId::new(2)),
    );
    catalog
}

#[test]
fn test_same_variant_from_two_roots_merges() {
    let generator = VariantGenerator::new(&twin_catalog(), EngineConfig::default()).unwrap();
    let report = generator.run();

    assert_eq!(report.variants.len(), 1);
    assert_eq!(report.stats.merges, 1);

    let definition = report.variants.values().next().unwrap();
    assert_eq!(definition.id.to_string(), "1-2");
    assert_eq!(
        definition.generated_by,
        BTreeSet::from([ComboId::new(1), ComboId::new(2)])
    );
    assert_eq!(definition.combos, BTreeSet::from([ComboId::new(1), ComboId::new(2)]));
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_small_variant_limit_fails_one_root() {
    let report = run(EngineConfig::default().with_variant_limit(2));

    assert_eq!(report.stats.roots_failed, 1);
    assert_eq!(report.stats.roots_processed, 1);
    match &report.failures[0].error {
        GraphError::VariantLimitExceeded { estimate, limit, .. } => {
            assert!(estimate > limit);
        }
        other => panic!("unexpected error: {other}"),
    }
    // B1's variants are still reported.
    assert_eq!(report.variants.len(), 2);
    assert!(report
        .variants
        .values()
        .all(|v| v.generated_by == BTreeSet::from([B1])));
}

#[test]
fn test_invalid_catalog_fails_construction() {
    let mut catalog = sample_catalog();
    catalog.register_combo(Combo::new(ComboId::new(9), "Ghost").with_card(CardId::new(77)));
    let result = VariantGenerator::new(&catalog, EngineConfig::default());
    assert!(matches!(result, Err(GraphError::Catalog(_))));
}

// =============================================================================
// Repeated Production Tests
// =============================================================================

/// A utility combo turns `Spark` into `Token`; the payoff needs two tokens.
/// `fuel` cards produce `Spark`; with `engine` set the token combo also
/// needs card 2.
fn token_catalog(fuel: &[u32], engine: bool) -> Catalog {
    let mut catalog = Catalog::new();
    catalog.register_feature(Feature::new(FeatureId::new(1), "Spark").utility());
    catalog.register_feature(Feature::new(FeatureId::new(2), "Token"));
    catalog.register_feature(Feature::new(FeatureId::new(3), "Win"));
    for &id in fuel {
        catalog.register_card(Card::new(CardId::new(id), format!("Fuel {id}")));
        catalog.register_feature_of_card(FeatureOfCard::new(
            FeatureOfCardId::new(id),
            CardId::new(id),
            FeatureId::new(1),
        ));
    }
    let mut token = Combo::new(ComboId::new(1), "Make token")
        .utility()
        .needs(FeatureId::new(1), 1)
        .produces(FeatureId::new(2));
    if engine {
        catalog.register_card(Card::new(CardId::new(2), "Engine"));
        token = token.with_card(CardId::new(2));
    }
    catalog.register_combo(token);
    catalog.register_combo(
        Combo::new(ComboId::new(2), "Two tokens")
            .needs(FeatureId::new(2), 2)
            .produces(FeatureId::new(3)),
    );
    catalog
}

fn assert_roots_realized(report: &combo_variants::GenerationReport) {
    assert!(report.is_complete());
    assert!(!report.variants.is_empty());
    for definition in report.variants.values() {
        assert!(
            definition.generated_by.is_subset(&definition.combos),
            "{} does not fire its root",
            definition.id
        );
        assert!(
            definition.generated_by.is_subset(&definition.needed_combos),
            "{} does not need its root",
            definition.id
        );
    }
}

#[test]
fn test_doubled_combo_copies_realize_root() {
    let config = EngineConfig::default().with_multiple_copies(true);
    let report = VariantGenerator::new(&token_catalog(&[1], true), config)
        .unwrap()
        .run();

    assert_roots_realized(&report);
    let ids: Vec<String> = report.variants.keys().map(ToString::to_string).collect();
    assert_eq!(ids, vec!["1-1-2-2"]);
}

#[test]
fn test_distinct_producers_realize_root() {
    let report = VariantGenerator::new(&token_catalog(&[1, 3], false), EngineConfig::default())
        .unwrap()
        .run();

    assert_roots_realized(&report);
    let ids: Vec<String> = report.variants.keys().map(ToString::to_string).collect();
    assert_eq!(ids, vec!["1-3"]);
}

#[test]
fn test_sample_roots_realized_with_multiple_copies() {
    let report = run(EngineConfig::default().with_multiple_copies(true));
    assert_roots_realized(&report);
    assert_eq!(report.variants.len(), 5);
}
