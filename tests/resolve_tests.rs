//! Downward resolution integration tests using the sample catalog.

use combo_variants::catalog::sample::*;
use combo_variants::catalog::{
    AttributeMatcher, Card, Catalog, Combo, Feature, FeatureAttribute, FeatureOfCard,
};
use combo_variants::core::{
    AttributeId, CardId, ComboId, ConfigError, EngineConfig, FeatureId, FeatureOfCardId,
    GraphError, TemplateId,
};
use combo_variants::graph::Graph;
use combo_variants::variants::Multiset;

fn sample_graph(config: EngineConfig) -> Graph {
    Graph::new(&sample_catalog(), config).unwrap()
}

// =============================================================================
// Card Limit Tests
// =============================================================================

#[test]
fn test_root_resolves_to_three_variants() {
    let graph = sample_graph(EngineConfig::default());
    let variants = graph.resolver().resolve(B2).unwrap();

    let mut widths: Vec<usize> = variants.keys().map(|k| k.distinct_len()).collect();
    widths.sort();
    assert_eq!(widths, vec![3, 4, 5]);
}

#[test]
fn test_card_limit_one_is_unsatisfiable() {
    let graph = sample_graph(EngineConfig::default().with_card_limit(1));
    let variants = graph.resolver().resolve(B2).unwrap();
    assert!(variants.is_empty());
}

#[test]
fn test_card_limit_zero_rejected() {
    let config = EngineConfig::default().with_card_limit(0);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let result = Graph::new(&sample_catalog(), config);
    assert!(matches!(result, Err(GraphError::Config(_))));
}

#[test]
fn test_card_limit_thresholds() {
    let expected = [(3, 1), (4, 2), (5, 3), (6, 3), (10, 3)];
    for (limit, count) in expected {
        let graph = sample_graph(EngineConfig::default().with_card_limit(limit));
        assert_eq!(
            graph.resolver().resolve(B2).unwrap().len(),
            count,
            "card_limit = {limit}"
        );
    }
}

#[test]
fn test_limit_counts_templates() {
    // {C4, C5, T1} is three ingredients even though only two are cards.
    let graph = sample_graph(EngineConfig::default().with_card_limit(2));
    assert!(graph.resolver().resolve(B2).unwrap().is_empty());
    // B1 without its template finisher still fits at three.
    let graph = sample_graph(EngineConfig::default().with_card_limit(3));
    assert_eq!(graph.resolver().resolve(B1).unwrap().len(), 1);
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_config_from_toml_drives_resolution() {
    let config = EngineConfig::from_toml_str("card_limit = 4\n").unwrap();
    assert_eq!(config.variant_limit, 10_000);

    let graph = sample_graph(config);
    assert_eq!(graph.resolver().resolve(B2).unwrap().len(), 2);
}

#[test]
fn test_snapshot_resolves_identically() {
    let catalog = sample_catalog();
    let bytes = catalog.to_snapshot().unwrap();
    let restored = Catalog::from_snapshot(&bytes).unwrap();

    let original = Graph::new(&catalog, EngineConfig::default()).unwrap();
    let decoded = Graph::new(&restored, EngineConfig::default()).unwrap();
    assert_eq!(
        original.resolver().resolve(B2).unwrap().variants(),
        decoded.resolver().resolve(B2).unwrap().variants()
    );
}

// =============================================================================
// Attribute Matching Tests
// =============================================================================

#[test]
fn test_matcher_selects_producers() {
    let colorless = AttributeId::new(1);
    let tapped = AttributeId::new(2);
    let mana = FeatureId::new(1);
    let win = FeatureId::new(2);

    let mut catalog = Catalog::new();
    catalog.register_attribute(FeatureAttribute::new(colorless, "Colorless"));
    catalog.register_attribute(FeatureAttribute::new(tapped, "Tapped"));
    catalog.register_feature(Feature::new(mana, "Mana"));
    catalog.register_feature(Feature::new(win, "Win"));
    for (i, attributes) in [vec![colorless], vec![colorless, tapped], vec![]]
        .into_iter()
        .enumerate()
    {
        let id = i as u32 + 1;
        catalog.register_card(Card::new(CardId::new(id), format!("Rock {id}")));
        catalog.register_feature_of_card(
            FeatureOfCard::new(FeatureOfCardId::new(id), CardId::new(id), mana)
                .with_attributes(attributes),
        );
    }
    catalog.register_combo(
        Combo::new(ComboId::new(1), "Untapped colorless")
            .needs_matching(
                mana,
                AttributeMatcher::new().all_of([colorless]).none_of([tapped]),
                1,
            )
            .produces(win),
    );
    catalog.register_combo(
        Combo::new(ComboId::new(2), "Any mana")
            .needs(mana, 1)
            .produces(win),
    );

    let graph = Graph::new(&catalog, EngineConfig::default()).unwrap();
    let mut resolver = graph.resolver();

    let strict = resolver.resolve(ComboId::new(1)).unwrap();
    assert_eq!(
        strict.variants(),
        vec![(Multiset::single(CardId::new(1), 1), Multiset::<TemplateId>::new())]
    );
    assert_eq!(resolver.resolve(ComboId::new(2)).unwrap().len(), 3);
}

#[test]
fn test_unmatched_requirement_is_empty_not_error() {
    let mut catalog = sample_catalog();
    catalog.register_feature(Feature::new(FeatureId::new(40), "Nobody makes this"));
    catalog.register_combo(
        Combo::new(ComboId::new(40), "Impossible")
            .with_card(C1)
            .needs(FeatureId::new(40), 1)
            .produces(F4),
    );

    let graph = Graph::new(&catalog, EngineConfig::default()).unwrap();
    assert!(graph.resolver().resolve(ComboId::new(40)).unwrap().is_empty());
}

// =============================================================================
// Explosion Guard Tests
// =============================================================================

#[test]
fn test_wide_catalog_hits_variant_limit() {
    let fuel = FeatureId::new(1);
    let mut catalog = Catalog::new();
    catalog.register_feature(Feature::new(fuel, "Fuel"));
    catalog.register_feature(Feature::new(FeatureId::new(2), "Win"));
    for i in 1..=30 {
        catalog.register_card(Card::new(CardId::new(i), format!("Fuel {i}")));
        catalog.register_feature_of_card(FeatureOfCard::new(
            FeatureOfCardId::new(i),
            CardId::new(i),
            fuel,
        ));
    }
    catalog.register_combo(
        Combo::new(ComboId::new(1), "Big burn")
            .needs(fuel, 4)
            .produces(FeatureId::new(2)),
    );

    let graph = Graph::new(&catalog, EngineConfig::default().with_variant_limit(1_000)).unwrap();
    let err = graph.resolver().resolve(ComboId::new(1)).unwrap_err();
    assert!(err.is_explosion());
    assert!(err.to_string().contains("above the limit of 1000"));
}
