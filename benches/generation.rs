//! Whole-run generation benchmarks.

use combo_variants::catalog::sample::sample_catalog;
use combo_variants::catalog::{Card, Catalog, Combo, Feature, FeatureOfCard};
use combo_variants::core::{CardId, ComboId, EngineConfig, FeatureId, FeatureOfCardId};
use combo_variants::generator::VariantGenerator;
use combo_variants::graph::Graph;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// `layers` chained features, each produced by `width` cards and by the
/// combo of the previous layer. Every layer's combo is a generator.
fn layered_catalog(layers: u32, width: u32) -> Catalog {
    let mut catalog = Catalog::new();
    let mut next_card = 1;
    for layer in 1..=layers {
        catalog.register_feature(Feature::new(FeatureId::new(layer), format!("Layer {layer}")));
        for _ in 0..width {
            let card = CardId::new(next_card);
            catalog.register_card(Card::new(card, format!("Card {next_card}")));
            catalog.register_feature_of_card(FeatureOfCard::new(
                FeatureOfCardId::new(next_card),
                card,
                FeatureId::new(layer),
            ));
            next_card += 1;
        }
    }
    catalog.register_feature(Feature::new(FeatureId::new(layers + 1), "Finish"));
    for layer in 1..=layers {
        catalog.register_combo(
            Combo::new(ComboId::new(layer), format!("Step {layer}"))
                .needs(FeatureId::new(layer), 1)
                .produces(FeatureId::new(layer + 1)),
        );
    }
    catalog
}

fn bench_sample(c: &mut Criterion) {
    let catalog = sample_catalog();
    c.bench_function("sample_run", |b| {
        b.iter(|| {
            let generator = VariantGenerator::new(&catalog, EngineConfig::default()).unwrap();
            black_box(generator.run())
        })
    });
}

fn bench_layered(c: &mut Criterion) {
    let mut group = c.benchmark_group("layered_run");
    for width in [2u32, 4, 8] {
        let catalog = layered_catalog(6, width);
        let generator = VariantGenerator::new(&catalog, EngineConfig::default()).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(width), &generator, |b, generator| {
            b.iter(|| black_box(generator.run()))
        });
    }
    group.finish();
}

fn bench_close(c: &mut Criterion) {
    let graph = Graph::new(&sample_catalog(), EngineConfig::default()).unwrap();
    let variants = graph
        .resolver()
        .resolve(combo_variants::catalog::sample::B2)
        .unwrap()
        .variants();
    c.bench_function("close_sample_variants", |b| {
        b.iter(|| {
            for (cards, templates) in &variants {
                black_box(graph.close(cards, templates));
            }
        })
    });
}

criterion_group!(benches, bench_sample, bench_layered, bench_close);
criterion_main!(benches);
