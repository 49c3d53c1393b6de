//! Whole-catalog variant enumeration.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::core::{ComboId, EngineConfig, GraphError};
use crate::graph::{Graph, Resolver};

use super::definition::{VariantDefinition, VariantId};
use super::stats::GenerationStats;

/// A generator combo whose resolution was aborted.
#[derive(Debug)]
pub struct RootFailure {
    pub combo: ComboId,
    pub error: GraphError,
}

/// Result of a generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Every distinct variant, by canonical id.
    pub variants: BTreeMap<VariantId, VariantDefinition>,

    /// Roots skipped because of an error.
    pub failures: Vec<RootFailure>,

    pub stats: GenerationStats,
}

impl GenerationReport {
    /// Look up a variant by id.
    #[must_use]
    pub fn get(&self, id: &VariantId) -> Option<&VariantDefinition> {
        self.variants.get(id)
    }

    /// Whether every root was resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Enumerates the variants of every generator combo in a catalog.
///
/// ```
/// use combo_variants::catalog::sample::sample_catalog;
/// use combo_variants::core::EngineConfig;
/// use combo_variants::generator::VariantGenerator;
///
/// let generator = VariantGenerator::new(&sample_catalog(), EngineConfig::default()).unwrap();
/// let report = generator.run();
/// assert!(report.is_complete());
/// assert_eq!(report.variants.len(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct VariantGenerator {
    graph: Graph,
}

impl VariantGenerator {
    /// Build the graph for a catalog.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid or the catalog has dangling references.
    pub fn new(catalog: &Catalog, config: EngineConfig) -> Result<Self, GraphError> {
        Ok(Self::from_graph(Graph::new(catalog, config)?))
    }

    /// Use an already built graph.
    #[must_use]
    pub fn from_graph(graph: Graph) -> Self {
        Self { graph }
    }

    /// The underlying graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Enumerate the variants of every generator combo, in ascending id order.
    #[must_use]
    pub fn run(&self) -> GenerationReport {
        self.run_roots(self.graph.generators())
    }

    /// Enumerate the variants of the given roots only.
    ///
    /// Roots that are not in the graph are reported as failures.
    #[must_use]
    pub fn run_roots(&self, roots: &[ComboId]) -> GenerationReport {
        let start = Instant::now();
        let config = self.graph.config();
        info!(
            roots = roots.len(),
            card_limit = config.card_limit,
            variant_limit = config.variant_limit,
            allow_multiple_copies = config.allow_multiple_copies,
            "generating variants"
        );

        let mut report = GenerationReport::default();
        let mut resolver = self.graph.resolver();
        for &root in roots {
            match self.generate_root(&mut resolver, root, &mut report) {
                Ok(found) => {
                    report.stats.roots_processed += 1;
                    debug!(combo = %root, variants = found, "resolved root");
                }
                Err(error) => {
                    report.stats.roots_failed += 1;
                    warn!(combo = %root, %error, "skipping root");
                    report.failures.push(RootFailure { combo: root, error });
                }
            }
        }

        report.stats.resolve = resolver.stats().clone();
        report.stats.finish(report.variants.len(), start.elapsed());
        info!(
            variants = report.stats.variants,
            merges = report.stats.merges,
            failed = report.stats.roots_failed,
            time_us = report.stats.time_us,
            "generation finished"
        );
        report
    }

    fn generate_root(
        &self,
        resolver: &mut Resolver<'_>,
        root: ComboId,
        report: &mut GenerationReport,
    ) -> Result<usize, GraphError> {
        let variants = resolver.resolve(root)?.variants();
        let found = variants.len();
        for (cards, templates) in variants {
            let mut definition = self.graph.close(&cards, &templates);
            definition.generated_by.insert(root);
            match report.variants.entry(definition.id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(definition);
                }
                Entry::Occupied(mut slot) => {
                    slot.get_mut().merge(definition);
                    report.stats.merges += 1;
                }
            }
        }
        Ok(found)
    }
}
