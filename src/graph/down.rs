//! Downward resolution: every minimal way to satisfy a combo or feature.
//!
//! A `Resolver` walks from a combo towards the leaves, combining child
//! variant sets with AND (all requirements of a combo), OR (alternative
//! producers of a flavor) and repeated sums (quantities). Results for combo,
//! flavor and requirement nodes are memoized for the lifetime of the
//! resolver, so components shared by many roots are computed once.
//!
//! A node reached again while it is still being resolved contributes an
//! empty set along that path. Its other producers are unaffected.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{CardId, ComboId, FeatureId, GraphError, TemplateId};
use crate::variants::{Multiset, VariantSet};

use super::arena::Graph;
use super::node::{
    ComboNode, FeatureWithAttributesMatcherNode, FeatureWithAttributesNode, Node, NodeId,
};

/// Counters collected by one resolver.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveStats {
    /// Combo, flavor and requirement nodes computed.
    pub nodes_resolved: u32,

    /// Lookups answered from the memo.
    pub cache_hits: u32,

    /// Nodes reached while already being resolved.
    pub cycle_cuts: u32,

    /// Size of the largest memoized set.
    pub largest_set: usize,
}

impl ResolveStats {
    /// Create new empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of memoized lookups that hit the cache.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.nodes_resolved;
        if lookups == 0 {
            0.0
        } else {
            f64::from(self.cache_hits) / f64::from(lookups)
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Visit {
    #[default]
    NotVisited,
    Visiting,
    Visited,
}

/// Side tables for one downward pass, indexed by `NodeId`.
#[derive(Debug)]
struct DownPass {
    visits: Vec<Visit>,
    memo: Vec<Option<VariantSet>>,
    stats: ResolveStats,
}

impl DownPass {
    fn new(len: usize) -> Self {
        Self {
            visits: vec![Visit::NotVisited; len],
            memo: vec![None; len],
            stats: ResolveStats::new(),
        }
    }
}

/// Memoizing downward resolver over a graph.
///
/// One resolver should serve a whole run so memoized components are shared
/// across roots.
#[derive(Debug)]
pub struct Resolver<'g> {
    graph: &'g Graph,
    pass: DownPass,
}

impl<'g> Resolver<'g> {
    /// Create a resolver with an empty memo.
    #[must_use]
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            pass: DownPass::new(graph.len()),
        }
    }

    /// The graph being resolved.
    #[must_use]
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Statistics so far.
    #[must_use]
    pub fn stats(&self) -> &ResolveStats {
        &self.pass.stats
    }

    /// Every minimal ingredient combination that satisfies a combo.
    ///
    /// # Errors
    ///
    /// `UnknownCombo` for ids outside the graph (including draft combos),
    /// `VariantLimitExceeded` if any step would grow past the variant limit.
    pub fn resolve(&mut self, combo: ComboId) -> Result<VariantSet, GraphError> {
        let node = self
            .graph
            .combo_node(combo)
            .ok_or(GraphError::UnknownCombo(combo))?;
        self.node_down(node)
    }

    /// The variants of a combo that fit inside a concrete selection.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub fn resolve_within(
        &mut self,
        combo: ComboId,
        cards: &Multiset<CardId>,
        templates: &Multiset<TemplateId>,
    ) -> Result<VariantSet, GraphError> {
        Ok(self.resolve(combo)?.filter(cards, templates))
    }

    /// Every minimal way to produce any flavor of a feature.
    ///
    /// # Errors
    ///
    /// `VariantLimitExceeded` if any step would grow past the variant limit.
    pub fn feature_variants(&mut self, feature: FeatureId) -> Result<VariantSet, GraphError> {
        let graph = self.graph;
        let mut sets = Vec::new();
        for &flavor in graph.flavors_of(feature) {
            sets.push(self.node_down(flavor)?);
        }
        let estimate = sets.iter().map(VariantSet::len).fold(0, usize::saturating_add);
        if estimate > graph.config().variant_limit {
            return Err(GraphError::VariantLimitExceeded {
                node: feature.to_string(),
                estimate,
                limit: graph.config().variant_limit,
            });
        }
        Ok(VariantSet::or_sets(graph.params(), &sets))
    }

    fn node_down(&mut self, id: NodeId) -> Result<VariantSet, GraphError> {
        let graph = self.graph;
        let params = graph.params();
        match graph.node(id) {
            Node::Card(card) => Ok(VariantSet::from_ingredients(
                params,
                &Multiset::single(card.card, 1),
                &Multiset::new(),
            )),
            Node::Template(template) => Ok(VariantSet::from_ingredients(
                params,
                &Multiset::new(),
                &Multiset::single(template.template, 1),
            )),
            Node::FeatureOfCard(edge) => Ok(VariantSet::from_ingredients(
                params,
                &Multiset::single(edge.card, edge.quantity),
                &Multiset::new(),
            )),
            Node::Feature(flavor) => self.memoized(id, |r| r.flavor_down(id, flavor)),
            Node::FeatureMatcher(requirement) => {
                self.memoized(id, |r| r.requirement_down(id, requirement))
            }
            Node::Combo(combo) => self.memoized(id, |r| r.combo_down(id, combo)),
        }
    }

    fn memoized(
        &mut self,
        id: NodeId,
        compute: impl FnOnce(&mut Self) -> Result<VariantSet, GraphError>,
    ) -> Result<VariantSet, GraphError> {
        let slot = id.index();
        match self.pass.visits[slot] {
            Visit::Visited => {
                if let Some(set) = &self.pass.memo[slot] {
                    self.pass.stats.cache_hits += 1;
                    return Ok(set.clone());
                }
            }
            Visit::Visiting => {
                self.pass.stats.cycle_cuts += 1;
                debug!(node = %self.graph.node(id), "cycle cut");
                return Ok(VariantSet::new(self.graph.params()));
            }
            Visit::NotVisited => {}
        }

        self.pass.visits[slot] = Visit::Visiting;
        match compute(self) {
            Ok(set) => {
                self.pass.visits[slot] = Visit::Visited;
                self.pass.stats.nodes_resolved += 1;
                self.pass.stats.largest_set = self.pass.stats.largest_set.max(set.len());
                trace!(node = %self.graph.node(id), variants = set.len(), "resolved");
                self.pass.memo[slot] = Some(set.clone());
                Ok(set)
            }
            Err(err) => {
                self.pass.visits[slot] = Visit::NotVisited;
                Err(err)
            }
        }
    }

    fn flavor_down(
        &mut self,
        id: NodeId,
        flavor: &'g FeatureWithAttributesNode,
    ) -> Result<VariantSet, GraphError> {
        let mut sets =
            Vec::with_capacity(flavor.produced_by_cards.len() + flavor.produced_by_combos.len());
        for &producer in flavor
            .produced_by_cards
            .iter()
            .chain(&flavor.produced_by_combos)
        {
            sets.push(self.node_down(producer)?);
        }
        self.or_checked(id, &sets)
    }

    fn requirement_down(
        &mut self,
        id: NodeId,
        requirement: &'g FeatureWithAttributesMatcherNode,
    ) -> Result<VariantSet, GraphError> {
        let mut sets = Vec::with_capacity(requirement.matches.len());
        for &flavor in &requirement.matches {
            sets.push(self.node_down(flavor)?);
        }
        self.or_checked(id, &sets)
    }

    fn combo_down(&mut self, id: NodeId, combo: &'g ComboNode) -> Result<VariantSet, GraphError> {
        let graph = self.graph;
        let params = graph.params();

        let own = VariantSet::from_ingredients(params, &combo.cards, &combo.templates);
        if own.is_empty() {
            return Ok(own);
        }

        let mut sets = Vec::with_capacity(combo.needs.len() + 1);
        sets.push(own);
        for &(requirement, quantity) in &combo.needs {
            let uncountable = graph
                .node(requirement)
                .as_matcher()
                .is_some_and(|r| r.uncountable);
            let set = self.node_down(requirement)?;
            let set = if uncountable || quantity <= 1 {
                set
            } else {
                self.check_limit(id, set.len().saturating_pow(quantity))?;
                set.repeat(quantity)
            };
            if set.is_empty() {
                return Ok(VariantSet::new(params));
            }
            sets.push(set);
        }

        let estimate = sets.iter().map(VariantSet::len).fold(1, usize::saturating_mul);
        self.check_limit(id, estimate)?;
        Ok(VariantSet::and_sets(params, &sets))
    }

    fn or_checked(&self, id: NodeId, sets: &[VariantSet]) -> Result<VariantSet, GraphError> {
        let estimate = sets.iter().map(VariantSet::len).fold(0, usize::saturating_add);
        self.check_limit(id, estimate)?;
        Ok(VariantSet::or_sets(self.graph.params(), sets))
    }

    fn check_limit(&self, id: NodeId, estimate: usize) -> Result<(), GraphError> {
        let limit = self.graph.config().variant_limit;
        if estimate > limit {
            return Err(GraphError::VariantLimitExceeded {
                node: self.graph.node(id).to_string(),
                estimate,
                limit,
            });
        }
        Ok(())
    }
}
