//! Upward closure: what a concrete selection realizes.
//!
//! Starting from a fixed card and template multiset, the closure discovers
//! every combo the selection can fire, then prunes the discovery down to the
//! combos, features and production edges that actually lead to an
//! interesting (non-utility, non-removed) feature.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::core::{CardId, FeatureId, TemplateId};
use crate::generator::{IngredientGroup, VariantDefinition};
use crate::variants::{Multiset, VariantSet, VariantSetParams};

use super::arena::Graph;
use super::node::{ComboNode, Node, NodeId};

/// Side tables for one closure, indexed by `NodeId`.
struct UpPass {
    /// Available units per flavor.
    currency: Vec<u32>,
    /// Edges and combos that fired.
    fired: Vec<bool>,
    /// Copies of each combo whose productions were credited.
    credited: Vec<u32>,
    /// Ingredient groups of each fired producer, within the selection.
    groups: Vec<Option<VariantSet>>,
    edges: Vec<NodeId>,
    combos: Vec<NodeId>,
}

impl UpPass {
    fn new(len: usize) -> Self {
        Self {
            currency: vec![0; len],
            fired: vec![false; len],
            credited: vec![0; len],
            groups: vec![None; len],
            edges: Vec::new(),
            combos: Vec::new(),
        }
    }

    fn credit(&mut self, flavor: NodeId, units: u32, uncountable: bool) {
        let slot = &mut self.currency[flavor.index()];
        *slot = if uncountable {
            1
        } else {
            slot.saturating_add(units)
        };
    }

    fn available(&self, flavor: NodeId) -> bool {
        self.currency[flavor.index()] > 0
    }
}

impl Graph {
    /// Close a concrete selection over every combo it can fire.
    ///
    /// The returned definition has an empty `generated_by`.
    #[must_use]
    pub fn close(
        &self,
        cards: &Multiset<CardId>,
        templates: &Multiset<TemplateId>,
    ) -> VariantDefinition {
        let mut pass = UpPass::new(self.len());
        // Groups never leave the selection, so they are bounded by its width.
        let params = VariantSetParams::new(cards.distinct_len() + templates.distinct_len(), true);

        self.seed_currency(&mut pass, params, cards);
        self.fire_combos(&mut pass, cards, templates);
        self.settle_groups(&mut pass, params, cards, templates);

        let mut definition = VariantDefinition::new(cards.clone(), templates.clone());
        self.prune(&pass, &mut definition);
        trace!(
            variant = %definition.id,
            combos = definition.combos.len(),
            needed = definition.needed_combos.len(),
            "closed selection"
        );
        definition
    }

    fn seed_currency(&self, pass: &mut UpPass, params: VariantSetParams, cards: &Multiset<CardId>) {
        for (card, count) in cards.iter() {
            let Some(Node::Card(card_node)) = self.card_node(card).map(|id| self.node(id)) else {
                continue;
            };
            for &edge_id in &card_node.features {
                let Some(edge) = self.node(edge_id).as_feature_of_card() else {
                    continue;
                };
                if count < edge.quantity {
                    continue;
                }
                let uncountable = self
                    .node(edge.flavor)
                    .as_feature()
                    .is_some_and(|f| f.uncountable);
                pass.credit(edge.flavor, count / edge.quantity, uncountable);
                pass.fired[edge_id.index()] = true;
                pass.groups[edge_id.index()] = Some(VariantSet::from_ingredients(
                    params,
                    &Multiset::single(card, edge.quantity),
                    &Multiset::new(),
                ));
                pass.edges.push(edge_id);
            }
        }
    }

    fn fire_combos(
        &self,
        pass: &mut UpPass,
        cards: &Multiset<CardId>,
        templates: &Multiset<TemplateId>,
    ) {
        let mut candidates: Vec<NodeId> = self.ingredientless_combos().to_vec();
        for card in cards.keys() {
            if let Some(Node::Card(node)) = self.card_node(card).map(|id| self.node(id)) {
                candidates.extend(&node.combos);
            }
        }
        for template in templates.keys() {
            if let Some(Node::Template(node)) = self.template_node(template).map(|id| self.node(id))
            {
                candidates.extend(&node.combos);
            }
        }
        candidates.sort();
        candidates.dedup();
        candidates.retain(|&id| {
            self.node(id).as_combo().is_some_and(|combo| {
                combo.cards.is_subset_of(cards) && combo.templates.is_subset_of(templates)
            })
        });

        // Combos fire in rounds; each round only sees currency from earlier ones.
        // A fired combo fires again while the selection supports more copies.
        let cap = u32::try_from(cards.total() + templates.total())
            .unwrap_or(u32::MAX)
            .max(1);
        loop {
            let current: &UpPass = pass;
            let ready: Vec<(NodeId, &ComboNode, u32)> = candidates
                .iter()
                .filter_map(|&id| self.node(id).as_combo().map(|combo| (id, combo)))
                .filter_map(|(id, combo)| {
                    let copies = self.copies(current, combo, cards, templates, cap);
                    let extra = copies.saturating_sub(current.credited[id.index()]);
                    (extra > 0).then_some((id, combo, extra))
                })
                .collect();
            if ready.is_empty() {
                break;
            }
            for (id, combo, extra) in ready {
                if !pass.fired[id.index()] {
                    pass.fired[id.index()] = true;
                    pass.combos.push(id);
                }
                pass.credited[id.index()] += extra;
                for &flavor in &combo.produces {
                    let uncountable = self.node(flavor).as_feature().is_some_and(|f| f.uncountable);
                    pass.credit(flavor, extra, uncountable);
                }
            }
        }
    }

    /// Grow the ingredient groups of fired combos until they stop changing.
    ///
    /// Groups only ever gain alternatives and stay inside the selection, so
    /// this terminates.
    fn settle_groups(
        &self,
        pass: &mut UpPass,
        params: VariantSetParams,
        cards: &Multiset<CardId>,
        templates: &Multiset<TemplateId>,
    ) {
        loop {
            let mut changed = false;
            for i in 0..pass.combos.len() {
                let id = pass.combos[i];
                let Some(combo) = self.node(id).as_combo() else {
                    continue;
                };
                let group = self.combo_group(pass, params, combo).filter(cards, templates);
                let slot = &mut pass.groups[id.index()];
                if slot
                    .as_ref()
                    .map_or(true, |old| old.variants() != group.variants())
                {
                    *slot = Some(group);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    /// Disjoint copies of a combo that the selection and current currency
    /// support, at most `cap`. Zero means it cannot fire.
    ///
    /// Without multiple copies a combo that names cards fires at most once.
    fn copies(
        &self,
        pass: &UpPass,
        combo: &ComboNode,
        cards: &Multiset<CardId>,
        templates: &Multiset<TemplateId>,
        cap: u32,
    ) -> u32 {
        let mut copies = if !self.config().allow_multiple_copies && !combo.cards.is_empty() {
            1
        } else {
            cap
        };
        for (card, count) in combo.cards.iter() {
            copies = copies.min(cards.count(card) / count.max(1));
        }
        for (template, count) in combo.templates.iter() {
            copies = copies.min(templates.count(template) / count.max(1));
        }
        for &(requirement, quantity) in &combo.needs {
            let Some(requirement) = self.node(requirement).as_matcher() else {
                return 0;
            };
            let have = requirement
                .matches
                .iter()
                .map(|flavor| pass.currency[flavor.index()])
                .fold(0u32, u32::saturating_add);
            if requirement.uncountable {
                if have == 0 {
                    return 0;
                }
            } else {
                copies = copies.min(have / quantity.max(1));
            }
        }
        copies
    }

    /// The combo's own ingredients joined with the current groups of the
    /// fired producers of everything it needs.
    fn combo_group(&self, pass: &UpPass, params: VariantSetParams, combo: &ComboNode) -> VariantSet {
        let mut sets = vec![VariantSet::from_ingredients(
            params,
            &combo.cards,
            &combo.templates,
        )];
        for &(requirement, quantity) in &combo.needs {
            let Some(requirement) = self.node(requirement).as_matcher() else {
                continue;
            };
            let producers: Vec<&VariantSet> = requirement
                .matches
                .iter()
                .filter_map(|&flavor| self.node(flavor).as_feature())
                .flat_map(|flavor| {
                    flavor
                        .produced_by_cards
                        .iter()
                        .chain(&flavor.produced_by_combos)
                })
                .filter_map(|producer| pass.groups[producer.index()].as_ref())
                .collect();
            let alternatives = VariantSet::or_sets(params, producers);
            if requirement.uncountable || quantity <= 1 {
                sets.push(alternatives);
            } else {
                sets.push(alternatives.repeat(quantity));
            }
        }
        VariantSet::and_sets(params, &sets)
    }

    /// Features removed by any discovered combo are never interesting, even
    /// when the remover itself is scaffolding.
    fn prune(&self, pass: &UpPass, definition: &mut VariantDefinition) {
        let mut removed = FxHashSet::default();
        for &id in &pass.combos {
            if let Some(combo) = self.node(id).as_combo() {
                definition.combos.insert(combo.combo);
                removed.extend(combo.removes.iter().copied());
            }
        }

        let mut needed_flavors: Vec<NodeId> = Vec::new();
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        let mut available: BTreeSet<NodeId> = BTreeSet::new();
        for &edge in &pass.edges {
            if let Some(edge) = self.node(edge).as_feature_of_card() {
                available.insert(edge.flavor);
            }
        }
        for &id in &pass.combos {
            if let Some(combo) = self.node(id).as_combo() {
                available.extend(combo.produces.iter().copied());
            }
        }
        for &flavor in &available {
            let Some(node) = self.node(flavor).as_feature() else {
                continue;
            };
            if node.utility || removed.contains(&node.feature) {
                continue;
            }
            definition.features.insert(node.feature);
            if seen.insert(flavor) {
                needed_flavors.push(flavor);
            }
        }

        let mut producers_of: BTreeMap<FeatureId, Vec<NodeId>> = BTreeMap::new();
        while let Some(flavor_id) = needed_flavors.pop() {
            let Some(flavor) = self.node(flavor_id).as_feature() else {
                continue;
            };
            definition.needed_features.insert(flavor.feature);

            for &edge_id in &flavor.produced_by_cards {
                if !pass.fired[edge_id.index()] {
                    continue;
                }
                if let Some(edge) = self.node(edge_id).as_feature_of_card() {
                    definition.needed_feature_of_cards.insert(edge.edge);
                    producers_of.entry(flavor.feature).or_default().push(edge_id);
                }
            }
            for &combo_id in &flavor.produced_by_combos {
                if !pass.fired[combo_id.index()] {
                    continue;
                }
                let Some(combo) = self.node(combo_id).as_combo() else {
                    continue;
                };
                producers_of.entry(flavor.feature).or_default().push(combo_id);
                if !definition.needed_combos.insert(combo.combo) {
                    continue;
                }
                for &(requirement, _) in &combo.needs {
                    let Some(requirement) = self.node(requirement).as_matcher() else {
                        continue;
                    };
                    for &matched in &requirement.matches {
                        if pass.available(matched) && seen.insert(matched) {
                            needed_flavors.push(matched);
                        }
                    }
                }
            }
        }

        for (feature, producers) in producers_of {
            let mut groups: Vec<IngredientGroup> = producers
                .iter()
                .filter_map(|producer| pass.groups[producer.index()].as_ref())
                .flat_map(VariantSet::variants)
                .map(|(cards, templates)| IngredientGroup { cards, templates })
                .collect();
            groups.sort();
            groups.dedup();
            if !groups.is_empty() {
                definition.replacements.insert(feature, groups);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::*;
    use crate::catalog::{Card, Catalog, Combo, Feature, FeatureOfCard};
    use crate::core::{ComboId, EngineConfig, FeatureOfCardId};

    fn graph() -> Graph {
        Graph::new(&sample_catalog(), EngineConfig::default()).unwrap()
    }

    fn cards(ids: &[CardId]) -> Multiset<CardId> {
        Multiset::from_items(ids.iter().copied())
    }

    fn group(card_ids: &[CardId], template_ids: &[TemplateId]) -> IngredientGroup {
        IngredientGroup {
            cards: cards(card_ids),
            templates: Multiset::from_items(template_ids.iter().copied()),
        }
    }

    #[test]
    fn test_close_without_finisher() {
        let definition = graph().close(&cards(&[C1, C2, C3]), &Multiset::new());

        assert_eq!(definition.combos, BTreeSet::from([B1, B5]));
        assert_eq!(definition.needed_combos, BTreeSet::from([B1]));
        assert_eq!(definition.features, BTreeSet::from([F3]));
        assert_eq!(definition.needed_features, BTreeSet::from([F1, F3]));
        assert_eq!(definition.needed_feature_of_cards, BTreeSet::from([E1]));
        assert!(definition.generated_by.is_empty());
    }

    #[test]
    fn test_close_removes_features_and_prunes_scaffolding() {
        let definition = graph().close(&cards(&[C1, C2, C3]), &Multiset::single(T1, 1));

        assert_eq!(definition.combos, BTreeSet::from([B1, B2, B5]));
        assert_eq!(definition.needed_combos, BTreeSet::from([B1, B2]));
        // F3 is removed by B2; F5 only comes from utility scaffolding.
        assert_eq!(definition.features, BTreeSet::from([F4]));
        assert_eq!(definition.needed_features, BTreeSet::from([F1, F2, F4]));
        assert_eq!(definition.needed_feature_of_cards, BTreeSet::from([E1]));
        assert_eq!(definition.id.to_string(), "1-2-3--1");
    }

    #[test]
    fn test_close_replacements() {
        let definition = graph().close(&cards(&[C1, C2, C3]), &Multiset::single(T1, 1));

        assert_eq!(definition.replacements[&F4], vec![group(&[C1, C2, C3], &[T1])]);
        assert_eq!(definition.replacements[&F2], vec![group(&[C1, C2, C3], &[])]);
        assert_eq!(definition.replacements[&F1], vec![group(&[C1], &[])]);
        assert!(!definition.replacements.contains_key(&F5));
    }

    #[test]
    fn test_close_chained_utility_combos() {
        let definition = graph().close(&cards(&[C2, C3, C6, C7]), &Multiset::single(T1, 1));

        assert_eq!(definition.combos, BTreeSet::from([B1, B2, B4, B5]));
        assert_eq!(definition.needed_combos, BTreeSet::from([B1, B2, B4]));
        assert!(definition.needed_feature_of_cards.is_empty());
        assert_eq!(definition.replacements[&F1], vec![group(&[C6, C7], &[])]);
    }

    #[test]
    fn test_close_alternative_producers() {
        let definition =
            graph().close(&cards(&[C1, C2, C3, C4, C5]), &Multiset::single(T1, 1));

        assert_eq!(definition.needed_combos, BTreeSet::from([B1, B2, B3]));
        assert_eq!(
            definition.replacements[&F2],
            vec![group(&[C1, C2, C3], &[]), group(&[C4, C5], &[])]
        );
        assert_eq!(
            definition.replacements[&F4],
            vec![group(&[C1, C2, C3], &[T1]), group(&[C4, C5], &[T1])]
        );
    }

    #[test]
    fn test_close_nothing_fires() {
        let definition = graph().close(&cards(&[C4]), &Multiset::new());
        assert!(definition.combos.is_empty());
        assert!(definition.features.is_empty());
        assert!(definition.replacements.is_empty());
    }

    #[test]
    fn test_close_utility_only_is_not_needed() {
        // B3 fires but only produces utility F2.
        let definition = graph().close(&cards(&[C4, C5]), &Multiset::new());
        assert_eq!(definition.combos, BTreeSet::from([B3]));
        assert!(definition.needed_combos.is_empty());
        assert!(definition.features.is_empty());
    }

    /// Card 1 fuels a utility combo on card 2; the payoff needs two of its
    /// products.
    fn doubling_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.register_card(Card::new(CardId::new(1), "Fuel"));
        catalog.register_card(Card::new(CardId::new(2), "Engine"));
        catalog.register_feature(Feature::new(FeatureId::new(1), "Spark").utility());
        catalog.register_feature(Feature::new(FeatureId::new(2), "Token"));
        catalog.register_feature(Feature::new(FeatureId::new(3), "Win"));
        catalog.register_feature_of_card(FeatureOfCard::new(
            FeatureOfCardId::new(1),
            CardId::new(1),
            FeatureId::new(1),
        ));
        catalog.register_combo(
            Combo::new(ComboId::new(1), "Make token")
                .utility()
                .with_card(CardId::new(2))
                .needs(FeatureId::new(1), 1)
                .produces(FeatureId::new(2)),
        );
        catalog.register_combo(
            Combo::new(ComboId::new(2), "Two tokens")
                .needs(FeatureId::new(2), 2)
                .produces(FeatureId::new(3)),
        );
        catalog
    }

    #[test]
    fn test_close_credits_each_combo_copy() {
        let config = EngineConfig::default().with_multiple_copies(true);
        let graph = Graph::new(&doubling_catalog(), config).unwrap();
        let twice = Multiset::from_items([CardId::new(1), CardId::new(1), CardId::new(2), CardId::new(2)]);

        let definition = graph.close(&twice, &Multiset::new());
        assert_eq!(definition.combos, BTreeSet::from([ComboId::new(1), ComboId::new(2)]));
        assert_eq!(
            definition.needed_combos,
            BTreeSet::from([ComboId::new(1), ComboId::new(2)])
        );
        assert_eq!(
            definition.replacements[&FeatureId::new(3)],
            vec![IngredientGroup {
                cards: twice.clone(),
                templates: Multiset::new(),
            }]
        );

        // One engine only supports one copy.
        let once = Multiset::from_items([CardId::new(1), CardId::new(1), CardId::new(2)]);
        let definition = graph.close(&once, &Multiset::new());
        assert_eq!(definition.combos, BTreeSet::from([ComboId::new(1)]));
    }

    #[test]
    fn test_close_single_copy_without_multiple_copies() {
        let graph = Graph::new(&doubling_catalog(), EngineConfig::default()).unwrap();
        let twice = Multiset::from_items([CardId::new(1), CardId::new(1), CardId::new(2), CardId::new(2)]);

        let definition = graph.close(&twice, &Multiset::new());
        assert_eq!(definition.combos, BTreeSet::from([ComboId::new(1)]));
    }
}
