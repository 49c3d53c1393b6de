//! The combo graph.
//!
//! Built once from a catalog snapshot. Nodes are stored in a flat
//! `Vec<Node>` and referenced by `NodeId` indices, so shared sub-structure
//! (a card used by many combos, a feature produced by many cards) exists
//! exactly once and can be memoized by index.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::catalog::{AttributeMatcher, AttributeSet, Catalog, ComboStatus, Feature};
use crate::core::{
    CardId, CatalogError, ComboId, EngineConfig, FeatureId, GraphError, TemplateId,
};
use crate::variants::VariantSetParams;

use super::down::Resolver;
use super::node::{
    CardNode, ComboNode, FeatureOfCardNode, FeatureWithAttributesMatcherNode,
    FeatureWithAttributesNode, Node, NodeId, TemplateNode,
};

/// Arena-based combo graph.
///
/// ```
/// use combo_variants::catalog::sample::{sample_catalog, B2};
/// use combo_variants::core::EngineConfig;
/// use combo_variants::graph::Graph;
///
/// let graph = Graph::new(&sample_catalog(), EngineConfig::default()).unwrap();
/// let variants = graph.resolver().resolve(B2).unwrap();
/// assert_eq!(variants.len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    cards: FxHashMap<CardId, NodeId>,
    templates: FxHashMap<TemplateId, NodeId>,
    combos: FxHashMap<ComboId, NodeId>,
    flavors: FxHashMap<(FeatureId, AttributeSet), NodeId>,
    matchers: FxHashMap<(FeatureId, AttributeMatcher), NodeId>,
    flavors_of: FxHashMap<FeatureId, Vec<NodeId>>,
    ingredientless: Vec<NodeId>,
    generators: Vec<ComboId>,
    config: EngineConfig,
}

impl Graph {
    /// Build the graph for a catalog.
    ///
    /// Draft combos are left out.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid or the catalog has dangling references.
    pub fn new(catalog: &Catalog, config: EngineConfig) -> Result<Self, GraphError> {
        config.validate()?;
        catalog.validate()?;

        let mut graph = Self {
            nodes: Vec::new(),
            cards: FxHashMap::default(),
            templates: FxHashMap::default(),
            combos: FxHashMap::default(),
            flavors: FxHashMap::default(),
            matchers: FxHashMap::default(),
            flavors_of: FxHashMap::default(),
            ingredientless: Vec::new(),
            generators: Vec::new(),
            config,
        };

        for card in catalog.cards() {
            let id = graph.alloc(Node::Card(CardNode {
                card: card.id,
                features: Vec::new(),
                combos: Vec::new(),
            }));
            graph.cards.insert(card.id, id);
        }

        for template in catalog.templates() {
            let id = graph.alloc(Node::Template(TemplateNode {
                template: template.id,
                combos: Vec::new(),
            }));
            graph.templates.insert(template.id, id);
        }

        for edge in catalog.feature_of_cards() {
            let feature = lookup_feature(catalog, edge.feature, || edge.id.to_string())?;
            let flavor = graph.flavor_node(feature, &edge.attributes);
            let node = graph.alloc(Node::FeatureOfCard(FeatureOfCardNode {
                edge: edge.id,
                card: edge.card,
                quantity: edge.quantity,
                flavor,
            }));
            if let Some(&id) = graph.cards.get(&edge.card) {
                if let Node::Card(card) = &mut graph.nodes[id.index()] {
                    card.features.push(node);
                }
            }
            if let Node::Feature(flavor) = &mut graph.nodes[flavor.index()] {
                flavor.produced_by_cards.push(node);
            }
        }

        let combos: Vec<_> = catalog
            .combos()
            .into_iter()
            .filter(|c| c.status != ComboStatus::Draft)
            .collect();

        // Productions first so every flavor exists before requirements are matched.
        let mut combo_nodes = Vec::with_capacity(combos.len());
        for combo in &combos {
            let node = graph.alloc(Node::Combo(ComboNode {
                combo: combo.id,
                status: combo.status,
                cards: combo.cards.clone(),
                templates: combo.templates.clone(),
                needs: Vec::new(),
                produces: Vec::new(),
                removes: combo.removes.clone(),
            }));
            graph.combos.insert(combo.id, node);
            combo_nodes.push(node);

            for card in combo.cards.keys() {
                if let Some(&id) = graph.cards.get(&card) {
                    if let Node::Card(card) = &mut graph.nodes[id.index()] {
                        card.combos.push(node);
                    }
                }
            }
            for template in combo.templates.keys() {
                if let Some(&id) = graph.templates.get(&template) {
                    if let Node::Template(template) = &mut graph.nodes[id.index()] {
                        template.combos.push(node);
                    }
                }
            }
            if combo.cards.is_empty() && combo.templates.is_empty() {
                graph.ingredientless.push(node);
            }

            for production in &combo.produces {
                let feature = lookup_feature(catalog, production.feature, || combo.id.to_string())?;
                let flavor = graph.flavor_node(feature, &production.attributes);
                if let Node::Feature(flavor) = &mut graph.nodes[flavor.index()] {
                    flavor.produced_by_combos.push(node);
                }
                if let Node::Combo(combo) = &mut graph.nodes[node.index()] {
                    if !combo.produces.contains(&flavor) {
                        combo.produces.push(flavor);
                    }
                }
            }

            if combo.status == ComboStatus::Generator {
                graph.generators.push(combo.id);
            }
        }

        for (combo, &node) in combos.iter().zip(&combo_nodes) {
            for need in &combo.needs {
                let feature = lookup_feature(catalog, need.feature, || combo.id.to_string())?;
                let matcher = graph.matcher_node(feature, &need.matcher);
                if let Node::FeatureMatcher(matcher) = &mut graph.nodes[matcher.index()] {
                    matcher.needed_by.push(node);
                }
                if let Node::Combo(combo) = &mut graph.nodes[node.index()] {
                    combo.needs.push((matcher, need.quantity));
                }
            }
        }

        graph.match_requirements();

        debug!(
            nodes = graph.nodes.len(),
            combos = graph.combos.len(),
            generators = graph.generators.len(),
            flavors = graph.flavors.len(),
            requirements = graph.matchers.len(),
            "built combo graph"
        );
        Ok(graph)
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node of a card.
    #[must_use]
    pub fn card_node(&self, card: CardId) -> Option<NodeId> {
        self.cards.get(&card).copied()
    }

    /// Node of a template.
    #[must_use]
    pub fn template_node(&self, template: TemplateId) -> Option<NodeId> {
        self.templates.get(&template).copied()
    }

    /// Node of a combo. `None` for unknown and draft combos.
    #[must_use]
    pub fn combo_node(&self, combo: ComboId) -> Option<NodeId> {
        self.combos.get(&combo).copied()
    }

    /// Node of an exact (feature, attributes) flavor.
    #[must_use]
    pub fn flavor_node_of(&self, feature: FeatureId, attributes: &AttributeSet) -> Option<NodeId> {
        self.flavors.get(&(feature, attributes.clone())).copied()
    }

    /// Every flavor node of a feature.
    #[must_use]
    pub fn flavors_of(&self, feature: FeatureId) -> &[NodeId] {
        self.flavors_of.get(&feature).map_or(&[], Vec::as_slice)
    }

    /// Combos requiring neither cards nor templates.
    #[must_use]
    pub fn ingredientless_combos(&self) -> &[NodeId] {
        &self.ingredientless
    }

    /// Generator combos in ascending id order.
    #[must_use]
    pub fn generators(&self) -> &[ComboId] {
        &self.generators
    }

    /// The configuration the graph was built with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Variant set parameters derived from the configuration.
    #[must_use]
    pub fn params(&self) -> VariantSetParams {
        VariantSetParams::from(&self.config)
    }

    /// Start a downward resolution pass.
    #[must_use]
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn flavor_node(&mut self, feature: &Feature, attributes: &AttributeSet) -> NodeId {
        let key = (feature.id, attributes.clone());
        if let Some(&id) = self.flavors.get(&key) {
            return id;
        }
        let id = self.alloc(Node::Feature(FeatureWithAttributesNode {
            feature: feature.id,
            attributes: attributes.clone(),
            uncountable: feature.uncountable,
            utility: feature.utility,
            produced_by_cards: Vec::new(),
            produced_by_combos: Vec::new(),
        }));
        self.flavors.insert(key, id);
        self.flavors_of.entry(feature.id).or_default().push(id);
        id
    }

    fn matcher_node(&mut self, feature: &Feature, matcher: &AttributeMatcher) -> NodeId {
        let key = (feature.id, matcher.clone());
        if let Some(&id) = self.matchers.get(&key) {
            return id;
        }
        let id = self.alloc(Node::FeatureMatcher(FeatureWithAttributesMatcherNode {
            feature: feature.id,
            matcher: matcher.clone(),
            uncountable: feature.uncountable,
            matches: Vec::new(),
            needed_by: Vec::new(),
        }));
        self.matchers.insert(key, id);
        id
    }

    fn match_requirements(&mut self) {
        let requirements: Vec<NodeId> = self.matchers.values().copied().collect();
        for id in requirements {
            let Some(requirement) = self.nodes[id.index()].as_matcher() else {
                continue;
            };
            let mut matches: Vec<NodeId> = self
                .flavors_of(requirement.feature)
                .iter()
                .copied()
                .filter(|&flavor| {
                    self.nodes[flavor.index()]
                        .as_feature()
                        .is_some_and(|f| requirement.matcher.matches(&f.attributes))
                })
                .collect();
            matches.sort();
            if let Node::FeatureMatcher(requirement) = &mut self.nodes[id.index()] {
                requirement.matches = matches;
            }
        }
    }
}

fn lookup_feature<'c>(
    catalog: &'c Catalog,
    feature: FeatureId,
    owner: impl FnOnce() -> String,
) -> Result<&'c Feature, CatalogError> {
    catalog.feature(feature).ok_or_else(|| CatalogError::UnknownFeature {
        owner: owner(),
        feature,
    })
}
