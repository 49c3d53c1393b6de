//! Graph nodes.
//!
//! Every node lives in the `Graph` arena and is referenced by `NodeId`.
//! Nodes only hold immutable structure; traversal state (visit marks,
//! memoized variant sets, feature currency) lives in the pass that walks
//! them.

use serde::{Deserialize, Serialize};

use crate::catalog::{AttributeMatcher, AttributeSet, ComboStatus};
use crate::core::{CardId, ComboId, FeatureId, FeatureOfCardId, TemplateId};
use crate::variants::Multiset;

/// Index into the graph node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A card ingredient.
#[derive(Clone, Debug)]
pub struct CardNode {
    pub card: CardId,
    /// Production edges from this card.
    pub features: Vec<NodeId>,
    /// Combos requiring this card.
    pub combos: Vec<NodeId>,
}

/// A template ingredient.
#[derive(Clone, Debug)]
pub struct TemplateNode {
    pub template: TemplateId,
    /// Combos requiring this template.
    pub combos: Vec<NodeId>,
}

/// A card producing a feature flavor.
#[derive(Clone, Debug)]
pub struct FeatureOfCardNode {
    pub edge: FeatureOfCardId,
    pub card: CardId,
    /// Copies of the card per produced unit.
    pub quantity: u32,
    /// The produced flavor node.
    pub flavor: NodeId,
}

/// A (feature, attribute set) flavor and everything producing it.
#[derive(Clone, Debug)]
pub struct FeatureWithAttributesNode {
    pub feature: FeatureId,
    pub attributes: AttributeSet,
    pub uncountable: bool,
    pub utility: bool,
    /// `FeatureOfCard` producers.
    pub produced_by_cards: Vec<NodeId>,
    /// `Combo` producers.
    pub produced_by_combos: Vec<NodeId>,
}

/// A (feature, matcher) requirement and the flavors it accepts.
#[derive(Clone, Debug)]
pub struct FeatureWithAttributesMatcherNode {
    pub feature: FeatureId,
    pub matcher: AttributeMatcher,
    pub uncountable: bool,
    /// Matching flavor nodes, fixed at build time.
    pub matches: Vec<NodeId>,
    /// Combos with this requirement.
    pub needed_by: Vec<NodeId>,
}

/// A combo hyperedge.
#[derive(Clone, Debug)]
pub struct ComboNode {
    pub combo: ComboId,
    pub status: ComboStatus,
    pub cards: Multiset<CardId>,
    pub templates: Multiset<TemplateId>,
    /// Requirement nodes with the needed quantity.
    pub needs: Vec<(NodeId, u32)>,
    /// Produced flavor nodes.
    pub produces: Vec<NodeId>,
    pub removes: Vec<FeatureId>,
}

impl ComboNode {
    /// Check if the combo needs no cards and no templates.
    #[must_use]
    pub fn is_ingredientless(&self) -> bool {
        self.cards.is_empty() && self.templates.is_empty()
    }
}

/// Any node in the graph.
#[derive(Clone, Debug)]
pub enum Node {
    Card(CardNode),
    Template(TemplateNode),
    FeatureOfCard(FeatureOfCardNode),
    Feature(FeatureWithAttributesNode),
    FeatureMatcher(FeatureWithAttributesMatcherNode),
    Combo(ComboNode),
}

impl Node {
    /// The combo payload, if this is a combo node.
    #[must_use]
    pub fn as_combo(&self) -> Option<&ComboNode> {
        match self {
            Node::Combo(combo) => Some(combo),
            _ => None,
        }
    }

    /// The flavor payload, if this is a flavor node.
    #[must_use]
    pub fn as_feature(&self) -> Option<&FeatureWithAttributesNode> {
        match self {
            Node::Feature(flavor) => Some(flavor),
            _ => None,
        }
    }

    /// The matcher payload, if this is a requirement node.
    #[must_use]
    pub fn as_matcher(&self) -> Option<&FeatureWithAttributesMatcherNode> {
        match self {
            Node::FeatureMatcher(matcher) => Some(matcher),
            _ => None,
        }
    }

    /// The production edge payload, if this is an edge node.
    #[must_use]
    pub fn as_feature_of_card(&self) -> Option<&FeatureOfCardNode> {
        match self {
            Node::FeatureOfCard(edge) => Some(edge),
            _ => None,
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Card(card) => write!(f, "{}", card.card),
            Node::Template(template) => write!(f, "{}", template.template),
            Node::FeatureOfCard(edge) => write!(f, "{}", edge.edge),
            Node::Feature(flavor) => {
                write!(f, "{} with {} attributes", flavor.feature, flavor.attributes.len())
            }
            Node::FeatureMatcher(matcher) => write!(f, "{} requirement", matcher.feature),
            Node::Combo(combo) => write!(f, "{}", combo.combo),
        }
    }
}
