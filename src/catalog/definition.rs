//! Catalog entries.
//!
//! Cards and templates are ingredients. Features are effects. A
//! `FeatureOfCard` says a card produces a feature; a `Combo` says a set of
//! ingredients plus some features produces more features.

use serde::{Deserialize, Serialize};

use crate::core::{AttributeId, CardId, ComboId, FeatureId, FeatureOfCardId, TemplateId};
use crate::variants::Multiset;

use super::attributes::{AttributeMatcher, AttributeSet};

/// A concrete card.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
}

impl Card {
    /// Create a new card.
    pub fn new(id: CardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A template ingredient standing in for any card that fits a description.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
}

impl Template {
    /// Create a new template.
    pub fn new(id: TemplateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A named effect.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feature {
    /// Unique identifier.
    pub id: FeatureId,

    /// Feature name (for display/debugging).
    pub name: String,

    /// Presence-only: one producer satisfies any requested quantity.
    pub uncountable: bool,

    /// Scaffolding feature: never reported as a result on its own.
    pub utility: bool,
}

impl Feature {
    /// Create a countable, non-utility feature.
    pub fn new(id: FeatureId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            uncountable: false,
            utility: false,
        }
    }

    /// Mark as uncountable (builder pattern).
    #[must_use]
    pub fn uncountable(mut self) -> Self {
        self.uncountable = true;
        self
    }

    /// Mark as utility (builder pattern).
    #[must_use]
    pub fn utility(mut self) -> Self {
        self.utility = true;
        self
    }
}

/// A card producing a feature flavor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureOfCard {
    /// Unique identifier of this edge.
    pub id: FeatureOfCardId,

    /// The producing card.
    pub card: CardId,

    /// The produced feature.
    pub feature: FeatureId,

    /// Attributes of the produced flavor.
    pub attributes: AttributeSet,

    /// Copies of the card needed to produce one unit of the feature.
    pub quantity: u32,
}

impl FeatureOfCard {
    /// Create an edge needing one copy of `card`.
    pub fn new(id: FeatureOfCardId, card: CardId, feature: FeatureId) -> Self {
        Self {
            id,
            card,
            feature,
            attributes: AttributeSet::new(),
            quantity: 1,
        }
    }

    /// Set the produced attributes (builder pattern).
    #[must_use]
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = AttributeId>) -> Self {
        self.attributes = attributes.into_iter().collect();
        self
    }

    /// Set the card quantity (builder pattern).
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// How a combo takes part in generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComboStatus {
    /// Root of enumeration: every way to realize it becomes a variant.
    #[default]
    Generator,
    /// Only used to produce features other combos need.
    Utility,
    /// Not part of the graph.
    Draft,
}

/// A feature flavor a combo needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureNeed {
    pub feature: FeatureId,
    pub matcher: AttributeMatcher,
    pub quantity: u32,
}

/// A feature flavor a combo produces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureProduction {
    pub feature: FeatureId,
    pub attributes: AttributeSet,
}

/// A combo: ingredients plus needed features produce features.
///
/// ## Example
///
/// ```
/// use combo_variants::catalog::{Combo, ComboStatus};
/// use combo_variants::core::{CardId, ComboId, FeatureId, TemplateId};
///
/// let combo = Combo::new(ComboId::new(1), "Infinite mana")
///     .with_card(CardId::new(10))
///     .with_template(TemplateId::new(2))
///     .needs(FeatureId::new(1), 1)
///     .produces(FeatureId::new(5))
///     .removes(FeatureId::new(3));
///
/// assert_eq!(combo.status, ComboStatus::Generator);
/// assert_eq!(combo.cards.total(), 1);
/// assert_eq!(combo.needs.len(), 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Combo {
    /// Unique identifier.
    pub id: ComboId,

    /// Combo name (for display/debugging).
    pub name: String,

    /// Generation role.
    pub status: ComboStatus,

    /// Required cards.
    pub cards: Multiset<CardId>,

    /// Required templates.
    pub templates: Multiset<TemplateId>,

    /// Required feature flavors.
    pub needs: Vec<FeatureNeed>,

    /// Produced feature flavors.
    pub produces: Vec<FeatureProduction>,

    /// Features this combo cancels in any variant that includes it.
    pub removes: Vec<FeatureId>,
}

impl Combo {
    /// Create an empty generator combo.
    pub fn new(id: ComboId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: ComboStatus::default(),
            cards: Multiset::new(),
            templates: Multiset::new(),
            needs: Vec::new(),
            produces: Vec::new(),
            removes: Vec::new(),
        }
    }

    /// Set the status (builder pattern).
    #[must_use]
    pub fn with_status(mut self, status: ComboStatus) -> Self {
        self.status = status;
        self
    }

    /// Shorthand for `with_status(ComboStatus::Utility)`.
    #[must_use]
    pub fn utility(self) -> Self {
        self.with_status(ComboStatus::Utility)
    }

    /// Require one copy of a card (builder pattern).
    #[must_use]
    pub fn with_card(self, card: CardId) -> Self {
        self.with_cards(card, 1)
    }

    /// Require `quantity` copies of a card (builder pattern).
    #[must_use]
    pub fn with_cards(mut self, card: CardId, quantity: u32) -> Self {
        self.cards.insert(card, quantity);
        self
    }

    /// Require one copy of a template (builder pattern).
    #[must_use]
    pub fn with_template(mut self, template: TemplateId) -> Self {
        self.templates.insert(template, 1);
        self
    }

    /// Need `quantity` units of any flavor of `feature` (builder pattern).
    #[must_use]
    pub fn needs(self, feature: FeatureId, quantity: u32) -> Self {
        self.needs_matching(feature, AttributeMatcher::new(), quantity)
    }

    /// Need `quantity` units of the flavors of `feature` accepted by
    /// `matcher` (builder pattern).
    #[must_use]
    pub fn needs_matching(
        mut self,
        feature: FeatureId,
        matcher: AttributeMatcher,
        quantity: u32,
    ) -> Self {
        self.needs.push(FeatureNeed {
            feature,
            matcher,
            quantity,
        });
        self
    }

    /// Produce the untagged flavor of `feature` (builder pattern).
    #[must_use]
    pub fn produces(self, feature: FeatureId) -> Self {
        self.produces_with(feature, std::iter::empty())
    }

    /// Produce `feature` tagged with `attributes` (builder pattern).
    #[must_use]
    pub fn produces_with(
        mut self,
        feature: FeatureId,
        attributes: impl IntoIterator<Item = AttributeId>,
    ) -> Self {
        self.produces.push(FeatureProduction {
            feature,
            attributes: attributes.into_iter().collect(),
        });
        self
    }

    /// Cancel `feature` in including variants (builder pattern).
    #[must_use]
    pub fn removes(mut self, feature: FeatureId) -> Self {
        if !self.removes.contains(&feature) {
            self.removes.push(feature);
        }
        self
    }
}
