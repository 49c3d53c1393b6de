//! Catalog registry.
//!
//! The `Catalog` stores every card, template, feature, attribute, production
//! edge and combo the engine reads. It is filled once and then treated as a
//! read-only snapshot: the graph borrows nothing from it after building.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{
    AttributeId, CardId, CatalogError, ComboId, FeatureId, FeatureOfCardId, TemplateId,
};

use super::attributes::FeatureAttribute;
use super::definition::{Card, Combo, Feature, FeatureOfCard, Template};

/// Registry of catalog entries.
///
/// ## Example
///
/// ```
/// use combo_variants::catalog::{Catalog, Card, Combo, Feature};
/// use combo_variants::core::{CardId, ComboId, FeatureId};
///
/// let mut catalog = Catalog::new();
/// catalog.register_card(Card::new(CardId::new(1), "Sol Ring"));
/// catalog.register_feature(Feature::new(FeatureId::new(1), "Infinite mana"));
/// catalog.register_combo(
///     Combo::new(ComboId::new(1), "Ring alone")
///         .with_card(CardId::new(1))
///         .produces(FeatureId::new(1)),
/// );
///
/// assert!(catalog.validate().is_ok());
/// assert_eq!(catalog.combo(ComboId::new(1)).unwrap().name, "Ring alone");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    cards: FxHashMap<CardId, Card>,
    templates: FxHashMap<TemplateId, Template>,
    features: FxHashMap<FeatureId, Feature>,
    attributes: FxHashMap<AttributeId, FeatureAttribute>,
    feature_of_cards: FxHashMap<FeatureOfCardId, FeatureOfCard>,
    combos: FxHashMap<ComboId, Combo>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register_card(&mut self, card: Card) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Register a template.
    ///
    /// Panics if a template with the same ID already exists.
    pub fn register_template(&mut self, template: Template) {
        if self.templates.contains_key(&template.id) {
            panic!("Template with ID {:?} already registered", template.id);
        }
        self.templates.insert(template.id, template);
    }

    /// Register a feature.
    ///
    /// Panics if a feature with the same ID already exists.
    pub fn register_feature(&mut self, feature: Feature) {
        if self.features.contains_key(&feature.id) {
            panic!("Feature with ID {:?} already registered", feature.id);
        }
        self.features.insert(feature.id, feature);
    }

    /// Register an attribute.
    ///
    /// Panics if an attribute with the same ID already exists.
    pub fn register_attribute(&mut self, attribute: FeatureAttribute) {
        if self.attributes.contains_key(&attribute.id) {
            panic!("Attribute with ID {:?} already registered", attribute.id);
        }
        self.attributes.insert(attribute.id, attribute);
    }

    /// Register a production edge.
    ///
    /// Panics if an edge with the same ID already exists.
    pub fn register_feature_of_card(&mut self, edge: FeatureOfCard) {
        if self.feature_of_cards.contains_key(&edge.id) {
            panic!("FeatureOfCard with ID {:?} already registered", edge.id);
        }
        self.feature_of_cards.insert(edge.id, edge);
    }

    /// Register a combo.
    ///
    /// Panics if a combo with the same ID already exists.
    pub fn register_combo(&mut self, combo: Combo) {
        if self.combos.contains_key(&combo.id) {
            panic!("Combo with ID {:?} already registered", combo.id);
        }
        self.combos.insert(combo.id, combo);
    }

    /// Get a card by ID.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Get a template by ID.
    #[must_use]
    pub fn template(&self, id: TemplateId) -> Option<&Template> {
        self.templates.get(&id)
    }

    /// Get a feature by ID.
    #[must_use]
    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    /// Get an attribute by ID.
    #[must_use]
    pub fn attribute(&self, id: AttributeId) -> Option<&FeatureAttribute> {
        self.attributes.get(&id)
    }

    /// Get a production edge by ID.
    #[must_use]
    pub fn feature_of_card(&self, id: FeatureOfCardId) -> Option<&FeatureOfCard> {
        self.feature_of_cards.get(&id)
    }

    /// Get a combo by ID.
    #[must_use]
    pub fn combo(&self, id: ComboId) -> Option<&Combo> {
        self.combos.get(&id)
    }

    /// Cards in ascending id order.
    pub fn cards(&self) -> Vec<&Card> {
        sorted_by_id(self.cards.values(), |c| c.id)
    }

    /// Templates in ascending id order.
    pub fn templates(&self) -> Vec<&Template> {
        sorted_by_id(self.templates.values(), |t| t.id)
    }

    /// Features in ascending id order.
    pub fn features(&self) -> Vec<&Feature> {
        sorted_by_id(self.features.values(), |f| f.id)
    }

    /// Production edges in ascending id order.
    pub fn feature_of_cards(&self) -> Vec<&FeatureOfCard> {
        sorted_by_id(self.feature_of_cards.values(), |e| e.id)
    }

    /// Combos in ascending id order.
    pub fn combos(&self) -> Vec<&Combo> {
        sorted_by_id(self.combos.values(), |c| c.id)
    }

    /// Number of combos.
    #[must_use]
    pub fn combo_count(&self) -> usize {
        self.combos.len()
    }

    /// Check every reference between entries.
    ///
    /// # Errors
    ///
    /// Returns the first dangling id or zero quantity found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for edge in self.feature_of_cards() {
            if !self.cards.contains_key(&edge.card) {
                return Err(CatalogError::UnknownProducer {
                    edge: edge.id,
                    card: edge.card,
                });
            }
            let owner = edge.id.to_string();
            self.check_feature(&owner, edge.feature)?;
            self.check_attributes(&owner, edge.attributes.iter())?;
            if edge.quantity == 0 {
                return Err(CatalogError::ZeroQuantity { owner });
            }
        }

        for combo in self.combos() {
            let owner = combo.id.to_string();
            if let Some(card) = combo.cards.keys().find(|c| !self.cards.contains_key(c)) {
                return Err(CatalogError::UnknownCard {
                    combo: combo.id,
                    card,
                });
            }
            if let Some(template) = combo
                .templates
                .keys()
                .find(|t| !self.templates.contains_key(t))
            {
                return Err(CatalogError::UnknownTemplate {
                    combo: combo.id,
                    template,
                });
            }
            for need in &combo.needs {
                self.check_feature(&owner, need.feature)?;
                self.check_attributes(&owner, need.matcher.referenced())?;
                if need.quantity == 0 {
                    return Err(CatalogError::ZeroQuantity { owner });
                }
            }
            for production in &combo.produces {
                self.check_feature(&owner, production.feature)?;
                self.check_attributes(&owner, production.attributes.iter())?;
            }
            for &removed in &combo.removes {
                self.check_feature(&owner, removed)?;
            }
        }
        Ok(())
    }

    /// Encode the catalog as a binary snapshot.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, CatalogError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode and validate a binary snapshot.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, CatalogError> {
        let catalog: Self = bincode::deserialize(bytes)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn check_feature(&self, owner: &str, feature: FeatureId) -> Result<(), CatalogError> {
        if self.features.contains_key(&feature) {
            Ok(())
        } else {
            Err(CatalogError::UnknownFeature {
                owner: owner.to_string(),
                feature,
            })
        }
    }

    fn check_attributes(
        &self,
        owner: &str,
        mut attributes: impl Iterator<Item = AttributeId>,
    ) -> Result<(), CatalogError> {
        match attributes.find(|a| !self.attributes.contains_key(a)) {
            Some(attribute) => Err(CatalogError::UnknownAttribute {
                owner: owner.to_string(),
                attribute,
            }),
            None => Ok(()),
        }
    }
}

fn sorted_by_id<'a, T, K: Ord>(
    values: impl Iterator<Item = &'a T>,
    key: impl Fn(&T) -> K,
) -> Vec<&'a T> {
    let mut values: Vec<&T> = values.collect();
    values.sort_by_key(|v| key(*v));
    values
}
