//! Variant definitions produced by a generation run.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{CardId, ComboId, FeatureId, FeatureOfCardId, TemplateId};
use crate::variants::Multiset;

/// Canonical identity of a variant: its cards and templates in ascending
/// order, each id repeated once per copy.
///
/// Displays as card ids joined by `-`, then `--` and the template ids when
/// there are any: `1-2-2-3--1`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariantId {
    cards: Vec<CardId>,
    templates: Vec<TemplateId>,
}

impl VariantId {
    /// Canonical id of a card and template selection.
    #[must_use]
    pub fn new(cards: &Multiset<CardId>, templates: &Multiset<TemplateId>) -> Self {
        Self {
            cards: expand(cards),
            templates: expand(templates),
        }
    }

    /// Card ids, one entry per copy.
    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    /// Template ids, one entry per copy.
    #[must_use]
    pub fn templates(&self) -> &[TemplateId] {
        &self.templates
    }
}

fn expand<K: Copy + Ord>(multiset: &Multiset<K>) -> Vec<K> {
    multiset
        .iter()
        .flat_map(|(key, count)| std::iter::repeat(key).take(count as usize))
        .collect()
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for card in &self.cards {
            if !first {
                f.write_str("-")?;
            }
            write!(f, "{}", card.raw())?;
            first = false;
        }
        if !self.templates.is_empty() {
            f.write_str("--")?;
            let mut first = true;
            for template in &self.templates {
                if !first {
                    f.write_str("-")?;
                }
                write!(f, "{}", template.raw())?;
                first = false;
            }
        }
        Ok(())
    }
}

/// One concrete group of ingredients that realized a feature.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IngredientGroup {
    pub cards: Multiset<CardId>,
    pub templates: Multiset<TemplateId>,
}

/// Everything a concrete selection of cards and templates realizes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDefinition {
    pub id: VariantId,
    pub cards: Multiset<CardId>,
    pub templates: Multiset<TemplateId>,

    /// Produced features that are neither utility nor removed.
    pub features: BTreeSet<FeatureId>,

    /// Every combo the selection satisfies.
    pub combos: BTreeSet<ComboId>,

    /// Combos that contribute to an interesting feature.
    pub needed_combos: BTreeSet<ComboId>,

    /// Features on the path to an interesting feature, including it.
    pub needed_features: BTreeSet<FeatureId>,

    /// Production edges on the path to an interesting feature.
    pub needed_feature_of_cards: BTreeSet<FeatureOfCardId>,

    /// Minimal ingredient groups realizing each needed feature.
    pub replacements: BTreeMap<FeatureId, Vec<IngredientGroup>>,

    /// Generator combos whose resolution yielded this variant.
    pub generated_by: BTreeSet<ComboId>,
}

impl VariantDefinition {
    /// An empty definition for a selection.
    #[must_use]
    pub fn new(cards: Multiset<CardId>, templates: Multiset<TemplateId>) -> Self {
        Self {
            id: VariantId::new(&cards, &templates),
            cards,
            templates,
            features: BTreeSet::new(),
            combos: BTreeSet::new(),
            needed_combos: BTreeSet::new(),
            needed_features: BTreeSet::new(),
            needed_feature_of_cards: BTreeSet::new(),
            replacements: BTreeMap::new(),
            generated_by: BTreeSet::new(),
        }
    }

    /// Fold another definition of the same variant into this one.
    pub fn merge(&mut self, other: VariantDefinition) {
        debug_assert_eq!(self.id, other.id);
        self.features.extend(other.features);
        self.combos.extend(other.combos);
        self.needed_combos.extend(other.needed_combos);
        self.needed_features.extend(other.needed_features);
        self.needed_feature_of_cards
            .extend(other.needed_feature_of_cards);
        self.generated_by.extend(other.generated_by);
        for (feature, groups) in other.replacements {
            let merged = self.replacements.entry(feature).or_default();
            merged.extend(groups);
            merged.sort();
            merged.dedup();
        }
    }
}
