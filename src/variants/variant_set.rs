//! Variant sets: antichains of ingredient keys.
//!
//! A key is one multiset over cards *and* templates, so "two copies of card 7
//! plus template 3" is a single key. A `VariantSet` holds the minimal keys
//! that satisfy some requirement; every superset of a stored key satisfies
//! it too and is never stored.
//!
//! ## Operations
//!
//! - `or`: either requirement suffices (alternative producers)
//! - `and`: both requirements hold at once; keys are unioned pointwise
//!   (max), so one card may serve both sides
//! - `sum` / `+`: copies add up; one card may not fill both sides unless
//!   multiple copies are allowed
//!
//! Keys with more than `max_depth` distinct ingredients are never stored.

use serde::{Deserialize, Serialize};
use std::ops::{Add, BitAnd, BitOr};

use crate::core::{CardId, EngineConfig, TemplateId};

use super::antichain::MinimalSetOfMultisets;
use super::multiset::Multiset;

/// One ingredient of a variant.
///
/// Cards order before templates, so keys list cards first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ingredient {
    Card(CardId),
    Template(TemplateId),
}

impl Ingredient {
    /// Check if this ingredient is a card.
    #[must_use]
    pub fn is_card(self) -> bool {
        matches!(self, Ingredient::Card(_))
    }
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ingredient::Card(id) => write!(f, "{}", id),
            Ingredient::Template(id) => write!(f, "{}", id),
        }
    }
}

/// Combined card and template multiset.
pub type IngredientKey = Multiset<Ingredient>;

/// Limits shared by every set derived from the same run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSetParams {
    /// Maximum distinct ingredients per key.
    pub max_depth: usize,

    /// Whether `sum` may reuse a card on both sides.
    pub allow_multiple_copies: bool,
}

impl VariantSetParams {
    /// Create parameters.
    #[must_use]
    pub const fn new(max_depth: usize, allow_multiple_copies: bool) -> Self {
        Self {
            max_depth,
            allow_multiple_copies,
        }
    }
}

impl From<&EngineConfig> for VariantSetParams {
    fn from(config: &EngineConfig) -> Self {
        Self::new(config.card_limit, config.allow_multiple_copies)
    }
}

/// A minimal set of ingredient keys.
///
/// ```
/// use combo_variants::core::{CardId, TemplateId};
/// use combo_variants::variants::{Multiset, VariantSet, VariantSetParams};
///
/// let params = VariantSetParams::new(3, false);
/// let mut combo = VariantSet::new(params);
/// combo.insert(&Multiset::from_items([CardId::new(1), CardId::new(2)]), &Multiset::new());
///
/// let mut other = VariantSet::new(params);
/// other.insert(&Multiset::from_items([CardId::new(3)]), &Multiset::from_items([TemplateId::new(1)]));
///
/// // Needing both pieces at once unions the keys.
/// let both = &combo & &other;
/// assert_eq!(both.len(), 0); // 4 distinct ingredients exceed max_depth = 3
///
/// let either = &combo | &other;
/// assert_eq!(either.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSet {
    sets: MinimalSetOfMultisets<Ingredient>,
    params: VariantSetParams,
}

impl VariantSet {
    /// Create an empty (unsatisfiable) set.
    #[must_use]
    pub fn new(params: VariantSetParams) -> Self {
        Self {
            sets: MinimalSetOfMultisets::new(),
            params,
        }
    }

    /// The set containing only the empty key: satisfied by anything.
    ///
    /// This is the identity of `and` and `sum`.
    #[must_use]
    pub fn unit(params: VariantSetParams) -> Self {
        let mut set = Self::new(params);
        set.add_key(IngredientKey::new());
        set
    }

    /// A set with a single key.
    #[must_use]
    pub fn from_ingredients(
        params: VariantSetParams,
        cards: &Multiset<CardId>,
        templates: &Multiset<TemplateId>,
    ) -> Self {
        let mut set = Self::new(params);
        set.insert(cards, templates);
        set
    }

    /// Merge card and template multisets into one key.
    #[must_use]
    pub fn ingredients_to_key(
        cards: &Multiset<CardId>,
        templates: &Multiset<TemplateId>,
    ) -> IngredientKey {
        cards
            .iter()
            .map(|(id, n)| (Ingredient::Card(id), n))
            .chain(templates.iter().map(|(id, n)| (Ingredient::Template(id), n)))
            .collect()
    }

    /// Split a key back into card and template multisets.
    #[must_use]
    pub fn key_to_ingredients(key: &IngredientKey) -> (Multiset<CardId>, Multiset<TemplateId>) {
        let mut cards = Multiset::new();
        let mut templates = Multiset::new();
        for (ingredient, n) in key.iter() {
            match ingredient {
                Ingredient::Card(id) => cards.insert(id, n),
                Ingredient::Template(id) => templates.insert(id, n),
            }
        }
        (cards, templates)
    }

    /// The parameters this set was created with.
    #[must_use]
    pub fn params(&self) -> VariantSetParams {
        self.params
    }

    /// Add a combination of cards and templates.
    ///
    /// No-op if it has more than `max_depth` distinct ingredients or if an
    /// existing key already covers it.
    pub fn insert(&mut self, cards: &Multiset<CardId>, templates: &Multiset<TemplateId>) {
        self.add_key(Self::ingredients_to_key(cards, templates));
    }

    /// Add a key directly. Returns `true` if it was stored.
    pub fn add_key(&mut self, key: IngredientKey) -> bool {
        if key.distinct_len() > self.params.max_depth {
            return false;
        }
        self.sets.add(key)
    }

    /// Keys that fit inside a concrete selection of cards and templates.
    #[must_use]
    pub fn filter(&self, cards: &Multiset<CardId>, templates: &Multiset<TemplateId>) -> Self {
        let selection = Self::ingredients_to_key(cards, templates);
        let mut result = Self::new(self.params);
        for key in self.sets.subsets_of(&selection) {
            result.sets.add(key.clone());
        }
        result
    }

    /// Satisfied by either set.
    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for key in other.sets.iter() {
            result.add_key(key.clone());
        }
        result
    }

    /// Satisfied by both sets at once.
    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        let mut result = Self::new(self.params);
        for left in self.sets.iter() {
            for right in other.sets.iter() {
                result.add_key(left.union(right));
            }
        }
        result
    }

    /// Satisfied by one key from each set with their copies added together.
    ///
    /// When multiple copies are not allowed, pairs that would use the same
    /// card on both sides are skipped.
    #[must_use]
    pub fn sum(&self, other: &Self) -> Self {
        let mut result = Self::new(self.params);
        for left in self.sets.iter() {
            for right in other.sets.iter() {
                if !self.params.allow_multiple_copies
                    && left.shares_key_where(right, Ingredient::is_card)
                {
                    continue;
                }
                result.add_key(left.sum(right));
            }
        }
        result
    }

    /// `quantity` independent copies of this requirement.
    #[must_use]
    pub fn repeat(&self, quantity: u32) -> Self {
        match quantity {
            0 => Self::unit(self.params),
            1 => self.clone(),
            _ => (1..quantity).fold(self.clone(), |acc, _| acc.sum(self)),
        }
    }

    /// Union of all sets. Empty when there are none.
    pub fn or_sets<'a>(params: VariantSetParams, sets: impl IntoIterator<Item = &'a Self>) -> Self {
        sets.into_iter().fold(Self::new(params), |acc, set| acc.or(set))
    }

    /// Conjunction of all sets. The unit set when there are none.
    pub fn and_sets<'a>(params: VariantSetParams, sets: impl IntoIterator<Item = &'a Self>) -> Self {
        sets.into_iter().fold(Self::unit(params), |acc, set| acc.and(set))
    }

    /// Sum of all sets. The unit set when there are none.
    pub fn sum_sets<'a>(params: VariantSetParams, sets: impl IntoIterator<Item = &'a Self>) -> Self {
        sets.into_iter().fold(Self::unit(params), |acc, set| acc.sum(set))
    }

    /// Number of keys. An upper bound on the size of anything derived
    /// from this set by a single `or` term.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if nothing satisfies this set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Iterate over raw keys.
    pub fn keys(&self) -> impl Iterator<Item = &IngredientKey> {
        self.sets.iter()
    }

    /// All variants as card and template multisets, sorted.
    #[must_use]
    pub fn variants(&self) -> Vec<(Multiset<CardId>, Multiset<TemplateId>)> {
        self.sets
            .sorted()
            .iter()
            .map(Self::key_to_ingredients)
            .collect()
    }
}

impl BitOr for &VariantSet {
    type Output = VariantSet;

    fn bitor(self, rhs: Self) -> VariantSet {
        self.or(rhs)
    }
}

impl BitAnd for &VariantSet {
    type Output = VariantSet;

    fn bitand(self, rhs: Self) -> VariantSet {
        self.and(rhs)
    }
}

impl Add for &VariantSet {
    type Output = VariantSet;

    fn add(self, rhs: Self) -> VariantSet {
        self.sum(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: VariantSetParams = VariantSetParams::new(4, false);

    fn cards(ids: &[u32]) -> Multiset<CardId> {
        Multiset::from_items(ids.iter().map(|&id| CardId::new(id)))
    }

    fn templates(ids: &[u32]) -> Multiset<TemplateId> {
        Multiset::from_items(ids.iter().map(|&id| TemplateId::new(id)))
    }

    fn set(keys: &[(&[u32], &[u32])]) -> VariantSet {
        let mut result = VariantSet::new(PARAMS);
        for (c, t) in keys {
            result.insert(&cards(c), &templates(t));
        }
        result
    }

    #[test]
    fn test_depth_bound() {
        let mut s = VariantSet::new(VariantSetParams::new(2, false));
        s.insert(&cards(&[1, 2]), &templates(&[1]));
        assert!(s.is_empty());

        // Copies do not count towards depth.
        s.insert(&Multiset::single(CardId::new(1), 5), &templates(&[1]));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_key_round_trip_separates_namespaces() {
        let key = VariantSet::ingredients_to_key(&cards(&[3, 1]), &templates(&[3]));
        assert_eq!(key.distinct_len(), 3);
        assert_eq!(
            key.keys().collect::<Vec<_>>(),
            vec![
                Ingredient::Card(CardId::new(1)),
                Ingredient::Card(CardId::new(3)),
                Ingredient::Template(TemplateId::new(3)),
            ]
        );

        let (c, t) = VariantSet::key_to_ingredients(&key);
        assert_eq!(c, cards(&[1, 3]));
        assert_eq!(t, templates(&[3]));
    }

    #[test]
    fn test_filter_keeps_fitting_keys() {
        let s = set(&[(&[1, 2], &[]), (&[3], &[1]), (&[4], &[])]);
        let fitting = s.filter(&cards(&[1, 2, 3, 9]), &templates(&[1]));
        assert_eq!(
            fitting.variants(),
            vec![(cards(&[1, 2]), templates(&[])), (cards(&[3]), templates(&[1]))]
        );
    }

    #[test]
    fn test_or_identity_laws() {
        let s = set(&[(&[1], &[]), (&[2, 3], &[])]);
        assert!(VariantSet::or_sets(PARAMS, std::iter::empty()).is_empty());
        assert_eq!(VariantSet::or_sets(PARAMS, [&s, &s]).variants(), s.variants());
        assert_eq!(VariantSet::and_sets(PARAMS, [&s]).variants(), s.variants());
    }

    #[test]
    fn test_and_is_cartesian_union() {
        let left = set(&[(&[1], &[]), (&[2], &[])]);
        let right = set(&[(&[1], &[]), (&[3], &[1])]);

        let both = &left & &right;
        // {1}&{1} = {1} dominates {1}&{3,t1}; {2}&{1} = {1,2} is dominated by {1}.
        assert_eq!(
            both.variants(),
            vec![(cards(&[1]), templates(&[])), (cards(&[2, 3]), templates(&[1]))]
        );
    }

    #[test]
    fn test_and_with_empty_is_empty() {
        let s = set(&[(&[1], &[])]);
        assert!((&s & &VariantSet::new(PARAMS)).is_empty());
        assert_eq!((&s & &VariantSet::unit(PARAMS)).variants(), s.variants());
    }

    #[test]
    fn test_sum_rejects_shared_cards() {
        let producers = set(&[(&[1], &[]), (&[2], &[])]);
        let two = &producers + &producers;
        assert_eq!(two.variants(), vec![(cards(&[1, 2]), templates(&[]))]);

        let permissive = VariantSetParams::new(4, true);
        let mut producers = VariantSet::new(permissive);
        producers.insert(&cards(&[1]), &templates(&[]));
        let two = producers.repeat(2);
        assert_eq!(
            two.variants(),
            vec![(Multiset::single(CardId::new(1), 2), templates(&[]))]
        );
    }

    #[test]
    fn test_sum_allows_shared_templates() {
        let s = set(&[(&[1], &[5]), (&[2], &[5])]);
        let two = s.repeat(2);
        assert_eq!(
            two.variants(),
            vec![(cards(&[1, 2]), Multiset::single(TemplateId::new(5), 2))]
        );
    }

    #[test]
    fn test_repeat_edge_cases() {
        let s = set(&[(&[1], &[])]);
        assert_eq!(s.repeat(0), VariantSet::unit(PARAMS));
        assert_eq!(s.repeat(1), s);
        assert!(s.repeat(2).is_empty());
    }

    #[test]
    fn test_sum_sets_of_nothing_is_unit() {
        assert_eq!(VariantSet::sum_sets(PARAMS, std::iter::empty()), VariantSet::unit(PARAMS));
    }
}
