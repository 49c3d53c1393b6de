//! Feature attributes and attribute matchers.
//!
//! Producers tag the feature they emit with a set of attributes
//! ("mana", "colorless"). Consumers describe which tagged flavors they accept
//! with an `AttributeMatcher`: any of, all of, none of.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::AttributeId;

/// A named attribute tag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureAttribute {
    /// Unique identifier.
    pub id: AttributeId,

    /// Attribute name (for display/debugging).
    pub name: String,
}

impl FeatureAttribute {
    /// Create a new attribute.
    pub fn new(id: AttributeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A sorted, duplicate-free set of attributes.
///
/// Two productions of the same feature are the same flavor exactly when
/// their attribute sets are equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributeSet(SmallVec<[AttributeId; 4]>);

impl AttributeSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if `attribute` is in the set.
    #[must_use]
    pub fn contains(&self, attribute: AttributeId) -> bool {
        self.0.binary_search(&attribute).is_ok()
    }

    /// Check if the sets share any attribute.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.0.iter().any(|&a| other.contains(a))
    }

    /// Check if every attribute of `self` is in `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.0.iter().all(|&a| other.contains(a))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over attributes in order.
    pub fn iter(&self) -> impl Iterator<Item = AttributeId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<AttributeId> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = AttributeId>>(iter: I) -> Self {
        let mut attributes: SmallVec<[AttributeId; 4]> = iter.into_iter().collect();
        attributes.sort_unstable();
        attributes.dedup();
        Self(attributes)
    }
}

/// Predicate over attribute sets.
///
/// A set matches when it contains at least one `any_of` attribute (or
/// `any_of` is empty), contains every `all_of` attribute, and contains no
/// `none_of` attribute. The default matcher accepts every set.
///
/// ```
/// use combo_variants::catalog::{AttributeMatcher, AttributeSet};
/// use combo_variants::core::AttributeId;
///
/// let mana = AttributeId::new(1);
/// let colorless = AttributeId::new(2);
///
/// let colored_mana = AttributeMatcher::new()
///     .all_of([mana])
///     .none_of([colorless]);
///
/// assert!(colored_mana.matches(&[mana].into_iter().collect()));
/// assert!(!colored_mana.matches(&[mana, colorless].into_iter().collect()));
/// assert!(!colored_mana.matches(&AttributeSet::new()));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributeMatcher {
    /// At least one of these must be present (ignored when empty).
    pub any_of: AttributeSet,

    /// All of these must be present.
    pub all_of: AttributeSet,

    /// None of these may be present.
    pub none_of: AttributeSet,
}

impl AttributeMatcher {
    /// A matcher accepting every attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require at least one of `attributes` (builder pattern).
    #[must_use]
    pub fn any_of(mut self, attributes: impl IntoIterator<Item = AttributeId>) -> Self {
        self.any_of = self.any_of.iter().chain(attributes).collect();
        self
    }

    /// Require all of `attributes` (builder pattern).
    #[must_use]
    pub fn all_of(mut self, attributes: impl IntoIterator<Item = AttributeId>) -> Self {
        self.all_of = self.all_of.iter().chain(attributes).collect();
        self
    }

    /// Forbid all of `attributes` (builder pattern).
    #[must_use]
    pub fn none_of(mut self, attributes: impl IntoIterator<Item = AttributeId>) -> Self {
        self.none_of = self.none_of.iter().chain(attributes).collect();
        self
    }

    /// Check if a produced attribute set satisfies this matcher.
    #[must_use]
    pub fn matches(&self, attributes: &AttributeSet) -> bool {
        (self.any_of.is_empty() || self.any_of.intersects(attributes))
            && self.all_of.is_subset_of(attributes)
            && !self.none_of.intersects(attributes)
    }

    /// Every attribute the matcher mentions.
    pub fn referenced(&self) -> impl Iterator<Item = AttributeId> + '_ {
        self.any_of
            .iter()
            .chain(self.all_of.iter())
            .chain(self.none_of.iter())
    }
}
