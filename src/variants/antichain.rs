//! Antichain of multisets.
//!
//! `MinimalSetOfMultisets` keeps only the minimal members of everything added
//! to it: a multiset that contains an existing member is redundant and is
//! dropped, and adding a smaller multiset evicts every member that contains
//! it. After any sequence of `add` calls no member is a submultiset of
//! another.

use serde::{Deserialize, Serialize};

use super::multiset::Multiset;

/// A set of multisets in which no member dominates another.
///
/// ```
/// use combo_variants::variants::{MinimalSetOfMultisets, Multiset};
///
/// let mut store = MinimalSetOfMultisets::new();
/// store.add(Multiset::from_items(['a', 'b']));
/// store.add(Multiset::from_items(['a']));
///
/// assert_eq!(store.len(), 1);
/// assert!(store.contains_subset_of(&Multiset::from_items(['a', 'c'])));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalSetOfMultisets<K> {
    members: Vec<Multiset<K>>,
}

impl<K> Default for MinimalSetOfMultisets<K> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

impl<K: Ord + Copy> MinimalSetOfMultisets<K> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a multiset, keeping the store minimal.
    ///
    /// Returns `true` if `set` was inserted, `false` if an existing member
    /// already covered it.
    pub fn add(&mut self, set: Multiset<K>) -> bool {
        if self.contains_subset_of(&set) {
            return false;
        }
        self.members.retain(|member| !set.is_subset_of(member));
        self.members.push(set);
        true
    }

    /// Check if some member is a submultiset of `set`.
    #[must_use]
    pub fn contains_subset_of(&self, set: &Multiset<K>) -> bool {
        self.members.iter().any(|member| member.is_subset_of(set))
    }

    /// Iterate over the members that are submultisets of `set`.
    pub fn subsets_of<'a>(&'a self, set: &'a Multiset<K>) -> impl Iterator<Item = &'a Multiset<K>> + 'a {
        self.members.iter().filter(move |member| member.is_subset_of(set))
    }

    /// Merge several stores into one.
    pub fn union<'a>(stores: impl IntoIterator<Item = &'a Self>) -> Self
    where
        K: 'a,
    {
        let mut result = Self::new();
        for store in stores {
            for member in &store.members {
                result.add(member.clone());
            }
        }
        result
    }

    /// Number of members.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Multiset<K>> {
        self.members.iter()
    }

    /// Members sorted, for order-insensitive comparison.
    #[must_use]
    pub fn sorted(&self) -> Vec<Multiset<K>> {
        let mut members = self.members.clone();
        members.sort();
        members
    }
}

impl<K: Ord + Copy> IntoIterator for MinimalSetOfMultisets<K> {
    type Item = Multiset<K>;
    type IntoIter = std::vec::IntoIter<Multiset<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<K: Ord + Copy> FromIterator<Multiset<K>> for MinimalSetOfMultisets<K> {
    fn from_iter<I: IntoIterator<Item = Multiset<K>>>(iter: I) -> Self {
        let mut store = Self::new();
        for set in iter {
            store.add(set);
        }
        store
    }
}

impl<K: Ord + Copy> Extend<Multiset<K>> for MinimalSetOfMultisets<K> {
    fn extend<I: IntoIterator<Item = Multiset<K>>>(&mut self, iter: I) {
        for set in iter {
            self.add(set);
        }
    }
}
