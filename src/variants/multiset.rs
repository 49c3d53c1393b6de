//! Quantity-aware multisets.
//!
//! A `Multiset` is a sorted list of `(key, count)` pairs with no zero counts.
//! Keys are kept sorted so that subset tests, unions and sums are linear
//! merges, and so that equal multisets compare and hash equal.
//!
//! Most multisets in the engine hold a handful of ingredients, so entries
//! live inline in a `SmallVec` until they outgrow it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;

/// A multiset over an ordered key space.
///
/// ```
/// use combo_variants::variants::Multiset;
///
/// let small: Multiset<u32> = [(1, 1)].into_iter().collect();
/// let big: Multiset<u32> = [(1, 2), (4, 1)].into_iter().collect();
///
/// assert!(small.is_subset_of(&big));
/// assert_eq!(big.distinct_len(), 2);
/// assert_eq!(big.total(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Multiset<K> {
    entries: SmallVec<[(K, u32); 8]>,
}

impl<K> Default for Multiset<K> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<K: Ord + Copy> Multiset<K> {
    /// Create an empty multiset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A multiset holding `count` copies of a single key.
    #[must_use]
    pub fn single(key: K, count: u32) -> Self {
        let mut set = Self::new();
        set.insert(key, count);
        set
    }

    /// Build a multiset where every key appears once per occurrence.
    pub fn from_items(items: impl IntoIterator<Item = K>) -> Self {
        items.into_iter().map(|k| (k, 1)).collect()
    }

    /// Add `count` copies of `key`.
    pub fn insert(&mut self, key: K, count: u32) {
        if count == 0 {
            return;
        }
        match self.entries.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(idx) => self.entries[idx].1 += count,
            Err(idx) => self.entries.insert(idx, (key, count)),
        }
    }

    /// Number of copies of `key`.
    #[must_use]
    pub fn count(&self, key: K) -> u32 {
        self.entries
            .binary_search_by(|(k, _)| k.cmp(&key))
            .map_or(0, |idx| self.entries[idx].1)
    }

    /// Check if `key` appears at least once.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.count(key) > 0
    }

    /// Number of distinct keys.
    #[inline]
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of copies across all keys.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, n)| u64::from(n)).sum()
    }

    /// Check if the multiset is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, count)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Iterate over distinct keys in order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|&(k, _)| k)
    }

    /// Every key of `self` appears in `other` with at least the same count.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        if self.entries.len() > other.entries.len() {
            return false;
        }
        let mut theirs = other.entries.iter();
        'outer: for &(key, count) in &self.entries {
            for &(other_key, other_count) in theirs.by_ref() {
                match other_key.cmp(&key) {
                    Ordering::Less => continue,
                    Ordering::Equal if other_count >= count => continue 'outer,
                    _ => return false,
                }
            }
            return false;
        }
        true
    }

    /// Pointwise maximum.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.merge_with(other, u32::max)
    }

    /// Pointwise sum.
    #[must_use]
    pub fn sum(&self, other: &Self) -> Self {
        self.merge_with(other, |a, b| a.saturating_add(b))
    }

    /// Check if any key satisfying `pred` appears in both multisets.
    pub fn shares_key_where(&self, other: &Self, pred: impl Fn(K) -> bool) -> bool {
        let (mut a, mut b) = (self.entries.iter().peekable(), other.entries.iter().peekable());
        while let (Some(&&(ka, _)), Some(&&(kb, _))) = (a.peek(), b.peek()) {
            match ka.cmp(&kb) {
                Ordering::Less => {
                    a.next();
                }
                Ordering::Greater => {
                    b.next();
                }
                Ordering::Equal => {
                    if pred(ka) {
                        return true;
                    }
                    a.next();
                    b.next();
                }
            }
        }
        false
    }

    fn merge_with(&self, other: &Self, combine: impl Fn(u32, u32) -> u32) -> Self {
        let mut entries = SmallVec::with_capacity(self.entries.len().max(other.entries.len()));
        let (mut a, mut b) = (self.entries.iter().peekable(), other.entries.iter().peekable());
        loop {
            match (a.peek(), b.peek()) {
                (Some(&&(ka, na)), Some(&&(kb, nb))) => match ka.cmp(&kb) {
                    Ordering::Less => {
                        entries.push((ka, na));
                        a.next();
                    }
                    Ordering::Greater => {
                        entries.push((kb, nb));
                        b.next();
                    }
                    Ordering::Equal => {
                        entries.push((ka, combine(na, nb)));
                        a.next();
                        b.next();
                    }
                },
                (Some(&&entry), None) => {
                    entries.push(entry);
                    a.next();
                }
                (None, Some(&&entry)) => {
                    entries.push(entry);
                    b.next();
                }
                (None, None) => break,
            }
        }
        Self { entries }
    }
}

impl<K: Ord + Copy> FromIterator<(K, u32)> for Multiset<K> {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, count) in iter {
            set.insert(key, count);
        }
        set
    }
}

impl<K: Ord + Copy> Extend<(K, u32)> for Multiset<K> {
    fn extend<I: IntoIterator<Item = (K, u32)>>(&mut self, iter: I) {
        for (key, count) in iter {
            self.insert(key, count);
        }
    }
}
