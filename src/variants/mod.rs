//! Variant algebra: multisets, antichains of multisets, and variant sets.
//!
//! ## Key Types
//!
//! - `Multiset`: sorted quantity-aware multiset
//! - `MinimalSetOfMultisets`: antichain store keeping only minimal members
//! - `VariantSet`: antichain of combined card/template keys with the
//!   `or` / `and` / `sum` operations used by the resolver

pub mod antichain;
pub mod multiset;
pub mod variant_set;

pub use antichain::MinimalSetOfMultisets;
pub use multiset::Multiset;
pub use variant_set::{Ingredient, IngredientKey, VariantSet, VariantSetParams};
