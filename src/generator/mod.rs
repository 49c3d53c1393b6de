//! Variant enumeration over a whole catalog.
//!
//! `VariantGenerator` resolves every generator combo, closes each resulting
//! variant, and merges variants reached from several roots under their
//! canonical `VariantId`.

pub mod definition;
pub mod driver;
pub mod stats;

pub use definition::{IngredientGroup, VariantDefinition, VariantId};
pub use driver::{GenerationReport, RootFailure, VariantGenerator};
pub use stats::GenerationStats;
