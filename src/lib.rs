//! # combo-variants
//!
//! Variant generation for trading-card game combos.
//!
//! A combo needs some cards and templates plus prerequisite features, and
//! produces features in turn. A *variant* is a concrete multiset of cards and
//! templates that satisfies a combo, possibly through chains of other combos
//! producing the features it needs.
//!
//! ## Design Principles
//!
//! 1. **Minimal Variants Only**: Variant sets are antichains; a combination
//!    that contains another satisfying combination is never reported.
//!
//! 2. **Bounded Work**: `card_limit` caps the number of distinct ingredients
//!    in a variant, `variant_limit` aborts a root before any combination
//!    could grow past it.
//!
//! 3. **Read-Only Catalog**: The graph is compiled once per run from a
//!    catalog snapshot and never mutated; traversal state lives in the pass.
//!
//! ## Modules
//!
//! - `core`: Catalog ids, engine configuration, errors
//! - `catalog`: Cards, templates, features, combos and their registry
//! - `variants`: Multisets, antichains and the variant set algebra
//! - `graph`: Arena graph, downward resolver, upward closure
//! - `generator`: Whole-catalog enumeration and variant definitions
//!
//! ## Usage
//!
//! ```rust
//! use combo_variants::catalog::sample::sample_catalog;
//! use combo_variants::{EngineConfig, VariantGenerator};
//!
//! let config = EngineConfig::default().with_card_limit(4);
//! let report = VariantGenerator::new(&sample_catalog(), config)
//!     .unwrap()
//!     .run();
//!
//! for (id, variant) in &report.variants {
//!     println!("{id}: {} combos needed", variant.needed_combos.len());
//! }
//! ```

pub mod catalog;
pub mod core;
pub mod generator;
pub mod graph;
pub mod variants;

// Re-export commonly used types
pub use crate::core::{
    AttributeId, CardId, CatalogError, ComboId, ConfigError, EngineConfig, FeatureId,
    FeatureOfCardId, GraphError, TemplateId,
};

pub use crate::catalog::{
    AttributeMatcher, AttributeSet, Card, Catalog, Combo, ComboStatus, Feature, FeatureAttribute,
    FeatureOfCard, Template,
};

pub use crate::variants::{Ingredient, MinimalSetOfMultisets, Multiset, VariantSet, VariantSetParams};

pub use crate::graph::{Graph, NodeId, ResolveStats, Resolver};

pub use crate::generator::{
    GenerationReport, GenerationStats, IngredientGroup, RootFailure, VariantDefinition,
    VariantGenerator, VariantId,
};
