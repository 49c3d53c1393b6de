//! Combo graph and its two traversals.
//!
//! ## Overview
//!
//! The catalog is compiled once into an arena of nodes:
//!
//! - **Card / Template**: ingredients, each satisfied by itself
//! - **FeatureOfCard**: a card producing a feature flavor
//! - **Feature**: a (feature, attributes) flavor with all its producers
//! - **FeatureMatcher**: a (feature, matcher) requirement with its matching flavors
//! - **Combo**: ingredients plus requirements producing flavors
//!
//! Two passes walk the arena, each with its own side tables:
//!
//! - `down::Resolver` resolves a combo to every minimal variant that satisfies it
//! - `Graph::close` takes one variant and reports what it realizes
//!
//! ## Usage
//!
//! ```rust
//! use combo_variants::catalog::sample::{sample_catalog, B2};
//! use combo_variants::core::EngineConfig;
//! use combo_variants::graph::Graph;
//!
//! let graph = Graph::new(&sample_catalog(), EngineConfig::default()).unwrap();
//! let mut resolver = graph.resolver();
//!
//! for (cards, templates) in resolver.resolve(B2).unwrap().variants() {
//!     let definition = graph.close(&cards, &templates);
//!     assert!(definition.needed_combos.contains(&B2));
//! }
//! ```

pub mod arena;
pub mod down;
pub mod node;
pub mod up;

pub use arena::Graph;
pub use down::{ResolveStats, Resolver};
pub use node::{
    CardNode, ComboNode, FeatureOfCardNode, FeatureWithAttributesMatcherNode,
    FeatureWithAttributesNode, Node, NodeId, TemplateNode,
};
