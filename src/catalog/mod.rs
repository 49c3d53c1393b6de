//! Catalog model: ingredients, features, production edges and combos.
//!
//! ## Key Types
//!
//! - `Card`, `Template`: ingredients
//! - `Feature`, `FeatureAttribute`: effects and their tags
//! - `AttributeSet`, `AttributeMatcher`: produced flavors and accepted flavors
//! - `FeatureOfCard`: a card producing a feature
//! - `Combo`: ingredients plus needed features producing features
//! - `Catalog`: the registry the graph is built from
//!
//! `sample` holds a small catalog used by tests, docs and benches.

pub mod attributes;
pub mod definition;
pub mod registry;
pub mod sample;

pub use attributes::{AttributeMatcher, AttributeSet, FeatureAttribute};
pub use definition::{
    Card, Combo, ComboStatus, Feature, FeatureNeed, FeatureOfCard, FeatureProduction, Template,
};
pub use registry::Catalog;
