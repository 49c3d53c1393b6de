//! Engine error types.
//!
//! Building a graph fails on bad input. Resolving fails only when a step
//! would exceed the configured variant limit. An unsatisfiable combo is not
//! an error; it resolves to an empty variant set.

use thiserror::Error;

use super::config::ConfigError;
use super::ids::{AttributeId, CardId, ComboId, FeatureId, FeatureOfCardId, TemplateId};

/// Inconsistent catalog content detected while building the graph.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{combo} requires unknown {card}")]
    UnknownCard { combo: ComboId, card: CardId },

    #[error("{combo} requires unknown {template}")]
    UnknownTemplate { combo: ComboId, template: TemplateId },

    #[error("{feature} referenced by {owner} is not defined")]
    UnknownFeature { owner: String, feature: FeatureId },

    #[error("{attribute} referenced by {owner} is not defined")]
    UnknownAttribute { owner: String, attribute: AttributeId },

    #[error("{edge} is produced by unknown {card}")]
    UnknownProducer { edge: FeatureOfCardId, card: CardId },

    #[error("{owner} has a zero quantity requirement")]
    ZeroQuantity { owner: String },

    #[error("catalog snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

/// Failure while resolving variants.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The estimated size of a combination exceeded `variant_limit`.
    ///
    /// The estimate is an upper bound on the minimized result, so the
    /// abort never discards a result that would have fit.
    #[error("{node} would combine into up to {estimate} variants, above the limit of {limit}")]
    VariantLimitExceeded {
        node: String,
        estimate: usize,
        limit: usize,
    },

    #[error("{0} is not part of the graph")]
    UnknownCombo(ComboId),

    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl GraphError {
    /// Whether this error came from a size guard rather than bad input.
    #[must_use]
    pub fn is_explosion(&self) -> bool {
        matches!(self, GraphError::VariantLimitExceeded { .. })
    }
}
