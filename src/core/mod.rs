//! Core engine types: catalog ids, configuration, errors.

pub mod config;
pub mod error;
pub mod ids;

pub use config::{ConfigError, EngineConfig};
pub use error::{CatalogError, GraphError};
pub use ids::{AttributeId, CardId, ComboId, FeatureId, FeatureOfCardId, TemplateId};
