//! Catalog identifiers.
//!
//! Every catalog entity is referenced by a small integer newtype. The engine
//! never looks inside an id; ids only need to be unique within their kind.
//!
//! ```
//! use combo_variants::core::{CardId, TemplateId};
//!
//! let card = CardId::new(7);
//! assert_eq!(card.raw(), 7);
//! assert_eq!(format!("{}", card), "Card(7)");
//! assert_eq!(format!("{}", TemplateId::new(3)), "Template(3)");
//! ```

use serde::{Deserialize, Serialize};

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            /// Create a new id.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the raw id value.
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

catalog_id!(
    /// A concrete card.
    CardId,
    "Card"
);

catalog_id!(
    /// A template: a placeholder ingredient ("any creature with flash") that
    /// stands in for a family of cards.
    TemplateId,
    "Template"
);

catalog_id!(
    /// A named effect that cards and combos produce and combos need.
    FeatureId,
    "Feature"
);

catalog_id!(
    /// A tag distinguishing flavors of the same feature.
    AttributeId,
    "Attribute"
);

catalog_id!(
    /// A production edge: one card producing one feature flavor.
    FeatureOfCardId,
    "FeatureOfCard"
);

catalog_id!(
    /// A combo (hyperedge).
    ComboId,
    "Combo"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_and_display() {
        assert_eq!(FeatureId::new(4).raw(), 4);
        assert_eq!(format!("{}", ComboId::new(12)), "Combo(12)");
        assert_eq!(format!("{}", FeatureOfCardId::new(1)), "FeatureOfCard(1)");
    }

    #[test]
    fn test_ordering_follows_raw_value() {
        let mut ids = vec![CardId::new(3), CardId::new(1), CardId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![CardId::new(1), CardId::new(2), CardId::new(3)]);
    }

    #[test]
    fn test_from_u32() {
        let id: AttributeId = 9.into();
        assert_eq!(id, AttributeId::new(9));
    }

    #[test]
    fn test_serialization() {
        let id = TemplateId::new(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: TemplateId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
