//! A small catalog exercising chained feature production.
//!
//! ```text
//! C1 ──E1──▶ F1 (mana, utility)
//! C6 + C7 ──B4──▶ F1
//! C2 + C3 + F1 ──B1──▶ F2 (untap, utility), F3 (infinite mana)
//! C4 + C5 ──B3──▶ F2
//! T1 + F2 ──B2──▶ F4 (infinite damage), removes F3
//! C2 ──B5──▶ F5 (sacrifice outlet, utility)
//! C1 ──B6 (draft)──▶ F4
//! ```
//!
//! `B2` can be assembled three ways, with 3, 4 and 5 distinct ingredients:
//! `{C4, C5, T1}`, `{C1, C2, C3, T1}` and `{C2, C3, C6, C7, T1}`.
//! `B1` and `B2` are generators; the others are utility or draft combos.

use crate::core::{CardId, ComboId, FeatureId, FeatureOfCardId, TemplateId};

use super::definition::{Card, Combo, ComboStatus, Feature, FeatureOfCard, Template};
use super::registry::Catalog;

/// Produces `F1` on its own.
pub const C1: CardId = CardId::new(1);
/// Piece of `B1`; also feeds the scaffolding combo `B5`.
pub const C2: CardId = CardId::new(2);
/// Piece of `B1`.
pub const C3: CardId = CardId::new(3);
/// Piece of `B3`.
pub const C4: CardId = CardId::new(4);
/// Piece of `B3`.
pub const C5: CardId = CardId::new(5);
/// Piece of `B4`.
pub const C6: CardId = CardId::new(6);
/// Piece of `B4`.
pub const C7: CardId = CardId::new(7);

/// Template required by `B2`.
pub const T1: TemplateId = TemplateId::new(1);

/// Mana (utility).
pub const F1: FeatureId = FeatureId::new(1);
/// Untap (utility).
pub const F2: FeatureId = FeatureId::new(2);
/// Infinite mana; removed by `B2`.
pub const F3: FeatureId = FeatureId::new(3);
/// Infinite damage.
pub const F4: FeatureId = FeatureId::new(4);
/// Sacrifice outlet (utility, never needed).
pub const F5: FeatureId = FeatureId::new(5);

/// `C1` produces `F1`.
pub const E1: FeatureOfCardId = FeatureOfCardId::new(1);

pub const B1: ComboId = ComboId::new(1);
pub const B2: ComboId = ComboId::new(2);
pub const B3: ComboId = ComboId::new(3);
pub const B4: ComboId = ComboId::new(4);
pub const B5: ComboId = ComboId::new(5);
pub const B6: ComboId = ComboId::new(6);

/// Build the sample catalog.
#[must_use]
pub fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();

    for (id, name) in [
        (C1, "Mana Rock"),
        (C2, "Untapper"),
        (C3, "Mana Engine"),
        (C4, "Twin Servant"),
        (C5, "Twin Master"),
        (C6, "Ritual Caller"),
        (C7, "Ritual Keeper"),
    ] {
        catalog.register_card(Card::new(id, name));
    }
    catalog.register_template(Template::new(T1, "Any damage outlet"));

    catalog.register_feature(Feature::new(F1, "Mana").utility());
    catalog.register_feature(Feature::new(F2, "Untap").utility());
    catalog.register_feature(Feature::new(F3, "Infinite mana"));
    catalog.register_feature(Feature::new(F4, "Infinite damage"));
    catalog.register_feature(Feature::new(F5, "Sacrifice outlet").utility());

    catalog.register_feature_of_card(FeatureOfCard::new(E1, C1, F1));

    catalog.register_combo(
        Combo::new(B1, "Untap loop")
            .with_card(C2)
            .with_card(C3)
            .needs(F1, 1)
            .produces(F2)
            .produces(F3),
    );
    catalog.register_combo(
        Combo::new(B2, "Damage finisher")
            .with_template(T1)
            .needs(F2, 1)
            .produces(F4)
            .removes(F3),
    );
    catalog.register_combo(
        Combo::new(B3, "Twin untap")
            .utility()
            .with_card(C4)
            .with_card(C5)
            .produces(F2),
    );
    catalog.register_combo(
        Combo::new(B4, "Ritual mana")
            .utility()
            .with_card(C6)
            .with_card(C7)
            .produces(F1),
    );
    catalog.register_combo(
        Combo::new(B5, "Untapper outlet")
            .utility()
            .with_card(C2)
            .produces(F5),
    );
    catalog.register_combo(
        Combo::new(B6, "Unreviewed")
            .with_status(ComboStatus::Draft)
            .with_card(C1)
            .produces(F4),
    );

    catalog
}
