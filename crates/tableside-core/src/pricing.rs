//! # Pricing Resolver
//!
//! Turns a product plus the cashier's modifiers into a unit price and the
//! human-readable configuration label that identifies the line.
//!
//! ```text
//! unit price = (variant price  OR  base price)  +  Σ add_on.price × qty
//!
//! Margherita Pizza, Large (4250), Olives 240 × 2
//!   = 4250 + 480 = 4730
//! label = "Large + Olives x2"
//! ```
//!
//! Nothing is rounded here. Callers are expected to have validated the
//! selection first; malformed input is logged and priced defensively.

use std::collections::BTreeMap;

use tracing::warn;

use crate::money::Money;
use crate::types::Product;
use crate::REGULAR_LABEL;

/// Resolves the unit price of one configured item.
///
/// ## Malformed Input
/// - Unknown variant name: logged, priced at the base price.
/// - Unknown add-on id or non-positive quantity: logged, contributes nothing.
///
/// ## Example
/// ```rust
/// use std::collections::BTreeMap;
/// use tableside_core::{resolve_unit_price, Money, Product};
///
/// let pizza = Product::new("p-1", "Margherita Pizza", "Pizza", Money::from_cents(2500))
///     .with_variant("Large", Money::from_cents(4250))
///     .with_add_on("olives", "Olives", Money::from_cents(240));
///
/// let add_ons = BTreeMap::from([("olives".to_string(), 2)]);
/// let unit = resolve_unit_price(&pizza, Some("Large"), &add_ons);
/// assert_eq!(unit.cents(), 4730);
/// ```
pub fn resolve_unit_price(
    product: &Product,
    variant: Option<&str>,
    add_ons: &BTreeMap<String, i64>,
) -> Money {
    let base = match variant {
        Some(name) => match product.variant(name) {
            Some(v) => v.price,
            None => {
                warn!(
                    product_id = %product.id,
                    variant = %name,
                    "unknown variant, pricing at base price"
                );
                product.base_price
            }
        },
        None => product.base_price,
    };

    let extras: Money = add_ons
        .iter()
        .filter_map(|(id, &qty)| {
            if qty <= 0 {
                warn!(product_id = %product.id, add_on = %id, qty, "non-positive add-on quantity ignored");
                return None;
            }
            match product.add_on(id) {
                Some(add_on) => Some(add_on.price.multiply_quantity(qty)),
                None => {
                    warn!(product_id = %product.id, add_on = %id, "unknown add-on ignored");
                    None
                }
            }
        })
        .sum();

    base + extras
}

/// Price of `quantity` units.
#[inline]
pub fn resolve_line_total(unit_price: Money, quantity: i64) -> Money {
    unit_price.multiply_quantity(quantity)
}

/// Builds the configuration label used as the merge key.
///
/// Variant first, then add-ons in the product's own order (so the label does
/// not depend on the order the cashier tapped them), joined with `" + "`.
///
/// ## Example
/// ```rust
/// use std::collections::BTreeMap;
/// use tableside_core::{configuration_label, Money, Product};
///
/// let pizza = Product::new("p-1", "Margherita Pizza", "Pizza", Money::from_cents(2500))
///     .with_variant("Large", Money::from_cents(4250))
///     .with_add_on("olives", "Olives", Money::from_cents(240))
///     .with_add_on("basil", "Basil", Money::from_cents(60));
///
/// let add_ons = BTreeMap::from([("olives".to_string(), 2), ("basil".to_string(), 1)]);
/// assert_eq!(configuration_label(&pizza, Some("Large"), &add_ons), "Large + Olives x2 + Basil");
/// assert_eq!(configuration_label(&pizza, None, &BTreeMap::new()), "REGULAR");
/// ```
pub fn configuration_label(
    product: &Product,
    variant: Option<&str>,
    add_ons: &BTreeMap<String, i64>,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(name) = variant {
        parts.push(name.to_string());
    }

    for add_on in &product.add_ons {
        match add_ons.get(&add_on.id) {
            Some(&1) => parts.push(add_on.name.clone()),
            Some(&qty) if qty > 1 => parts.push(format!("{} x{}", add_on.name, qty)),
            _ => {}
        }
    }

    if parts.is_empty() {
        REGULAR_LABEL.to_string()
    } else {
        parts.join(" + ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza() -> Product {
        Product::new("p-1", "Margherita Pizza", "Pizza", Money::from_cents(2500))
            .with_variant("Medium", Money::from_cents(3400))
            .with_variant("Large", Money::from_cents(4250))
            .with_add_on("olives", "Olives", Money::from_cents(240))
            .with_add_on("cheese", "Extra Cheese", Money::from_cents(300))
    }

    fn add_ons(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
        entries.iter().map(|(id, q)| (id.to_string(), *q)).collect()
    }

    #[test]
    fn test_base_price_without_modifiers() {
        let unit = resolve_unit_price(&pizza(), None, &BTreeMap::new());
        assert_eq!(unit.cents(), 2500);
    }

    #[test]
    fn test_variant_replaces_base_price() {
        let unit = resolve_unit_price(&pizza(), Some("Medium"), &BTreeMap::new());
        assert_eq!(unit.cents(), 3400);
    }

    #[test]
    fn test_add_ons_multiply_by_quantity() {
        let unit = resolve_unit_price(
            &pizza(),
            Some("Large"),
            &add_ons(&[("olives", 2), ("cheese", 1)]),
        );
        assert_eq!(unit.cents(), 4250 + 480 + 300);
    }

    #[test]
    fn test_unknown_variant_falls_back_to_base() {
        let unit = resolve_unit_price(&pizza(), Some("Family"), &BTreeMap::new());
        assert_eq!(unit.cents(), 2500);
    }

    #[test]
    fn test_malformed_add_ons_contribute_nothing() {
        let unit = resolve_unit_price(&pizza(), None, &add_ons(&[("anchovy", 1), ("olives", 0)]));
        assert_eq!(unit.cents(), 2500);
    }

    #[test]
    fn test_line_total() {
        let product = pizza();
        for qty in 1..=5 {
            let unit = resolve_unit_price(&product, Some("Large"), &add_ons(&[("olives", 2)]));
            assert_eq!(resolve_line_total(unit, qty).cents(), qty * (4250 + 240 * 2));
        }
    }

    #[test]
    fn test_label_formats() {
        let product = pizza();
        assert_eq!(configuration_label(&product, None, &BTreeMap::new()), "REGULAR");
        assert_eq!(configuration_label(&product, Some("Large"), &BTreeMap::new()), "Large");
        assert_eq!(
            configuration_label(&product, None, &add_ons(&[("cheese", 1)])),
            "Extra Cheese"
        );
        assert_eq!(
            configuration_label(&product, Some("Large"), &add_ons(&[("olives", 2)])),
            "Large + Olives x2"
        );
    }

    #[test]
    fn test_label_independent_of_tap_order() {
        let product = pizza();
        let a = add_ons(&[("cheese", 1), ("olives", 3)]);
        let b = add_ons(&[("olives", 3), ("cheese", 1)]);
        assert_eq!(
            configuration_label(&product, None, &a),
            configuration_label(&product, None, &b)
        );
        assert_eq!(configuration_label(&product, None, &a), "Olives x3 + Extra Cheese");
    }
}
