//! # Discount Overlay
//!
//! Promotional pricing used by the inventory discount builder. Independent of
//! ticket composition: it transforms one price into another.
//!
//! ```text
//! percentage:      discount = base × pct            (0 < pct ≤ 100%)
//! fixed amount:    discount = amount                (amount > 0)
//! result:          max(0, base − discount)
//! ```
//!
//! Over-discounting floors at zero; that is an outcome, not an error.
//! Range checks live in [`crate::validation::validate_discount`] and run
//! before a spec is accepted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

/// How the discount amount is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage off, in basis points (1000 = 10%).
    Percentage { bps: u32 },
    /// Absolute amount off.
    FixedAmountOff { amount: Money },
}

impl DiscountKind {
    /// Whole-percent convenience constructor.
    pub const fn percent(pct: u32) -> Self {
        DiscountKind::Percentage { bps: pct * 100 }
    }

    pub const fn fixed(amount: Money) -> Self {
        DiscountKind::FixedAmountOff { amount }
    }

    /// The amount this discount takes off `base`, before flooring.
    pub fn discount_amount(&self, base: Money) -> Money {
        match *self {
            DiscountKind::Percentage { bps } => base.portion_bps(bps),
            DiscountKind::FixedAmountOff { amount } => amount,
        }
    }
}

/// A discount targeted at a product, optionally narrowed to one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountSpec {
    pub product_id: String,
    /// Variant name; `None` targets the base price and every variant.
    #[serde(default)]
    pub variant: Option<String>,
    pub kind: DiscountKind,
}

impl DiscountSpec {
    pub fn new(product_id: impl Into<String>, kind: DiscountKind) -> Self {
        DiscountSpec {
            product_id: product_id.into(),
            variant: None,
            kind,
        }
    }

    pub fn for_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// True when this spec covers the given product/variant pair.
    pub fn applies_to(&self, product_id: &str, variant: Option<&str>) -> bool {
        if self.product_id != product_id {
            return false;
        }
        match (&self.variant, variant) {
            (None, _) => true,
            (Some(target), Some(chosen)) => target == chosen,
            (Some(_), None) => false,
        }
    }
}

/// Applies a discount to a price, flooring at zero.
///
/// ## Example
/// ```rust
/// use tableside_core::{apply_discount, DiscountKind, DiscountSpec, Money};
///
/// let ten_pct = DiscountSpec::new("p-1", DiscountKind::percent(10));
/// assert_eq!(apply_discount(Money::from_cents(100), &ten_pct).cents(), 90);
///
/// let too_much = DiscountSpec::new("p-1", DiscountKind::fixed(Money::from_cents(150)));
/// assert_eq!(apply_discount(Money::from_cents(100), &too_much).cents(), 0);
/// ```
pub fn apply_discount(base: Money, spec: &DiscountSpec) -> Money {
    (base - spec.kind.discount_amount(base)).floor_zero()
}

/// Percentage label for a fixed discount, rounded to one decimal and capped
/// at 100. A zero or negative base yields 0.0.
///
/// ## Example
/// ```rust
/// use tableside_core::{equivalent_percentage, Money};
///
/// assert_eq!(equivalent_percentage(Money::from_cents(3000), Money::from_cents(1000)), 33.3);
/// assert_eq!(equivalent_percentage(Money::from_cents(100), Money::from_cents(150)), 100.0);
/// ```
pub fn equivalent_percentage(base: Money, discount: Money) -> f64 {
    if !base.is_positive() || !discount.is_positive() {
        return 0.0;
    }
    // tenths of a percent, round half up
    let base = base.cents() as i128;
    let per_mille = (discount.cents() as i128 * 1000 + base / 2) / base;
    per_mille.min(1000) as f64 / 10.0
}

/// Discounted price of a product (or one of its variants) under the first
/// matching spec. Returns the undiscounted price when none applies.
pub fn discounted_price_for(
    product: &Product,
    variant: Option<&str>,
    specs: &[DiscountSpec],
) -> Money {
    let base = variant
        .and_then(|name| product.variant(name))
        .map(|v| v.price)
        .unwrap_or(product.base_price);

    specs
        .iter()
        .find(|spec| spec.applies_to(&product.id, variant))
        .map(|spec| apply_discount(base, spec))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(kind: DiscountKind) -> DiscountSpec {
        DiscountSpec::new("p-1", kind)
    }

    #[test]
    fn test_percentage_discount() {
        let price = apply_discount(Money::from_cents(100), &spec(DiscountKind::percent(10)));
        assert_eq!(price.cents(), 90);

        let price = apply_discount(Money::from_cents(2500), &spec(DiscountKind::percent(100)));
        assert!(price.is_zero());
    }

    #[test]
    fn test_fractional_percentage_rounds() {
        // 12.5% of 999 = 124.875 → 125 off
        let price = apply_discount(
            Money::from_cents(999),
            &spec(DiscountKind::Percentage { bps: 1250 }),
        );
        assert_eq!(price.cents(), 874);
    }

    #[test]
    fn test_fixed_discount() {
        let price = apply_discount(
            Money::from_cents(2500),
            &spec(DiscountKind::fixed(Money::from_cents(300))),
        );
        assert_eq!(price.cents(), 2200);
    }

    #[test]
    fn test_over_discount_floors_at_zero() {
        let price = apply_discount(
            Money::from_cents(100),
            &spec(DiscountKind::fixed(Money::from_cents(150))),
        );
        assert_eq!(price.cents(), 0);
    }

    #[test]
    fn test_equivalent_percentage() {
        assert_eq!(equivalent_percentage(Money::from_cents(2000), Money::from_cents(500)), 25.0);
        assert_eq!(equivalent_percentage(Money::from_cents(3000), Money::from_cents(1000)), 33.3);
        assert_eq!(equivalent_percentage(Money::from_cents(3000), Money::from_cents(2000)), 66.7);
        assert_eq!(equivalent_percentage(Money::from_cents(100), Money::from_cents(400)), 100.0);
        assert_eq!(equivalent_percentage(Money::zero(), Money::from_cents(400)), 0.0);
    }

    #[test]
    fn test_applies_to() {
        let all_sizes = spec(DiscountKind::percent(10));
        assert!(all_sizes.applies_to("p-1", None));
        assert!(all_sizes.applies_to("p-1", Some("Large")));
        assert!(!all_sizes.applies_to("p-2", None));

        let large_only = spec(DiscountKind::percent(10)).for_variant("Large");
        assert!(large_only.applies_to("p-1", Some("Large")));
        assert!(!large_only.applies_to("p-1", Some("Medium")));
        assert!(!large_only.applies_to("p-1", None));
    }

    #[test]
    fn test_discounted_price_for_variant() {
        let pizza = Product::new("p-1", "Margherita Pizza", "Pizza", Money::from_cents(2500))
            .with_variant("Large", Money::from_cents(4250));
        let specs = vec![spec(DiscountKind::fixed(Money::from_cents(250))).for_variant("Large")];

        assert_eq!(discounted_price_for(&pizza, Some("Large"), &specs).cents(), 4000);
        assert_eq!(discounted_price_for(&pizza, None, &specs).cents(), 2500);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&DiscountKind::percent(10)).unwrap();
        assert_eq!(json, r#"{"mode":"percentage","bps":1000}"#);
    }
}
