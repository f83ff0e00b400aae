//! # Discount Commands
//!
//! Previews a discount against the live menu price. Discounts are an
//! overlay for display and promotion setup; they never rewrite lines
//! already on a ticket.

use std::collections::BTreeMap;
use std::slice;

use serde::Serialize;
use tableside_core::discount::discounted_price_for;
use tableside_core::validation::validate_discount;
use tableside_core::{
    equivalent_percentage, resolve_unit_price, CoreError, DiscountSpec, Money, ValidationError,
};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::ApiError;
use crate::state::TillConfig;

/// Before/after prices for one discount.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountPreview {
    pub product_id: String,
    pub variant: Option<String>,
    pub base_price: Money,
    pub discounted_price: Money,
    pub saved: Money,
    /// Equivalent percentage, one decimal, capped at 100.
    pub percentage_off: f64,
    /// e.g. "$1.50 off (10.0%)"
    pub label: String,
}

/// Applies a discount spec to a menu price and reports the result.
///
/// ## Behavior
/// - Percentage: base × rate, rounded half up
/// - Fixed: flat amount, never below zero
/// - A variant-targeted spec prices that variant; otherwise the base price
pub fn apply_discount<C: Catalog>(
    catalog: &C,
    config: &TillConfig,
    spec: DiscountSpec,
) -> Result<DiscountPreview, ApiError> {
    debug!(product_id = %spec.product_id, variant = ?spec.variant, "apply_discount command");

    validate_discount(&spec).map_err(CoreError::from)?;
    let product = catalog.require(&spec.product_id)?;

    let variant = spec.variant.as_deref();
    if let Some(name) = variant {
        if product.variant(name).is_none() {
            return Err(CoreError::from(ValidationError::UnknownVariant {
                product: product.name.clone(),
                variant: name.to_string(),
            })
            .into());
        }
    }

    let base_price = resolve_unit_price(product, variant, &BTreeMap::new());
    let discounted_price = discounted_price_for(product, variant, slice::from_ref(&spec));
    let saved = base_price - discounted_price;
    let percentage_off = equivalent_percentage(base_price, saved);

    Ok(DiscountPreview {
        label: format!("{} off ({:.1}%)", config.format_currency(saved), percentage_off),
        product_id: spec.product_id,
        variant: spec.variant,
        base_price,
        discounted_price,
        saved,
        percentage_off,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{config, menu};
    use crate::error::ErrorCode;
    use tableside_core::DiscountKind;

    #[test]
    fn test_percentage_preview() {
        let spec = DiscountSpec::new("p-1", DiscountKind::percent(10));
        let preview = apply_discount(&menu(), &config(), spec).unwrap();

        assert_eq!(preview.base_price.cents(), 2500);
        assert_eq!(preview.discounted_price.cents(), 2250);
        assert_eq!(preview.percentage_off, 10.0);
        assert_eq!(preview.label, "$2.50 off (10.0%)");
    }

    #[test]
    fn test_variant_targeted_fixed_discount() {
        let spec = DiscountSpec::new("p-1", DiscountKind::fixed(Money::from_cents(1000)))
            .for_variant("Large");
        let preview = apply_discount(&menu(), &config(), spec).unwrap();

        assert_eq!(preview.base_price.cents(), 4250);
        assert_eq!(preview.discounted_price.cents(), 3250);
        assert_eq!(preview.percentage_off, 23.5);
    }

    #[test]
    fn test_fixed_larger_than_price_floors_at_zero() {
        let spec = DiscountSpec::new("p-2", DiscountKind::fixed(Money::from_cents(600)));
        let preview = apply_discount(&menu(), &config(), spec).unwrap();

        assert!(preview.discounted_price.is_zero());
        assert_eq!(preview.saved.cents(), 450);
        assert_eq!(preview.percentage_off, 100.0);
    }

    #[test]
    fn test_rejections() {
        let zero = DiscountSpec::new("p-1", DiscountKind::percent(0));
        assert_eq!(
            apply_discount(&menu(), &config(), zero).unwrap_err().code,
            ErrorCode::ValidationError
        );

        let unknown = DiscountSpec::new("p-404", DiscountKind::percent(5));
        assert_eq!(
            apply_discount(&menu(), &config(), unknown).unwrap_err().code,
            ErrorCode::NotFound
        );

        let bad_variant = DiscountSpec::new("p-1", DiscountKind::percent(5)).for_variant("Family");
        assert_eq!(
            apply_discount(&menu(), &config(), bad_variant).unwrap_err().code,
            ErrorCode::ValidationError
        );
    }
}
