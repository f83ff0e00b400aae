//! # Validation Module
//!
//! Input checks that run before anything is priced or stored.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard UI                                                 │
//! │  ├── Disables "+" at the cap, hides unavailable variants               │
//! │  └── Immediate cashier feedback                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Till commands                                                │
//! │  ├── Deserialization (types)                                           │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing resolver                                             │
//! │  └── Defensive fallback + warn! for anything that slipped through      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed check surfaces as a rejected operation; the caller's state is
//! untouched.

use crate::discount::{DiscountKind, DiscountSpec};
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Fulfillment, OrderDetails, Product, Selection};
use crate::ticket::LineItem;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS, MAX_TICKET_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## Example
/// ```rust
/// use tableside_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(1000).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    validate_quantity_of("quantity", qty)
}

fn validate_quantity_of(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a catalog price.
///
/// ## Rules
/// - Zero is allowed (complimentary items)
/// - Must not be negative or exceed MAX_PRICE_CENTS
///
/// ## Example
/// ```rust
/// use tableside_core::validation::validate_price;
/// use tableside_core::Money;
///
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-500)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    validate_price_of("price", price)
}

fn validate_price_of(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates ticket size before a new line is appended.
pub fn validate_ticket_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_TICKET_LINES {
        return Err(ValidationError::OutOfRange {
            field: "ticket lines".to_string(),
            min: 0,
            max: MAX_TICKET_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates every price a product carries: base, variants and add-ons.
///
/// Run when a menu is loaded, so a bad entry never reaches a ticket.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_price_of(&format!("{} base price", product.name), product.base_price)?;

    for variant in &product.variants {
        validate_price_of(&format!("{} variant {}", product.name, variant.name), variant.price)?;
    }
    for add_on in &product.add_ons {
        validate_price_of(&format!("{} add-on {}", product.name, add_on.name), add_on.price)?;
    }

    Ok(())
}

/// Validates a line carried over from a placed order.
pub fn validate_line_item(line: &LineItem) -> ValidationResult<()> {
    validate_quantity_of(&format!("{} quantity", line.product_name), line.quantity)?;
    validate_price_of(&format!("{} unit price", line.product_name), line.unit_price)
}

// =============================================================================
// Selection Validator
// =============================================================================

/// Validates a selection against the product it claims to configure.
///
/// ## Rules
/// - `selection.product_id` matches `product.id`
/// - Requested quantity passes [`validate_quantity`]
/// - Variant, if any, is one of the product's variants
/// - Every add-on id is one of the product's add-ons, with a quantity that
///   passes the same bounds as a line quantity
/// - Every price the selection draws on is within [`validate_price`] bounds
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Item modal: "Add to order"                                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_selection(product, selection) ← THIS FUNCTION                 │
/// │       │                                                                 │
/// │       ├── variant "Family" not offered → UnknownVariant                 │
/// │       ├── add-on "anchovy" not offered → UnknownAddOn                   │
/// │       ├── qty 0 → MustBePositive                                        │
/// │       ├── add-on qty 5000 → OutOfRange                                  │
/// │       │                                                                 │
/// │       └── OK → price + merge into ticket                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_selection(product: &Product, selection: &Selection) -> ValidationResult<()> {
    if selection.product_id != product.id {
        return Err(ValidationError::ProductMismatch {
            selected: selection.product_id.clone(),
            supplied: product.id.clone(),
        });
    }

    validate_quantity(selection.quantity)?;

    let base_price = match selection.variant.as_deref() {
        Some(name) => match product.variant(name) {
            Some(variant) => variant.price,
            None => {
                return Err(ValidationError::UnknownVariant {
                    product: product.name.clone(),
                    variant: name.to_string(),
                })
            }
        },
        None => product.base_price,
    };
    validate_price(base_price)?;

    for (id, &qty) in &selection.add_ons {
        let Some(add_on) = product.add_on(id) else {
            return Err(ValidationError::UnknownAddOn {
                product: product.name.clone(),
                add_on: id.clone(),
            });
        };
        validate_quantity_of(&format!("add-on {} quantity", id), qty)?;
        validate_price_of(&format!("add-on {} price", id), add_on.price)?;
    }

    Ok(())
}

// =============================================================================
// Discount Validator
// =============================================================================

/// Validates a discount spec before it is saved.
///
/// ## Rules
/// - Product id is required
/// - Percentage: 0 < value ≤ 100% (1..=10000 bps)
/// - Fixed amount: > 0
///
/// ## Example
/// ```rust
/// use tableside_core::{DiscountKind, DiscountSpec, Money};
/// use tableside_core::validation::validate_discount;
///
/// assert!(validate_discount(&DiscountSpec::new("p-1", DiscountKind::percent(10))).is_ok());
/// assert!(validate_discount(&DiscountSpec::new("p-1", DiscountKind::percent(0))).is_err());
/// assert!(validate_discount(&DiscountSpec::new("p-1", DiscountKind::fixed(Money::zero()))).is_err());
/// ```
pub fn validate_discount(spec: &DiscountSpec) -> ValidationResult<()> {
    if spec.product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product".to_string(),
        });
    }

    match spec.kind {
        DiscountKind::Percentage { bps } => {
            if bps == 0 || bps > 10_000 {
                return Err(ValidationError::OutOfRange {
                    field: "discount percentage (bps)".to_string(),
                    min: 1,
                    max: 10_000,
                });
            }
        }
        DiscountKind::FixedAmountOff { amount } => {
            if !amount.is_positive() {
                return Err(ValidationError::MustBePositive {
                    field: "discount amount".to_string(),
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Order Details Validator
// =============================================================================

/// Validates customer and fulfillment details.
///
/// ## Rules
/// - Customer name required
/// - Phone: 7-15 digits, optional leading `+`, spaces and dashes ignored
/// - Dine In: table number required
/// - Delivery: address and zip code required
pub fn validate_order_details(details: &OrderDetails) -> ValidationResult<()> {
    if details.customer_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    validate_phone(&details.phone)?;

    match &details.fulfillment {
        Fulfillment::DineIn { table_number } => {
            if table_number.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "table number".to_string(),
                });
            }
        }
        Fulfillment::TakeAway => {}
        Fulfillment::Delivery {
            address, zip_code, ..
        } => {
            if address.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "address".to_string(),
                });
            }
            if zip_code.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "zip code".to_string(),
                });
            }
        }
    }

    Ok(())
}

fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    let mut digits = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' => {}
            _ => {
                return Err(ValidationError::InvalidFormat {
                    field: "phone".to_string(),
                    reason: "must contain only digits, spaces, and dashes".to_string(),
                })
            }
        }
    }

    if !(7..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must have between 7 and 15 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
