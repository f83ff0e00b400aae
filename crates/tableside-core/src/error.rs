//! # Error Types
//!
//! Domain-specific error types for tableside-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tableside-core errors (this file)                                     │
//! │  ├── CoreError        - Rejected ticket/session operations             │
//! │  └── ValidationError  - Malformed selections, discounts, details       │
//! │                                                                         │
//! │  apps/till errors                                                      │
//! │  ├── TillError        - Config, catalog, submit collaborator failures  │
//! │  └── ApiError         - What the UI layer sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Opening a third ticket or closing the last one is NOT an error: the
//! session returns itself unchanged. Over-discounts and full cancellations
//! are arithmetic outcomes, not errors either.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// A rejected operation. The state passed in is left untouched.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No line with this id on the ticket.
    #[error("Line item not found: {0}")]
    LineItemNotFound(String),

    /// No ticket with this id in the session.
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    /// Line quantity would exceed the per-line cap.
    ///
    /// ## User Workflow
    /// ```text
    /// Line: Margherita Pizza x998
    ///      │
    ///      ▼
    /// tap "+" twice (delta 2)
    ///      │
    ///      ▼
    /// QuantityTooLarge { requested: 1000, max: 999 }
    ///      │
    ///      ▼
    /// UI shows: "Quantity 1000 exceeds maximum allowed (999)"
    /// ```
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Ticket already holds the maximum number of distinct lines.
    #[error("Ticket cannot have more than {max} lines")]
    TicketTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before anything reaches the pricing resolver.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Variant name is not one of the product's variants.
    #[error("Variant '{variant}' is not offered for {product}")]
    UnknownVariant { product: String, variant: String },

    /// Add-on id is not one of the product's add-ons.
    #[error("Add-on '{add_on}' is not offered for {product}")]
    UnknownAddOn { product: String, add_on: String },

    /// Selection refers to a different product than the one supplied.
    #[error("Selection is for product {selected}, got {supplied}")]
    ProductMismatch { selected: String, supplied: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1000 exceeds maximum allowed (999)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::UnknownVariant {
            product: "Margherita Pizza".to_string(),
            variant: "Huge".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Variant 'Huge' is not offered for Margherita Pizza"
        );

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "customer name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
