//! # Till Errors
//!
//! `TillError` covers the till's own failures (config, catalog, collaborator
//! calls). `ApiError` is what the UI layer receives for any failed command.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Till                               │
//! │                                                                         │
//! │  UI request                                                             │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Command  Result<T, ApiError>                                           │
//! │      │                                                                  │
//! │      ├── ValidationError ─► CoreError ────────────┐                     │
//! │      │                                            ▼                     │
//! │      ├── Catalog / submit failure ─► TillError ─► ApiError ─► UI        │
//! │      │                                                                  │
//! │      └── Success ─────────────────────────────────────────────► UI      │
//! │                                                                         │
//! │  A failed command never replaces the session: prior state stays.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tableside_core::CoreError;
use thiserror::Error;

// =============================================================================
// Till Error
// =============================================================================

/// Result type alias for till operations.
pub type TillResult<T> = Result<T, TillError>;

#[derive(Debug, Error)]
pub enum TillError {
    /// Config or catalog file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// till.toml did not parse.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config parsed but failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Menu file did not parse.
    #[error("Failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),

    /// Product id not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Submitting to the orders service failed.
    #[error("Order submission failed: {0}")]
    SubmitFailed(String),

    /// Edit command without `begin_edit` first.
    #[error("No order edit in progress")]
    NoEditInProgress,

    /// Nothing to submit.
    #[error("Ticket is empty")]
    EmptyTicket,
}

// =============================================================================
// API Error
// =============================================================================

/// Error returned to the UI layer.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Variant 'Family' is not offered for Margherita Pizza"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, ticket or line not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Ticket operation rejected (caps)
    TicketError,

    /// Edit flow misuse
    EditError,

    /// Orders service rejected or unreachable
    SubmitError,

    /// Request could not be parsed
    BadRequest,

    /// Internal failure
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LineItemNotFound(id) => ApiError::not_found("Line item", &id),
            CoreError::TicketNotFound(id) => ApiError::not_found("Ticket", &id),
            e @ CoreError::QuantityTooLarge { .. } => ApiError::validation(e.to_string()),
            e @ CoreError::TicketTooLarge { .. } => ApiError::new(ErrorCode::TicketError, e.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<TillError> for ApiError {
    fn from(err: TillError) -> Self {
        match err {
            TillError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            TillError::NoEditInProgress => ApiError::new(ErrorCode::EditError, err.to_string()),
            TillError::EmptyTicket => ApiError::validation(err.to_string()),
            TillError::SubmitFailed(reason) => {
                tracing::error!(%reason, "order submission failed");
                ApiError::new(ErrorCode::SubmitError, "Could not reach the orders service")
            }
            other => {
                tracing::error!(error = %other, "internal till error");
                ApiError::internal(other.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tableside_core::ValidationError;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err: ApiError = CoreError::LineItemNotFound("l-1".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Line item not found: l-1");

        let err: ApiError = CoreError::Validation(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "quantity must be positive");

        let err: ApiError = CoreError::TicketTooLarge { max: 100 }.into();
        assert_eq!(err.code, ErrorCode::TicketError);
    }

    #[test]
    fn test_submit_failure_hides_details() {
        let err: ApiError = TillError::SubmitFailed("connection refused".to_string()).into();
        assert_eq!(err.code, ErrorCode::SubmitError);
        assert!(!err.message.contains("refused"));
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::not_found("Product", "p-404");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"code":"NOT_FOUND","message":"Product not found: p-404"}"#);
    }
}
