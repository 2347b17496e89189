//! # Error Types
//!
//! Domain-specific error types for crema-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  crema-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  crema-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                     │
//! │                          (wraps CoreError for the service surface)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, units, amounts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::units::Unit;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Inventory item cannot be found.
    #[error("Inventory item not found: {0}")]
    ItemNotFound(String),

    /// Conversion requested across dimension families.
    ///
    /// ## When This Occurs
    /// - A recipe line's unit (e.g. liter) cannot be converted into the
    ///   target item's stock unit (e.g. gram)
    /// - Always a data entry problem in the recipe; handled according to
    ///   [`crate::config::UnitMismatchPolicy`]
    #[error("Cannot convert {from} to {to}: incompatible dimensions")]
    UnitMismatch { from: Unit, to: Unit },

    /// Insufficient stock to cover a deduction.
    ///
    /// ## When This Occurs
    /// Only under [`crate::config::StockPolicy::RejectOrder`]. The default
    /// policy clamps the deduction to available stock instead of raising
    /// this error.
    ///
    /// ## User Workflow
    /// ```text
    /// Order: 2 × Croissant (needs 400 g flour)
    ///      │
    ///      ▼
    /// Stock check: 150 g available
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Flour", available: 150.0, requested: 400.0 }
    ///      │
    ///      ▼
    /// UI shows: "Not enough Flour to complete this order"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: f64,
        requested: f64,
    },

    /// A (menu item, inventory item) recipe mapping already exists.
    ///
    /// ## When This Occurs
    /// - Adding a single recipe line for a pair that is already mapped
    /// - Never raised by `replace_all`, which carries replace semantics
    #[error("Menu item {menu_item_id} already maps ingredient {inventory_item_id}")]
    DuplicateMapping {
        menu_item_id: String,
        inventory_item_id: String,
    },

    /// Order has exceeded the maximum allowed line count.
    #[error("Order cannot have more than {max} lines")]
    OrderTooLarge { max: usize },

    /// Line quantity exceeds the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., invalid UUID, non-finite number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate item name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Flour".to_string(),
            available: 150.0,
            requested: 400.0,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Flour: available 150, requested 400"
        );

        let err = CoreError::UnitMismatch {
            from: Unit::Liter,
            to: Unit::Gram,
        };
        assert_eq!(err.to_string(), "Cannot convert l to g: incompatible dimensions");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBeNonNegative {
            field: "low_stock_threshold".to_string(),
        };
        assert_eq!(err.to_string(), "low_stock_threshold must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
