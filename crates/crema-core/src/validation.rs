//! # Validation Module
//!
//! Input validation utilities for Crema POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                         │
//! │  ├── Basic format checks (empty, length)                                │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine entry points (Rust)                                    │
//! │  └── THIS MODULE: rejected BEFORE any mutation                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE constraints                                                 │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use crema_core::validation::{validate_item_name, validate_recipe_quantity};
//!
//! validate_item_name("Espresso Beans").unwrap();
//! assert!(validate_recipe_quantity(0.0).is_err());
//! ```

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an inventory item name.
///
/// ## Rules
/// - Must not be empty (names are the human key)
/// - Must be at most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an opaque identifier.
///
/// ## Rules
/// - Must not be empty
/// - No structural checks: ids are opaque, a backend may use UUIDs or
///   integer keys rendered as strings
pub fn validate_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an on-hand stock quantity.
///
/// ## Rules
/// - Must be finite (NaN/inf would corrupt every later calculation)
/// - Must not be negative
pub fn validate_stock_quantity(quantity: f64) -> ValidationResult<()> {
    if !quantity.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if quantity < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a low-stock threshold.
///
/// ## Rules
/// - Must be finite
/// - Must not be negative (0 disables the alert)
pub fn validate_threshold(threshold: f64) -> ValidationResult<()> {
    if !threshold.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "low_stock_threshold".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if threshold < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "low_stock_threshold".to_string(),
        });
    }

    Ok(())
}

/// Validates a per-unit recipe quantity.
///
/// ## Rules
/// - Must be finite
/// - Must be strictly positive (a zero-quantity ingredient is a recipe
///   entry mistake, not a no-op)
pub fn validate_recipe_quantity(quantity: f64) -> ValidationResult<()> {
    if !quantity.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "quantity_required".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity_required".to_string(),
        });
    }

    Ok(())
}

/// Validates an order line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Checkout: place order                                                  │
/// │                                                                         │
/// │  Line quantity: 5                                                       │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_line_quantity(5) ← THIS FUNCTION                              │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"                │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: out of range                              │
/// │       │                                                                 │
/// │       └── OK → Proceed with consumption                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_line_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Espresso Beans").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_id("42").is_ok()); // opaque: integers are fine
        assert!(validate_id("").is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(0.0).is_ok());
        assert!(validate_stock_quantity(1500.5).is_ok());
        assert!(validate_stock_quantity(-0.1).is_err());
        assert!(validate_stock_quantity(f64::NAN).is_err());
        assert!(validate_stock_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(25.0).is_ok());
        assert!(validate_threshold(-1.0).is_err());
    }

    #[test]
    fn test_validate_recipe_quantity() {
        assert!(validate_recipe_quantity(0.03).is_ok());
        assert!(validate_recipe_quantity(0.0).is_err());
        assert!(validate_recipe_quantity(-2.0).is_err());
        assert!(validate_recipe_quantity(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_line_quantity() {
        assert!(validate_line_quantity(1).is_ok());
        assert!(validate_line_quantity(999).is_ok());

        assert!(validate_line_quantity(0).is_err());
        assert!(validate_line_quantity(-1).is_err());
        assert!(validate_line_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(450).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }
}
