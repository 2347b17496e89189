//! # Measurement Units Module
//!
//! Provides the `Unit` type and pure conversion between units of the same
//! dimension family.
//!
//! ## Why Explicit Dimensions?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE UNIT MISMATCH PROBLEM                                              │
//! │                                                                         │
//! │  A recipe says:      0.03 l  of milk per latte                          │
//! │  The stock bin says: 5000 ml on hand                                    │
//! │                                                                         │
//! │  Same dimension (volume) → convert: 0.03 l = 30 ml    ✓                 │
//! │                                                                         │
//! │  A recipe that says:  0.03 l of flour                                   │
//! │  against a bin in:    grams                                             │
//! │                                                                         │
//! │  Different dimensions → UnitMismatch error            ✗                 │
//! │  NEVER a silent coercion - a wrong deduction corrupts stock forever     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use crema_core::units::{convert, Unit};
//!
//! let ml = convert(1.5, Unit::Liter, Unit::Milliliter).unwrap();
//! assert_eq!(ml, 1500.0);
//!
//! // Identity conversion is a no-op
//! assert_eq!(convert(7.0, Unit::Gram, Unit::Gram).unwrap(), 7.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Dimension
// =============================================================================

/// The physical dimension a unit measures.
///
/// Conversion is only defined between units of the same dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Weight: gram, kilogram.
    Mass,
    /// Liquid volume: milliliter, liter.
    Volume,
    /// Discrete items: piece.
    Count,
}

// =============================================================================
// Unit
// =============================================================================

/// A measurement unit an inventory quantity can be expressed in.
///
/// ## The Fixed Set
/// The engine supports exactly these five units. Stock units and recipe
/// units both come from this set; they may differ for the same ingredient
/// (recipe in kilograms, bin tracked in grams) as long as the dimension
/// matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Mass, base unit.
    Gram,
    /// Mass, 1000 g.
    Kilogram,
    /// Volume, base unit.
    Milliliter,
    /// Volume, 1000 ml.
    Liter,
    /// Count (eggs, cups, lids). No cross-family conversion.
    Piece,
}

impl Unit {
    /// Returns the dimension family this unit belongs to.
    #[inline]
    pub const fn dimension(&self) -> Dimension {
        match self {
            Unit::Gram | Unit::Kilogram => Dimension::Mass,
            Unit::Milliliter | Unit::Liter => Dimension::Volume,
            Unit::Piece => Dimension::Count,
        }
    }

    /// Factor to the dimension's base unit (gram, milliliter, piece).
    ///
    /// ## Example
    /// ```rust
    /// use crema_core::units::Unit;
    ///
    /// assert_eq!(Unit::Kilogram.base_factor(), 1000.0);
    /// assert_eq!(Unit::Gram.base_factor(), 1.0);
    /// ```
    #[inline]
    pub const fn base_factor(&self) -> f64 {
        match self {
            Unit::Gram | Unit::Milliliter | Unit::Piece => 1.0,
            Unit::Kilogram | Unit::Liter => 1000.0,
        }
    }

    /// Short display symbol (for receipts and admin screens).
    pub const fn symbol(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Piece => "pc",
        }
    }

    /// All supported units, in a stable order.
    ///
    /// ## Usage
    /// Admin UI dropdowns and exhaustive tests.
    pub const fn all() -> [Unit; 5] {
        [
            Unit::Gram,
            Unit::Kilogram,
            Unit::Milliliter,
            Unit::Liter,
            Unit::Piece,
        ]
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// =============================================================================
// Conversion
// =============================================================================

/// Converts a quantity from one unit to another within the same dimension.
///
/// ## Contract
/// - Identity conversion (`from == to`) returns the input unchanged.
/// - Same-dimension conversion goes through the base unit
///   (`qty * from_factor / to_factor`) and is round-trip stable within
///   floating tolerance for the supported factor-of-1000 pairs.
/// - Cross-dimension conversion returns [`CoreError::UnitMismatch`] and
///   never silently coerces.
///
/// ## Example
/// ```rust
/// use crema_core::units::{convert, Unit};
///
/// // 200 g per unit sold, stock tracked in kilograms
/// let kg = convert(200.0, Unit::Gram, Unit::Kilogram).unwrap();
/// assert_eq!(kg, 0.2);
///
/// assert!(convert(1.0, Unit::Piece, Unit::Gram).is_err());
/// ```
pub fn convert(quantity: f64, from: Unit, to: Unit) -> Result<f64, CoreError> {
    if from == to {
        return Ok(quantity);
    }

    if from.dimension() != to.dimension() {
        return Err(CoreError::UnitMismatch { from, to });
    }

    Ok(quantity * from.base_factor() / to.base_factor())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        assert_eq!(Unit::Gram.dimension(), Dimension::Mass);
        assert_eq!(Unit::Kilogram.dimension(), Dimension::Mass);
        assert_eq!(Unit::Milliliter.dimension(), Dimension::Volume);
        assert_eq!(Unit::Liter.dimension(), Dimension::Volume);
        assert_eq!(Unit::Piece.dimension(), Dimension::Count);
    }

    #[test]
    fn test_identity_conversion() {
        for unit in Unit::all() {
            assert_eq!(convert(42.5, unit, unit).unwrap(), 42.5);
        }
    }

    #[test]
    fn test_mass_conversion() {
        assert_eq!(convert(2.0, Unit::Kilogram, Unit::Gram).unwrap(), 2000.0);
        assert_eq!(convert(500.0, Unit::Gram, Unit::Kilogram).unwrap(), 0.5);
    }

    #[test]
    fn test_volume_conversion() {
        assert_eq!(convert(1.5, Unit::Liter, Unit::Milliliter).unwrap(), 1500.0);
        assert_eq!(convert(250.0, Unit::Milliliter, Unit::Liter).unwrap(), 0.25);
    }

    #[test]
    fn test_round_trip_stability() {
        // convert(convert(x, A, B), B, A) == x within tolerance,
        // for every same-dimension pair
        let samples = [0.001, 0.25, 1.0, 3.7, 150.0, 99999.5];
        for from in Unit::all() {
            for to in Unit::all() {
                if from.dimension() != to.dimension() {
                    continue;
                }
                for &x in &samples {
                    let there = convert(x, from, to).unwrap();
                    let back = convert(there, to, from).unwrap();
                    assert!(
                        (back - x).abs() < 1e-9,
                        "round trip {from:?} -> {to:?} drifted: {x} -> {back}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_cross_family_is_error() {
        // Every cross-dimension pair must fail, in both directions
        for from in Unit::all() {
            for to in Unit::all() {
                if from.dimension() == to.dimension() {
                    continue;
                }
                let err = convert(1.0, from, to).unwrap_err();
                assert!(
                    matches!(err, CoreError::UnitMismatch { .. }),
                    "expected UnitMismatch for {from:?} -> {to:?}"
                );
            }
        }
    }

    #[test]
    fn test_piece_never_converts() {
        assert!(convert(12.0, Unit::Piece, Unit::Gram).is_err());
        assert!(convert(12.0, Unit::Piece, Unit::Liter).is_err());
        assert_eq!(convert(12.0, Unit::Piece, Unit::Piece).unwrap(), 12.0);
    }

    #[test]
    fn test_display_symbols() {
        assert_eq!(Unit::Gram.to_string(), "g");
        assert_eq!(Unit::Kilogram.to_string(), "kg");
        assert_eq!(Unit::Milliliter.to_string(), "ml");
        assert_eq!(Unit::Liter.to_string(), "l");
        assert_eq!(Unit::Piece.to_string(), "pc");
    }
}
