//! # Engine Configuration
//!
//! Explicit configuration for the consumption processor and alert evaluator.
//!
//! ## Why Explicit?
//! Earlier revisions of the platform kept tunables (alert windows, stock
//! policy) as ambient client-side state, which made behavior depend on call
//! site. Here the configuration is a plain value the caller constructs once
//! and passes into the engine, so two call sites can never silently disagree.
//!
//! ## Thread Safety
//! Configuration is read-only after construction; it is `Copy`-cheap to
//! clone and share.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// What to do when an order needs more stock than is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Deduct whatever is available, floor at zero, and record the applied
    /// amount in the ledger. This is the historical platform behavior.
    #[default]
    ClampToAvailable,

    /// Fail the whole order with `InsufficientStock` and roll everything
    /// back. Strict mode for shops that would rather void the sale than
    /// let book stock drift from reality.
    RejectOrder,
}

/// What to do when a recipe line's unit cannot be converted into the target
/// item's stock unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UnitMismatchPolicy {
    /// Abort and roll back the entire order. A mismatched recipe is a data
    /// entry problem that should be fixed, not worked around.
    #[default]
    FailOrder,

    /// Skip the offending recipe line, log a warning, and report it in the
    /// consumption result. The rest of the order proceeds. Matches the
    /// historical platform behavior.
    SkipLine,
}

/// Engine configuration.
///
/// ## Usage
/// ```rust
/// use crema_core::config::{EngineConfig, StockPolicy};
///
/// let config = EngineConfig {
///     stock_policy: StockPolicy::RejectOrder,
///     ..EngineConfig::default()
/// };
/// assert_eq!(config.expiry_lookahead_days, 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EngineConfig {
    /// Days ahead of today within which an item counts as expiring soon.
    pub expiry_lookahead_days: u32,

    /// Insufficient-stock handling during order consumption.
    pub stock_policy: StockPolicy,

    /// Unit-mismatch handling during order consumption.
    pub unit_mismatch_policy: UnitMismatchPolicy,
}

impl Default for EngineConfig {
    /// Returns the default engine configuration.
    ///
    /// ## Default Values
    /// - Expiry lookahead: 7 days (the canonical window)
    /// - Stock: clamp to available
    /// - Unit mismatch: fail the order
    fn default() -> Self {
        EngineConfig {
            expiry_lookahead_days: 7,
            stock_policy: StockPolicy::ClampToAvailable,
            unit_mismatch_policy: UnitMismatchPolicy::FailOrder,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.expiry_lookahead_days, 7);
        assert_eq!(config.stock_policy, StockPolicy::ClampToAvailable);
        assert_eq!(config.unit_mismatch_policy, UnitMismatchPolicy::FailOrder);
    }
}
