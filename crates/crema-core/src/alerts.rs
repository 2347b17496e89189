//! # Alert Evaluation
//!
//! Derives low-stock and expiry alerts from a catalog snapshot.
//!
//! ## Design: Derived, Never Persisted
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Alert Evaluation Flow                             │
//! │                                                                         │
//! │  Admin UI polls ──► crema-db snapshots catalog ──► evaluate() (HERE)    │
//! │                                                                         │
//! │  No alert rows in the database, no background jobs, no state to get     │
//! │  stale. Alerts are a pure function of (catalog, today, config), so      │
//! │  clients may poll at arbitrary frequency.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Classification Rules
//! Applied independently - one item can land in several sets:
//! - `expired`: has an expiry date, `expires_on < today`
//! - `expiring_soon`: has an expiry date, `today <= expires_on <= today + lookahead`
//! - `low_stock`: `threshold > 0 && quantity <= threshold`

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::EngineConfig;
use crate::types::InventoryItem;

// =============================================================================
// Alert Report
// =============================================================================

/// Point-in-time alert sets over a catalog snapshot.
///
/// Items are cloned into the report so the caller can hand it to a frontend
/// without holding the snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AlertReport {
    /// Stock at or below the item's threshold (threshold 0 = disabled).
    pub low_stock: Vec<InventoryItem>,
    /// Expiry date within the configured lookahead window.
    pub expiring_soon: Vec<InventoryItem>,
    /// Expiry date in the past.
    pub expired: Vec<InventoryItem>,
}

impl AlertReport {
    /// True when no alert fired.
    pub fn is_empty(&self) -> bool {
        self.low_stock.is_empty() && self.expiring_soon.is_empty() && self.expired.is_empty()
    }

    /// Total number of alerting items (an item in two sets counts twice).
    pub fn len(&self) -> usize {
        self.low_stock.len() + self.expiring_soon.len() + self.expired.len()
    }
}

/// Single-item classification for list screens.
///
/// Unlike [`AlertReport`], this collapses to exactly one status per item,
/// highest severity first: expired > expiring soon > low stock > normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Normal,
    LowStock,
    ExpiringSoon,
    Expired,
}

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluates alert sets over a catalog snapshot.
///
/// Pure read: no side effects, safe to call at arbitrarily high frequency.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use crema_core::alerts::evaluate;
/// use crema_core::config::EngineConfig;
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
/// let report = evaluate(&[], today, &EngineConfig::default());
/// assert!(report.is_empty());
/// ```
pub fn evaluate(items: &[InventoryItem], today: NaiveDate, config: &EngineConfig) -> AlertReport {
    let horizon = today
        .checked_add_days(Days::new(u64::from(config.expiry_lookahead_days)))
        .unwrap_or(NaiveDate::MAX);

    let mut report = AlertReport::default();

    for item in items {
        if item.is_low_stock() {
            report.low_stock.push(item.clone());
        }

        if let Some(expires_on) = item.expires_on {
            if expires_on < today {
                report.expired.push(item.clone());
            } else if expires_on <= horizon {
                report.expiring_soon.push(item.clone());
            }
        }
    }

    report
}

/// Classifies a single item, highest severity first.
pub fn classify(item: &InventoryItem, today: NaiveDate, config: &EngineConfig) -> AlertStatus {
    let horizon = today
        .checked_add_days(Days::new(u64::from(config.expiry_lookahead_days)))
        .unwrap_or(NaiveDate::MAX);

    if let Some(expires_on) = item.expires_on {
        if expires_on < today {
            return AlertStatus::Expired;
        }
        if expires_on <= horizon {
            return AlertStatus::ExpiringSoon;
        }
    }

    if item.is_low_stock() {
        return AlertStatus::LowStock;
    }

    AlertStatus::Normal
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InventoryItemId;
    use crate::units::Unit;
    use chrono::Utc;

    fn item(name: &str, quantity: f64, threshold: f64, expires_on: Option<NaiveDate>) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: InventoryItemId::generate(),
            name: name.to_string(),
            unit: Unit::Gram,
            quantity,
            low_stock_threshold: threshold,
            expires_on,
            category: None,
            cost_per_unit_cents: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn config_with_lookahead(days: u32) -> EngineConfig {
        EngineConfig {
            expiry_lookahead_days: days,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_low_stock_classification() {
        // quantity=2, threshold=5 → low stock
        let items = [item("Beans", 2.0, 5.0, None)];
        let report = evaluate(&items, today(), &EngineConfig::default());

        assert_eq!(report.low_stock.len(), 1);
        assert!(report.expiring_soon.is_empty());
        assert!(report.expired.is_empty());
    }

    #[test]
    fn test_threshold_boundary_is_low_stock() {
        let items = [item("Beans", 5.0, 5.0, None)];
        let report = evaluate(&items, today(), &EngineConfig::default());
        assert_eq!(report.low_stock.len(), 1);
    }

    #[test]
    fn test_zero_threshold_never_alerts() {
        let items = [item("Beans", 0.0, 0.0, None)];
        let report = evaluate(&items, today(), &EngineConfig::default());
        assert!(report.is_empty());
    }

    #[test]
    fn test_expiring_soon_within_window() {
        // expiry = today + 2 days, lookahead 3 days → expiring soon
        let expires = today().checked_add_days(Days::new(2));
        let items = [item("Milk", 100.0, 0.0, expires)];
        let report = evaluate(&items, today(), &config_with_lookahead(3));

        assert_eq!(report.expiring_soon.len(), 1);
        assert!(report.expired.is_empty());
    }

    #[test]
    fn test_expiry_beyond_window_is_normal() {
        let expires = today().checked_add_days(Days::new(10));
        let items = [item("Milk", 100.0, 0.0, expires)];
        let report = evaluate(&items, today(), &config_with_lookahead(7));
        assert!(report.is_empty());
    }

    #[test]
    fn test_expired_yesterday_not_expiring_soon() {
        // expiry = yesterday → expired, and NOT in expiring_soon
        let expires = today().checked_sub_days(Days::new(1));
        let items = [item("Cream", 100.0, 0.0, expires)];
        let report = evaluate(&items, today(), &EngineConfig::default());

        assert_eq!(report.expired.len(), 1);
        assert!(report.expiring_soon.is_empty());
    }

    #[test]
    fn test_expiring_today_counts_as_soon() {
        let items = [item("Cream", 100.0, 0.0, Some(today()))];
        let report = evaluate(&items, today(), &EngineConfig::default());

        assert_eq!(report.expiring_soon.len(), 1);
        assert!(report.expired.is_empty());
    }

    #[test]
    fn test_item_can_appear_in_multiple_sets() {
        // Low on stock AND expired
        let expires = today().checked_sub_days(Days::new(3));
        let items = [item("Yeast", 1.0, 10.0, expires)];
        let report = evaluate(&items, today(), &EngineConfig::default());

        assert_eq!(report.low_stock.len(), 1);
        assert_eq!(report.expired.len(), 1);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_classify_severity_order() {
        let config = EngineConfig::default();
        let expired = item("A", 1.0, 10.0, today().checked_sub_days(Days::new(1)));
        let soon = item("B", 1.0, 10.0, today().checked_add_days(Days::new(2)));
        let low = item("C", 1.0, 10.0, None);
        let normal = item("D", 100.0, 10.0, None);

        assert_eq!(classify(&expired, today(), &config), AlertStatus::Expired);
        assert_eq!(classify(&soon, today(), &config), AlertStatus::ExpiringSoon);
        assert_eq!(classify(&low, today(), &config), AlertStatus::LowStock);
        assert_eq!(classify(&normal, today(), &config), AlertStatus::Normal);
    }
}
