//! # Domain Types
//!
//! Core domain types used throughout Crema POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InventoryItem   │   │   RecipeLine    │   │  LedgerEntry    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (opaque)    │   │  menu_item_id   │   │  item id (FK)   │       │
//! │  │  name (unique)  │   │  inventory id   │   │  kind           │       │
//! │  │  unit, quantity │   │  qty_required   │   │  signed qty     │       │
//! │  │  threshold      │   │  unit           │   │  causal order   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │   OrderLine     │   │  MovementKind   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  total_cents    │   │  menu_item_id   │   │  Add / Remove   │       │
//! │  │  payment method │   │  quantity       │   │  Adjust / Sale  │       │
//! │  │  immutable      │   │  price snapshot │   │  Expired        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Opaque Identifier Pattern
//! Menu items and inventory items are referenced by opaque string-backed
//! newtypes. The engine never inspects an id's structure, so a storage
//! backend is free to use UUIDs, integers rendered as strings, or anything
//! else comparable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::units::Unit;

// =============================================================================
// Opaque Identifiers
// =============================================================================

/// Opaque identifier of a raw-material inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct InventoryItemId(pub String);

impl InventoryItemId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        InventoryItemId(Uuid::new_v4().to_string())
    }

    /// Wraps an existing id value.
    pub fn new(id: impl Into<String>) -> Self {
        InventoryItemId(id.into())
    }

    /// Borrows the raw id (for query binding and logging).
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InventoryItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a sellable menu item.
///
/// Menu items themselves (names, prices, categories) live in the product
/// catalog, outside the engine. The engine only joins recipe lines and order
/// lines on this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct MenuItemId(pub String);

impl MenuItemId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        MenuItemId(Uuid::new_v4().to_string())
    }

    /// Wraps an existing id value.
    pub fn new(id: impl Into<String>) -> Self {
        MenuItemId(id.into())
    }

    /// Borrows the raw id (for query binding and logging).
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A raw material tracked in stock.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryItem {
    /// Opaque identifier.
    pub id: InventoryItemId,

    /// Display name. Unique - this is the human key.
    pub name: String,

    /// Stock unit: the canonical unit `quantity` is recorded in.
    pub unit: Unit,

    /// Current on-hand quantity, in `unit`. Never negative; deductions
    /// clamp at zero.
    pub quantity: f64,

    /// Low-stock alert threshold, in `unit`. 0 disables the alert.
    pub low_stock_threshold: f64,

    /// Expiry date of the current batch, if perishable.
    #[ts(as = "Option<String>")]
    pub expires_on: Option<NaiveDate>,

    /// Optional grouping for admin screens ("dairy", "dry goods").
    pub category: Option<String>,

    /// Purchase cost per stock unit, in cents (for stock valuation).
    pub cost_per_unit_cents: Option<i64>,

    /// When the item was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Checks whether stock is at or below the configured threshold.
    ///
    /// A threshold of 0 disables the check.
    pub fn is_low_stock(&self) -> bool {
        self.low_stock_threshold > 0.0 && self.quantity <= self.low_stock_threshold
    }
}

// =============================================================================
// Recipe Line
// =============================================================================

/// One ingredient requirement of a menu item's recipe (a BOM entry).
///
/// Links one menu item to one inventory item with the quantity consumed per
/// unit sold. `unit` may differ from the inventory item's stock unit; the
/// consumption processor converts at deduction time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RecipeLine {
    pub id: String,
    pub menu_item_id: MenuItemId,
    pub inventory_item_id: InventoryItemId,
    /// Quantity consumed per unit sold, expressed in `unit`. Always > 0.
    pub quantity_required: f64,
    /// Unit `quantity_required` is expressed in.
    pub unit: Unit,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Ingredient input for recipe edits (`replace_all`).
///
/// The caller supplies the mapping; ids and timestamps are generated at
/// insert time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecipeLineInput {
    pub inventory_item_id: InventoryItemId,
    pub quantity_required: f64,
    pub unit: Unit,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How an order was paid.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    ExternalCard,
}

// =============================================================================
// Order
// =============================================================================

/// An immutable record of a completed sale.
///
/// Created once at sale time by the consumption processor; never mutated
/// thereafter (refunds/voids are out of scope).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A line item in an order.
///
/// `unit_price_cents` is a snapshot: the price at sale time, frozen so sale
/// history survives later menu edits.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: MenuItemId,
    /// Units of the menu item sold. Always > 0.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl OrderLine {
    /// Line total before tax (unit_price × quantity).
    #[inline]
    pub const fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// The kind of stock movement a ledger entry records.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods received (delivery, restock).
    Add,
    /// Goods taken out for a reason other than a sale (breakage, transfer).
    Remove,
    /// Manual administrative correction after a count.
    Adjust,
    /// Automatic deduction driven by order consumption.
    Sale,
    /// Write-off of spoiled stock past its expiry date.
    Expired,
}

/// An immutable audit record of one stock quantity mutation.
///
/// ## Invariants
/// - Write-once: entries are never updated or deleted.
/// - `quantity` is the signed delta actually applied, in the item's stock
///   unit. Sale deductions are negative; clamped deductions record the
///   applied amount, not the requested one.
/// - The sum of `Sale` deltas for an item equals the total quantity the
///   catalog lost to orders over the same period (reconciliation).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct LedgerEntry {
    pub id: String,
    pub inventory_item_id: InventoryItemId,
    pub kind: MovementKind,
    /// Signed delta applied to the item's quantity, in `unit`.
    pub quantity: f64,
    /// The item's stock unit at the time of the movement.
    pub unit: Unit,
    /// Causal reference: the order that triggered a `Sale` movement.
    pub order_id: Option<String>,
    /// Free-text reason, mainly for manual adjustments.
    pub note: Option<String>,
    /// Who caused the movement ("pos" for the processor, a user name for
    /// admin corrections).
    pub actor: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates an entry with a generated id and current timestamp.
    ///
    /// Callers attach `order_id` / `note` as appropriate before appending.
    pub fn new(
        inventory_item_id: InventoryItemId,
        kind: MovementKind,
        quantity: f64,
        unit: Unit,
        actor: impl Into<String>,
    ) -> Self {
        LedgerEntry {
            id: Uuid::new_v4().to_string(),
            inventory_item_id,
            kind,
            quantity,
            unit,
            order_id: None,
            note: None,
            actor: actor.into(),
            created_at: Utc::now(),
        }
    }

    /// Attaches the causal order reference.
    pub fn with_order(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Attaches a free-text note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_item(quantity: f64, threshold: f64) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: InventoryItemId::generate(),
            name: "Flour".to_string(),
            unit: Unit::Gram,
            quantity,
            low_stock_threshold: threshold,
            expires_on: None,
            category: None,
            cost_per_unit_cents: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_low_stock_check() {
        assert!(test_item(2.0, 5.0).is_low_stock());
        assert!(test_item(5.0, 5.0).is_low_stock());
        assert!(!test_item(6.0, 5.0).is_low_stock());
    }

    #[test]
    fn test_zero_threshold_disables_low_stock() {
        assert!(!test_item(0.0, 0.0).is_low_stock());
    }

    #[test]
    fn test_order_line_total() {
        let line = OrderLine {
            id: "l1".to_string(),
            order_id: "o1".to_string(),
            menu_item_id: MenuItemId::new("latte"),
            quantity: 3,
            unit_price_cents: 450,
            created_at: Utc::now(),
        };
        assert_eq!(line.line_total_cents(), 1350);
    }

    #[test]
    fn test_ledger_entry_builder() {
        let item_id = InventoryItemId::generate();
        let entry = LedgerEntry::new(item_id.clone(), MovementKind::Sale, -150.0, Unit::Gram, "pos")
            .with_order("order-1");

        assert_eq!(entry.inventory_item_id, item_id);
        assert_eq!(entry.kind, MovementKind::Sale);
        assert_eq!(entry.quantity, -150.0);
        assert_eq!(entry.order_id.as_deref(), Some("order-1"));
        assert!(entry.note.is_none());
    }

    #[test]
    fn test_opaque_ids_compare_by_value() {
        let a = InventoryItemId::new("item-1");
        let b = InventoryItemId::new("item-1");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "item-1");
    }

    #[test]
    fn test_wire_format() {
        // The frontend contract: ids are plain strings, enums snake_case
        let id = InventoryItemId::new("item-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"item-1\"");
        assert_eq!(
            serde_json::to_string(&Unit::Kilogram).unwrap(),
            "\"kilogram\""
        );
        assert_eq!(
            serde_json::to_string(&MovementKind::Sale).unwrap(),
            "\"sale\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::ExternalCard).unwrap(),
            "\"external_card\""
        );
    }
}
