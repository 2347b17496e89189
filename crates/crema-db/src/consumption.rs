//! # Order Consumption Processor
//!
//! Translates a placed order into recipe-driven stock deductions, ledger
//! entries, and an immutable order record - atomically.
//!
//! ## The One Transaction Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    place_order(request)                                 │
//! │                                                                         │
//! │  BEGIN ──────────────────────────────────────────────────────┐          │
//! │  │ INSERT order + order lines                                │          │
//! │  │                                                           │          │
//! │  │ for each order line:                                      │          │
//! │  │   lines_for(menu_item)            ← BOM lookup            │          │
//! │  │   (no recipe? line moves no stock - not an error)         │          │
//! │  │   for each recipe line:                                   │          │
//! │  │     required = qty_required × qty_sold                    │          │
//! │  │     convert(required, recipe unit → stock unit)           │          │
//! │  │     adjust_quantity(item, -required)  ← clamped at zero   │          │
//! │  │     append ledger entry (kind: sale, applied delta,       │          │
//! │  │                          causal ref: the order)           │          │
//! │  │                                                           │          │
//! │  COMMIT ──── all stock effects + ledger + order together ────┘          │
//! │                                                                         │
//! │  Any error on the way out = the transaction drops = FULL ROLLBACK.      │
//! │  No partial order, no partial deduction, no orphan ledger entry is      │
//! │  ever visible.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The transaction holds SQLite's write lock from first write to commit, so
//! two concurrent orders draining the same ingredient serialize; the clamp
//! floor lives in the UPDATE statement itself (see
//! [`InventoryRepository::adjust_quantity`]), never in application
//! read-then-write.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use crate::repository::inventory::InventoryRepository;
use crate::repository::ledger::LedgerRepository;
use crate::repository::order::OrderRepository;
use crate::repository::recipe::RecipeRepository;
use crema_core::validation::{validate_line_quantity, validate_price_cents};
use crema_core::{
    convert, CoreError, EngineConfig, InventoryItemId, LedgerEntry, MenuItemId, MovementKind,
    Order, OrderLine, PaymentMethod, StockPolicy, Unit, UnitMismatchPolicy, ValidationError,
    MAX_ORDER_LINES, SYSTEM_ACTOR,
};

// =============================================================================
// Request / Result Types
// =============================================================================

/// A sale to record, as handed over by order intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Order total in cents (computed by the cart, snapshot here).
    pub total_cents: i64,
    /// How the order was paid.
    pub payment_method: PaymentMethod,
    /// Sold menu items. Must not be empty.
    pub lines: Vec<OrderLineRequest>,
}

/// One sold menu item within an order request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub menu_item_id: MenuItemId,
    /// Units sold. Must be positive.
    pub quantity: i64,
    /// Unit price in cents at sale time.
    pub unit_price_cents: i64,
}

/// One stock deduction performed while consuming an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub inventory_item_id: InventoryItemId,
    pub item_name: String,
    /// Deduction the recipes asked for, in the item's stock unit.
    pub requested: f64,
    /// Deduction actually applied (smaller than `requested` when clamped).
    pub deducted: f64,
    /// The item's stock unit.
    pub unit: Unit,
    /// True when the floor reduced the deduction.
    pub clamped: bool,
    /// On-hand quantity after the deduction.
    pub new_quantity: f64,
}

/// A recipe line skipped under [`UnitMismatchPolicy::SkipLine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedLine {
    pub menu_item_id: MenuItemId,
    pub inventory_item_id: InventoryItemId,
    pub reason: String,
}

/// Outcome of a successfully committed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionResult {
    pub order_id: String,
    /// One movement per consumed recipe line, in processing order.
    pub movements: Vec<StockMovement>,
    /// Recipe lines skipped under the lenient unit-mismatch policy.
    pub skipped: Vec<SkippedLine>,
}

// =============================================================================
// Processor
// =============================================================================

/// Orchestrates order consumption.
///
/// Configuration is passed in explicitly at construction; the processor
/// never consults ambient state.
///
/// ## Usage
/// ```rust,ignore
/// let processor = db.consumption(EngineConfig::default());
/// let result = processor.place_order(request).await?;
/// info!(order = %result.order_id, movements = result.movements.len(), "Order placed");
/// ```
#[derive(Debug, Clone)]
pub struct ConsumptionProcessor {
    pool: SqlitePool,
    config: EngineConfig,
}

impl ConsumptionProcessor {
    /// Creates a new processor over the given pool and configuration.
    pub fn new(pool: SqlitePool, config: EngineConfig) -> Self {
        ConsumptionProcessor { pool, config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Places an order: records the sale and consumes ingredient stock.
    ///
    /// All side effects - the order record, every deduction, every ledger
    /// entry - commit together or not at all. Insufficient stock is NOT an
    /// error under the default policy: the deduction clamps to available
    /// stock and the ledger records the applied amount.
    ///
    /// ## Errors
    /// * `DbError::Domain(Validation...)` - malformed request, nothing written
    /// * `DbError::Domain(UnitMismatch...)` - under `FailOrder`, full rollback
    /// * `DbError::Domain(InsufficientStock...)` - under `RejectOrder`, full rollback
    /// * any storage error - full rollback
    pub async fn place_order(&self, request: OrderRequest) -> DbResult<ConsumptionResult> {
        Self::validate_request(&request)?;

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            total_cents: request.total_cents,
            payment_method: request.payment_method,
            created_at: now,
        };

        debug!(order = %order.id, lines = request.lines.len(), "Consuming order");

        // Everything below runs on one transaction; an early `?` drops it
        // and rolls back.
        let mut tx = self.pool.begin().await?;

        OrderRepository::insert_order(&mut tx, &order).await?;

        let mut movements: Vec<StockMovement> = Vec::new();
        let mut skipped: Vec<SkippedLine> = Vec::new();

        for line_request in &request.lines {
            let line = OrderLine {
                id: Uuid::new_v4().to_string(),
                order_id: order.id.clone(),
                menu_item_id: line_request.menu_item_id.clone(),
                quantity: line_request.quantity,
                unit_price_cents: line_request.unit_price_cents,
                created_at: now,
            };
            OrderRepository::insert_line(&mut tx, &line).await?;

            // BOM lookup. No recipe = no stock movement; a menu item that
            // doesn't track ingredients is normal, not an error.
            let recipe = RecipeRepository::lines_for_on(&mut tx, &line_request.menu_item_id).await?;

            for recipe_line in &recipe {
                let item = InventoryRepository::get_on(&mut tx, &recipe_line.inventory_item_id)
                    .await?
                    .ok_or_else(|| {
                        DbError::not_found("InventoryItem", recipe_line.inventory_item_id.as_str())
                    })?;

                let required_in_recipe_unit =
                    recipe_line.quantity_required * line_request.quantity as f64;

                // Normalize to the item's stock unit. A cross-family recipe
                // unit is a data entry defect handled per policy.
                let required = match convert(required_in_recipe_unit, recipe_line.unit, item.unit) {
                    Ok(quantity) => quantity,
                    Err(err @ CoreError::UnitMismatch { .. }) => {
                        match self.config.unit_mismatch_policy {
                            UnitMismatchPolicy::FailOrder => return Err(err.into()),
                            UnitMismatchPolicy::SkipLine => {
                                warn!(
                                    menu_item = %line_request.menu_item_id,
                                    item = %item.name,
                                    recipe_unit = %recipe_line.unit,
                                    stock_unit = %item.unit,
                                    "Skipping recipe line: unit mismatch"
                                );
                                skipped.push(SkippedLine {
                                    menu_item_id: line_request.menu_item_id.clone(),
                                    inventory_item_id: recipe_line.inventory_item_id.clone(),
                                    reason: err.to_string(),
                                });
                                continue;
                            }
                        }
                    }
                    Err(err) => return Err(err.into()),
                };

                if self.config.stock_policy == StockPolicy::RejectOrder && item.quantity < required
                {
                    return Err(CoreError::InsufficientStock {
                        name: item.name,
                        available: item.quantity,
                        requested: required,
                    }
                    .into());
                }

                let change = InventoryRepository::adjust_quantity(
                    &mut tx,
                    &recipe_line.inventory_item_id,
                    -required,
                )
                .await?;

                // One ledger entry per consumed recipe line, recording the
                // APPLIED delta (possibly clamped), in the stock unit.
                let entry = LedgerEntry::new(
                    recipe_line.inventory_item_id.clone(),
                    MovementKind::Sale,
                    change.applied(),
                    item.unit,
                    SYSTEM_ACTOR,
                )
                .with_order(order.id.clone());
                LedgerRepository::append(&mut tx, &entry).await?;

                let deducted = -change.applied();
                if deducted < required {
                    warn!(
                        item = %item.name,
                        requested = %required,
                        deducted = %deducted,
                        "Deduction clamped to available stock"
                    );
                }

                movements.push(StockMovement {
                    inventory_item_id: recipe_line.inventory_item_id.clone(),
                    item_name: item.name,
                    requested: required,
                    deducted,
                    unit: item.unit,
                    clamped: deducted < required,
                    new_quantity: change.after,
                });
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order = %order.id,
            total = %order.total_cents,
            movements = movements.len(),
            skipped = skipped.len(),
            "Order consumed"
        );

        Ok(ConsumptionResult {
            order_id: order.id,
            movements,
            skipped,
        })
    }

    /// Rejects malformed requests before anything touches the database.
    fn validate_request(request: &OrderRequest) -> DbResult<()> {
        validate_price_cents(request.total_cents).map_err(CoreError::from)?;

        if request.lines.is_empty() {
            return Err(CoreError::Validation(ValidationError::Required {
                field: "lines".to_string(),
            })
            .into());
        }

        if request.lines.len() > MAX_ORDER_LINES {
            return Err(CoreError::OrderTooLarge {
                max: MAX_ORDER_LINES,
            }
            .into());
        }

        for line in &request.lines {
            validate_line_quantity(line.quantity).map_err(CoreError::from)?;
            validate_price_cents(line.unit_price_cents).map_err(CoreError::from)?;
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
