//! # Inventory Repository
//!
//! Database operations for the raw-material catalog.
//!
//! ## Key Operations
//! - CRUD with field validation before any mutation
//! - Atomic clamped quantity adjustment (the floor lives in the UPDATE)
//! - Administrative stock operations, each paired with exactly one ledger
//!   entry in the same transaction
//!
//! ## Clamped Deduction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Atomic Decrement-With-Floor                             │
//! │                                                                         │
//! │  ❌ WRONG: read-then-write in application code                          │
//! │     let q = SELECT quantity ...;                                        │
//! │     UPDATE ... SET quantity = {q - delta}   ← lost update under races   │
//! │                                                                         │
//! │  ✅ CORRECT: the floor is part of the statement                         │
//! │     UPDATE inventory_items                                              │
//! │        SET quantity = MAX(0.0, quantity + ?delta)                       │
//! │      WHERE id = ? RETURNING quantity                                    │
//! │                                                                         │
//! │  Stock: 150 g   requested: -200 g                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  quantity = MAX(0, 150 - 200) = 0                                       │
//! │  applied  = 0 - 150 = -150    ← what the ledger must record             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::ledger::LedgerRepository;
use crema_core::validation::{validate_item_name, validate_stock_quantity, validate_threshold};
use crema_core::{CoreError, InventoryItem, InventoryItemId, LedgerEntry, MovementKind};

/// Outcome of a quantity adjustment.
///
/// `applied()` may be smaller in magnitude than the requested delta when the
/// floor clamped a deduction; callers record the applied amount, never the
/// requested one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantityChange {
    /// Quantity before the adjustment.
    pub before: f64,
    /// Quantity after the adjustment (never negative).
    pub after: f64,
}

impl QuantityChange {
    /// The signed delta actually applied.
    #[inline]
    pub fn applied(&self) -> f64 {
        self.after - self.before
    }

    /// True when the floor reduced the requested deduction.
    #[inline]
    pub fn was_clamped(&self, requested_delta: f64) -> bool {
        (self.applied() - requested_delta).abs() > f64::EPSILON
    }
}

/// Repository for inventory catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = InventoryRepository::new(pool);
///
/// let item = repo.get_by_name("Flour").await?;
/// repo.adjust_stock(&item.id, 500.0, "weekly count correction", "maria").await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

const SELECT_COLUMNS: &str = "id, name, unit, quantity, low_stock_threshold, \
     expires_on, category, cost_per_unit_cents, created_at, updated_at";

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Gets an item by its ID.
    pub async fn get(&self, id: &InventoryItemId) -> DbResult<Option<InventoryItem>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM inventory_items WHERE id = ?1");
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Gets an item by its unique name (the human key).
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<InventoryItem>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM inventory_items WHERE name = ?1");
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Lists the whole catalog, sorted by name.
    ///
    /// ## Usage
    /// Admin screens and alert evaluation snapshots. Lock-free read; may
    /// observe a state slightly older than a concurrently committing order.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM inventory_items ORDER BY name");
        let items = sqlx::query_as::<_, InventoryItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Inserts a new item.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::Domain)` - Field validation failed, nothing written
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, item: &InventoryItem) -> DbResult<()> {
        validate_item_name(&item.name).map_err(CoreError::from)?;
        validate_stock_quantity(item.quantity).map_err(CoreError::from)?;
        validate_threshold(item.low_stock_threshold).map_err(CoreError::from)?;

        debug!(id = %item.id, name = %item.name, "Inserting inventory item");

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, name, unit, quantity, low_stock_threshold,
                expires_on, category, cost_per_unit_cents,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(item.id.as_str())
        .bind(&item.name)
        .bind(item.unit)
        .bind(item.quantity)
        .bind(item.low_stock_threshold)
        .bind(item.expires_on)
        .bind(&item.category)
        .bind(item.cost_per_unit_cents)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing item's fields.
    ///
    /// Quantity is NOT updated here - quantity changes go through
    /// [`Self::adjust_quantity`] so every change is clamped and ledgered.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn update(&self, item: &InventoryItem) -> DbResult<()> {
        validate_item_name(&item.name).map_err(CoreError::from)?;
        validate_threshold(item.low_stock_threshold).map_err(CoreError::from)?;

        debug!(id = %item.id, "Updating inventory item");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventory_items SET
                name = ?2,
                unit = ?3,
                low_stock_threshold = ?4,
                expires_on = ?5,
                category = ?6,
                cost_per_unit_cents = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(item.id.as_str())
        .bind(&item.name)
        .bind(item.unit)
        .bind(item.low_stock_threshold)
        .bind(item.expires_on)
        .bind(&item.category)
        .bind(item.cost_per_unit_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InventoryItem", item.id.as_str()));
        }

        Ok(())
    }

    /// Deletes an item.
    ///
    /// Recipe lines referencing the item are removed by the
    /// `ON DELETE CASCADE` constraint - an item is never left referenced by
    /// a dangling mapping. Ledger history is retained (no FK there).
    pub async fn delete(&self, id: &InventoryItemId) -> DbResult<()> {
        debug!(id = %id, "Deleting inventory item");

        let result = sqlx::query("DELETE FROM inventory_items WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InventoryItem", id.as_str()));
        }

        Ok(())
    }

    /// Counts catalog items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transactional quantity operations
    // =========================================================================

    /// Fetches an item on a specific connection (for use inside a
    /// transaction, where reads must see the transaction's own writes).
    pub async fn get_on(
        conn: &mut SqliteConnection,
        id: &InventoryItemId,
    ) -> DbResult<Option<InventoryItem>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM inventory_items WHERE id = ?1");
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(id.as_str())
            .fetch_optional(&mut *conn)
            .await?;

        Ok(item)
    }

    /// Applies a signed quantity delta with a floor at zero.
    ///
    /// The floor is part of the UPDATE statement, so the storage layer -
    /// not application code - guarantees the non-negative invariant. The
    /// transaction owning `conn` holds SQLite's write lock for its whole
    /// lifetime, so the read/update pair cannot interleave with another
    /// writer; two concurrent orders draining the same ingredient serialize
    /// here.
    ///
    /// Every successful call must be paired with exactly one ledger entry by
    /// its caller (the consumption processor or an administrative
    /// operation); the repository itself never writes the ledger, keeping
    /// causal references with the caller that knows them.
    ///
    /// ## Returns
    /// The before/after quantities; `applied()` is what the ledger records.
    pub async fn adjust_quantity(
        conn: &mut SqliteConnection,
        id: &InventoryItemId,
        delta: f64,
    ) -> DbResult<QuantityChange> {
        let before: f64 = sqlx::query_scalar("SELECT quantity FROM inventory_items WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| DbError::not_found("InventoryItem", id.as_str()))?;

        let now = Utc::now();

        let after: f64 = sqlx::query_scalar(
            r#"
            UPDATE inventory_items
            SET quantity = MAX(0.0, quantity + ?2),
                updated_at = ?3
            WHERE id = ?1
            RETURNING quantity
            "#,
        )
        .bind(id.as_str())
        .bind(delta)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        debug!(id = %id, delta = %delta, before = %before, after = %after, "Adjusted quantity");

        Ok(QuantityChange { before, after })
    }

    // =========================================================================
    // Administrative stock operations (each = one adjustment + one ledger
    // entry, committed together)
    // =========================================================================

    /// Records received goods (delivery, restock). Kind: `add`.
    pub async fn receive_stock(
        &self,
        id: &InventoryItemId,
        quantity: f64,
        note: &str,
        actor: &str,
    ) -> DbResult<QuantityChange> {
        if !(quantity.is_finite() && quantity > 0.0) {
            return Err(CoreError::Validation(
                crema_core::ValidationError::MustBePositive {
                    field: "quantity".to_string(),
                },
            )
            .into());
        }

        self.ledgered_adjustment(id, quantity, MovementKind::Add, note, actor)
            .await
    }

    /// Records goods taken out for a reason other than a sale (breakage,
    /// staff meals, transfer). Kind: `remove`. Clamps at zero like every
    /// deduction.
    pub async fn remove_stock(
        &self,
        id: &InventoryItemId,
        quantity: f64,
        note: &str,
        actor: &str,
    ) -> DbResult<QuantityChange> {
        if !(quantity.is_finite() && quantity > 0.0) {
            return Err(CoreError::Validation(
                crema_core::ValidationError::MustBePositive {
                    field: "quantity".to_string(),
                },
            )
            .into());
        }

        self.ledgered_adjustment(id, -quantity, MovementKind::Remove, note, actor)
            .await
    }

    /// Manual administrative correction after a physical count. Kind:
    /// `adjust`. The delta may have either sign.
    pub async fn adjust_stock(
        &self,
        id: &InventoryItemId,
        delta: f64,
        note: &str,
        actor: &str,
    ) -> DbResult<QuantityChange> {
        if !delta.is_finite() {
            return Err(CoreError::Validation(
                crema_core::ValidationError::InvalidFormat {
                    field: "delta".to_string(),
                    reason: "must be a finite number".to_string(),
                },
            )
            .into());
        }

        self.ledgered_adjustment(id, delta, MovementKind::Adjust, note, actor)
            .await
    }

    /// Writes off an expired item's remaining quantity. Kind: `expired`.
    ///
    /// Zeroes the on-hand quantity; the ledger entry records how much was
    /// discarded.
    pub async fn write_off_expired(
        &self,
        id: &InventoryItemId,
        note: &str,
        actor: &str,
    ) -> DbResult<QuantityChange> {
        let mut tx = self.pool.begin().await?;

        let item = Self::get_on(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("InventoryItem", id.as_str()))?;

        let change = Self::adjust_quantity(&mut tx, id, -item.quantity).await?;

        if change.applied() != 0.0 {
            let entry = LedgerEntry::new(
                id.clone(),
                MovementKind::Expired,
                change.applied(),
                item.unit,
                actor,
            )
            .with_note(note);
            LedgerRepository::append(&mut tx, &entry).await?;
        }

        tx.commit().await?;

        let discarded = -change.applied();
        debug!(id = %id, discarded = %discarded, "Expired stock written off");

        Ok(change)
    }

    /// Shared implementation: one clamped adjustment + one ledger entry,
    /// committed together or not at all.
    async fn ledgered_adjustment(
        &self,
        id: &InventoryItemId,
        delta: f64,
        kind: MovementKind,
        note: &str,
        actor: &str,
    ) -> DbResult<QuantityChange> {
        let mut tx = self.pool.begin().await?;

        let item = Self::get_on(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("InventoryItem", id.as_str()))?;

        let change = Self::adjust_quantity(&mut tx, id, delta).await?;

        let mut entry = LedgerEntry::new(id.clone(), kind, change.applied(), item.unit, actor);
        if !note.is_empty() {
            entry = entry.with_note(note);
        }
        LedgerRepository::append(&mut tx, &entry).await?;

        tx.commit().await?;

        Ok(change)
    }
}

/// Helper to generate a new inventory item ID.
///
/// ## Usage
/// ```rust,ignore
/// let id = generate_item_id();
/// let item = InventoryItem { id, ... };
/// ```
pub fn generate_item_id() -> InventoryItemId {
    InventoryItemId::generate()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crema_core::Unit;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn item(name: &str, unit: Unit, quantity: f64) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: InventoryItemId::generate(),
            name: name.to_string(),
            unit,
            quantity,
            low_stock_threshold: 0.0,
            expires_on: None,
            category: None,
            cost_per_unit_cents: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.inventory();

        let flour = item("Flour", Unit::Gram, 1500.0);
        repo.insert(&flour).await.unwrap();

        let fetched = repo.get(&flour.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Flour");
        assert_eq!(fetched.unit, Unit::Gram);
        assert_eq!(fetched.quantity, 1500.0);

        let by_name = repo.get_by_name("Flour").await.unwrap().unwrap();
        assert_eq!(by_name.id, flour.id);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = test_db().await;
        let repo = db.inventory();

        repo.insert(&item("Milk", Unit::Milliliter, 5000.0))
            .await
            .unwrap();
        let err = repo
            .insert(&item("Milk", Unit::Liter, 3.0))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_validation_rejects_before_mutation() {
        let db = test_db().await;
        let repo = db.inventory();

        let mut bad = item("", Unit::Gram, 10.0);
        assert!(matches!(
            repo.insert(&bad).await.unwrap_err(),
            DbError::Domain(_)
        ));

        bad.name = "Sugar".to_string();
        bad.quantity = -5.0;
        assert!(matches!(
            repo.insert(&bad).await.unwrap_err(),
            DbError::Domain(_)
        ));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = test_db().await;
        let repo = db.inventory();

        repo.insert(&item("Sugar", Unit::Gram, 1.0)).await.unwrap();
        repo.insert(&item("Beans", Unit::Gram, 1.0)).await.unwrap();
        repo.insert(&item("Milk", Unit::Liter, 1.0)).await.unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Beans", "Milk", "Sugar"]);
    }

    #[tokio::test]
    async fn test_adjust_quantity_clamps_at_zero() {
        let db = test_db().await;
        let repo = db.inventory();

        let beans = item("Beans", Unit::Gram, 5.0);
        repo.insert(&beans).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let change = InventoryRepository::adjust_quantity(&mut tx, &beans.id, -8.0)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(change.before, 5.0);
        assert_eq!(change.after, 0.0);
        assert_eq!(change.applied(), -5.0);
        assert!(change.was_clamped(-8.0));

        let fetched = repo.get(&beans.id).await.unwrap().unwrap();
        assert_eq!(fetched.quantity, 0.0);
    }

    #[tokio::test]
    async fn test_adjust_stock_writes_ledger() {
        let db = test_db().await;
        let repo = db.inventory();

        let milk = item("Milk", Unit::Milliliter, 1000.0);
        repo.insert(&milk).await.unwrap();

        let change = repo
            .adjust_stock(&milk.id, -250.0, "spillage", "maria")
            .await
            .unwrap();
        assert_eq!(change.applied(), -250.0);

        let history = db.ledger().history(&milk.id, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, MovementKind::Adjust);
        assert_eq!(history[0].quantity, -250.0);
        assert_eq!(history[0].note.as_deref(), Some("spillage"));
        assert_eq!(history[0].actor, "maria");
    }

    #[tokio::test]
    async fn test_receive_and_remove_stock() {
        let db = test_db().await;
        let repo = db.inventory();

        let beans = item("Beans", Unit::Gram, 100.0);
        repo.insert(&beans).await.unwrap();

        repo.receive_stock(&beans.id, 900.0, "weekly delivery", "jo")
            .await
            .unwrap();
        let change = repo
            .remove_stock(&beans.id, 50.0, "staff espresso", "jo")
            .await
            .unwrap();

        assert_eq!(change.after, 950.0);

        let history = db.ledger().history(&beans.id, 10).await.unwrap();
        assert_eq!(history.len(), 2);
        // Newest first
        assert_eq!(history[0].kind, MovementKind::Remove);
        assert_eq!(history[1].kind, MovementKind::Add);
        assert_eq!(history[1].quantity, 900.0);
    }

    #[tokio::test]
    async fn test_write_off_expired_zeroes_quantity() {
        let db = test_db().await;
        let repo = db.inventory();

        let cream = item("Cream", Unit::Milliliter, 400.0);
        repo.insert(&cream).await.unwrap();

        let change = repo
            .write_off_expired(&cream.id, "past date", "jo")
            .await
            .unwrap();
        assert_eq!(change.after, 0.0);

        let history = db.ledger().history(&cream.id, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, MovementKind::Expired);
        assert_eq!(history[0].quantity, -400.0);
    }

    #[tokio::test]
    async fn test_delete_missing_item_is_not_found() {
        let db = test_db().await;
        let repo = db.inventory();

        let err = repo.delete(&InventoryItemId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
