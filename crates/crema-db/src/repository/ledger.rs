//! # Stock Ledger Repository
//!
//! Append-only audit trail of stock quantity mutations.
//!
//! ## Append-Only Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stock Ledger                                      │
//! │                                                                         │
//! │  append() ──► INSERT                                                    │
//! │  history() ─► SELECT ... ORDER BY created_at DESC                       │
//! │                                                                         │
//! │  There is NO update and NO delete path. The ledger is the               │
//! │  reconciliation source of truth: summing `sale` deltas for an item      │
//! │  over a period equals the catalog's observed quantity decrease absent   │
//! │  manual adjustments.                                                    │
//! │                                                                         │
//! │  Appends that accompany a quantity change run on the SAME connection    │
//! │  (transaction) as the change - a failed append rolls the change back.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crema_core::{InventoryItemId, LedgerEntry};

/// Repository for stock ledger operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

const SELECT_COLUMNS: &str =
    "id, inventory_item_id, kind, quantity, unit, order_id, note, actor, created_at";

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Appends one entry on the caller's connection.
    ///
    /// Takes `&mut SqliteConnection` rather than the pool so the append
    /// shares the transaction of the quantity change it records - the two
    /// commit or roll back together.
    pub async fn append(conn: &mut SqliteConnection, entry: &LedgerEntry) -> DbResult<()> {
        debug!(
            item = %entry.inventory_item_id,
            kind = ?entry.kind,
            quantity = %entry.quantity,
            "Appending ledger entry"
        );

        sqlx::query(
            r#"
            INSERT INTO stock_ledger (
                id, inventory_item_id, kind, quantity, unit,
                order_id, note, actor, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.inventory_item_id.as_str())
        .bind(entry.kind)
        .bind(entry.quantity)
        .bind(entry.unit)
        .bind(&entry.order_id)
        .bind(&entry.note)
        .bind(&entry.actor)
        .bind(entry.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Returns an item's movement history, newest first.
    pub async fn history(&self, item_id: &InventoryItemId, limit: u32) -> DbResult<Vec<LedgerEntry>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM stock_ledger \
             WHERE inventory_item_id = ?1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT ?2"
        );
        let entries = sqlx::query_as::<_, LedgerEntry>(&sql)
            .bind(item_id.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Returns every entry caused by one order.
    pub async fn entries_for_order(&self, order_id: &str) -> DbResult<Vec<LedgerEntry>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM stock_ledger \
             WHERE order_id = ?1 \
             ORDER BY created_at, id"
        );
        let entries = sqlx::query_as::<_, LedgerEntry>(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Sums the signed `sale` deltas for an item (in its stock unit).
    ///
    /// ## Usage
    /// Reconciliation: for an item with no manual adjustments,
    /// `initial_quantity + sales_total == current_quantity`.
    pub async fn sales_total(&self, item_id: &InventoryItemId) -> DbResult<f64> {
        let total: Option<f64> = sqlx::query_scalar(
            "SELECT SUM(quantity) FROM stock_ledger \
             WHERE inventory_item_id = ?1 AND kind = 'sale'",
        )
        .bind(item_id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0.0))
    }

    /// Counts all ledger entries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_ledger")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crema_core::{MovementKind, Unit};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn entry(item_id: &InventoryItemId, kind: MovementKind, quantity: f64) -> LedgerEntry {
        LedgerEntry::new(item_id.clone(), kind, quantity, Unit::Gram, "test")
    }

    #[tokio::test]
    async fn test_append_and_history_newest_first() {
        let db = test_db().await;
        let ledger = db.ledger();
        let item_id = InventoryItemId::generate();

        let mut conn = db.pool().acquire().await.unwrap();
        LedgerRepository::append(&mut conn, &entry(&item_id, MovementKind::Add, 500.0))
            .await
            .unwrap();
        LedgerRepository::append(&mut conn, &entry(&item_id, MovementKind::Sale, -120.0))
            .await
            .unwrap();
        drop(conn);

        let history = ledger.history(&item_id, 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, MovementKind::Sale);
        assert_eq!(history[1].kind, MovementKind::Add);
    }

    #[tokio::test]
    async fn test_history_respects_limit() {
        let db = test_db().await;
        let ledger = db.ledger();
        let item_id = InventoryItemId::generate();

        let mut conn = db.pool().acquire().await.unwrap();
        for i in 0..5 {
            LedgerRepository::append(
                &mut conn,
                &entry(&item_id, MovementKind::Adjust, f64::from(i)),
            )
            .await
            .unwrap();
        }
        drop(conn);

        let history = ledger.history(&item_id, 3).await.unwrap();
        assert_eq!(history.len(), 3);
    }

    #[tokio::test]
    async fn test_sales_total_sums_only_sales() {
        let db = test_db().await;
        let ledger = db.ledger();
        let item_id = InventoryItemId::generate();

        let mut conn = db.pool().acquire().await.unwrap();
        LedgerRepository::append(&mut conn, &entry(&item_id, MovementKind::Add, 1000.0))
            .await
            .unwrap();
        LedgerRepository::append(&mut conn, &entry(&item_id, MovementKind::Sale, -120.0))
            .await
            .unwrap();
        LedgerRepository::append(&mut conn, &entry(&item_id, MovementKind::Sale, -80.0))
            .await
            .unwrap();
        drop(conn);

        let total = ledger.sales_total(&item_id).await.unwrap();
        assert_eq!(total, -200.0);
    }

    #[tokio::test]
    async fn test_sales_total_empty_is_zero() {
        let db = test_db().await;
        let total = db
            .ledger()
            .sales_total(&InventoryItemId::new("nothing"))
            .await
            .unwrap();
        assert_eq!(total, 0.0);
    }
}
