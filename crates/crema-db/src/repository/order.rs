//! # Order Repository
//!
//! Database operations for immutable order records.
//!
//! ## Immutability
//! Orders and their lines are written exactly once, by the consumption
//! processor, inside the consumption transaction. There is no update path
//! and no delete path; refunds/voids are out of scope for the engine.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crema_core::{Order, OrderLine};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, total_cents, payment_method, created_at FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets all lines for an order, in insertion order.
    pub async fn get_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            "SELECT id, order_id, menu_item_id, quantity, unit_price_cents, created_at \
             FROM order_lines \
             WHERE order_id = ?1 \
             ORDER BY created_at, id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists recent orders, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, total_cents, payment_method, created_at \
             FROM orders \
             ORDER BY created_at DESC, id DESC \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts orders (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transactional inserts (consumption processor only)
    // =========================================================================

    /// Inserts an order on the caller's connection.
    pub async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, total = %order.total_cents, "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (id, total_cents, payment_method, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&order.id)
        .bind(order.total_cents)
        .bind(order.payment_method)
        .bind(order.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Inserts an order line on the caller's connection.
    pub async fn insert_line(conn: &mut SqliteConnection, line: &OrderLine) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO order_lines (
                id, order_id, menu_item_id, quantity, unit_price_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&line.id)
        .bind(&line.order_id)
        .bind(line.menu_item_id.as_str())
        .bind(line.quantity)
        .bind(line.unit_price_cents)
        .bind(line.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use crema_core::{MenuItemId, PaymentMethod};
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn order(total_cents: i64) -> Order {
        Order {
            id: Uuid::new_v4().to_string(),
            total_cents,
            payment_method: PaymentMethod::Cash,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_order_with_lines() {
        let db = test_db().await;
        let repo = db.orders();

        let o = order(1350);
        let line = OrderLine {
            id: Uuid::new_v4().to_string(),
            order_id: o.id.clone(),
            menu_item_id: MenuItemId::new("latte"),
            quantity: 3,
            unit_price_cents: 450,
            created_at: o.created_at,
        };

        let mut tx = db.pool().begin().await.unwrap();
        OrderRepository::insert_order(&mut tx, &o).await.unwrap();
        OrderRepository::insert_line(&mut tx, &line).await.unwrap();
        tx.commit().await.unwrap();

        let fetched = repo.get_by_id(&o.id).await.unwrap().unwrap();
        assert_eq!(fetched.total_cents, 1350);
        assert_eq!(fetched.payment_method, PaymentMethod::Cash);

        let lines = repo.get_lines(&o.id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_total_cents(), 1350);
    }

    #[tokio::test]
    async fn test_line_requires_existing_order() {
        let db = test_db().await;

        let line = OrderLine {
            id: Uuid::new_v4().to_string(),
            order_id: "missing".to_string(),
            menu_item_id: MenuItemId::new("latte"),
            quantity: 1,
            unit_price_cents: 450,
            created_at: Utc::now(),
        };

        let mut conn = db.pool().acquire().await.unwrap();
        let err = OrderRepository::insert_line(&mut conn, &line)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::DbError::ForeignKeyViolation { .. }
        ));
    }

    #[tokio::test]
    async fn test_list_recent_orders() {
        let db = test_db().await;

        let mut tx = db.pool().begin().await.unwrap();
        for cents in [100, 200, 300] {
            OrderRepository::insert_order(&mut tx, &order(cents))
                .await
                .unwrap();
        }
        tx.commit().await.unwrap();

        let recent = db.orders().list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(db.orders().count().await.unwrap(), 3);
    }
}
