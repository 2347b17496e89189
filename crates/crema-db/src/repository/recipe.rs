//! # Recipe Repository
//!
//! Menu item → ingredient mappings (the Bill of Materials).
//!
//! ## Editing Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Recipe Editing Model                                 │
//! │                                                                         │
//! │  Product screen saves a recipe                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  replace_all(menu_item, [ingredients])   ← the supported edit           │
//! │  ├── BEGIN                                                              │
//! │  ├── DELETE old lines for the menu item                                 │
//! │  ├── INSERT every new line                                              │
//! │  └── COMMIT (idempotent: same input twice = same final state)           │
//! │                                                                         │
//! │  add_line() exists for incremental edits and FAILS on a duplicate       │
//! │  (menu item, ingredient) pair - replace semantics must be explicit,     │
//! │  never accidental.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crema_core::validation::validate_recipe_quantity;
use crema_core::{CoreError, InventoryItemId, MenuItemId, RecipeLine, RecipeLineInput, Unit};

/// Repository for recipe (BOM) operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = RecipeRepository::new(pool);
///
/// // "One latte consumes 18 g of beans and 200 ml of milk"
/// repo.replace_all(&latte_id, &[
///     RecipeLineInput { inventory_item_id: beans_id, quantity_required: 18.0, unit: Unit::Gram },
///     RecipeLineInput { inventory_item_id: milk_id, quantity_required: 200.0, unit: Unit::Milliliter },
/// ]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RecipeRepository {
    pool: SqlitePool,
}

const SELECT_COLUMNS: &str =
    "id, menu_item_id, inventory_item_id, quantity_required, unit, created_at";

impl RecipeRepository {
    /// Creates a new RecipeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RecipeRepository { pool }
    }

    /// Returns a menu item's recipe lines in stable (ingredient id) order.
    ///
    /// An empty result is normal: not every menu item tracks ingredients.
    pub async fn lines_for(&self, menu_item_id: &MenuItemId) -> DbResult<Vec<RecipeLine>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM recipe_lines \
             WHERE menu_item_id = ?1 \
             ORDER BY inventory_item_id"
        );
        let lines = sqlx::query_as::<_, RecipeLine>(&sql)
            .bind(menu_item_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// Same as [`Self::lines_for`], on a specific connection (for use inside
    /// the consumption transaction).
    pub async fn lines_for_on(
        conn: &mut SqliteConnection,
        menu_item_id: &MenuItemId,
    ) -> DbResult<Vec<RecipeLine>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM recipe_lines \
             WHERE menu_item_id = ?1 \
             ORDER BY inventory_item_id"
        );
        let lines = sqlx::query_as::<_, RecipeLine>(&sql)
            .bind(menu_item_id.as_str())
            .fetch_all(&mut *conn)
            .await?;

        Ok(lines)
    }

    /// Adds a single recipe line.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain)` - non-positive quantity, nothing written
    /// * `Err(DbError::UniqueViolation)` - the (menu item, ingredient) pair
    ///   is already mapped; use [`Self::replace_all`] for replace semantics
    /// * `Err(DbError::ForeignKeyViolation)` - unknown inventory item
    pub async fn add_line(
        &self,
        menu_item_id: &MenuItemId,
        inventory_item_id: &InventoryItemId,
        quantity_required: f64,
        unit: Unit,
    ) -> DbResult<RecipeLine> {
        validate_recipe_quantity(quantity_required).map_err(CoreError::from)?;

        let line = RecipeLine {
            id: Uuid::new_v4().to_string(),
            menu_item_id: menu_item_id.clone(),
            inventory_item_id: inventory_item_id.clone(),
            quantity_required,
            unit,
            created_at: Utc::now(),
        };

        debug!(
            menu_item = %menu_item_id,
            ingredient = %inventory_item_id,
            quantity = %quantity_required,
            "Adding recipe line"
        );

        let mut conn = self.pool.acquire().await?;
        Self::insert_on(&mut conn, &line).await?;

        Ok(line)
    }

    /// Replaces a menu item's entire recipe in one transaction.
    ///
    /// The supported "edit the whole recipe" operation: delete-then-insert,
    /// so calling twice with the same list leaves exactly one line per
    /// ingredient. All quantities are validated before anything is deleted.
    pub async fn replace_all(
        &self,
        menu_item_id: &MenuItemId,
        lines: &[RecipeLineInput],
    ) -> DbResult<Vec<RecipeLine>> {
        for input in lines {
            validate_recipe_quantity(input.quantity_required).map_err(CoreError::from)?;
        }

        debug!(menu_item = %menu_item_id, lines = lines.len(), "Replacing recipe");

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM recipe_lines WHERE menu_item_id = ?1")
            .bind(menu_item_id.as_str())
            .execute(&mut *tx)
            .await?;

        let mut inserted = Vec::with_capacity(lines.len());
        for input in lines {
            let line = RecipeLine {
                id: Uuid::new_v4().to_string(),
                menu_item_id: menu_item_id.clone(),
                inventory_item_id: input.inventory_item_id.clone(),
                quantity_required: input.quantity_required,
                unit: input.unit,
                created_at: now,
            };
            Self::insert_on(&mut tx, &line).await?;
            inserted.push(line);
        }

        tx.commit().await?;

        Ok(inserted)
    }

    /// Removes a single recipe line by id.
    pub async fn remove(&self, line_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM recipe_lines WHERE id = ?1")
            .bind(line_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("RecipeLine", line_id));
        }

        Ok(())
    }

    /// Removes every recipe line of a menu item (menu item deleted upstream).
    pub async fn remove_for_menu_item(&self, menu_item_id: &MenuItemId) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM recipe_lines WHERE menu_item_id = ?1")
            .bind(menu_item_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Counts all recipe lines (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipe_lines")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn insert_on(conn: &mut SqliteConnection, line: &RecipeLine) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO recipe_lines (
                id, menu_item_id, inventory_item_id,
                quantity_required, unit, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&line.id)
        .bind(line.menu_item_id.as_str())
        .bind(line.inventory_item_id.as_str())
        .bind(line.quantity_required)
        .bind(line.unit)
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
    use crema_core::InventoryItem;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_item(db: &Database, name: &str, unit: Unit) -> InventoryItemId {
        let now = Utc::now();
        let item = InventoryItem {
            id: InventoryItemId::generate(),
            name: name.to_string(),
            unit,
            quantity: 1000.0,
            low_stock_threshold: 0.0,
            expires_on: None,
            category: None,
            cost_per_unit_cents: None,
            created_at: now,
            updated_at: now,
        };
        db.inventory().insert(&item).await.unwrap();
        item.id
    }

    #[tokio::test]
    async fn test_add_line_and_lines_for() {
        let db = test_db().await;
        let beans = seed_item(&db, "Beans", Unit::Gram).await;
        let latte = MenuItemId::new("latte");

        db.recipes()
            .add_line(&latte, &beans, 18.0, Unit::Gram)
            .await
            .unwrap();

        let lines = db.recipes().lines_for(&latte).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity_required, 18.0);
    }

    #[tokio::test]
    async fn test_duplicate_pair_rejected() {
        let db = test_db().await;
        let beans = seed_item(&db, "Beans", Unit::Gram).await;
        let latte = MenuItemId::new("latte");

        db.recipes()
            .add_line(&latte, &beans, 18.0, Unit::Gram)
            .await
            .unwrap();
        let err = db
            .recipes()
            .add_line(&latte, &beans, 20.0, Unit::Gram)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let db = test_db().await;
        let beans = seed_item(&db, "Beans", Unit::Gram).await;
        let latte = MenuItemId::new("latte");

        let err = db
            .recipes()
            .add_line(&latte, &beans, 0.0, Unit::Gram)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(_)));
        assert_eq!(db.recipes().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_ingredient_rejected() {
        let db = test_db().await;
        let latte = MenuItemId::new("latte");

        let err = db
            .recipes()
            .add_line(&latte, &InventoryItemId::new("ghost"), 1.0, Unit::Gram)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_replace_all_is_idempotent() {
        let db = test_db().await;
        let beans = seed_item(&db, "Beans", Unit::Gram).await;
        let milk = seed_item(&db, "Milk", Unit::Milliliter).await;
        let latte = MenuItemId::new("latte");

        let recipe = vec![
            RecipeLineInput {
                inventory_item_id: beans.clone(),
                quantity_required: 18.0,
                unit: Unit::Gram,
            },
            RecipeLineInput {
                inventory_item_id: milk.clone(),
                quantity_required: 200.0,
                unit: Unit::Milliliter,
            },
        ];

        db.recipes().replace_all(&latte, &recipe).await.unwrap();
        db.recipes().replace_all(&latte, &recipe).await.unwrap();

        // Exactly one line per ingredient, stable order across round trips
        let first = db.recipes().lines_for(&latte).await.unwrap();
        assert_eq!(first.len(), 2);

        let second = db.recipes().lines_for(&latte).await.unwrap();
        let ids_first: Vec<_> = first.iter().map(|l| l.inventory_item_id.clone()).collect();
        let ids_second: Vec<_> = second.iter().map(|l| l.inventory_item_id.clone()).collect();
        assert_eq!(ids_first, ids_second);
    }

    #[tokio::test]
    async fn test_replace_all_with_empty_list_clears_recipe() {
        let db = test_db().await;
        let beans = seed_item(&db, "Beans", Unit::Gram).await;
        let latte = MenuItemId::new("latte");

        db.recipes()
            .add_line(&latte, &beans, 18.0, Unit::Gram)
            .await
            .unwrap();
        db.recipes().replace_all(&latte, &[]).await.unwrap();

        assert!(db.recipes().lines_for(&latte).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_item_cascades_recipe_lines() {
        let db = test_db().await;
        let beans = seed_item(&db, "Beans", Unit::Gram).await;
        let latte = MenuItemId::new("latte");

        db.recipes()
            .add_line(&latte, &beans, 18.0, Unit::Gram)
            .await
            .unwrap();
        db.inventory().delete(&beans).await.unwrap();

        assert!(db.recipes().lines_for(&latte).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_single_line() {
        let db = test_db().await;
        let beans = seed_item(&db, "Beans", Unit::Gram).await;
        let latte = MenuItemId::new("latte");

        let line = db
            .recipes()
            .add_line(&latte, &beans, 18.0, Unit::Gram)
            .await
            .unwrap();
        db.recipes().remove(&line.id).await.unwrap();

        assert!(db.recipes().lines_for(&latte).await.unwrap().is_empty());
    }
}
