//! # Seed Data Generator
//!
//! Populates the database with café inventory and recipes for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p crema-db --bin seed
//!
//! # Specify database path
//! cargo run -p crema-db --bin seed -- --db ./data/crema.db
//!
//! # Dump the resulting alert report as JSON
//! cargo run -p crema-db --bin seed -- --json
//! ```
//!
//! ## Generated Data
//! - Raw materials across categories (coffee, dairy, bakery, packaging)
//!   with realistic stock units, thresholds, and expiry dates
//! - Recipes for a small café menu (espresso, latte, croissant, ...)
//! - One demo order so the ledger has a sale movement to look at

use chrono::{Days, Utc};
use std::env;

use crema_core::{
    EngineConfig, InventoryItem, InventoryItemId, MenuItemId, PaymentMethod, RecipeLineInput, Unit,
};
use crema_db::{Database, DbConfig, OrderLineRequest, OrderRequest};

/// (name, unit, quantity, threshold, category, expires in days, cost per unit in cents)
const ITEMS: &[(&str, Unit, f64, f64, &str, Option<u64>, i64)] = &[
    ("Espresso Beans", Unit::Gram, 4000.0, 1000.0, "coffee", None, 3),
    ("Decaf Beans", Unit::Gram, 1500.0, 500.0, "coffee", None, 3),
    ("Whole Milk", Unit::Milliliter, 10000.0, 3000.0, "dairy", Some(5), 1),
    ("Oat Milk", Unit::Liter, 6.0, 2.0, "dairy", Some(20), 210),
    ("Heavy Cream", Unit::Milliliter, 2000.0, 500.0, "dairy", Some(4), 1),
    ("Flour", Unit::Kilogram, 25.0, 5.0, "bakery", None, 120),
    ("Butter", Unit::Gram, 5000.0, 1000.0, "bakery", Some(30), 2),
    ("Sugar", Unit::Gram, 8000.0, 2000.0, "bakery", None, 1),
    ("Chocolate Syrup", Unit::Milliliter, 1500.0, 400.0, "syrups", Some(90), 2),
    ("Vanilla Syrup", Unit::Milliliter, 1200.0, 400.0, "syrups", Some(90), 2),
    ("Paper Cup 12oz", Unit::Piece, 800.0, 200.0, "packaging", None, 15),
    ("Cup Lid", Unit::Piece, 750.0, 200.0, "packaging", None, 5),
    ("Croissant Dough", Unit::Piece, 40.0, 12.0, "bakery", Some(3), 95),
];

/// (menu item id, [(ingredient name, quantity, unit)])
const RECIPES: &[(&str, &[(&str, f64, Unit)])] = &[
    ("espresso", &[("Espresso Beans", 18.0, Unit::Gram)]),
    (
        "latte",
        &[
            ("Espresso Beans", 18.0, Unit::Gram),
            ("Whole Milk", 0.2, Unit::Liter),
            ("Paper Cup 12oz", 1.0, Unit::Piece),
            ("Cup Lid", 1.0, Unit::Piece),
        ],
    ),
    (
        "oat-latte",
        &[
            ("Espresso Beans", 18.0, Unit::Gram),
            ("Oat Milk", 200.0, Unit::Milliliter),
            ("Paper Cup 12oz", 1.0, Unit::Piece),
            ("Cup Lid", 1.0, Unit::Piece),
        ],
    ),
    (
        "mocha",
        &[
            ("Espresso Beans", 18.0, Unit::Gram),
            ("Whole Milk", 180.0, Unit::Milliliter),
            ("Chocolate Syrup", 20.0, Unit::Milliliter),
            ("Paper Cup 12oz", 1.0, Unit::Piece),
        ],
    ),
    (
        "croissant",
        &[
            ("Croissant Dough", 1.0, Unit::Piece),
            ("Butter", 15.0, Unit::Gram),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let db_path = args
        .iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
        .unwrap_or("./crema.db");

    println!("Crema POS seed");
    println!("  Database: {}", db_path);

    let db = Database::new(DbConfig::new(db_path)).await?;

    // Seed inventory
    println!();
    println!("Seeding inventory items...");

    let now = Utc::now();
    let today = now.date_naive();
    let mut seeded = 0;

    for (name, unit, quantity, threshold, category, expires_in, cost) in ITEMS {
        let item = InventoryItem {
            id: InventoryItemId::generate(),
            name: (*name).to_string(),
            unit: *unit,
            quantity: *quantity,
            low_stock_threshold: *threshold,
            expires_on: expires_in.and_then(|days| today.checked_add_days(Days::new(days))),
            category: Some((*category).to_string()),
            cost_per_unit_cents: Some(*cost),
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = db.inventory().insert(&item).await {
            eprintln!("Failed to insert {}: {}", name, e);
            continue;
        }
        seeded += 1;
    }

    println!("  {} items", seeded);

    // Seed recipes
    println!("Seeding recipes...");

    for (menu_item, ingredients) in RECIPES {
        let menu_item_id = MenuItemId::new(*menu_item);
        let mut inputs = Vec::with_capacity(ingredients.len());
        for (ingredient_name, quantity, unit) in *ingredients {
            let item = db
                .inventory()
                .get_by_name(ingredient_name)
                .await?
                .ok_or_else(|| format!("missing seeded ingredient {ingredient_name}"))?;
            inputs.push(RecipeLineInput {
                inventory_item_id: item.id,
                quantity_required: *quantity,
                unit: *unit,
            });
        }
        db.recipes().replace_all(&menu_item_id, &inputs).await?;
    }

    println!("  {} recipes", RECIPES.len());

    // One demo order so the ledger isn't empty
    println!("Placing demo order...");

    let result = db
        .consumption(EngineConfig::default())
        .place_order(OrderRequest {
            total_cents: 1250,
            payment_method: PaymentMethod::Cash,
            lines: vec![
                OrderLineRequest {
                    menu_item_id: MenuItemId::new("latte"),
                    quantity: 2,
                    unit_price_cents: 450,
                },
                OrderLineRequest {
                    menu_item_id: MenuItemId::new("croissant"),
                    quantity: 1,
                    unit_price_cents: 350,
                },
            ],
        })
        .await?;

    println!("  Order {} ({} movements)", result.order_id, result.movements.len());

    // Show what the alert evaluator sees
    let report = db.alert_report(&EngineConfig::default()).await?;
    println!();
    println!("✓ Seed complete!");
    println!(
        "  Alerts: {} low stock, {} expiring soon, {} expired",
        report.low_stock.len(),
        report.expiring_soon.len(),
        report.expired.len()
    );

    if args.iter().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
