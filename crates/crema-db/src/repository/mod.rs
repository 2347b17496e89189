//! # Repository Module
//!
//! Database repository implementations for Crema POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │                                                                 │
//! │       │  db.inventory().get_by_name("Flour")                            │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                    │
//! │  ├── get(&self, id)                                                     │
//! │  ├── insert(&self, item)                                                │
//! │  └── adjust_stock(&self, id, delta, note, actor)                        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Transactional participation: the operations the consumption            │
//! │  processor composes into one transaction are associated functions       │
//! │  taking `&mut SqliteConnection`, so a caller can only run them on a     │
//! │  connection it controls - usually a transaction it will commit or       │
//! │  roll back as a unit.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`inventory::InventoryRepository`] - Catalog CRUD and stock adjustments
//! - [`recipe::RecipeRepository`] - Menu item ingredient mappings (BOM)
//! - [`ledger::LedgerRepository`] - Append-only stock movement audit trail
//! - [`order::OrderRepository`] - Immutable order records

pub mod inventory;
pub mod ledger;
pub mod order;
pub mod recipe;
