//! # crema-db: Database Layer for Crema POS
//!
//! This crate provides database access for the Crema POS inventory engine.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Crema POS Data Flow                              │
//! │                                                                         │
//! │  Order intake / Admin UI                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     crema-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │ inventory.rs   │   │  (embedded)  │   │   │
//! │  │   │               │    │ recipe.rs      │   │              │   │   │
//! │  │   │ SqlitePool    │◄───│ ledger.rs      │   │ 001_init.sql │   │   │
//! │  │   │ Management    │    │ order.rs       │   │ ...          │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────────────────────────────────────────────────┐   │   │
//! │  │   │ consumption.rs - the ONE transaction boundary:          │   │   │
//! │  │   │ order insert + recipe-driven deductions + ledger        │   │   │
//! │  │   └─────────────────────────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode, foreign keys on)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (inventory, recipe, ledger, order)
//! - [`consumption`] - Order consumption processor (atomic stock deduction)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crema_db::{Database, DbConfig};
//! use crema_core::EngineConfig;
//!
//! // Create database with default config
//! let db = Database::new(DbConfig::new("path/to/crema.db")).await?;
//!
//! // Place an order; stock deduction and ledger writes commit atomically
//! let result = db.consumption(EngineConfig::default()).place_order(request).await?;
//!
//! // Poll alerts
//! let report = db.alert_report(&EngineConfig::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod consumption;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use consumption::{
    ConsumptionProcessor, ConsumptionResult, OrderLineRequest, OrderRequest, SkippedLine,
    StockMovement,
};
pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::inventory::InventoryRepository;
pub use repository::ledger::LedgerRepository;
pub use repository::order::OrderRepository;
pub use repository::recipe::RecipeRepository;
