//! # crema-core: Pure Business Logic for Crema POS
//!
//! This crate is the **heart** of the Crema POS inventory engine. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Crema POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 POS / Admin Frontend                            │   │
//! │  │    Cart UI ──► Checkout ──► Inventory Admin ──► Alert Badges    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ crema-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   units   │  │  alerts   │  │ validation│   │   │
//! │  │   │ Inventory │  │   Unit    │  │ evaluate  │  │   rules   │   │   │
//! │  │   │  Recipe   │  │  convert  │  │ classify  │  │   checks  │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    crema-db (Database Layer)                    │   │
//! │  │      SQLite repositories, migrations, order consumption         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryItem, RecipeLine, Order, LedgerEntry)
//! - [`units`] - Measurement units and conversion (no silent coercion!)
//! - [`alerts`] - Low-stock / expiry alert evaluation (pure, poll-safe)
//! - [`config`] - Engine configuration (explicit, never ambient)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use crema_core::units::{convert, Unit};
//!
//! // A recipe calls for 0.2 kg of flour; the bin is tracked in grams.
//! let grams = convert(0.2, Unit::Kilogram, Unit::Gram).unwrap();
//! assert_eq!(grams, 200.0);
//!
//! // Cross-family conversion never silently coerces.
//! assert!(convert(1.0, Unit::Liter, Unit::Gram).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alerts;
pub mod config;
pub mod error;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use crema_core::Unit` instead of
// `use crema_core::units::Unit`

pub use alerts::{evaluate, AlertReport, AlertStatus};
pub use config::{EngineConfig, StockPolicy, UnitMismatchPolicy};
pub use error::{CoreError, ValidationError};
pub use types::*;
pub use units::{convert, Dimension, Unit};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Actor recorded on ledger entries written by the order consumption
/// processor (as opposed to a named admin user performing a manual
/// correction).
pub const SYSTEM_ACTOR: &str = "pos";

/// Maximum lines allowed in a single order.
///
/// ## Business Reason
/// Prevents runaway orders and ensures reasonable transaction sizes.
/// Can be made configurable per-tenant in future versions.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single menu item in one order line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Configurable per-tenant in future versions.
pub const MAX_LINE_QUANTITY: i64 = 999;
