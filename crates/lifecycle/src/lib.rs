//! Order lifecycle manager.
//!
//! Owns the coordination between the order aggregate, the stock ledger
//! and the catalog registry so that reserved stock, committed stock and
//! order status can never drift apart:
//!
//! - `create` reserves stock for every line all-or-nothing before the
//!   order is persisted, and releases on persistence failure
//! - `deliver` and `cancel` win the status transition first (optimistic
//!   append), then apply the ledger effect exactly once
//! - `edit` swaps reservations in a single ledger critical section
//!
//! Re-invoking an already-applied transition returns the current order
//! state instead of an error, so retried boundary calls are harmless.

pub mod error;
pub mod manager;
pub mod numbering;

pub use error::LifecycleError;
pub use manager::{DraftLine, NewOrder, OrderLifecycle, ProductAvailability};
pub use numbering::OrderNumbers;
