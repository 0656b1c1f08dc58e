//! Lifecycle error types.

use catalog::{ProductId, WarehouseId, WarehouseStatus};
use common::AggregateId;
use domain::{DomainError, OrderError};
use ledger::LedgerError;
use thiserror::Error;

/// Errors that can occur during lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Unknown order ID.
    #[error("Order not found: {0}")]
    OrderNotFound(AggregateId),

    /// A draft line references an unknown product.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A draft line references an unknown warehouse.
    #[error("Warehouse not found: {0}")]
    WarehouseNotFound(WarehouseId),

    /// The warehouse exists but is not accepting orders.
    #[error("Warehouse {warehouse} is not accepting orders (status: {status})")]
    WarehouseUnavailable {
        warehouse: WarehouseId,
        status: WarehouseStatus,
    },

    /// Stock ledger error (insufficient stock, unknown entry, ...).
    #[error("Stock ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Domain error (validation, compliance, state transition, store).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl From<OrderError> for LifecycleError {
    fn from(e: OrderError) -> Self {
        LifecycleError::Domain(DomainError::Order(e))
    }
}

/// Convenience type alias for lifecycle results.
pub type Result<T> = std::result::Result<T, LifecycleError>;
