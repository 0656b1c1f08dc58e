//! Ledger error types.

use catalog::{ProductId, WarehouseId};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// A reservation asked for more units than are available.
    #[error(
        "insufficient stock for {product} in warehouse {warehouse}: {available} available, {requested} requested"
    )]
    InsufficientStock {
        product: ProductId,
        warehouse: WarehouseId,
        requested: u32,
        available: u32,
    },

    /// The product is not stocked in that warehouse at all.
    #[error("product {product} is not stocked in warehouse {warehouse}")]
    UnknownStock {
        product: ProductId,
        warehouse: WarehouseId,
    },

    /// A release asked for more units than are reserved. Impossible
    /// under correct callers; indicates a caller bug.
    #[error(
        "release of {requested} units exceeds reservation of {reserved} for {product} in warehouse {warehouse}"
    )]
    ReleaseExceedsReserved {
        product: ProductId,
        warehouse: WarehouseId,
        requested: u32,
        reserved: u32,
    },

    /// A commit asked for more units than are reserved. Impossible
    /// under correct callers; indicates a caller bug.
    #[error(
        "commit of {requested} units exceeds reservation of {reserved} for {product} in warehouse {warehouse}"
    )]
    CommitExceedsReserved {
        product: ProductId,
        warehouse: WarehouseId,
        requested: u32,
        reserved: u32,
    },
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
