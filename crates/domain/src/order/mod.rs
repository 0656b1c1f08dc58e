//! Order aggregate and related types.

mod aggregate;
mod builder;
mod commands;
mod events;
mod service;
mod state;
mod values;

pub use aggregate::Order;
pub use builder::{CandidateLine, build_lines};
pub use commands::*;
pub use events::{
    LinesReplacedData, OrderCancelledData, OrderDeliveredData, OrderEvent, OrderPlacedData,
    OrderPreparedData, OrderValidatedData,
};
pub use service::OrderService;
pub use state::OrderStatus;
pub use values::{FranchiseId, OrderLine};

use catalog::{ProductId, WarehouseId};
use thiserror::Error;

use crate::compliance::REQUIRED_COMPANY_PCT;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// Order is not in the expected status for the attempted transition.
    #[error("invalid state transition: cannot {attempted} an order in {current} status")]
    InvalidStateTransition {
        current: OrderStatus,
        attempted: &'static str,
    },

    /// Delivery address was empty or blank.
    #[error("delivery address must not be empty")]
    EmptyDeliveryAddress,

    /// Order has no lines.
    #[error("order must contain at least one line")]
    NoLines,

    /// Line quantity was zero.
    #[error("invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// The same (product, warehouse) pair appeared more than once.
    #[error("duplicate line: product {product} from warehouse {warehouse}")]
    DuplicateLine {
        product: ProductId,
        warehouse: WarehouseId,
    },

    /// Soft stock check: a line asks for more than was available when
    /// the draft was resolved. The authoritative check is the ledger
    /// reservation.
    #[error(
        "requested {requested} units of {product} from warehouse {warehouse}, only {available} available"
    )]
    ExceedsAvailable {
        product: ProductId,
        warehouse: WarehouseId,
        requested: u32,
        available: u32,
    },

    /// The 80/20 rule is violated.
    #[error(
        "only {company_pct:.1}% of the order value comes from company warehouses (minimum {required_pct}%)"
    )]
    NotConforming { company_pct: f64, required_pct: u8 },

    /// Order is already placed.
    #[error("order already placed")]
    AlreadyPlaced,

    /// Operation on an order that was never placed.
    #[error("order does not exist")]
    NotPlaced,
}

impl OrderError {
    /// Builds a `NotConforming` error from an evaluated report.
    pub fn not_conforming(report: &crate::compliance::ComplianceReport) -> Self {
        OrderError::NotConforming {
            company_pct: report.company_pct(),
            required_pct: REQUIRED_COMPANY_PCT,
        }
    }
}
