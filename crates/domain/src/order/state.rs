//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of a supply order in its lifecycle.
///
/// Status transitions:
/// ```text
/// Pending ──► Validated ──► Prepared ──► Delivered
///    │            │            │
///    └────────────┴────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order is placed and its stock reserved; lines can still be replaced.
    #[default]
    Pending,

    /// Order was accepted by an administrator.
    Validated,

    /// Order is picked and packed in the warehouses.
    Prepared,

    /// Order was delivered; reserved stock is consumed (terminal).
    Delivered,

    /// Order was cancelled; reserved stock is returned (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the line set can be replaced in this status.
    pub fn can_edit_lines(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if the order can be validated in this status.
    pub fn can_validate(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if preparation can start in this status.
    pub fn can_prepare(&self) -> bool {
        matches!(self, OrderStatus::Validated)
    }

    /// Returns true if the order can be delivered in this status.
    pub fn can_deliver(&self) -> bool {
        matches!(self, OrderStatus::Prepared)
    }

    /// Returns true if the order can be cancelled in this status.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Validated | OrderStatus::Prepared
        )
    }

    /// Returns true if this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Validated => "validated",
            OrderStatus::Prepared => "prepared",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
