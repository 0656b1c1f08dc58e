//! Order commands.

use chrono::NaiveDate;
use common::AggregateId;

use crate::command::Command;

use super::{FranchiseId, Order, OrderLine};

/// Command to place a new order with a validated line set.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    /// The order ID to create.
    pub order_id: AggregateId,

    /// Human-readable order number.
    pub order_number: String,

    /// The franchise placing the order.
    pub franchise_id: FranchiseId,

    /// Where to deliver.
    pub delivery_address: String,

    /// Requested delivery date, if any.
    pub delivery_date: Option<NaiveDate>,

    /// The validated lines.
    pub lines: Vec<OrderLine>,
}

impl PlaceOrder {
    /// Creates a new PlaceOrder command with a generated order ID.
    pub fn new(
        order_number: impl Into<String>,
        franchise_id: FranchiseId,
        delivery_address: impl Into<String>,
        delivery_date: Option<NaiveDate>,
        lines: Vec<OrderLine>,
    ) -> Self {
        Self {
            order_id: AggregateId::new(),
            order_number: order_number.into(),
            franchise_id,
            delivery_address: delivery_address.into(),
            delivery_date,
            lines,
        }
    }
}

impl Command for PlaceOrder {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

/// Command to replace a pending order's line set.
#[derive(Debug, Clone)]
pub struct ReplaceLines {
    /// The order to edit.
    pub order_id: AggregateId,

    /// The new validated lines.
    pub lines: Vec<OrderLine>,
}

impl ReplaceLines {
    /// Creates a new ReplaceLines command.
    pub fn new(order_id: AggregateId, lines: Vec<OrderLine>) -> Self {
        Self { order_id, lines }
    }
}

impl Command for ReplaceLines {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

/// Command to validate an order.
#[derive(Debug, Clone)]
pub struct ValidateOrder {
    /// The order to validate.
    pub order_id: AggregateId,
}

impl ValidateOrder {
    /// Creates a new ValidateOrder command.
    pub fn new(order_id: AggregateId) -> Self {
        Self { order_id }
    }
}

impl Command for ValidateOrder {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

/// Command to mark an order prepared.
#[derive(Debug, Clone)]
pub struct PrepareOrder {
    /// The order to prepare.
    pub order_id: AggregateId,
}

impl PrepareOrder {
    /// Creates a new PrepareOrder command.
    pub fn new(order_id: AggregateId) -> Self {
        Self { order_id }
    }
}

impl Command for PrepareOrder {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

/// Command to mark an order delivered.
#[derive(Debug, Clone)]
pub struct DeliverOrder {
    /// The order to deliver.
    pub order_id: AggregateId,
}

impl DeliverOrder {
    /// Creates a new DeliverOrder command.
    pub fn new(order_id: AggregateId) -> Self {
        Self { order_id }
    }
}

impl Command for DeliverOrder {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

/// Command to cancel an order.
#[derive(Debug, Clone)]
pub struct CancelOrder {
    /// The order to cancel.
    pub order_id: AggregateId,

    /// Reason for cancellation.
    pub reason: String,
}

impl CancelOrder {
    /// Creates a new CancelOrder command.
    pub fn new(order_id: AggregateId, reason: impl Into<String>) -> Self {
        Self {
            order_id,
            reason: reason.into(),
        }
    }
}

impl Command for CancelOrder {
    type Aggregate = Order;

    fn aggregate_id(&self) -> AggregateId {
        self.order_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::WarehouseKind;
    use common::Money;

    #[test]
    fn place_order_generates_an_id() {
        let cmd = PlaceOrder::new(
            "CMD-20240101-0001",
            FranchiseId::new(),
            "12 rue des Halles",
            None,
            vec![OrderLine::new(
                "SKU-TOMATO",
                "W-IVRY",
                WarehouseKind::Company,
                2,
                Money::from_cents(500),
            )],
        );
        assert_eq!(cmd.aggregate_id(), cmd.order_id);
        assert_eq!(cmd.order_number, "CMD-20240101-0001");
    }

    #[test]
    fn cancel_order_command_carries_reason() {
        let order_id = AggregateId::new();
        let cmd = CancelOrder::new(order_id, "franchise closed");
        assert_eq!(cmd.aggregate_id(), order_id);
        assert_eq!(cmd.reason, "franchise closed");
    }
}
