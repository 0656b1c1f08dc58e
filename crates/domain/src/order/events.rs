//! Order domain events.

use chrono::{DateTime, NaiveDate, Utc};
use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{FranchiseId, OrderLine};

/// Events that can occur on an order aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    /// Order was placed with its full line set; stock is reserved.
    OrderPlaced(OrderPlacedData),

    /// The pending order's line set was replaced.
    LinesReplaced(LinesReplacedData),

    /// Order was accepted by an administrator.
    OrderValidated(OrderValidatedData),

    /// Order was picked and packed.
    OrderPrepared(OrderPreparedData),

    /// Order was delivered; reserved stock was consumed.
    OrderDelivered(OrderDeliveredData),

    /// Order was cancelled; reserved stock was returned.
    OrderCancelled(OrderCancelledData),
}

impl DomainEvent for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced(_) => "OrderPlaced",
            OrderEvent::LinesReplaced(_) => "LinesReplaced",
            OrderEvent::OrderValidated(_) => "OrderValidated",
            OrderEvent::OrderPrepared(_) => "OrderPrepared",
            OrderEvent::OrderDelivered(_) => "OrderDelivered",
            OrderEvent::OrderCancelled(_) => "OrderCancelled",
        }
    }
}

/// Data for OrderPlaced event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPlacedData {
    /// The unique order ID.
    pub order_id: AggregateId,

    /// Human-readable order number (per-day sequence).
    pub order_number: String,

    /// The franchise placing the order.
    pub franchise_id: FranchiseId,

    /// Where to deliver.
    pub delivery_address: String,

    /// Requested delivery date, if any.
    pub delivery_date: Option<NaiveDate>,

    /// The validated line set.
    pub lines: Vec<OrderLine>,

    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
}

/// Data for LinesReplaced event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinesReplacedData {
    /// The new validated line set.
    pub lines: Vec<OrderLine>,

    /// When the lines were replaced.
    pub replaced_at: DateTime<Utc>,
}

/// Data for OrderValidated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderValidatedData {
    /// When the order was validated.
    pub validated_at: DateTime<Utc>,
}

/// Data for OrderPrepared event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPreparedData {
    /// When preparation finished.
    pub prepared_at: DateTime<Utc>,
}

/// Data for OrderDelivered event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDeliveredData {
    /// When the order was delivered.
    pub delivered_at: DateTime<Utc>,
}

/// Data for OrderCancelled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCancelledData {
    /// When the order was cancelled.
    pub cancelled_at: DateTime<Utc>,

    /// Reason for cancellation.
    pub reason: String,
}

// Convenience constructors for events
impl OrderEvent {
    /// Creates an OrderPlaced event.
    pub fn order_placed(
        order_id: AggregateId,
        order_number: impl Into<String>,
        franchise_id: FranchiseId,
        delivery_address: impl Into<String>,
        delivery_date: Option<NaiveDate>,
        lines: Vec<OrderLine>,
    ) -> Self {
        OrderEvent::OrderPlaced(OrderPlacedData {
            order_id,
            order_number: order_number.into(),
            franchise_id,
            delivery_address: delivery_address.into(),
            delivery_date,
            lines,
            placed_at: Utc::now(),
        })
    }

    /// Creates a LinesReplaced event.
    pub fn lines_replaced(lines: Vec<OrderLine>) -> Self {
        OrderEvent::LinesReplaced(LinesReplacedData {
            lines,
            replaced_at: Utc::now(),
        })
    }

    /// Creates an OrderValidated event.
    pub fn order_validated() -> Self {
        OrderEvent::OrderValidated(OrderValidatedData {
            validated_at: Utc::now(),
        })
    }

    /// Creates an OrderPrepared event.
    pub fn order_prepared() -> Self {
        OrderEvent::OrderPrepared(OrderPreparedData {
            prepared_at: Utc::now(),
        })
    }

    /// Creates an OrderDelivered event.
    pub fn order_delivered() -> Self {
        OrderEvent::OrderDelivered(OrderDeliveredData {
            delivered_at: Utc::now(),
        })
    }

    /// Creates an OrderCancelled event.
    pub fn order_cancelled(reason: impl Into<String>) -> Self {
        OrderEvent::OrderCancelled(OrderCancelledData {
            cancelled_at: Utc::now(),
            reason: reason.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::WarehouseKind;
    use common::Money;

    fn sample_lines() -> Vec<OrderLine> {
        vec![OrderLine::new(
            "SKU-TOMATO",
            "W-IVRY",
            WarehouseKind::Company,
            8,
            Money::from_cents(500),
        )]
    }

    #[test]
    fn event_types() {
        let event = OrderEvent::order_placed(
            AggregateId::new(),
            "CMD-20240101-0001",
            FranchiseId::new(),
            "12 rue des Halles, 75001 Paris",
            None,
            sample_lines(),
        );
        assert_eq!(event.event_type(), "OrderPlaced");

        assert_eq!(
            OrderEvent::lines_replaced(sample_lines()).event_type(),
            "LinesReplaced"
        );
        assert_eq!(OrderEvent::order_validated().event_type(), "OrderValidated");
        assert_eq!(OrderEvent::order_prepared().event_type(), "OrderPrepared");
        assert_eq!(OrderEvent::order_delivered().event_type(), "OrderDelivered");
        assert_eq!(
            OrderEvent::order_cancelled("changed plans").event_type(),
            "OrderCancelled"
        );
    }

    #[test]
    fn placed_event_serialization_roundtrip() {
        let order_id = AggregateId::new();
        let franchise_id = FranchiseId::new();
        let event = OrderEvent::order_placed(
            order_id,
            "CMD-20240101-0001",
            franchise_id,
            "12 rue des Halles, 75001 Paris",
            None,
            sample_lines(),
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("OrderPlaced"));

        let deserialized: OrderEvent = serde_json::from_str(&json).unwrap();
        if let OrderEvent::OrderPlaced(data) = deserialized {
            assert_eq!(data.order_id, order_id);
            assert_eq!(data.franchise_id, franchise_id);
            assert_eq!(data.order_number, "CMD-20240101-0001");
            assert_eq!(data.lines.len(), 1);
        } else {
            panic!("Expected OrderPlaced event");
        }
    }

    #[test]
    fn cancelled_event_carries_reason() {
        let event = OrderEvent::order_cancelled("franchise closed for the week");

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: OrderEvent = serde_json::from_str(&json).unwrap();

        if let OrderEvent::OrderCancelled(data) = deserialized {
            assert_eq!(data.reason, "franchise closed for the week");
        } else {
            panic!("Expected OrderCancelled event");
        }
    }
}
