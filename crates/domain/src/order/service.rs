//! Order service providing a simplified API for order operations.

use common::AggregateId;
use event_store::EventStore;

use crate::command::{CommandHandler, CommandResult};
use crate::error::DomainError;

use super::{
    CancelOrder, DeliverOrder, Order, PlaceOrder, PrepareOrder, ReplaceLines, ValidateOrder,
};

impl From<super::OrderError> for DomainError {
    fn from(e: super::OrderError) -> Self {
        DomainError::Order(e)
    }
}

/// Service for executing order commands against the event store.
///
/// Each method loads the aggregate, runs the command and appends the
/// resulting events with an expected-version check; the lifecycle
/// manager builds ledger coordination on top of this.
pub struct OrderService<S: EventStore> {
    handler: CommandHandler<S, Order>,
}

impl<S: EventStore> OrderService<S> {
    /// Creates a new order service with the given event store.
    pub fn new(store: S) -> Self {
        Self {
            handler: CommandHandler::new(store),
        }
    }

    /// Returns a reference to the underlying command handler.
    pub fn handler(&self) -> &CommandHandler<S, Order> {
        &self.handler
    }

    /// Places a new order.
    #[tracing::instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<CommandResult<Order>, DomainError> {
        self.handler
            .execute(cmd.order_id, |order| {
                order.place(
                    cmd.order_id,
                    cmd.order_number.clone(),
                    cmd.franchise_id,
                    cmd.delivery_address.clone(),
                    cmd.delivery_date,
                    cmd.lines.clone(),
                )
            })
            .await
    }

    /// Replaces a pending order's line set.
    #[tracing::instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub async fn replace_lines(
        &self,
        cmd: ReplaceLines,
    ) -> Result<CommandResult<Order>, DomainError> {
        self.handler
            .execute(cmd.order_id, |order| order.replace_lines(cmd.lines.clone()))
            .await
    }

    /// Validates an order.
    #[tracing::instrument(skip(self))]
    pub async fn validate_order(
        &self,
        cmd: ValidateOrder,
    ) -> Result<CommandResult<Order>, DomainError> {
        self.handler
            .execute(cmd.order_id, |order| order.validate())
            .await
    }

    /// Marks an order prepared.
    #[tracing::instrument(skip(self))]
    pub async fn prepare_order(
        &self,
        cmd: PrepareOrder,
    ) -> Result<CommandResult<Order>, DomainError> {
        self.handler
            .execute(cmd.order_id, |order| order.prepare())
            .await
    }

    /// Marks an order delivered.
    #[tracing::instrument(skip(self))]
    pub async fn deliver_order(
        &self,
        cmd: DeliverOrder,
    ) -> Result<CommandResult<Order>, DomainError> {
        self.handler
            .execute(cmd.order_id, |order| order.deliver())
            .await
    }

    /// Cancels an order.
    #[tracing::instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub async fn cancel_order(
        &self,
        cmd: CancelOrder,
    ) -> Result<CommandResult<Order>, DomainError> {
        self.handler
            .execute(cmd.order_id, |order| order.cancel(cmd.reason.clone()))
            .await
    }

    /// Loads an order by ID, returning None if it doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: AggregateId) -> Result<Option<Order>, DomainError> {
        self.handler.load_existing(order_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{FranchiseId, OrderLine, OrderStatus};
    use catalog::WarehouseKind;
    use common::Money;
    use event_store::InMemoryEventStore;

    fn conforming_lines() -> Vec<OrderLine> {
        vec![
            OrderLine::new(
                "SKU-TOMATO",
                "W-IVRY",
                WarehouseKind::Company,
                16,
                Money::from_cents(500),
            ),
            OrderLine::new(
                "SKU-CREAM",
                "W-LYON",
                WarehouseKind::Independent,
                1,
                Money::from_cents(2000),
            ),
        ]
    }

    #[tokio::test]
    async fn place_then_get() {
        let service = OrderService::new(InMemoryEventStore::new());
        let cmd = PlaceOrder::new(
            "CMD-20240101-0001",
            FranchiseId::new(),
            "12 rue des Halles, 75001 Paris",
            None,
            conforming_lines(),
        );
        let order_id = cmd.order_id;

        service.place_order(cmd).await.unwrap();

        let order = service.get_order(order_id).await.unwrap().unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.lines().len(), 2);
        assert_eq!(order.grand_total().cents(), 10_000);
    }

    #[tokio::test]
    async fn get_missing_order_returns_none() {
        let service = OrderService::new(InMemoryEventStore::new());
        let result = service.get_order(AggregateId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn lifecycle_through_service() {
        let service = OrderService::new(InMemoryEventStore::new());
        let cmd = PlaceOrder::new(
            "CMD-20240101-0001",
            FranchiseId::new(),
            "12 rue des Halles, 75001 Paris",
            None,
            conforming_lines(),
        );
        let order_id = cmd.order_id;
        service.place_order(cmd).await.unwrap();

        let result = service
            .validate_order(ValidateOrder::new(order_id))
            .await
            .unwrap();
        assert_eq!(result.aggregate.status(), OrderStatus::Validated);

        let result = service
            .prepare_order(PrepareOrder::new(order_id))
            .await
            .unwrap();
        assert_eq!(result.aggregate.status(), OrderStatus::Prepared);

        let result = service
            .deliver_order(DeliverOrder::new(order_id))
            .await
            .unwrap();
        assert_eq!(result.aggregate.status(), OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn invalid_transition_surfaces_as_order_error() {
        let service = OrderService::new(InMemoryEventStore::new());
        let cmd = PlaceOrder::new(
            "CMD-20240101-0001",
            FranchiseId::new(),
            "12 rue des Halles, 75001 Paris",
            None,
            conforming_lines(),
        );
        let order_id = cmd.order_id;
        service.place_order(cmd).await.unwrap();

        let err = service
            .deliver_order(DeliverOrder::new(order_id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Order(crate::order::OrderError::InvalidStateTransition { .. })
        ));
    }
}
