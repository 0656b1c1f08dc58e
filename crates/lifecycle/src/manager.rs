//! The order lifecycle manager.

use std::collections::HashMap;

use catalog::{CatalogRegistry, Product, ProductId, Warehouse, WarehouseId};
use chrono::NaiveDate;
use common::AggregateId;
use domain::{
    CancelOrder, CandidateLine, DeliverOrder, FranchiseId, Order, OrderError, OrderLine,
    OrderService, OrderStatus, PlaceOrder, PrepareOrder, ReplaceLines, ValidateOrder, build_lines,
};
use event_store::{EventStore, EventStoreError};
use ledger::{StockKey, StockLedger, StockLine};
use serde::{Deserialize, Serialize};

use crate::error::{LifecycleError, Result};
use crate::numbering::OrderNumbers;

/// One client-assembled draft line: a warehouse, a product, a quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftLine {
    /// The warehouse to draw from.
    pub warehouse_id: WarehouseId,

    /// The product to order.
    pub product_id: ProductId,

    /// Units requested.
    pub quantity: u32,
}

/// A draft order as submitted by the boundary layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    /// The franchise placing the order.
    pub franchise_id: FranchiseId,

    /// Where to deliver.
    pub delivery_address: String,

    /// Requested delivery date, if any.
    pub delivery_date: Option<NaiveDate>,

    /// Candidate lines.
    pub lines: Vec<DraftLine>,
}

/// One product offered by a warehouse, with its current availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAvailability {
    /// The product.
    pub product: Product,

    /// Unreserved units at snapshot time.
    pub available: u32,

    /// True when the entry is at or below its alert threshold.
    pub low_stock: bool,
}

/// Coordinates the order aggregate, the stock ledger and the catalog.
///
/// All transitions are idempotent against their own already-applied
/// state: re-invoking `deliver` on a delivered order returns the current
/// order without a second commit.
pub struct OrderLifecycle<S, L, C>
where
    S: EventStore,
    L: StockLedger,
    C: CatalogRegistry,
{
    orders: OrderService<S>,
    ledger: L,
    catalog: C,
    numbers: OrderNumbers,
}

impl<S, L, C> OrderLifecycle<S, L, C>
where
    S: EventStore,
    L: StockLedger,
    C: CatalogRegistry,
{
    /// Creates a new lifecycle manager.
    pub fn new(store: S, ledger: L, catalog: C) -> Self {
        Self {
            orders: OrderService::new(store),
            ledger,
            catalog,
            numbers: OrderNumbers::new(),
        }
    }

    /// Returns a reference to the underlying order service.
    pub fn orders(&self) -> &OrderService<S> {
        &self.orders
    }

    /// Creates an order: builder validation, all-or-nothing reservation,
    /// then persistence. If persistence fails, the reservation is
    /// released before the error is returned.
    #[tracing::instrument(skip(self, draft), fields(franchise_id = %draft.franchise_id, line_count = draft.lines.len()))]
    pub async fn create_order(&self, draft: NewOrder) -> Result<Order> {
        metrics::counter!("order_placements_total").increment(1);
        let started = std::time::Instant::now();

        let candidates = self.resolve_candidates(&draft.lines).await?;
        let lines = build_lines(&draft.delivery_address, &candidates)?;
        let wanted = stock_lines(&lines);

        // Authoritative stock check: reserve everything or nothing.
        if let Err(e) = self.ledger.reserve_lines(&wanted).await {
            metrics::counter!("stock_reservation_failures_total").increment(1);
            return Err(e.into());
        }

        let order_number = self.numbers.next();
        let cmd = PlaceOrder::new(
            order_number,
            draft.franchise_id,
            draft.delivery_address,
            draft.delivery_date,
            lines,
        );
        let order_id = cmd.order_id;

        match self.orders.place_order(cmd).await {
            Ok(result) => {
                metrics::counter!("orders_placed").increment(1);
                metrics::histogram!("order_placement_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                tracing::info!(
                    %order_id,
                    order_number = result.aggregate.order_number(),
                    total_cents = result.aggregate.grand_total().cents(),
                    "order placed"
                );
                Ok(result.aggregate)
            }
            Err(e) => {
                // Nothing was persisted; give the stock back.
                if let Err(release_err) = self.ledger.release_lines(&wanted).await {
                    tracing::error!(%order_id, error = %release_err, "failed to release reservation after aborted placement");
                }
                Err(e.into())
            }
        }
    }

    /// Validates a pending order, re-running the compliance gate.
    #[tracing::instrument(skip(self))]
    pub async fn validate_order(&self, order_id: AggregateId) -> Result<Order> {
        let order = self.load(order_id).await?;
        if order.status() == OrderStatus::Validated {
            return Ok(order);
        }

        match self.orders.validate_order(ValidateOrder::new(order_id)).await {
            Ok(result) => Ok(result.aggregate),
            Err(e) if lost_race(&e) => {
                self.settle_race(order_id, OrderStatus::Validated, "validate")
                    .await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Marks a validated order prepared. No stock movement.
    #[tracing::instrument(skip(self))]
    pub async fn prepare_order(&self, order_id: AggregateId) -> Result<Order> {
        let order = self.load(order_id).await?;
        if order.status() == OrderStatus::Prepared {
            return Ok(order);
        }

        match self.orders.prepare_order(PrepareOrder::new(order_id)).await {
            Ok(result) => Ok(result.aggregate),
            Err(e) if lost_race(&e) => {
                self.settle_race(order_id, OrderStatus::Prepared, "prepare")
                    .await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delivers a prepared order, permanently consuming its reserved
    /// stock.
    ///
    /// The status transition is appended first: the optimistic version
    /// check picks exactly one winner among concurrent callers, and only
    /// the winner commits, so retried calls can never double-commit.
    #[tracing::instrument(skip(self))]
    pub async fn deliver_order(&self, order_id: AggregateId) -> Result<Order> {
        let order = self.load(order_id).await?;
        if order.status() == OrderStatus::Delivered {
            return Ok(order);
        }

        match self.orders.deliver_order(DeliverOrder::new(order_id)).await {
            Ok(result) => {
                let wanted = stock_lines(result.aggregate.lines());
                if let Err(e) = self.ledger.commit_lines(&wanted).await {
                    tracing::error!(%order_id, error = %e, "stock commit failed after delivery transition");
                    return Err(e.into());
                }
                metrics::counter!("orders_delivered").increment(1);
                tracing::info!(%order_id, "order delivered, stock committed");
                Ok(result.aggregate)
            }
            Err(e) if lost_race(&e) => {
                // The winner commits; the loser only reports the outcome.
                self.settle_race(order_id, OrderStatus::Delivered, "deliver")
                    .await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Cancels a non-terminal order, returning its reserved stock.
    #[tracing::instrument(skip(self, reason))]
    pub async fn cancel_order(&self, order_id: AggregateId, reason: &str) -> Result<Order> {
        let order = self.load(order_id).await?;
        if order.status() == OrderStatus::Cancelled {
            return Ok(order);
        }

        match self
            .orders
            .cancel_order(CancelOrder::new(order_id, reason))
            .await
        {
            Ok(result) => {
                let wanted = stock_lines(result.aggregate.lines());
                if let Err(e) = self.ledger.release_lines(&wanted).await {
                    tracing::error!(%order_id, error = %e, "stock release failed after cancellation");
                    return Err(e.into());
                }
                metrics::counter!("orders_cancelled").increment(1);
                tracing::info!(%order_id, reason, "order cancelled, stock released");
                Ok(result.aggregate)
            }
            Err(e) if lost_race(&e) => {
                self.settle_race(order_id, OrderStatus::Cancelled, "cancel")
                    .await
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces a pending order's line set.
    ///
    /// The ledger swap (release old, reserve new) happens in a single
    /// critical section; if the subsequent persistence fails, the swap
    /// is reversed.
    #[tracing::instrument(skip(self, new_lines), fields(line_count = new_lines.len()))]
    pub async fn edit_order(&self, order_id: AggregateId, new_lines: Vec<DraftLine>) -> Result<Order> {
        let order = self.load(order_id).await?;
        if !order.status().can_edit_lines() {
            return Err(OrderError::InvalidStateTransition {
                current: order.status(),
                attempted: "edit",
            }
            .into());
        }

        let old_stock = stock_lines(order.lines());

        // The soft availability check must not count the order against
        // itself: units it currently holds become available again the
        // moment the swap releases them.
        let own_reserved: HashMap<StockKey, u32> = old_stock
            .iter()
            .map(|line| (line.key.clone(), line.quantity))
            .collect();
        let mut candidates = self.resolve_candidates(&new_lines).await?;
        for candidate in &mut candidates {
            let key = StockKey::new(candidate.warehouse.id.clone(), candidate.product.id.clone());
            if let Some(held) = own_reserved.get(&key) {
                candidate.available += held;
            }
        }

        let lines = build_lines(order.delivery_address(), &candidates)?;
        let new_stock = stock_lines(&lines);

        self.ledger.replace_lines(&old_stock, &new_stock).await?;

        match self
            .orders
            .replace_lines(ReplaceLines::new(order_id, lines))
            .await
        {
            Ok(result) => {
                tracing::info!(%order_id, "order lines replaced");
                Ok(result.aggregate)
            }
            Err(e) => {
                if let Err(swap_err) = self.ledger.replace_lines(&new_stock, &old_stock).await {
                    tracing::error!(%order_id, error = %swap_err, "failed to restore reservations after aborted edit");
                }
                if is_conflict(&e) {
                    let current = self.load(order_id).await?;
                    return Err(OrderError::InvalidStateTransition {
                        current: current.status(),
                        attempted: "edit",
                    }
                    .into());
                }
                Err(e.into())
            }
        }
    }

    /// Loads an order with its computed fields.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: AggregateId) -> Result<Order> {
        self.load(order_id).await
    }

    /// Lists warehouses currently accepting orders.
    pub async fn available_warehouses(&self) -> Vec<Warehouse> {
        self.catalog
            .warehouses()
            .await
            .into_iter()
            .filter(|w| w.status.is_orderable())
            .collect()
    }

    /// Lists products with available stock in one warehouse.
    ///
    /// The listing is an eventually-consistent view for order-building
    /// UIs; the authoritative check happens again inside reservation.
    pub async fn available_products(
        &self,
        warehouse_id: &WarehouseId,
    ) -> Result<Vec<ProductAvailability>> {
        let warehouse = self
            .catalog
            .warehouse(warehouse_id)
            .await
            .ok_or_else(|| LifecycleError::WarehouseNotFound(warehouse_id.clone()))?;

        let mut listing = Vec::new();
        for level in self.ledger.snapshot(&warehouse.id).await {
            match self.catalog.product(&level.product).await {
                Some(product) => listing.push(ProductAvailability {
                    product,
                    available: level.available,
                    low_stock: level.low_stock,
                }),
                None => {
                    tracing::warn!(product = %level.product, warehouse = %warehouse.id, "stocked product missing from catalog");
                }
            }
        }
        Ok(listing)
    }

    async fn load(&self, order_id: AggregateId) -> Result<Order> {
        self.orders
            .get_order(order_id)
            .await?
            .ok_or(LifecycleError::OrderNotFound(order_id))
    }

    /// After losing an optimistic-concurrency race: if the other caller
    /// applied the same transition, report success idempotently;
    /// otherwise report the transition as invalid from the new status.
    async fn settle_race(
        &self,
        order_id: AggregateId,
        target: OrderStatus,
        attempted: &'static str,
    ) -> Result<Order> {
        let current = self.load(order_id).await?;
        if current.status() == target {
            Ok(current)
        } else {
            Err(OrderError::InvalidStateTransition {
                current: current.status(),
                attempted,
            }
            .into())
        }
    }

    async fn resolve_candidates(&self, lines: &[DraftLine]) -> Result<Vec<CandidateLine>> {
        let mut candidates = Vec::with_capacity(lines.len());
        for line in lines {
            let warehouse = self
                .catalog
                .warehouse(&line.warehouse_id)
                .await
                .ok_or_else(|| LifecycleError::WarehouseNotFound(line.warehouse_id.clone()))?;
            if !warehouse.status.is_orderable() {
                return Err(LifecycleError::WarehouseUnavailable {
                    warehouse: warehouse.id,
                    status: warehouse.status,
                });
            }

            let product = self
                .catalog
                .product(&line.product_id)
                .await
                .ok_or_else(|| LifecycleError::ProductNotFound(line.product_id.clone()))?;

            let key = StockKey::new(warehouse.id.clone(), product.id.clone());
            let available = self.ledger.available(&key).await?;

            candidates.push(CandidateLine {
                product,
                warehouse,
                quantity: line.quantity,
                available,
            });
        }
        Ok(candidates)
    }
}

fn stock_lines(lines: &[OrderLine]) -> Vec<StockLine> {
    lines
        .iter()
        .map(|line| {
            StockLine::new(
                StockKey::new(line.warehouse_id.clone(), line.product_id.clone()),
                line.quantity,
            )
        })
        .collect()
}

fn is_conflict(e: &domain::DomainError) -> bool {
    matches!(
        e,
        domain::DomainError::EventStore(EventStoreError::ConcurrencyConflict { .. })
    )
}

/// A transition attempt that lost to a concurrent caller: either the
/// optimistic append failed, or the rival's event landed between our two
/// loads and the command saw the post-transition status. Both cases are
/// settled by re-reading the order.
fn lost_race(e: &domain::DomainError) -> bool {
    is_conflict(e)
        || matches!(
            e,
            domain::DomainError::Order(OrderError::InvalidStateTransition { .. })
        )
}
