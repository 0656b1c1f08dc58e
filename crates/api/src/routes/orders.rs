//! Order endpoints: creation, queries and lifecycle transitions.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog::InMemoryCatalog;
use chrono::NaiveDate;
use common::AggregateId;
use domain::{Aggregate, FranchiseId, Order};
use event_store::EventStore;
use ledger::InMemoryStockLedger;
use lifecycle::{DraftLine, NewOrder, OrderLifecycle};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: EventStore> {
    pub lifecycle: OrderLifecycle<S, InMemoryStockLedger, InMemoryCatalog>,
    pub ledger: InMemoryStockLedger,
    pub catalog: InMemoryCatalog,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub franchise_id: String,
    pub delivery_address: String,
    pub delivery_date: Option<NaiveDate>,
    pub lines: Vec<OrderLineRequest>,
}

#[derive(Deserialize)]
pub struct OrderLineRequest {
    pub warehouse_id: String,
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct CancelOrderRequest {
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct ReplaceLinesRequest {
    pub lines: Vec<OrderLineRequest>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_number: String,
    pub franchise_id: String,
    pub status: String,
    pub delivery_address: String,
    pub delivery_date: Option<NaiveDate>,
    pub placed_at: Option<String>,
    pub lines: Vec<OrderLineResponse>,
    pub grand_total_cents: i64,
    pub company_total_cents: i64,
    pub independent_total_cents: i64,
    pub company_pct: f64,
    pub conforming: bool,
    pub warehouses_used: Vec<String>,
}

#[derive(Serialize)]
pub struct OrderLineResponse {
    pub product_id: String,
    pub warehouse_id: String,
    pub warehouse_kind: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl OrderResponse {
    fn from_order(order: &Order) -> Self {
        let report = order.compliance();
        Self {
            id: order
                .id()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            order_number: order.order_number().to_string(),
            franchise_id: order
                .franchise_id()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            status: order.status().to_string(),
            delivery_address: order.delivery_address().to_string(),
            delivery_date: order.delivery_date(),
            placed_at: order.placed_at().map(|t| t.to_rfc3339()),
            lines: order
                .lines()
                .iter()
                .map(|line| OrderLineResponse {
                    product_id: line.product_id.to_string(),
                    warehouse_id: line.warehouse_id.to_string(),
                    warehouse_kind: line.warehouse_kind.to_string(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price.cents(),
                    line_total_cents: line.line_total().cents(),
                })
                .collect(),
            grand_total_cents: order.grand_total().cents(),
            company_total_cents: report.company_total.cents(),
            independent_total_cents: report.independent_total.cents(),
            company_pct: report.company_pct(),
            conforming: report.conforming,
            warehouses_used: order
                .warehouses_used()
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

fn draft_lines(lines: &[OrderLineRequest]) -> Vec<DraftLine> {
    lines
        .iter()
        .map(|line| DraftLine {
            warehouse_id: line.warehouse_id.as_str().into(),
            product_id: line.product_id.as_str().into(),
            quantity: line.quantity,
        })
        .collect()
}

fn parse_order_id(id: &str) -> Result<AggregateId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order id: {e}")))?;
    Ok(AggregateId::from_uuid(uuid))
}

// -- Handlers --

/// POST /orders — validate, reserve and persist a new order.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let franchise_uuid = uuid::Uuid::parse_str(&req.franchise_id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid franchise_id: {e}")))?;

    let draft = NewOrder {
        franchise_id: FranchiseId::from_uuid(franchise_uuid),
        delivery_address: req.delivery_address,
        delivery_date: req.delivery_date,
        lines: draft_lines(&req.lines),
    };

    let order = state.lifecycle.create_order(draft).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from_order(&order))))
}

/// GET /orders/:id — order with computed totals and compliance.
#[tracing::instrument(skip(state))]
pub async fn get<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.lifecycle.get_order(order_id).await?;
    Ok(Json(OrderResponse::from_order(&order)))
}

/// POST /orders/:id/validate
#[tracing::instrument(skip(state))]
pub async fn validate<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.lifecycle.validate_order(order_id).await?;
    Ok(Json(OrderResponse::from_order(&order)))
}

/// POST /orders/:id/prepare
#[tracing::instrument(skip(state))]
pub async fn prepare<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.lifecycle.prepare_order(order_id).await?;
    Ok(Json(OrderResponse::from_order(&order)))
}

/// POST /orders/:id/deliver
#[tracing::instrument(skip(state))]
pub async fn deliver<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.lifecycle.deliver_order(order_id).await?;
    Ok(Json(OrderResponse::from_order(&order)))
}

/// POST /orders/:id/cancel — the body may carry a reason.
#[tracing::instrument(skip(state, req))]
pub async fn cancel<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<CancelOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let reason = req
        .reason
        .unwrap_or_else(|| "cancelled by operator".to_string());
    let order = state.lifecycle.cancel_order(order_id, &reason).await?;
    Ok(Json(OrderResponse::from_order(&order)))
}

/// PUT /orders/:id/lines — replace the line set of a pending order.
#[tracing::instrument(skip(state, req))]
pub async fn replace_lines<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<ReplaceLinesRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .lifecycle
        .edit_order(order_id, draft_lines(&req.lines))
        .await?;
    Ok(Json(OrderResponse::from_order(&order)))
}
