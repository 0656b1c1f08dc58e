//! Warehouse and stock listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use event_store::EventStore;
use serde::Serialize;

use crate::error::ApiError;
use crate::routes::orders::AppState;

/// One warehouse in a listing.
#[derive(Serialize)]
pub struct WarehouseResponse {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub status: String,
}

/// One orderable product in a warehouse.
#[derive(Serialize)]
pub struct ProductListingResponse {
    pub product_id: String,
    pub name: String,
    pub unit: String,
    pub unit_price_cents: i64,
    pub available: u32,
    pub low_stock: bool,
}

/// GET /warehouses — warehouses currently accepting orders.
#[tracing::instrument(skip(state))]
pub async fn list<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<WarehouseResponse>> {
    let warehouses = state.lifecycle.available_warehouses().await;
    Json(
        warehouses
            .into_iter()
            .map(|w| WarehouseResponse {
                id: w.id.to_string(),
                name: w.name,
                kind: w.kind.to_string(),
                status: w.status.to_string(),
            })
            .collect(),
    )
}

/// GET /warehouses/:id/products — products with available stock.
#[tracing::instrument(skip(state))]
pub async fn products<S: EventStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductListingResponse>>, ApiError> {
    let listing = state.lifecycle.available_products(&id.as_str().into()).await?;
    Ok(Json(
        listing
            .into_iter()
            .map(|item| ProductListingResponse {
                product_id: item.product.id.to_string(),
                name: item.product.name,
                unit: item.product.unit.to_string(),
                unit_price_cents: item.product.unit_price.cents(),
                available: item.available,
                low_stock: item.low_stock,
            })
            .collect(),
    ))
}
