//! API error types with HTTP response mapping.
//!
//! Error bodies are structured so a caller can render a precise message:
//! `{ "error": { "kind": ..., "message": ..., "details": { ... } } }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, OrderError};
use event_store::EventStoreError;
use ledger::LedgerError;
use lifecycle::LifecycleError;
use serde_json::json;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Error from the lifecycle manager or below.
    Lifecycle(LifecycleError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, json!({})),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, json!({})),
            ApiError::Lifecycle(err) => lifecycle_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    msg,
                    json!({}),
                )
            }
        };

        let body = json!({
            "error": {
                "kind": kind,
                "message": message,
                "details": details,
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

fn lifecycle_error_to_response(
    err: LifecycleError,
) -> (StatusCode, &'static str, String, serde_json::Value) {
    let message = err.to_string();
    match &err {
        LifecycleError::OrderNotFound(id) => (
            StatusCode::NOT_FOUND,
            "order_not_found",
            message,
            json!({ "order_id": id.to_string() }),
        ),
        LifecycleError::ProductNotFound(id) => (
            StatusCode::NOT_FOUND,
            "product_not_found",
            message,
            json!({ "product_id": id.to_string() }),
        ),
        LifecycleError::WarehouseNotFound(id) => (
            StatusCode::NOT_FOUND,
            "warehouse_not_found",
            message,
            json!({ "warehouse_id": id.to_string() }),
        ),
        LifecycleError::WarehouseUnavailable { warehouse, status } => (
            StatusCode::CONFLICT,
            "warehouse_unavailable",
            message,
            json!({ "warehouse_id": warehouse.to_string(), "status": status.to_string() }),
        ),
        LifecycleError::Ledger(ledger_err) => ledger_error_to_response(ledger_err, message),
        LifecycleError::Domain(domain_err) => domain_error_to_response(domain_err, message),
    }
}

fn ledger_error_to_response(
    err: &LedgerError,
    message: String,
) -> (StatusCode, &'static str, String, serde_json::Value) {
    match err {
        LedgerError::InsufficientStock {
            product,
            warehouse,
            requested,
            available,
        } => (
            StatusCode::CONFLICT,
            "insufficient_stock",
            message,
            json!({
                "product_id": product.to_string(),
                "warehouse_id": warehouse.to_string(),
                "requested": requested,
                "available": available,
            }),
        ),
        LedgerError::UnknownStock { product, warehouse } => (
            StatusCode::NOT_FOUND,
            "unknown_stock",
            message,
            json!({
                "product_id": product.to_string(),
                "warehouse_id": warehouse.to_string(),
            }),
        ),
        // Release/commit mismatches indicate a caller bug, not client input.
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "ledger_inconsistency",
            message,
            json!({}),
        ),
    }
}

fn domain_error_to_response(
    err: &DomainError,
    message: String,
) -> (StatusCode, &'static str, String, serde_json::Value) {
    match err {
        DomainError::Order(order_err) => match order_err {
            OrderError::NotConforming {
                company_pct,
                required_pct,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "compliance_violation",
                message,
                json!({ "company_pct": company_pct, "required_pct": required_pct }),
            ),
            OrderError::InvalidStateTransition { current, attempted } => (
                StatusCode::CONFLICT,
                "invalid_state_transition",
                message,
                json!({ "current": current.to_string(), "attempted": attempted }),
            ),
            OrderError::ExceedsAvailable {
                product,
                warehouse,
                requested,
                available,
            } => (
                StatusCode::CONFLICT,
                "insufficient_stock",
                message,
                json!({
                    "product_id": product.to_string(),
                    "warehouse_id": warehouse.to_string(),
                    "requested": requested,
                    "available": available,
                }),
            ),
            OrderError::DuplicateLine { product, warehouse } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                json!({
                    "product_id": product.to_string(),
                    "warehouse_id": warehouse.to_string(),
                }),
            ),
            OrderError::EmptyDeliveryAddress
            | OrderError::NoLines
            | OrderError::InvalidQuantity { .. }
            | OrderError::AlreadyPlaced
            | OrderError::NotPlaced => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                json!({}),
            ),
        },
        DomainError::EventStore(EventStoreError::ConcurrencyConflict { .. }) => {
            (StatusCode::CONFLICT, "conflict", message, json!({}))
        }
        DomainError::AggregateNotFound { .. } => {
            (StatusCode::NOT_FOUND, "not_found", message, json!({}))
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            message,
            json!({}),
        ),
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        ApiError::Lifecycle(err)
    }
}
