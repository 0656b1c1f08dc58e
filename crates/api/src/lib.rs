//! HTTP boundary for the franchise supply ordering core.
//!
//! Request parsing and response shaping only — authentication and
//! session handling are external collaborators. Structured logging
//! (tracing) and Prometheus metrics come along for every deployment.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use catalog::InMemoryCatalog;
use event_store::EventStore;
use ledger::InMemoryStockLedger;
use lifecycle::OrderLifecycle;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: EventStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/warehouses", get(routes::warehouses::list::<S>))
        .route(
            "/warehouses/{id}/products",
            get(routes::warehouses::products::<S>),
        )
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}/validate", post(routes::orders::validate::<S>))
        .route("/orders/{id}/prepare", post(routes::orders::prepare::<S>))
        .route("/orders/{id}/deliver", post(routes::orders::deliver::<S>))
        .route("/orders/{id}/cancel", post(routes::orders::cancel::<S>))
        .route("/orders/{id}/lines", put(routes::orders::replace_lines::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state: in-memory ledger and catalog
/// around the given event store.
pub fn create_default_state<S: EventStore + 'static>(event_store: S) -> Arc<AppState<S>> {
    let ledger = InMemoryStockLedger::new();
    let catalog = InMemoryCatalog::new();
    let lifecycle = OrderLifecycle::new(event_store, ledger.clone(), catalog.clone());

    Arc::new(AppState {
        lifecycle,
        ledger,
        catalog,
    })
}
