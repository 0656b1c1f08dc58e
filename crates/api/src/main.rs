//! API server entry point.

use catalog::{Product, UnitOfMeasure, Warehouse, WarehouseKind};
use common::Money;
use event_store::InMemoryEventStore;
use ledger::StockKey;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Seeds reference data for the demo deployment: the four company
/// warehouses, one independent supplier and a handful of products.
/// Catalog maintenance proper lives in an external system.
fn seed_demo_catalog(state: &api::routes::orders::AppState<InMemoryEventStore>) {
    for (id, name) in [
        ("W-IVRY", "Entrepôt Ivry-sur-Seine"),
        ("W-STDENIS", "Entrepôt Saint-Denis"),
        ("W-NANTERRE", "Entrepôt Nanterre"),
        ("W-CRETEIL", "Entrepôt Créteil"),
    ] {
        state
            .catalog
            .insert_warehouse(Warehouse::new(id, name, WarehouseKind::Company));
    }
    state.catalog.insert_warehouse(Warehouse::new(
        "W-RUNGIS-LIBRE",
        "Fournisseur libre Rungis",
        WarehouseKind::Independent,
    ));

    let products = [
        ("SKU-POTATO", "Pommes de terre", 180, UnitOfMeasure::Kilogram),
        ("SKU-TOMATO", "Tomates grappe", 250, UnitOfMeasure::Kilogram),
        ("SKU-BUN", "Pains burger", 45, UnitOfMeasure::Piece),
        ("SKU-STEAK", "Steaks hachés", 120, UnitOfMeasure::Piece),
        ("SKU-CREAM", "Crème fraîche", 320, UnitOfMeasure::Litre),
        ("SKU-TRUFFLE", "Huile de truffe", 1850, UnitOfMeasure::Litre),
    ];
    for (id, name, cents, unit) in products {
        state
            .catalog
            .insert_product(Product::new(id, name, Money::from_cents(cents), unit));
    }

    for id in ["W-IVRY", "W-STDENIS", "W-NANTERRE", "W-CRETEIL"] {
        for (sku, qty) in [
            ("SKU-POTATO", 500),
            ("SKU-TOMATO", 300),
            ("SKU-BUN", 1000),
            ("SKU-STEAK", 800),
        ] {
            state.ledger.set_stock(StockKey::new(id, sku), qty);
        }
    }
    state
        .ledger
        .set_stock(StockKey::new("W-RUNGIS-LIBRE", "SKU-CREAM"), 120);
    state
        .ledger
        .set_stock(StockKey::new("W-RUNGIS-LIBRE", "SKU-TRUFFLE"), 15);

    tracing::info!("seeded demo catalog and stock");
}

#[tokio::main]
async fn main() {
    let config = api::config::Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Create event store and application state
    let event_store = InMemoryEventStore::new();
    let state = api::create_default_state(event_store);
    seed_demo_catalog(&state);

    // 4. Build the application
    let app = api::create_app(state, metrics_handle);

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
