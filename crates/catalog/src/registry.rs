//! Catalog registry trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::{Product, ProductId, Warehouse, WarehouseId};

/// Read-only access to products and warehouses.
///
/// The core never mutates reference data through this trait; the
/// in-memory implementation's insert methods exist for process setup
/// and tests only.
#[async_trait]
pub trait CatalogRegistry: Send + Sync {
    /// Looks up a product by ID.
    async fn product(&self, id: &ProductId) -> Option<Product>;

    /// Looks up a warehouse by ID.
    async fn warehouse(&self, id: &WarehouseId) -> Option<Warehouse>;

    /// Lists all warehouses, sorted by ID.
    async fn warehouses(&self) -> Vec<Warehouse>;
}

#[derive(Debug, Default)]
struct CatalogState {
    products: HashMap<ProductId, Product>,
    warehouses: HashMap<WarehouseId, Warehouse>,
}

/// In-memory catalog registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a product.
    pub fn insert_product(&self, product: Product) {
        self.state
            .write()
            .unwrap()
            .products
            .insert(product.id.clone(), product);
    }

    /// Registers a warehouse.
    pub fn insert_warehouse(&self, warehouse: Warehouse) {
        self.state
            .write()
            .unwrap()
            .warehouses
            .insert(warehouse.id.clone(), warehouse);
    }

    /// Returns the number of registered products.
    pub fn product_count(&self) -> usize {
        self.state.read().unwrap().products.len()
    }
}

#[async_trait]
impl CatalogRegistry for InMemoryCatalog {
    async fn product(&self, id: &ProductId) -> Option<Product> {
        self.state.read().unwrap().products.get(id).cloned()
    }

    async fn warehouse(&self, id: &WarehouseId) -> Option<Warehouse> {
        self.state.read().unwrap().warehouses.get(id).cloned()
    }

    async fn warehouses(&self) -> Vec<Warehouse> {
        let state = self.state.read().unwrap();
        let mut all: Vec<_> = state.warehouses.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}
