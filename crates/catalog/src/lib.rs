//! Catalog registry: the read-only source of products, warehouses and
//! prices the ordering core draws from.
//!
//! Catalog maintenance (creating products, editing prices) happens in an
//! external system; from the core's perspective this data is immutable
//! within a single order's lifetime. Prices and warehouse kinds are
//! snapshotted into order lines at creation.

pub mod product;
pub mod registry;
pub mod warehouse;

pub use product::{Product, ProductId, UnitOfMeasure};
pub use registry::{CatalogRegistry, InMemoryCatalog};
pub use warehouse::{Warehouse, WarehouseId, WarehouseKind, WarehouseStatus};
