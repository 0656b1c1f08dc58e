//! Value objects for the order domain.

use catalog::{ProductId, WarehouseId, WarehouseKind};
use common::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a franchise operator.
///
/// Franchise profiles live in an external system; the core only ever
/// references them by ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FranchiseId(Uuid);

impl FranchiseId {
    /// Creates a new random franchise ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a franchise ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for FranchiseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FranchiseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for FranchiseId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<FranchiseId> for Uuid {
    fn from(id: FranchiseId) -> Self {
        id.0
    }
}

/// One line of a supply order: a quantity of a product drawn from a
/// specific warehouse.
///
/// Unit price and warehouse kind are snapshots taken when the line was
/// built, so totals and compliance stay stable even if catalog data
/// changes during the order's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// The product ordered.
    pub product_id: ProductId,

    /// The warehouse the product ships from.
    pub warehouse_id: WarehouseId,

    /// Company or independent, snapshotted for the 80/20 computation.
    pub warehouse_kind: WarehouseKind,

    /// Units ordered.
    pub quantity: u32,

    /// Price per unit at the time the line was built.
    pub unit_price: Money,
}

impl OrderLine {
    /// Creates a new order line.
    pub fn new(
        product_id: impl Into<ProductId>,
        warehouse_id: impl Into<WarehouseId>,
        warehouse_kind: WarehouseKind,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            warehouse_id: warehouse_id.into(),
            warehouse_kind,
            quantity,
            unit_price,
        }
    }

    /// Returns the total value of this line (quantity × unit price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}
