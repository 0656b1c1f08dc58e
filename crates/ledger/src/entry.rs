//! Stock entries and the keys that address them.

use catalog::{ProductId, WarehouseId};
use serde::{Deserialize, Serialize};

/// Addresses one stock entry: a product held in a warehouse.
///
/// Field order matters for the derived `Ord`: batches sort by warehouse
/// id first, then product id, which is the canonical acquisition order
/// for multi-entry operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StockKey {
    /// The warehouse holding the stock.
    pub warehouse: WarehouseId,

    /// The product stocked.
    pub product: ProductId,
}

impl StockKey {
    /// Creates a new stock key.
    pub fn new(warehouse: impl Into<WarehouseId>, product: impl Into<ProductId>) -> Self {
        Self {
            warehouse: warehouse.into(),
            product: product.into(),
        }
    }
}

impl std::fmt::Display for StockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.warehouse, self.product)
    }
}

/// A quantity against a stock key, the unit of batch operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLine {
    /// The entry addressed.
    pub key: StockKey,

    /// Units to reserve, release or commit.
    pub quantity: u32,
}

impl StockLine {
    /// Creates a new stock line.
    pub fn new(key: StockKey, quantity: u32) -> Self {
        Self { key, quantity }
    }
}

/// Inventory counts for one `(product, warehouse)` pair.
///
/// `available` never reflects quantities already promised to an order;
/// those sit in `reserved` until delivery moves them to `committed` or
/// cancellation returns them. For a given entry,
/// `available + reserved + committed` is constant absent restocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    /// Unreserved units on hand.
    pub available: u32,

    /// Units held by pending/validated/prepared orders.
    pub reserved: u32,

    /// Cumulative units consumed by delivered orders.
    pub committed: u64,

    /// Low-stock alert threshold.
    pub alert_threshold: u32,
}

/// Default alert threshold for newly provisioned entries.
pub(crate) const DEFAULT_ALERT_THRESHOLD: u32 = 10;

impl StockEntry {
    /// Creates an entry with the given available quantity and the
    /// default alert threshold.
    pub fn with_available(available: u32) -> Self {
        Self {
            available,
            reserved: 0,
            committed: 0,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }

    /// Total units either on hand or promised.
    pub fn on_hand(&self) -> u32 {
        self.available + self.reserved
    }

    /// Returns true when available stock is at or below the alert
    /// threshold.
    pub fn is_low(&self) -> bool {
        self.available <= self.alert_threshold
    }
}

/// One row of a per-warehouse stock snapshot, for order-building UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// The product stocked.
    pub product: ProductId,

    /// Unreserved units at snapshot time. Advisory only; the
    /// authoritative check happens inside `reserve`.
    pub available: u32,

    /// True when the entry is at or below its alert threshold.
    pub low_stock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_sort_by_warehouse_then_product() {
        let mut keys = vec![
            StockKey::new("W-LYON", "SKU-A"),
            StockKey::new("W-IVRY", "SKU-Z"),
            StockKey::new("W-IVRY", "SKU-A"),
        ];
        keys.sort();
        assert_eq!(keys[0], StockKey::new("W-IVRY", "SKU-A"));
        assert_eq!(keys[1], StockKey::new("W-IVRY", "SKU-Z"));
        assert_eq!(keys[2], StockKey::new("W-LYON", "SKU-A"));
    }

    #[test]
    fn entry_low_stock_flag() {
        let mut entry = StockEntry::with_available(25);
        assert!(!entry.is_low());

        entry.available = 10;
        assert!(entry.is_low());

        entry.available = 0;
        assert!(entry.is_low());
    }

    #[test]
    fn entry_on_hand_sums_available_and_reserved() {
        let entry = StockEntry {
            available: 7,
            reserved: 3,
            committed: 5,
            alert_threshold: 10,
        };
        assert_eq!(entry.on_hand(), 10);
    }
}
