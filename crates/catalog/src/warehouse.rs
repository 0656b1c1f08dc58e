//! Warehouses and the company/independent distinction.

use serde::{Deserialize, Serialize};

/// Warehouse identifier (short code).
///
/// `Ord` matters here: ledger keys sort by warehouse id first, giving
/// batch reservations a canonical acquisition order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarehouseId(String);

impl WarehouseId {
    /// Creates a new warehouse ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the warehouse ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WarehouseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WarehouseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WarehouseId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for WarehouseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether a warehouse is operated by the parent company or by an
/// independent supplier.
///
/// The distinction drives the 80/20 rule: company-warehouse value counts
/// toward the mandatory 80% share, independent value toward the 20% cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarehouseKind {
    Company,
    Independent,
}

impl WarehouseKind {
    /// Returns true for company-operated warehouses.
    pub fn is_company(&self) -> bool {
        matches!(self, WarehouseKind::Company)
    }

    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarehouseKind::Company => "company",
            WarehouseKind::Independent => "independent",
        }
    }
}

impl std::fmt::Display for WarehouseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operating status of a warehouse.
///
/// Only active warehouses accept new orders; maintenance and closed
/// warehouses keep their stock but are hidden from order building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WarehouseStatus {
    #[default]
    Active,
    Maintenance,
    Closed,
}

impl WarehouseStatus {
    /// Returns true if the warehouse can serve new orders.
    pub fn is_orderable(&self) -> bool {
        matches!(self, WarehouseStatus::Active)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarehouseStatus::Active => "active",
            WarehouseStatus::Maintenance => "maintenance",
            WarehouseStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for WarehouseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical warehouse supply orders can draw from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    /// The warehouse identifier.
    pub id: WarehouseId,

    /// Human-readable warehouse name.
    pub name: String,

    /// Company-operated or independent supplier.
    pub kind: WarehouseKind,

    /// Current operating status.
    pub status: WarehouseStatus,
}

impl Warehouse {
    /// Creates a new active warehouse.
    pub fn new(id: impl Into<WarehouseId>, name: impl Into<String>, kind: WarehouseKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            status: WarehouseStatus::Active,
        }
    }

    /// Sets the operating status.
    pub fn with_status(mut self, status: WarehouseStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warehouse_ids_sort_lexicographically() {
        let mut ids = vec![
            WarehouseId::new("W-LYON"),
            WarehouseId::new("W-IVRY"),
            WarehouseId::new("W-PARIS-NORD"),
        ];
        ids.sort();
        assert_eq!(ids[0].as_str(), "W-IVRY");
        assert_eq!(ids[2].as_str(), "W-PARIS-NORD");
    }

    #[test]
    fn kind_company_check() {
        assert!(WarehouseKind::Company.is_company());
        assert!(!WarehouseKind::Independent.is_company());
    }

    #[test]
    fn only_active_is_orderable() {
        assert!(WarehouseStatus::Active.is_orderable());
        assert!(!WarehouseStatus::Maintenance.is_orderable());
        assert!(!WarehouseStatus::Closed.is_orderable());
    }

    #[test]
    fn warehouse_builder_defaults_to_active() {
        let warehouse = Warehouse::new("W-IVRY", "Entrepôt Ivry", WarehouseKind::Company);
        assert_eq!(warehouse.status, WarehouseStatus::Active);

        let closed = warehouse.clone().with_status(WarehouseStatus::Closed);
        assert_eq!(closed.status, WarehouseStatus::Closed);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&WarehouseKind::Independent).unwrap();
        assert_eq!(json, "\"independent\"");
    }
}
