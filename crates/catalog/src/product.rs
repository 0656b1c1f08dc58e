//! Products and units of measure.

use common::Money;
use serde::{Deserialize, Serialize};

/// Product identifier (SKU).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unit a product is sold and stocked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    Kilogram,
    Litre,
    Piece,
    Portion,
}

impl UnitOfMeasure {
    /// Returns the unit name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::Kilogram => "kg",
            UnitOfMeasure::Litre => "litre",
            UnitOfMeasure::Piece => "piece",
            UnitOfMeasure::Portion => "portion",
        }
    }
}

impl std::fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A supply product offered through one or more warehouses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// The product identifier.
    pub id: ProductId,

    /// Human-readable product name.
    pub name: String,

    /// Current list price per unit.
    pub unit_price: Money,

    /// Unit the price applies to.
    pub unit: UnitOfMeasure,
}

impl Product {
    /// Creates a new product.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Money,
        unit: UnitOfMeasure,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_string_conversion() {
        let id = ProductId::new("SKU-TOMATO");
        assert_eq!(id.as_str(), "SKU-TOMATO");

        let id2: ProductId = "SKU-BUN".into();
        assert_eq!(id2.as_str(), "SKU-BUN");
    }

    #[test]
    fn unit_display() {
        assert_eq!(UnitOfMeasure::Kilogram.to_string(), "kg");
        assert_eq!(UnitOfMeasure::Portion.to_string(), "portion");
    }

    #[test]
    fn product_serialization_roundtrip() {
        let product = Product::new(
            "SKU-TOMATO",
            "Tomates grappe",
            Money::from_cents(250),
            UnitOfMeasure::Kilogram,
        );
        let json = serde_json::to_string(&product).unwrap();
        let deserialized: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product, deserialized);
    }
}
