//! The 80/20 compliance evaluator.
//!
//! A standing business rule requires that at least 80% of the monetary
//! value of every supply order originate from company-operated warehouses.
//! This module is the single place that rule is computed — the same pure
//! function serves client-side previews and the authoritative gate at
//! order creation and validation.

use catalog::WarehouseKind;
use common::Money;
use serde::{Deserialize, Serialize};

/// Minimum share of order value that must come from company warehouses,
/// in percent.
pub const REQUIRED_COMPANY_PCT: u8 = 80;

/// Value split and verdict for one set of order lines.
///
/// The verdict is computed on exact cent amounts; the percentage
/// accessors are for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Value drawn from company-operated warehouses.
    pub company_total: Money,

    /// Value drawn from independent suppliers.
    pub independent_total: Money,

    /// Whether the set satisfies the 80% rule.
    pub conforming: bool,
}

impl ComplianceReport {
    /// Total order value.
    pub fn grand_total(&self) -> Money {
        self.company_total + self.independent_total
    }

    /// Company share in percent, rounded to one decimal for display.
    pub fn company_pct(&self) -> f64 {
        pct(self.company_total, self.grand_total())
    }

    /// Independent share in percent, rounded to one decimal for display.
    pub fn independent_pct(&self) -> f64 {
        pct(self.independent_total, self.grand_total())
    }
}

fn pct(part: Money, whole: Money) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    let raw = part.cents() as f64 * 100.0 / whole.cents() as f64;
    (raw * 10.0).round() / 10.0
}

/// Evaluates the 80/20 rule over `(warehouse kind, line value)` pairs.
///
/// An empty set is conforming by convention (nothing to violate). The
/// boundary is inclusive: exactly 80.00% passes. The decision is made on
/// integer cents (128-bit cross-multiplication), so threshold values
/// cannot flicker through floating point rounding.
pub fn evaluate<I>(values: I) -> ComplianceReport
where
    I: IntoIterator<Item = (WarehouseKind, Money)>,
{
    let mut company_total = Money::zero();
    let mut independent_total = Money::zero();

    for (kind, value) in values {
        match kind {
            WarehouseKind::Company => company_total += value,
            WarehouseKind::Independent => independent_total += value,
        }
    }

    let grand = company_total + independent_total;
    let conforming = grand.is_zero()
        || company_total.cents() as i128 * 100 >= grand.cents() as i128 * REQUIRED_COMPANY_PCT as i128;

    ComplianceReport {
        company_total,
        independent_total,
        conforming,
    }
}
