//! Order builder: turns a client-assembled draft into validated lines.
//!
//! The multi-step warehouse/product/quantity picker on the client only
//! shapes the candidate list; this validation is the source of truth.
//! It is pure — the caller resolves catalog and stock data up front, and
//! persistence happens only once control passes to the lifecycle manager.

use std::collections::HashSet;

use catalog::{Product, Warehouse};

use crate::compliance;

use super::{OrderError, OrderLine};

/// One draft line resolved against catalog and ledger state.
#[derive(Debug, Clone)]
pub struct CandidateLine {
    /// The resolved product (price snapshot source).
    pub product: Product,

    /// The resolved warehouse (kind snapshot source).
    pub warehouse: Warehouse,

    /// Units requested.
    pub quantity: u32,

    /// Unreserved units in that warehouse when the draft was resolved.
    pub available: u32,
}

/// Validates a draft and produces the order lines.
///
/// Checks, in order: non-blank delivery address, at least one line,
/// positive quantities, no duplicate (product, warehouse) pair, the soft
/// stock check, and finally the 80/20 compliance gate. A non-conforming
/// draft is rejected outright — lines are never silently dropped to
/// force conformance.
pub fn build_lines(
    delivery_address: &str,
    candidates: &[CandidateLine],
) -> Result<Vec<OrderLine>, OrderError> {
    if delivery_address.trim().is_empty() {
        return Err(OrderError::EmptyDeliveryAddress);
    }
    if candidates.is_empty() {
        return Err(OrderError::NoLines);
    }

    let mut seen = HashSet::new();
    let mut lines = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if candidate.quantity == 0 {
            return Err(OrderError::InvalidQuantity {
                quantity: candidate.quantity,
            });
        }

        let pair = (candidate.product.id.clone(), candidate.warehouse.id.clone());
        if !seen.insert(pair) {
            return Err(OrderError::DuplicateLine {
                product: candidate.product.id.clone(),
                warehouse: candidate.warehouse.id.clone(),
            });
        }

        if candidate.quantity > candidate.available {
            return Err(OrderError::ExceedsAvailable {
                product: candidate.product.id.clone(),
                warehouse: candidate.warehouse.id.clone(),
                requested: candidate.quantity,
                available: candidate.available,
            });
        }

        lines.push(OrderLine::new(
            candidate.product.id.clone(),
            candidate.warehouse.id.clone(),
            candidate.warehouse.kind,
            candidate.quantity,
            candidate.product.unit_price,
        ));
    }

    let report = compliance::evaluate(
        lines
            .iter()
            .map(|line| (line.warehouse_kind, line.line_total())),
    );
    if !report.conforming {
        return Err(OrderError::not_conforming(&report));
    }

    Ok(lines)
}
