//! Stock ledger trait and in-memory implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use catalog::WarehouseId;

use crate::error::{LedgerError, Result};
use crate::{StockEntry, StockKey, StockLevel, StockLine};

/// Trait for stock ledger implementations.
///
/// Batch operations are all-or-nothing: if any line fails, no entry is
/// modified. Implementations must serialize mutations so that concurrent
/// callers contending for the same entry never both succeed beyond
/// available capacity.
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Moves `quantity` units from available to reserved.
    async fn reserve(&self, key: &StockKey, quantity: u32) -> Result<()>;

    /// Moves `quantity` units from reserved back to available.
    async fn release(&self, key: &StockKey, quantity: u32) -> Result<()>;

    /// Permanently removes `quantity` units from reserved (physical
    /// consumption on delivery; never returns them to available).
    async fn commit(&self, key: &StockKey, quantity: u32) -> Result<()>;

    /// Reserves every line, or none.
    async fn reserve_lines(&self, lines: &[StockLine]) -> Result<()>;

    /// Releases every line, or none.
    async fn release_lines(&self, lines: &[StockLine]) -> Result<()>;

    /// Commits every line, or none.
    async fn commit_lines(&self, lines: &[StockLine]) -> Result<()>;

    /// Releases `old` and reserves `new` in a single critical section.
    /// On failure the ledger is left exactly as before the call.
    async fn replace_lines(&self, old: &[StockLine], new: &[StockLine]) -> Result<()>;

    /// Unreserved units for one entry.
    async fn available(&self, key: &StockKey) -> Result<u32>;

    /// Eventually-consistent listing of entries with available stock in
    /// a warehouse, sorted by product id.
    async fn snapshot(&self, warehouse: &WarehouseId) -> Vec<StockLevel>;
}

/// Sums line quantities per key, in canonical key order.
///
/// Duplicate keys within one batch are validated against their combined
/// total, not line by line.
fn totals(lines: &[StockLine]) -> BTreeMap<StockKey, u32> {
    let mut map = BTreeMap::new();
    for line in lines {
        *map.entry(line.key.clone()).or_insert(0u32) += line.quantity;
    }
    map
}

fn unknown(key: &StockKey) -> LedgerError {
    LedgerError::UnknownStock {
        product: key.product.clone(),
        warehouse: key.warehouse.clone(),
    }
}

fn apply_reserve(entries: &mut BTreeMap<StockKey, StockEntry>, wanted: &BTreeMap<StockKey, u32>) -> Result<()> {
    for (key, &qty) in wanted {
        let entry = entries.get_mut(key).ok_or_else(|| unknown(key))?;
        if entry.available < qty {
            return Err(LedgerError::InsufficientStock {
                product: key.product.clone(),
                warehouse: key.warehouse.clone(),
                requested: qty,
                available: entry.available,
            });
        }
        entry.available -= qty;
        entry.reserved += qty;
    }
    Ok(())
}

fn apply_release(entries: &mut BTreeMap<StockKey, StockEntry>, wanted: &BTreeMap<StockKey, u32>) -> Result<()> {
    for (key, &qty) in wanted {
        let entry = entries.get_mut(key).ok_or_else(|| unknown(key))?;
        if entry.reserved < qty {
            return Err(LedgerError::ReleaseExceedsReserved {
                product: key.product.clone(),
                warehouse: key.warehouse.clone(),
                requested: qty,
                reserved: entry.reserved,
            });
        }
        entry.reserved -= qty;
        entry.available += qty;
    }
    Ok(())
}

fn apply_commit(entries: &mut BTreeMap<StockKey, StockEntry>, wanted: &BTreeMap<StockKey, u32>) -> Result<()> {
    for (key, &qty) in wanted {
        let entry = entries.get_mut(key).ok_or_else(|| unknown(key))?;
        if entry.reserved < qty {
            return Err(LedgerError::CommitExceedsReserved {
                product: key.product.clone(),
                warehouse: key.warehouse.clone(),
                requested: qty,
                reserved: entry.reserved,
            });
        }
        entry.reserved -= qty;
        entry.committed += qty as u64;
    }
    Ok(())
}

/// In-memory stock ledger.
///
/// All mutation passes through one write guard. Batch operations work on
/// a scratch copy of the affected entries and write back only on success,
/// so a mid-batch failure touches nothing. Guards never cross an await
/// point.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStockLedger {
    state: Arc<RwLock<HashMap<StockKey, StockEntry>>>,
}

impl InMemoryStockLedger {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provisions an entry with the given available quantity, replacing
    /// any existing entry. Setup/test helper, not part of the trait.
    pub fn set_stock(&self, key: StockKey, available: u32) {
        self.state
            .write()
            .unwrap()
            .insert(key, StockEntry::with_available(available));
    }

    /// Adjusts the low-stock alert threshold for an existing entry.
    pub fn set_alert_threshold(&self, key: &StockKey, threshold: u32) {
        if let Some(entry) = self.state.write().unwrap().get_mut(key) {
            entry.alert_threshold = threshold;
        }
    }

    /// Returns a copy of one entry, for observation in tests.
    pub fn entry(&self, key: &StockKey) -> Option<StockEntry> {
        self.state.read().unwrap().get(key).copied()
    }

    /// Runs a batch mutation on a scratch copy of the affected entries,
    /// writing back only if the whole batch succeeds.
    fn run_batch<F>(&self, keys: impl Iterator<Item = StockKey>, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<StockKey, StockEntry>) -> Result<()>,
    {
        let mut state = self.state.write().unwrap();

        let mut scratch = BTreeMap::new();
        for key in keys {
            if let Some(entry) = state.get(&key) {
                scratch.insert(key, *entry);
            }
        }

        mutate(&mut scratch)?;

        for (key, entry) in scratch {
            state.insert(key, entry);
        }
        Ok(())
    }
}

#[async_trait]
impl StockLedger for InMemoryStockLedger {
    async fn reserve(&self, key: &StockKey, quantity: u32) -> Result<()> {
        self.reserve_lines(&[StockLine::new(key.clone(), quantity)])
            .await
    }

    async fn release(&self, key: &StockKey, quantity: u32) -> Result<()> {
        self.release_lines(&[StockLine::new(key.clone(), quantity)])
            .await
    }

    async fn commit(&self, key: &StockKey, quantity: u32) -> Result<()> {
        self.commit_lines(&[StockLine::new(key.clone(), quantity)])
            .await
    }

    async fn reserve_lines(&self, lines: &[StockLine]) -> Result<()> {
        let wanted = totals(lines);
        let result = self.run_batch(wanted.keys().cloned().collect::<Vec<_>>().into_iter(), |scratch| {
            apply_reserve(scratch, &wanted)
        });
        if let Err(ref e) = result {
            tracing::debug!(error = %e, "batch reservation rejected");
        }
        result
    }

    async fn release_lines(&self, lines: &[StockLine]) -> Result<()> {
        let wanted = totals(lines);
        let result = self.run_batch(wanted.keys().cloned().collect::<Vec<_>>().into_iter(), |scratch| {
            apply_release(scratch, &wanted)
        });
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "batch release rejected");
        }
        result
    }

    async fn commit_lines(&self, lines: &[StockLine]) -> Result<()> {
        let wanted = totals(lines);
        let result = self.run_batch(wanted.keys().cloned().collect::<Vec<_>>().into_iter(), |scratch| {
            apply_commit(scratch, &wanted)
        });
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "batch commit rejected");
        }
        result
    }

    async fn replace_lines(&self, old: &[StockLine], new: &[StockLine]) -> Result<()> {
        let released = totals(old);
        let wanted = totals(new);
        let keys: Vec<StockKey> = released.keys().chain(wanted.keys()).cloned().collect();
        self.run_batch(keys.into_iter(), |scratch| {
            apply_release(scratch, &released)?;
            apply_reserve(scratch, &wanted)
        })
    }

    async fn available(&self, key: &StockKey) -> Result<u32> {
        self.state
            .read()
            .unwrap()
            .get(key)
            .map(|entry| entry.available)
            .ok_or_else(|| unknown(key))
    }

    async fn snapshot(&self, warehouse: &WarehouseId) -> Vec<StockLevel> {
        let state = self.state.read().unwrap();
        let mut levels: Vec<StockLevel> = state
            .iter()
            .filter(|(key, entry)| &key.warehouse == warehouse && entry.available > 0)
            .map(|(key, entry)| StockLevel {
                product: key.product.clone(),
                available: entry.available,
                low_stock: entry.is_low(),
            })
            .collect();
        levels.sort_by(|a, b| a.product.cmp(&b.product));
        levels
    }
}
