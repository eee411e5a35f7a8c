//! Snapshot cache over the remote store
//!
//! Every read path in the service goes through here. A snapshot is the
//! cleaned catalog plus the cleaned stock rows, fetched together and
//! replaced wholesale; a single mutex guards the snapshot and its fetch
//! timestamp. The fetch itself runs outside the lock so a slow store never
//! blocks readers that can be served from cache.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::store::{StoreHandle, StoreResult, TabularStore};
use shared::models::stock::FIRST_DATA_ROW;
use shared::{ProductRecord, StockRow};

/// Default snapshot time-to-live
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// One consistent view of the catalog and the stock sheet
#[derive(Default)]
pub struct Snapshot {
    pub products: Vec<ProductRecord>,
    pub stock: Vec<StockRow>,
    /// Present only when this snapshot came from a successful fetch
    pub handle: Option<StoreHandle>,
}

impl Snapshot {
    /// Case-insensitive catalog lookup by trimmed name
    pub fn find_product(&self, name: &str) -> Option<&ProductRecord> {
        self.products.iter().find(|p| p.matches_name(name))
    }
}

struct Inner {
    snapshot: Arc<Snapshot>,
    fetched_at: Option<Instant>,
}

/// Cache state for the status endpoint
#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub cached: bool,
    pub age_secs: Option<u64>,
    pub ttl_secs: u64,
    pub products: usize,
    pub stock_rows: usize,
}

/// TTL cache holding the latest [`Snapshot`]
pub struct SnapshotCache {
    store: Arc<dyn TabularStore>,
    ttl: Duration,
    inner: Mutex<Inner>,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn TabularStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            inner: Mutex::new(Inner {
                snapshot: Arc::new(Snapshot::default()),
                fetched_at: None,
            }),
        }
    }

    /// Read the current snapshot, fetching from the store when stale
    ///
    /// A valid snapshot is returned without touching the store. On fetch
    /// failure the previous snapshot is served stale (the error is only
    /// logged); callers detect the never-fetched case through the absent
    /// handle.
    pub async fn read(&self, force_refresh: bool) -> Arc<Snapshot> {
        {
            let inner = self.inner.lock();
            if !force_refresh
                && let Some(at) = inner.fetched_at
                && at.elapsed() < self.ttl
            {
                debug!("snapshot served from cache");
                return inner.snapshot.clone();
            }
        }

        match self.fetch().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                let mut inner = self.inner.lock();
                inner.snapshot = snapshot.clone();
                inner.fetched_at = Some(Instant::now());
                info!(
                    products = snapshot.products.len(),
                    stock_rows = snapshot.stock.len(),
                    "snapshot refreshed"
                );
                snapshot
            }
            Err(e) => {
                let inner = self.inner.lock();
                if inner.snapshot.handle.is_some() {
                    warn!(error = %e, "store fetch failed, serving stale snapshot");
                } else {
                    warn!(error = %e, "store fetch failed and no snapshot cached");
                }
                inner.snapshot.clone()
            }
        }
    }

    /// Drop freshness so the next read refetches
    ///
    /// Clears only the timestamp; the data stays available as a stale
    /// fallback.
    pub fn invalidate(&self) {
        self.inner.lock().fetched_at = None;
        debug!("snapshot invalidated");
    }

    /// Current cache state
    pub fn status(&self) -> CacheStatus {
        let inner = self.inner.lock();
        CacheStatus {
            cached: inner.fetched_at.is_some(),
            age_secs: inner.fetched_at.map(|at| at.elapsed().as_secs()),
            ttl_secs: self.ttl.as_secs(),
            products: inner.snapshot.products.len(),
            stock_rows: inner.snapshot.stock.len(),
        }
    }

    async fn fetch(&self) -> StoreResult<Snapshot> {
        let handle = self.store.open_catalog().await?;

        let records = self.store.read_products(&handle).await?;
        let products: Vec<ProductRecord> = records
            .iter()
            .filter_map(ProductRecord::from_record)
            .collect();

        let raw_rows = self.store.read_stock_rows(&handle).await?;
        let stock: Vec<StockRow> = raw_rows
            .iter()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let row_id = idx as u32 + 1;
                if row_id < FIRST_DATA_ROW {
                    return None;
                }
                StockRow::from_raw(row_id, raw)
            })
            .collect();

        Ok(Snapshot {
            products,
            stock,
            handle: Some(handle),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn raw(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn seeded_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_data(
            vec![
                raw(&["PRODUCT", "CATEGORY", "CODE"]),
                raw(&["Yogurt", "external", "YO"]),
                raw(&["", "", ""]),
            ],
            vec![
                raw(&["Product", "Qty", "Pack", "", "Lot", "Expiry", "Start"]),
                raw(&["Yogurt", "5", "bag", "", "L123", "2024-03-10", "2024-03-01"]),
                raw(&["Yogurt", "0"]),
            ],
        ))
    }

    #[tokio::test]
    async fn test_fetch_cleans_rows() {
        let store = seeded_store();
        let cache = SnapshotCache::new(store, DEFAULT_TTL);

        let snap = cache.read(false).await;
        assert!(snap.handle.is_some());
        assert_eq!(snap.products.len(), 1);
        // Zero-quantity row is dropped
        assert_eq!(snap.stock.len(), 1);
        assert_eq!(snap.stock[0].row_id, 2);
    }

    #[tokio::test]
    async fn test_valid_snapshot_serves_without_fetch() {
        let store = seeded_store();
        let cache = SnapshotCache::new(store.clone(), DEFAULT_TTL);

        cache.read(false).await;
        let after_first = store.read_count();
        cache.read(false).await;
        cache.read(false).await;
        assert_eq!(store.read_count(), after_first);
    }

    #[tokio::test]
    async fn test_force_refresh_refetches() {
        let store = seeded_store();
        let cache = SnapshotCache::new(store.clone(), DEFAULT_TTL);

        cache.read(false).await;
        let after_first = store.read_count();
        cache.read(true).await;
        assert!(store.read_count() > after_first);
    }

    #[tokio::test]
    async fn test_invalidate_forces_single_refetch() {
        let store = seeded_store();
        let cache = SnapshotCache::new(store.clone(), DEFAULT_TTL);

        cache.read(false).await;
        let after_first = store.read_count();

        cache.invalidate();
        cache.read(false).await;
        let after_second = store.read_count();
        assert!(after_second > after_first);

        // Fresh again: no further fetch
        cache.read(false).await;
        assert_eq!(store.read_count(), after_second);
    }

    #[tokio::test]
    async fn test_stale_fallback_on_outage() {
        let store = seeded_store();
        let cache = SnapshotCache::new(store.clone(), DEFAULT_TTL);

        cache.read(false).await;
        store.set_fail_reads(true);
        cache.invalidate();

        let snap = cache.read(false).await;
        assert!(snap.handle.is_some());
        assert_eq!(snap.stock.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_snapshot_when_never_fetched() {
        let store = seeded_store();
        store.set_fail_reads(true);
        let cache = SnapshotCache::new(store, DEFAULT_TTL);

        let snap = cache.read(false).await;
        assert!(snap.handle.is_none());
        assert!(snap.products.is_empty());
        assert!(snap.stock.is_empty());
    }

    #[tokio::test]
    async fn test_status_reports_state() {
        let store = seeded_store();
        let cache = SnapshotCache::new(store, DEFAULT_TTL);

        let status = cache.status();
        assert!(!status.cached);
        assert_eq!(status.products, 0);

        cache.read(false).await;
        let status = cache.status();
        assert!(status.cached);
        assert_eq!(status.products, 1);
        assert_eq!(status.stock_rows, 1);
        assert_eq!(status.ttl_secs, 30);
    }
}
