//! Server state composition root
//!
//! Builds and owns every service the handlers need. Cloning is cheap;
//! everything heavy sits behind an `Arc`.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::cache::SnapshotCache;
use crate::core::Config;
use crate::inventory::Inventory;
use crate::store::{MemoryStore, SheetStore, TabularStore};
use larder_printer::{LogoBitmap, NetworkPrinter};

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Arc<dyn TabularStore>,
    pub cache: Arc<SnapshotCache>,
    pub inventory: Arc<Inventory>,
    /// Network label printer, when one is configured
    pub printer: Option<NetworkPrinter>,
    /// Rasterized logo for labels, when configured and readable
    pub logo: Option<Arc<LogoBitmap>>,
}

impl ServerState {
    /// Build the full state from configuration
    pub async fn initialize(config: &Config) -> Self {
        let store: Arc<dyn TabularStore> = match SheetStore::from_config(config) {
            Some(sheets) => {
                info!(base_url = %config.store_base_url, "using remote spreadsheet store");
                Arc::new(sheets)
            }
            None => {
                warn!("store credentials not configured, using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        let cache = Arc::new(SnapshotCache::new(
            store.clone(),
            Duration::from_secs(config.cache_ttl_secs),
        ));
        let inventory = Arc::new(Inventory::new(store.clone(), cache.clone()));

        let printer = config.printer_addr.as_deref().and_then(|addr| {
            match NetworkPrinter::from_addr(addr) {
                Ok(p) => {
                    info!(addr = %addr, "label printer configured");
                    Some(p)
                }
                Err(e) => {
                    warn!(addr = %addr, error = %e, "invalid printer address, printing disabled");
                    None
                }
            }
        });

        let logo = config
            .logo_path
            .as_deref()
            .and_then(larder_printer::process_logo)
            .map(Arc::new);

        Self {
            config: Arc::new(config.clone()),
            store,
            cache,
            inventory,
            printer,
            logo,
        }
    }

    /// Warm the cache with one forced read; failure is logged, not fatal
    pub async fn preload_cache(&self) {
        let snapshot = self.cache.read(true).await;
        if snapshot.handle.is_some() {
            info!(
                products = snapshot.products.len(),
                stock_rows = snapshot.stock.len(),
                "cache preloaded"
            );
        } else {
            warn!("cache preload failed, first request will retry");
        }
    }

    /// State over a seeded in-memory store, for tests
    #[cfg(test)]
    pub fn for_tests(store: Arc<MemoryStore>) -> Self {
        let cache = Arc::new(SnapshotCache::new(
            store.clone() as Arc<dyn TabularStore>,
            Duration::from_secs(3600),
        ));
        let inventory = Arc::new(Inventory::new(store.clone(), cache.clone()));
        Self {
            config: Arc::new(Config {
                http_port: 0,
                environment: "test".into(),
                store_base_url: String::new(),
                spreadsheet_id: None,
                store_api_token: None,
                products_range: "Products".into(),
                stock_range: "Stock".into(),
                stock_sheet_gid: 0,
                cache_ttl_secs: 3600,
                request_timeout_ms: 1000,
                printer_addr: None,
                logo_path: None,
            }),
            store,
            cache,
            inventory,
            printer: None,
            logo: None,
        }
    }
}
