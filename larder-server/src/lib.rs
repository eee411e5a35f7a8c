//! Larder Server - perishable stock tracking and label printing
//!
//! # Architecture
//!
//! The server sits between the kitchen tablets and a remote spreadsheet
//! store, adding the things the spreadsheet cannot do itself:
//!
//! - **Snapshot cache** (`cache`): TTL-coordinated reads with stale fallback
//! - **Inventory engine** (`inventory`): lot rules, FIFO selection, stock
//!   reconciliation
//! - **Remote store** (`store`): spreadsheet REST client + in-memory double
//! - **HTTP API** (`api`): thin axum handlers over the engine
//!
//! # Module structure
//!
//! ```text
//! larder-server/src/
//! ├── core/          # config, state, server
//! ├── store/         # remote tabular store access
//! ├── cache/         # snapshot cache
//! ├── inventory/     # lot, FIFO and reconciliation logic
//! ├── api/           # HTTP routes and handlers
//! ├── routes.rs      # router assembly, middleware
//! └── utils/         # logging setup
//! ```

pub mod api;
pub mod cache;
pub mod core;
pub mod inventory;
pub mod routes;
pub mod store;
pub mod utils;

pub use cache::{Snapshot, SnapshotCache};
pub use core::{Config, Server, ServerState};
pub use inventory::Inventory;
pub use store::{MemoryStore, SheetStore, StoreError, TabularStore};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: dotenv, then logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __                   __
   / /   ____ __________/ /__  _____
  / /   / __ `/ ___/ __  / _ \/ ___/
 / /___/ /_/ / /  / /_/ /  __/ /
/_____/\__,_/_/   \__,_/\___/_/
    "#
    );
}
