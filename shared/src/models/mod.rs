//! Domain models
//!
//! - [`product`] - catalog products and free-text field canonicalization
//! - [`stock`] - stock rows and raw-sheet cleaning
//! - [`label`] - label copy limits

pub mod label;
pub mod product;
pub mod stock;

pub use product::{Category, ProductRecord, Record, parse_truthy};
pub use stock::{StockRow, StockSummary};
