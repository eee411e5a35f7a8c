//! Inventory domain logic
//!
//! - [`lot`] - lot identifier generation and normalization
//! - [`fifo`] - lot selection and consumption ordering over stock rows
//! - [`reconcile`] - the write engine tying products, lots and stock together

pub mod fifo;
pub mod lot;
pub mod reconcile;

pub use reconcile::{Inventory, LineOrder, LinePlanItem, StockWrite};
