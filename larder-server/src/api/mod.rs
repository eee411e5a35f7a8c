//! HTTP API modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`products`] - catalog listing
//! - [`stock`] - stock queries and mutations
//! - [`labels`] - label printing (single, line batch, reprint)
//! - [`cache`] - snapshot cache status and refresh

pub mod cache;
pub mod health;
pub mod labels;
pub mod products;
pub mod stock;
