//! # larder-printer
//!
//! TSPL label printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - TSPL command building for 58x40 mm label stock
//! - Deterministic label layout (name wrapping, font tiers)
//! - Network printing (TCP port 9100)
//! - Logo processing
//!
//! Business logic (WHAT ends up on a label) stays in application code:
//! - Lot resolution and stock reconciliation → larder-server
//!
//! ## Example
//!
//! ```ignore
//! use larder_printer::{LabelContent, NetworkPrinter, Printer, render_document};
//!
//! let label = LabelContent::new("Fresh Cream", "01/03/2024", "11/03/2024", "L010103 26FC");
//! let doc = render_document(&[(label, 2)], None);
//!
//! let printer = NetworkPrinter::new("192.168.1.50", 9100)?;
//! printer.print(&doc).await?;
//! ```

mod error;
mod layout;
mod printer;
mod tspl;

#[cfg(feature = "image")]
mod logo;

// Re-exports
pub use error::{PrintError, PrintResult};
pub use layout::{LabelContent, LabelFont, LabelOp, layout_label, render_document, wrap_name};
pub use printer::{NetworkPrinter, Printer};
pub use tspl::{DOTS_PER_MM, LABEL_HEIGHT_MM, LABEL_WIDTH_MM, LogoBitmap, TsplBuilder};

#[cfg(feature = "image")]
pub use logo::process_logo;
