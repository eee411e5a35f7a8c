//! Server utilities

pub mod logger;
