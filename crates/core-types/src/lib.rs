//! # Dealer Insights Core Types
//!
//! The shared vocabulary of the workspace: the records read from the backing
//! dataset (`SalesRecord`, `Dealer`, `InventorySnapshot`, `SoldQuantity`), the
//! reporting `Period`, and the composite `ForecastKey`.
//!
//! As a Layer 0 crate it has no knowledge of storage, HTTP or configuration.

pub mod error;
pub mod period;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use period::Period;
pub use structs::{Dealer, ForecastKey, InventorySnapshot, SalesRecord, SoldQuantity};
