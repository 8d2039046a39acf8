//! # Dealer Insights Data Layer
//!
//! This crate is the application's backing store: an immutable, in-memory
//! dataset of dealers, sales, inventory snapshots and sold quantities.
//!
//! ## Architectural Principles
//!
//! - **Layer 2 Adapter:** Everything above this crate reads records through
//!   `DataRepository` and never builds datasets itself. Swapping the in-memory
//!   store for a real persistence layer only touches this crate.
//! - **Validated on entry:** A `Dataset` is checked once when the repository is
//!   built (non-negative revenue, unique dealer ids); readers can trust it afterwards.
//! - **Cheap to share:** The repository wraps the dataset in an `Arc` so request
//!   handlers clone it freely.
//!
//! ## Public API
//!
//! - `load_dataset`: Reads a JSON dataset file, or falls back to the seed data.
//! - `DataRepository`: Read access to the validated dataset.
//! - `seed_dataset`: The built-in sample dataset.
//! - `DbError`: The specific error types that can be returned from this crate.

pub mod error;
pub mod loader;
pub mod repository;
pub mod seed;

pub use error::DbError;
pub use loader::load_dataset;
pub use repository::{DataRepository, Dataset};
pub use seed::seed_dataset;
