//! # Dealer Insights Analytics
//!
//! The computation core of the workspace: three independent, stateless units
//! that turn the raw dataset into dashboard-ready figures.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of storage,
//!   HTTP or configuration. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every operation takes the backing records as slices and
//!   returns freshly built values. Nothing is cached between calls; a forecast run
//!   hands its result back to the caller instead of storing it.
//! - **Default-fill, never fail:** Missing joins, empty groups and zero denominators
//!   resolve to documented defaults (`DealerProfile::unknown`, zero sold units,
//!   zero turnover, zero or last-observed forecast).
//!
//! ## Public API
//!
//! - `DealerAggregator` / `generate_chart`: per-dealer sales summaries for a period.
//! - `ForecastEngine` / `get_forecast`: linear-trend demand forecasts per (dealer, product).
//! - `TurnoverReporter`: inventory turnover per (dealer, model).

pub mod aggregator;
pub mod chart;
pub mod filters;
pub mod forecast;
pub mod report;
pub mod turnover;
pub mod util;

pub use aggregator::{DealerAggregator, DealerProfile};
pub use chart::generate_chart;
pub use filters::{ALL, DealerFilters, ForecastFilters, TurnoverFilters};
pub use forecast::{
    Clock, DemandModel, FixedClock, ForecastEngine, IdGenerator, LinearTrendModel, SequentialIds,
    SystemClock, UuidIds, get_forecast,
};
pub use report::{
    AggregatedDealerStat, BarChartEntry, ChartData, ChartSummary, ForecastRecord, PieChartEntry,
    TurnoverRow,
};
pub use turnover::TurnoverReporter;
