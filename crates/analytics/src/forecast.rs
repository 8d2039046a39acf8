use crate::filters::{ForecastFilters, active};
use crate::report::ForecastRecord;
use crate::util::round_half_up;
use chrono::{DateTime, Utc};
use core_types::{ForecastKey, SalesRecord};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Predicts next-period demand from an ordered quantity history.
pub trait DemandModel: Send + Sync {
    fn predict(&self, history: &[u32]) -> u32;
}

/// Single-step linear-trend extrapolation.
///
/// - no history: 0
/// - one observation: that observation
/// - otherwise: the last observation plus the mean period-over-period change,
///   rounded half up and never below zero
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrendModel;

impl DemandModel for LinearTrendModel {
    fn predict(&self, history: &[u32]) -> u32 {
        let Some(&last) = history.last() else {
            return 0;
        };
        if history.len() < 2 {
            return last;
        }

        let growth: Decimal = history
            .windows(2)
            .map(|w| Decimal::from(i64::from(w[1]) - i64::from(w[0])))
            .sum::<Decimal>()
            / Decimal::from(history.len() - 1);

        let predicted = round_half_up(Decimal::from(last) + growth, 0).max(Decimal::ZERO);
        predicted.to_u32().unwrap_or(u32::MAX)
    }
}

/// Source of forecast identifiers. Ids must be unique within a run.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Monotonic ids of the form `FC-000001`.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("FC-{n:06}")
    }
}

/// Random v4 UUID ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Produces one demand forecast per (dealer, product) sales history.
///
/// The engine holds no results: every run returns its own record set, and
/// keeping a "last run" around is left to the caller.
pub struct ForecastEngine {
    model: Box<dyn DemandModel>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl ForecastEngine {
    /// An engine using the `LinearTrendModel`.
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self::with_model(Box::new(LinearTrendModel), ids, clock)
    }

    pub fn with_model(model: Box<dyn DemandModel>, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { model, ids, clock }
    }

    /// Forecasts the period after each group's latest observed period.
    ///
    /// Groups are emitted in order of first appearance in `sales`; within a group
    /// quantities are ordered by period before the model sees them.
    pub fn run_demand_forecast(&self, sales: &[SalesRecord]) -> Vec<ForecastRecord> {
        let mut groups: Vec<(ForecastKey, Vec<&SalesRecord>)> = Vec::new();
        let mut positions: HashMap<ForecastKey, usize> = HashMap::new();

        for record in sales {
            let key = record.forecast_key();
            match positions.get(&key) {
                Some(&index) => groups[index].1.push(record),
                None => {
                    positions.insert(key.clone(), groups.len());
                    groups.push((key, vec![record]));
                }
            }
        }

        let created_at = self.clock.now();
        let forecasts: Vec<ForecastRecord> = groups
            .into_iter()
            .filter_map(|(key, mut history)| {
                history.sort_by_key(|r| r.period);
                let last_period = history.last()?.period;
                let Some(forecast_period_start) = last_period.next() else {
                    tracing::warn!(
                        dealer_id = %key.dealer_id,
                        product_id = %key.product_id,
                        %last_period,
                        "No quarter follows the last observed period; skipping group."
                    );
                    return None;
                };
                let quantities: Vec<u32> = history.iter().map(|r| r.quantity).collect();

                Some(ForecastRecord {
                    forecast_id: self.ids.next_id(),
                    dealer_id: key.dealer_id,
                    product_id: key.product_id,
                    forecast_period_start,
                    predicted_quantity: self.model.predict(&quantities),
                    created_at,
                })
            })
            .collect();

        tracing::info!(groups = forecasts.len(), records = sales.len(), "Demand forecast run complete.");
        forecasts
    }
}

/// Narrows a forecast run to one dealer. `ALL` or no dealer keeps every record.
pub fn get_forecast(records: &[ForecastRecord], filters: &ForecastFilters) -> Vec<ForecastRecord> {
    match active(filters.dealer_id.as_deref()) {
        Some(dealer_id) => records.iter().filter(|r| r.dealer_id == dealer_id).cloned().collect(),
        None => records.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn sale(dealer_id: &str, product: &str, period: &str, quantity: u32) -> SalesRecord {
        SalesRecord::new(dealer_id, product, period.parse().unwrap(), quantity, dec!(0)).unwrap()
    }

    fn engine() -> ForecastEngine {
        let at = Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap();
        ForecastEngine::new(Arc::new(SequentialIds::new()), Arc::new(FixedClock(at)))
    }

    #[test]
    fn constant_growth_is_extrapolated() {
        assert_eq!(LinearTrendModel.predict(&[120, 140, 160]), 180);
    }

    #[test]
    fn short_histories_copy_the_last_value() {
        assert_eq!(LinearTrendModel.predict(&[50]), 50);
        assert_eq!(LinearTrendModel.predict(&[]), 0);
    }

    #[test]
    fn declining_demand_never_goes_negative() {
        assert_eq!(LinearTrendModel.predict(&[100, 40, 5]), 0);
        assert_eq!(LinearTrendModel.predict(&[100, 90]), 80);
    }

    #[test]
    fn mean_growth_is_rounded_half_up() {
        // diffs 1 and 2, mean 1.5, 12 + 1.5 = 13.5
        assert_eq!(LinearTrendModel.predict(&[9, 10, 12]), 14);
    }

    #[test]
    fn one_forecast_per_dealer_product_group() {
        let sales = vec![
            sale("DL001", "VF5", "2025-Q3", 160),
            sale("DL002", "VF8", "2025-Q1", 10),
            sale("DL001", "VF5", "2025-Q1", 120),
            sale("DL001", "VF8", "2025-Q2", 7),
            sale("DL001", "VF5", "2025-Q2", 140),
        ];

        let forecasts = engine().run_demand_forecast(&sales);

        let keys: Vec<_> = forecasts.iter().map(|f| (f.dealer_id.as_str(), f.product_id.as_str())).collect();
        assert_eq!(keys, [("DL001", "VF5"), ("DL002", "VF8"), ("DL001", "VF8")]);

        // periods are reordered before fitting the trend
        assert_eq!(forecasts[0].predicted_quantity, 180);
        assert_eq!(forecasts[0].forecast_period_start.to_string(), "2025-Q4");
        assert_eq!(forecasts[1].predicted_quantity, 10);
        assert_eq!(forecasts[1].forecast_period_start.to_string(), "2025-Q2");
    }

    #[test]
    fn ids_are_unique_and_sequential() {
        let sales = vec![
            sale("DL001", "VF5", "2025-Q1", 1),
            sale("DL002", "VF5", "2025-Q1", 1),
            sale("DL003", "VF5", "2025-Q1", 1),
        ];
        let forecasts = engine().run_demand_forecast(&sales);

        let ids: HashSet<_> = forecasts.iter().map(|f| f.forecast_id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(forecasts[0].forecast_id, "FC-000001");
        assert_eq!(forecasts[2].forecast_id, "FC-000003");
    }

    #[test]
    fn history_ending_in_the_last_representable_quarter_is_skipped() {
        let sales = vec![
            sale("DL001", "VF5", "9999-Q3", 10),
            sale("DL001", "VF5", "9999-Q4", 12),
            sale("DL002", "VF5", "9999-Q3", 4),
        ];
        let forecasts = engine().run_demand_forecast(&sales);

        assert_eq!(forecasts.len(), 1);
        assert_eq!(forecasts[0].dealer_id, "DL002");
        assert_eq!(forecasts[0].forecast_period_start.to_string(), "9999-Q4");
    }

    #[test]
    fn uuid_ids_are_unique() {
        let ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn empty_history_gives_empty_run() {
        assert!(engine().run_demand_forecast(&[]).is_empty());
    }

    #[test]
    fn get_forecast_filters_by_dealer() {
        let sales = vec![sale("DL001", "VF5", "2025-Q1", 1), sale("DL002", "VF5", "2025-Q1", 1)];
        let forecasts = engine().run_demand_forecast(&sales);

        let only = get_forecast(
            &forecasts,
            &ForecastFilters {
                dealer_id: Some("DL002".into()),
            },
        );
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].dealer_id, "DL002");

        let all = get_forecast(
            &forecasts,
            &ForecastFilters {
                dealer_id: Some("ALL".into()),
            },
        );
        assert_eq!(all, forecasts);
        assert!(get_forecast(&[], &ForecastFilters::default()).is_empty());
    }
}
