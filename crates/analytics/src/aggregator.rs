use crate::filters::{DealerFilters, active};
use crate::report::AggregatedDealerStat;
use core_types::{Dealer, Period, SalesRecord};
use std::collections::HashMap;

/// Region reported for sales whose dealer is missing from the dealer list.
pub const UNKNOWN_REGION: &str = "Unknown";

/// The display attributes a sales record is filtered and grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealerProfile<'a> {
    pub name: &'a str,
    pub region: &'a str,
}

impl<'a> DealerProfile<'a> {
    /// Profile used when a sales record references a dealer that does not exist:
    /// the id doubles as the name and the region is `Unknown`.
    pub fn unknown(dealer_id: &'a str) -> Self {
        Self {
            name: dealer_id,
            region: UNKNOWN_REGION,
        }
    }

    pub fn resolve(dealer: Option<&'a Dealer>, dealer_id: &'a str) -> Self {
        match dealer {
            Some(dealer) => Self {
                name: &dealer.name,
                region: &dealer.region,
            },
            None => Self::unknown(dealer_id),
        }
    }
}

/// Groups a period's sales by dealer.
///
/// Built once over the dealer list so the per-record join is a hash lookup.
#[derive(Debug)]
pub struct DealerAggregator<'a> {
    dealers: HashMap<&'a str, &'a Dealer>,
}

impl<'a> DealerAggregator<'a> {
    pub fn new(dealers: &'a [Dealer]) -> Self {
        let mut index = HashMap::with_capacity(dealers.len());
        for dealer in dealers {
            // First definition wins, matching a linear `find`.
            index.entry(dealer.dealer_id.as_str()).or_insert(dealer);
        }
        Self { dealers: index }
    }

    pub fn profile<'b>(&'b self, dealer_id: &'b str) -> DealerProfile<'b> {
        DealerProfile::resolve(self.dealers.get(dealer_id).copied(), dealer_id)
    }

    /// Sums quantity and revenue per dealer for exactly `period`, keeps the dealers
    /// passing the region and search filters, and orders them by revenue, highest first.
    ///
    /// A `period` that is not a well-formed `YYYY-Qn` label matches no record.
    /// Dealers with equal revenue keep their order of first appearance.
    pub fn aggregate_by_dealer(
        &self,
        sales: &[SalesRecord],
        period: &str,
        filters: &DealerFilters,
    ) -> Vec<AggregatedDealerStat> {
        let Ok(period) = period.parse::<Period>() else {
            tracing::debug!(period, "Period is not a quarter label, no sales match.");
            return Vec::new();
        };

        let region = active(filters.region.as_deref());
        let needle = filters.search.as_deref().unwrap_or_default().to_lowercase();

        let mut rows: Vec<AggregatedDealerStat> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for record in sales.iter().filter(|r| r.period == period) {
            let profile = self.profile(&record.dealer_id);

            if region.is_some_and(|region| profile.region != region) {
                continue;
            }
            if !needle.is_empty()
                && !profile.name.to_lowercase().contains(&needle)
                && !record.dealer_id.to_lowercase().contains(&needle)
            {
                continue;
            }

            let index = *positions.entry(record.dealer_id.as_str()).or_insert_with(|| {
                rows.push(AggregatedDealerStat {
                    dealer_id: record.dealer_id.clone(),
                    dealer_name: profile.name.to_string(),
                    region: profile.region.to_string(),
                    quantity: 0,
                    revenue: Default::default(),
                });
                rows.len() - 1
            });

            let row = &mut rows[index];
            row.quantity += u64::from(record.quantity);
            row.revenue = row.revenue.saturating_add(record.revenue);
        }

        rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));

        tracing::debug!(%period, dealers = rows.len(), "Aggregated dealer sales.");
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn dealer(id: &str, name: &str, region: &str) -> Dealer {
        Dealer {
            dealer_id: id.into(),
            name: name.into(),
            region: region.into(),
        }
    }

    fn sale(dealer_id: &str, product: &str, period: &str, quantity: u32, revenue: rust_decimal::Decimal) -> SalesRecord {
        SalesRecord::new(dealer_id, product, period.parse().unwrap(), quantity, revenue).unwrap()
    }

    fn dealers() -> Vec<Dealer> {
        vec![
            dealer("DL001", "Hanoi Motors", "North"),
            dealer("DL002", "Saigon Auto", "South"),
            dealer("DL003", "Da Nang Cars", "Central"),
            dealer("DL004", "Hai Phong Auto", "North"),
            dealer("DL005", "Can Tho Motors", "South"),
        ]
    }

    fn sales() -> Vec<SalesRecord> {
        vec![
            sale("DL001", "VF5", "2025-Q3", 120, dec!(60_000_000)),
            sale("DL002", "VF8", "2025-Q3", 160, dec!(80_000_000)),
            sale("DL002", "VF5", "2025-Q3", 40, dec!(20_000_000)),
            sale("DL003", "VF5", "2025-Q3", 90, dec!(45_000_000)),
            sale("DL004", "VF8", "2025-Q3", 60, dec!(36_000_000)),
            sale("DL005", "VF5", "2025-Q3", 80, dec!(44_000_000)),
            sale("DL001", "VF5", "2025-Q2", 100, dec!(50_000_000)),
            sale("DL999", "VF5", "2025-Q2", 10, dec!(5_000_000)),
        ]
    }

    fn ids(rows: &[AggregatedDealerStat]) -> Vec<&str> {
        rows.iter().map(|r| r.dealer_id.as_str()).collect()
    }

    #[test]
    fn orders_dealers_by_descending_revenue() {
        let dealers = dealers();
        let aggregator = DealerAggregator::new(&dealers);
        let filters = DealerFilters {
            region: Some("ALL".into()),
            search: Some(String::new()),
        };

        let rows = aggregator.aggregate_by_dealer(&sales(), "2025-Q3", &filters);

        assert_eq!(ids(&rows), ["DL002", "DL001", "DL003", "DL005", "DL004"]);
        assert_eq!(rows[0].revenue, dec!(100_000_000));
        assert_eq!(rows[0].quantity, 200);
        assert_eq!(rows[0].dealer_name, "Saigon Auto");
        assert!(rows.windows(2).all(|w| w[0].revenue >= w[1].revenue));
    }

    #[test]
    fn preserves_total_quantity_of_matching_records() {
        let dealers = dealers();
        let sales = sales();
        let rows = DealerAggregator::new(&dealers).aggregate_by_dealer(&sales, "2025-Q3", &DealerFilters::default());

        let input: u64 = sales
            .iter()
            .filter(|r| r.period.to_string() == "2025-Q3")
            .map(|r| u64::from(r.quantity))
            .sum();
        let output: u64 = rows.iter().map(|r| r.quantity).sum();
        assert_eq!(input, output);
    }

    #[test]
    fn filters_by_exact_region() {
        let dealers = dealers();
        let filters = DealerFilters {
            region: Some("North".into()),
            search: None,
        };
        let rows = DealerAggregator::new(&dealers).aggregate_by_dealer(&sales(), "2025-Q3", &filters);
        assert_eq!(ids(&rows), ["DL001", "DL004"]);

        let filters = DealerFilters {
            region: Some("north".into()),
            search: None,
        };
        assert!(DealerAggregator::new(&dealers).aggregate_by_dealer(&sales(), "2025-Q3", &filters).is_empty());
    }

    #[test]
    fn search_matches_name_or_id_case_insensitively() {
        let dealers = dealers();
        let aggregator = DealerAggregator::new(&dealers);

        let by_name = DealerFilters {
            region: None,
            search: Some("MOTORS".into()),
        };
        assert_eq!(ids(&aggregator.aggregate_by_dealer(&sales(), "2025-Q3", &by_name)), ["DL001", "DL005"]);

        let by_id = DealerFilters {
            region: None,
            search: Some("dl00".into()),
        };
        assert_eq!(aggregator.aggregate_by_dealer(&sales(), "2025-Q3", &by_id).len(), 5);
    }

    #[test]
    fn unknown_dealer_falls_back_to_id_and_unknown_region() {
        let dealers = dealers();
        let rows = DealerAggregator::new(&dealers).aggregate_by_dealer(&sales(), "2025-Q2", &DealerFilters::default());

        let unknown = rows.iter().find(|r| r.dealer_id == "DL999").unwrap();
        assert_eq!(unknown.dealer_name, "DL999");
        assert_eq!(unknown.region, UNKNOWN_REGION);

        let filters = DealerFilters {
            region: Some(UNKNOWN_REGION.into()),
            search: None,
        };
        let rows = DealerAggregator::new(&dealers).aggregate_by_dealer(&sales(), "2025-Q2", &filters);
        assert_eq!(ids(&rows), ["DL999"]);
    }

    #[test]
    fn unknown_profile_policy() {
        assert_eq!(
            DealerProfile::unknown("DL404"),
            DealerProfile {
                name: "DL404",
                region: "Unknown"
            }
        );
    }

    #[test]
    fn unmatched_or_malformed_period_yields_nothing() {
        let dealers = dealers();
        let aggregator = DealerAggregator::new(&dealers);
        assert!(aggregator.aggregate_by_dealer(&sales(), "2024-Q1", &DealerFilters::default()).is_empty());
        assert!(aggregator.aggregate_by_dealer(&sales(), "Q3-2025", &DealerFilters::default()).is_empty());
    }

    #[test]
    fn equal_revenue_keeps_first_appearance() {
        let dealers = dealers();
        let sales = vec![
            sale("DL004", "VF8", "2025-Q3", 1, dec!(100)),
            sale("DL001", "VF5", "2025-Q3", 1, dec!(100)),
        ];
        let rows = DealerAggregator::new(&dealers).aggregate_by_dealer(&sales, "2025-Q3", &DealerFilters::default());
        assert_eq!(ids(&rows), ["DL004", "DL001"]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let dealers = dealers();
        let sales = sales();
        let aggregator = DealerAggregator::new(&dealers);
        let filters = DealerFilters::default();
        assert_eq!(
            aggregator.aggregate_by_dealer(&sales, "2025-Q3", &filters),
            aggregator.aggregate_by_dealer(&sales, "2025-Q3", &filters)
        );
    }

    #[test]
    fn huge_revenues_saturate_instead_of_overflowing() {
        let dealers = dealers();
        let half = Decimal::MAX / Decimal::TWO + Decimal::ONE;
        let sales = vec![
            sale("DL001", "VF5", "2025-Q3", 1, half),
            sale("DL001", "VF8", "2025-Q3", 1, half),
        ];
        let rows = DealerAggregator::new(&dealers).aggregate_by_dealer(&sales, "2025-Q3", &DealerFilters::default());
        assert_eq!(rows[0].revenue, Decimal::MAX);
        assert_eq!(rows[0].quantity, 2);
    }
}
