use crate::filters::{TurnoverFilters, active};
use crate::report::TurnoverRow;
use crate::util::round_half_up;
use core_types::{InventorySnapshot, SoldQuantity};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Computes how much of its average inventory each (dealer, model) sold.
#[derive(Debug, Default)]
pub struct TurnoverReporter {}

impl TurnoverReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// One row per snapshot passing the dealer filter.
    ///
    /// Snapshots without a matching sold record count as zero sold. The turnover
    /// rate is `sold / ((begin + end) / 2) * 100` at one decimal place, and zero
    /// when average inventory is zero.
    pub fn inventory_turnover_report(
        &self,
        snapshots: &[InventorySnapshot],
        sold: &[SoldQuantity],
        filters: &TurnoverFilters,
    ) -> Vec<TurnoverRow> {
        if let Some(period) = filters.period.as_deref() {
            tracing::debug!(period, "Turnover snapshots are not period-scoped; ignoring period filter.");
        }
        let dealer_filter = active(filters.dealer_id.as_deref());

        let mut sold_by_model: HashMap<(&str, &str), u32> = HashMap::with_capacity(sold.len());
        for entry in sold {
            sold_by_model
                .entry((entry.dealer_id.as_str(), entry.model.as_str()))
                .or_insert(entry.sold);
        }

        snapshots
            .iter()
            .filter(|s| dealer_filter.is_none_or(|dealer_id| s.dealer_id == dealer_id))
            .map(|snapshot| {
                let sold = sold_by_model
                    .get(&(snapshot.dealer_id.as_str(), snapshot.model.as_str()))
                    .copied()
                    .unwrap_or(0);
                self.build_row(snapshot, sold)
            })
            .collect()
    }

    fn build_row(&self, snapshot: &InventorySnapshot, sold: u32) -> TurnoverRow {
        let average_inventory =
            ((Decimal::from(snapshot.begin_stock) + Decimal::from(snapshot.end_stock)) / Decimal::TWO).normalize();

        let turnover_rate = if average_inventory.is_zero() {
            Decimal::ZERO
        } else {
            round_half_up(Decimal::from(sold) / average_inventory * Decimal::ONE_HUNDRED, 1)
        };

        let stock_discrepancy = snapshot.stock_discrepancy(sold);
        if stock_discrepancy != 0 {
            tracing::warn!(
                dealer_id = %snapshot.dealer_id,
                model = %snapshot.model,
                stock_discrepancy,
                "Inventory snapshot does not balance against sold units."
            );
        }

        TurnoverRow {
            dealer_id: snapshot.dealer_id.clone(),
            model: snapshot.model.clone(),
            begin_stock: snapshot.begin_stock,
            imported: snapshot.imported,
            sold,
            end_stock: snapshot.end_stock,
            average_inventory,
            turnover_rate,
            stock_discrepancy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(dealer_id: &str, model: &str, begin: u32, imported: u32, end: u32) -> InventorySnapshot {
        InventorySnapshot {
            dealer_id: dealer_id.into(),
            model: model.into(),
            begin_stock: begin,
            imported,
            end_stock: end,
        }
    }

    fn sold(dealer_id: &str, model: &str, sold: u32) -> SoldQuantity {
        SoldQuantity {
            dealer_id: dealer_id.into(),
            model: model.into(),
            sold,
        }
    }

    #[test]
    fn turnover_rate_is_percentage_of_average_inventory() {
        let rows = TurnoverReporter::new().inventory_turnover_report(
            &[snapshot("DL001", "VF5", 15, 10, 8)],
            &[sold("DL001", "VF5", 17)],
            &TurnoverFilters::default(),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].average_inventory, dec!(11.5));
        assert_eq!(rows[0].turnover_rate, dec!(147.8));
        assert_eq!(rows[0].stock_discrepancy, 0);
        assert_eq!(rows[0].average_inventory.to_string(), "11.5");
        assert_eq!(rows[0].turnover_rate.to_string(), "147.8");
    }

    #[test]
    fn figures_carry_at_most_one_decimal() {
        let rows = TurnoverReporter::new().inventory_turnover_report(
            &[snapshot("DL004", "VF3", 2, 1, 1), snapshot("DL004", "VF6", 10, 0, 6)],
            &[sold("DL004", "VF3", 1), sold("DL004", "VF6", 4)],
            &TurnoverFilters::default(),
        );
        assert_eq!(rows[0].average_inventory.to_string(), "1.5");
        assert_eq!(rows[0].turnover_rate.to_string(), "66.7");
        assert_eq!(rows[1].average_inventory.to_string(), "8");
        assert_eq!(rows[1].turnover_rate.to_string(), "50");
    }

    #[test]
    fn empty_inventory_has_zero_turnover() {
        let rows = TurnoverReporter::new().inventory_turnover_report(
            &[snapshot("DL003", "VF5", 0, 4, 0)],
            &[sold("DL003", "VF5", 4)],
            &TurnoverFilters::default(),
        );
        assert_eq!(rows[0].turnover_rate, Decimal::ZERO);
        assert_eq!(rows[0].average_inventory, Decimal::ZERO);
    }

    #[test]
    fn missing_sold_record_counts_as_zero() {
        let rows = TurnoverReporter::new().inventory_turnover_report(
            &[snapshot("DL002", "VF8", 20, 0, 10)],
            &[sold("DL002", "VF5", 9), sold("DL001", "VF8", 9)],
            &TurnoverFilters::default(),
        );
        assert_eq!(rows[0].sold, 0);
        assert_eq!(rows[0].turnover_rate, Decimal::ZERO);
        assert_eq!(rows[0].stock_discrepancy, 10);
    }

    #[test]
    fn dealer_filter_is_exact_and_all_keeps_everything() {
        let snapshots = [
            snapshot("DL001", "VF5", 1, 0, 1),
            snapshot("DL002", "VF5", 1, 0, 1),
            snapshot("DL001", "VF8", 1, 0, 1),
        ];
        let reporter = TurnoverReporter::new();

        let filters = TurnoverFilters {
            dealer_id: Some("DL001".into()),
            period: None,
        };
        let models: Vec<_> = reporter
            .inventory_turnover_report(&snapshots, &[], &filters)
            .into_iter()
            .map(|r| r.model)
            .collect();
        assert_eq!(models, ["VF5", "VF8"]);

        let filters = TurnoverFilters {
            dealer_id: Some("ALL".into()),
            period: Some("2025-Q3".into()),
        };
        assert_eq!(reporter.inventory_turnover_report(&snapshots, &[], &filters).len(), 3);
    }
}
