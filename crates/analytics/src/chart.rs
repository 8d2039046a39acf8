use crate::report::{AggregatedDealerStat, BarChartEntry, ChartData, ChartSummary, PieChartEntry};
use crate::util::round_half_up;
use rust_decimal::Decimal;

/// Number of slices in the revenue-share pie chart.
pub const PIE_CHART_SLICES: usize = 5;

/// Shapes aggregated dealer rows for the dashboard charts.
///
/// The pie chart takes the first `PIE_CHART_SLICES` rows as given; callers pass
/// rows already ordered by revenue (the output of `aggregate_by_dealer`).
pub fn generate_chart(rows: &[AggregatedDealerStat]) -> ChartData {
    let bar_chart_data = rows
        .iter()
        .map(|row| BarChartEntry {
            name: row.dealer_name.clone(),
            revenue: row.revenue,
            quantity: row.quantity,
        })
        .collect();

    let pie_chart_data = rows
        .iter()
        .take(PIE_CHART_SLICES)
        .map(|row| PieChartEntry {
            name: row.dealer_name.clone(),
            value: row.revenue,
        })
        .collect();

    let total_revenue = rows
        .iter()
        .fold(Decimal::ZERO, |total, row| total.saturating_add(row.revenue));
    let total_quantity: u64 = rows.iter().map(|row| row.quantity).sum();
    let avg_revenue = if rows.is_empty() {
        Decimal::ZERO
    } else {
        round_half_up(total_revenue / Decimal::from(rows.len()), 0)
    };

    ChartData {
        bar_chart_data,
        pie_chart_data,
        summary: ChartSummary {
            total_revenue,
            total_quantity,
            avg_revenue,
        },
    }
}
