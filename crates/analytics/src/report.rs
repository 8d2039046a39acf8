use chrono::{DateTime, Utc};
use core_types::Period;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Summed sales of one dealer for a period, as shown on the dealer dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDealerStat {
    pub dealer_id: String,
    pub dealer_name: String,
    pub region: String,
    pub quantity: u64,
    pub revenue: Decimal,
}

/// One bar of the revenue/quantity bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChartEntry {
    pub name: String,
    pub revenue: Decimal,
    pub quantity: u64,
}

/// One slice of the revenue-share pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieChartEntry {
    pub name: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSummary {
    pub total_revenue: Decimal,
    pub total_quantity: u64,
    pub avg_revenue: Decimal,
}

impl Default for ChartSummary {
    fn default() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            total_quantity: 0,
            avg_revenue: Decimal::ZERO,
        }
    }
}

/// Chart-ready view of a set of `AggregatedDealerStat` rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub bar_chart_data: Vec<BarChartEntry>,
    pub pie_chart_data: Vec<PieChartEntry>,
    pub summary: ChartSummary,
}

/// A predicted quantity for the period following a (dealer, product) history.
///
/// Records are derived on every run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    pub forecast_id: String,
    pub dealer_id: String,
    pub product_id: String,
    pub forecast_period_start: Period,
    pub predicted_quantity: u32,
    pub created_at: DateTime<Utc>,
}

/// Turnover of one model at one dealer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoverRow {
    pub dealer_id: String,
    pub model: String,
    pub begin_stock: u32,
    pub imported: u32,
    pub sold: u32,
    pub end_stock: u32,
    pub average_inventory: Decimal,
    /// Percentage of average inventory sold, one decimal place.
    pub turnover_rate: Decimal,
    /// `begin + imported - sold - end`; non-zero when the snapshot does not balance.
    pub stock_discrepancy: i64,
}
