use serde::Deserialize;

/// Sentinel accepted by every filter meaning "do not filter on this field".
pub const ALL: &str = "ALL";

/// Returns the filter value to apply, treating absent, blank and `ALL` as no filter.
pub(crate) fn active(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty() && *v != ALL)
}

/// Filters for `DealerAggregator::aggregate_by_dealer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerFilters {
    pub region: Option<String>,
    pub search: Option<String>,
}

/// Filters for `get_forecast`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastFilters {
    pub dealer_id: Option<String>,
}

/// Filters for `TurnoverReporter::inventory_turnover_report`.
///
/// `period` is accepted for forward compatibility; snapshots carry no period yet,
/// so it has no effect on the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoverFilters {
    pub dealer_id: Option<String>,
    pub period: Option<String>,
}
