use crate::{AppState, error::AppError, session::session_id};
use analytics::{
    AggregatedDealerStat, ChartData, DealerAggregator, DealerFilters, ForecastFilters, ForecastRecord,
    TurnoverFilters, TurnoverReporter, TurnoverRow, generate_chart, get_forecast,
};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, Uri},
};
use core_types::{CoreError, Dealer, Period};
use serde::Deserialize;
use std::sync::Arc;

/// Query string of the dealer analytics endpoints.
#[derive(Debug, Deserialize)]
pub struct DealerAnalyticsQuery {
    pub period: Option<String>,
    pub region: Option<String>,
    pub search: Option<String>,
}

impl DealerAnalyticsQuery {
    /// The period is required here and must be a `YYYY-Qn` label.
    fn period(&self) -> Result<Period, CoreError> {
        self.period
            .as_deref()
            .ok_or_else(|| CoreError::validation("period", "is required"))?
            .parse()
    }

    fn filters(self) -> DealerFilters {
        DealerFilters {
            region: self.region,
            search: self.search,
        }
    }
}

fn aggregate(state: &AppState, query: DealerAnalyticsQuery) -> Result<Vec<AggregatedDealerStat>, AppError> {
    let period = query.period()?.to_string();
    let filters = query.filters();
    tracing::debug!(%period, ?filters, "Aggregating dealer sales.");

    let aggregator = DealerAggregator::new(state.repo.dealers());
    Ok(aggregator.aggregate_by_dealer(state.repo.sales(), &period, &filters))
}

/// # GET /dealers
pub async fn get_dealers(State(state): State<Arc<AppState>>) -> Json<Vec<Dealer>> {
    Json(state.repo.dealers().to_vec())
}

/// # GET /analytics/dealers
/// Per-dealer sales totals for a period, highest revenue first.
pub async fn get_dealer_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DealerAnalyticsQuery>,
) -> Result<Json<Vec<AggregatedDealerStat>>, AppError> {
    Ok(Json(aggregate(&state, query)?))
}

/// # GET /analytics/dealers/chart
/// The same aggregation shaped for the dashboard charts.
pub async fn get_dealer_chart(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DealerAnalyticsQuery>,
) -> Result<Json<ChartData>, AppError> {
    let rows = aggregate(&state, query)?;
    Ok(Json(generate_chart(&rows)))
}

/// # POST /forecasts/run
/// Recomputes every forecast and keeps the result as the caller's last run.
pub async fn run_forecast(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<Vec<ForecastRecord>> {
    let session = session_id(&headers);
    let records = state.forecasts.run_demand_forecast(state.repo.sales());

    state.sessions.store(&session, records.clone()).await;
    tracing::info!(%session, forecasts = records.len(), "Stored forecast run.");
    Json(records)
}

/// # GET /forecasts
/// The caller's last forecast run, optionally narrowed to one dealer.
pub async fn get_forecasts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(filters): Query<ForecastFilters>,
) -> Json<Vec<ForecastRecord>> {
    let session = session_id(&headers);
    let last_run = state.sessions.last_run(&session).await;
    Json(get_forecast(&last_run, &filters))
}

/// # GET /reports/turnover
pub async fn get_turnover_report(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<TurnoverFilters>,
) -> Result<Json<Vec<TurnoverRow>>, AppError> {
    // A blank period means "no period", as for the dealer filter.
    if let Some(period) = filters.period.as_deref().filter(|p| !p.trim().is_empty()) {
        period.parse::<Period>()?;
    }

    let rows = TurnoverReporter::new().inventory_turnover_report(state.repo.inventory(), state.repo.sold(), &filters);
    Ok(Json(rows))
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}
