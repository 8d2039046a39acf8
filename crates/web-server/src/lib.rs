use analytics::{ForecastEngine, IdGenerator, SequentialIds, SystemClock, UuidIds};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use configuration::{IdStrategy, Settings};
use database::DataRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;
pub mod session;

pub use session::ForecastCache;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub repo: DataRepository,
    pub forecasts: ForecastEngine,
    pub sessions: ForecastCache,
}

impl AppState {
    pub fn new(repo: DataRepository, settings: &Settings) -> Self {
        let ids: Arc<dyn IdGenerator> = match settings.forecast.id_strategy {
            IdStrategy::Sequential => Arc::new(SequentialIds::new()),
            IdStrategy::Uuid => Arc::new(UuidIds),
        };

        Self {
            repo,
            forecasts: ForecastEngine::new(ids, Arc::new(SystemClock)),
            sessions: ForecastCache::new(settings.forecast.max_sessions),
        }
    }
}

/// Builds the application router with its middleware stack.
pub fn build_router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/dealers", get(handlers::get_dealers))
        .route("/analytics/dealers", get(handlers::get_dealer_analytics))
        .route("/analytics/dealers/chart", get(handlers::get_dealer_chart))
        .route("/forecasts", get(handlers::get_forecasts))
        .route("/forecasts/run", post(handlers::run_forecast))
        .route("/reports/turnover", get(handlers::get_turnover_report))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

/// Loads the dataset and serves the API until the process is stopped.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let repo = database::load_dataset(settings.data.path.as_deref())?;
    let state = Arc::new(AppState::new(repo, &settings));
    let app = build_router(state, settings.server.body_limit_bytes);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
