use analytics::{
    AggregatedDealerStat, ChartData, DealerAggregator, DealerFilters, ForecastEngine, ForecastFilters, ForecastRecord,
    IdGenerator, SequentialIds, SystemClock, TurnoverFilters, TurnoverReporter, TurnoverRow, UuidIds,
    generate_chart, get_forecast,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{IdStrategy, Settings};
use core_types::Period;
use database::DataRepository;
use std::path::PathBuf;
use std::sync::Arc;

/// The main entry point for the Dealer Insights application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load DEALER_INSIGHTS__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = configuration::load_settings(&cli.config)
        .with_context(|| format!("Failed to load settings from {}", cli.config.display()))?;
    if let Some(path) = cli.data {
        settings.data.path = Some(path);
    }
    let _guard = configuration::init_tracing(&settings.logging)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, settings).await,
        Commands::Dealers(args) => handle_dealers(args, &settings, cli.json),
        Commands::Forecast(args) => handle_forecast(args, &settings, cli.json),
        Commands::Turnover(args) => handle_turnover(args, &settings, cli.json),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Dealer sales analytics, demand forecasting and inventory turnover.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML settings file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// JSON dataset file; overrides `data.path` from the settings.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Print JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API.
    Serve(ServeArgs),
    /// Per-dealer sales totals for a period.
    Dealers(DealersArgs),
    /// Run the demand forecast over all sales history.
    Forecast(ForecastArgs),
    /// Inventory turnover per dealer and model.
    Turnover(TurnoverArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct DealersArgs {
    /// The quarter to report on (e.g., "2025-Q3").
    #[arg(long)]
    period: Period,

    /// Only dealers in this region. "ALL" keeps every region.
    #[arg(long)]
    region: Option<String>,

    /// Case-insensitive match against dealer name or id.
    #[arg(long)]
    search: Option<String>,

    /// Print the chart summary instead of the rows.
    #[arg(long)]
    chart: bool,
}

#[derive(Parser)]
struct ForecastArgs {
    /// Only forecasts for this dealer. "ALL" keeps every dealer.
    #[arg(long)]
    dealer: Option<String>,

    /// Overrides `forecast.id_strategy`.
    #[arg(long, value_enum)]
    id_strategy: Option<IdStrategy>,
}

#[derive(Parser)]
struct TurnoverArgs {
    /// Only snapshots of this dealer. "ALL" keeps every dealer.
    #[arg(long)]
    dealer: Option<String>,

    /// Reporting quarter. Accepted for compatibility; snapshots are not period-scoped.
    #[arg(long)]
    period: Option<Period>,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.validate()?;
    web_server::run_server(settings).await
}

fn load_repository(settings: &Settings) -> anyhow::Result<DataRepository> {
    database::load_dataset(settings.data.path.as_deref()).context("Failed to load the dataset")
}

fn handle_dealers(args: DealersArgs, settings: &Settings, json: bool) -> anyhow::Result<()> {
    let repo = load_repository(settings)?;
    let filters = DealerFilters {
        region: args.region,
        search: args.search,
    };
    let rows = DealerAggregator::new(repo.dealers()).aggregate_by_dealer(repo.sales(), &args.period.to_string(), &filters);

    if args.chart {
        let chart = generate_chart(&rows);
        if json {
            println!("{}", serde_json::to_string_pretty(&chart)?);
        } else {
            println!("{}", chart_table(&chart));
        }
    } else if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{}", dealer_table(&rows));
    }
    Ok(())
}

fn handle_forecast(args: ForecastArgs, settings: &Settings, json: bool) -> anyhow::Result<()> {
    let repo = load_repository(settings)?;
    let ids: Arc<dyn IdGenerator> = match args.id_strategy.unwrap_or(settings.forecast.id_strategy) {
        IdStrategy::Sequential => Arc::new(SequentialIds::new()),
        IdStrategy::Uuid => Arc::new(UuidIds),
    };
    let run = ForecastEngine::new(ids, Arc::new(SystemClock)).run_demand_forecast(repo.sales());
    let records = get_forecast(&run, &ForecastFilters { dealer_id: args.dealer });

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        println!("{}", forecast_table(&records));
    }
    Ok(())
}

fn handle_turnover(args: TurnoverArgs, settings: &Settings, json: bool) -> anyhow::Result<()> {
    let repo = load_repository(settings)?;
    let filters = TurnoverFilters {
        dealer_id: args.dealer,
        period: args.period.map(|p| p.to_string()),
    };
    let rows = TurnoverReporter::new().inventory_turnover_report(repo.inventory(), repo.sold(), &filters);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{}", turnover_table(&rows));
    }
    Ok(())
}

// ==============================================================================
// Table Rendering
// ==============================================================================

fn dealer_table(rows: &[AggregatedDealerStat]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Dealer", "Name", "Region", "Quantity", "Revenue"]);
    for row in rows {
        table.add_row(vec![
            row.dealer_id.clone(),
            row.dealer_name.clone(),
            row.region.clone(),
            row.quantity.to_string(),
            row.revenue.to_string(),
        ]);
    }
    table
}

fn chart_table(chart: &ChartData) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Total revenue".to_string(), chart.summary.total_revenue.to_string()]);
    table.add_row(vec!["Total quantity".to_string(), chart.summary.total_quantity.to_string()]);
    table.add_row(vec!["Average revenue".to_string(), chart.summary.avg_revenue.to_string()]);
    for slice in &chart.pie_chart_data {
        table.add_row(vec![format!("Top: {}", slice.name), slice.value.to_string()]);
    }
    table
}

fn forecast_table(records: &[ForecastRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Id", "Dealer", "Product", "Period", "Predicted"]);
    for record in records {
        table.add_row(vec![
            record.forecast_id.clone(),
            record.dealer_id.clone(),
            record.product_id.clone(),
            record.forecast_period_start.to_string(),
            record.predicted_quantity.to_string(),
        ]);
    }
    table
}

fn turnover_table(rows: &[TurnoverRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Dealer", "Model", "Begin", "Imported", "Sold", "End", "Avg inventory", "Turnover %", "Gap",
    ]);
    for row in rows {
        table.add_row(vec![
            row.dealer_id.clone(),
            row.model.clone(),
            row.begin_stock.to_string(),
            row.imported.to_string(),
            row.sold.to_string(),
            row.end_stock.to_string(),
            row.average_inventory.to_string(),
            row.turnover_rate.to_string(),
            row.stock_discrepancy.to_string(),
        ]);
    }
    table
}
