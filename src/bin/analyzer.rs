use clap::{Parser, ValueEnum};
use std::env;
use tracing::info;
use worldline::{
    AnalysisPolicy, ChangeStrategy, Config, GraphClient, MeasurementSource, RankScope,
    ReportEngine, SortOrder,
};

/// Run one analytical view against the live graph source
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Which view to compute
    #[arg(value_enum)]
    view: View,

    /// Metric code or display name (required for the leaders view)
    #[arg(short, long)]
    metric: Option<String>,

    /// Aggregation scope for the leaders view
    #[arg(long, default_value = "countries")]
    scope: String,

    /// Sort direction: ASC or DESC
    #[arg(short, long, default_value = "DESC")]
    order: String,

    /// Delta strategy: relative or absolute
    #[arg(short, long, default_value = "relative")]
    strategy: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum View {
    /// Which metrics changed most across the population
    Movers,
    /// Leaders and laggards on one metric
    Leaders,
    /// Composite top performers across all metrics
    Top,
    /// Reference countries aligned against their neighbors
    Neighborhood,
    /// List country nodes
    Countries,
    /// List metric nodes
    Metrics,
    /// List region nodes
    Regions,
    /// List income-group nodes
    IncomeGroups,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let config = Config::load()?;
    worldline::utils::init_from_config(&config.logging);
    info!(dataset = %config.general.dataset, environment = %config.general.environment, "configuration loaded");

    let password = env::var("WORLDLINE_GRAPH_PASSWORD")
        .or_else(|_| env::var("NEO4J_PASSWORD"))
        .map_err(|_| anyhow::anyhow!("WORLDLINE_GRAPH_PASSWORD not found in environment"))?;

    let client = GraphClient::new(&config.source, password)?;
    client.test_connectivity().await?;
    info!(uri = %config.source.uri, "connected to graph source");

    // Metadata listings short-circuit before any snapshot fetch.
    match args.view {
        View::Countries => return print_json(&client.list_countries().await?),
        View::Metrics => return print_json(&client.list_metrics().await?),
        View::Regions => return print_json(&client.list_regions().await?),
        View::IncomeGroups => return print_json(&client.list_income_groups().await?),
        _ => {}
    }

    let order: SortOrder = args.order.parse()?;
    let strategy: ChangeStrategy = args.strategy.parse()?;
    let scope: RankScope = args.scope.parse()?;

    let snapshot = client.snapshot().await?;
    info!(rows = snapshot.rows.len(), "snapshot retrieved");

    let engine = ReportEngine::new(AnalysisPolicy::from(&config.analysis));
    match args.view {
        View::Movers => print_json(&engine.metric_movers(&snapshot, order)?),
        View::Leaders => {
            let metric = args
                .metric
                .ok_or_else(|| anyhow::anyhow!("the leaders view requires --metric"))?;
            print_json(&engine.metric_leaders(&snapshot, &metric, scope, order, strategy)?)
        }
        View::Top => print_json(&engine.top_countries(&snapshot, order)?),
        View::Neighborhood => print_json(&engine.neighborhood(&snapshot)?),
        _ => unreachable!("listing views handled above"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
