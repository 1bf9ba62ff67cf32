use clap::Parser;
use worldline::{
    AnalysisPolicy, ChangeStrategy, MeasurementSource, MemorySource, ReportEngine, SortOrder,
};

/// Generate the full report suite from a snapshot file, offline
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON snapshot (rows + adjacency)
    snapshot: String,

    /// Where to write the combined report
    #[arg(short, long, default_value = "worldline_report.json")]
    output: String,

    /// Sort direction: ASC or DESC
    #[arg(long, default_value = "DESC")]
    order: String,

    /// Delta strategy: relative or absolute
    #[arg(long, default_value = "relative")]
    strategy: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_target(false)
        .init();

    let order: SortOrder = args.order.parse()?;
    let strategy: ChangeStrategy = args.strategy.parse()?;

    println!("Loading snapshot from {}...", args.snapshot);
    let source = MemorySource::from_json_file(&args.snapshot)?;
    println!("Loaded {} measurement rows", source.row_count());
    println!();

    let snapshot = source.snapshot().await?;
    let engine = ReportEngine::new(AnalysisPolicy::default());
    let report = engine.full_report(&snapshot, order, strategy)?;

    report.print_summary();

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&args.output, json)?;
    println!("Report saved to: {}", args.output);

    Ok(())
}
