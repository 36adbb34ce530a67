use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use collection_route_planner::model::{ContainerId, FillUrgency};
use collection_route_planner::telemetry::TelemetryExport;
use collection_route_planner::{
    CancellationToken, PlannerConfig, RouteOptimizer, TelemetrySource,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the collection route for a telemetry snapshot
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Print each container's latest fill level and urgency
    #[command(visible_alias = "c")]
    Classify {
        /// Snapshot file ({depot?, containers, readings})
        #[arg(short = 'i', long)]
        input: PathBuf,
    },
}

#[derive(Args)]
struct OptimizeArgs {
    /// Snapshot file ({depot?, containers, readings})
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// TOML planner configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum fill level (percent) to collect
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Use the OSRM service instead of the haversine formula
    #[arg(long)]
    remote: bool,

    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Classification {
    id: ContainerId,
    name: String,
    fill_level: Option<f64>,
    battery_level: Option<f64>,
    urgency: FillUrgency,
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Optimize { args } => optimize(args),
        Commands::Classify { input } => classify(&input),
    }
}

fn read_export(path: &Path) -> anyhow::Result<TelemetryExport> {
    let f = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let export = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(export)
}

fn optimize(args: OptimizeArgs) -> anyhow::Result<()> {
    let mut config = PlannerConfig::load(args.config.as_deref())?;
    if let Some(threshold) = args.threshold {
        config.fill_threshold = threshold;
    }
    if args.remote {
        config.use_remote_oracle = true;
    }

    let (depot, store) = read_export(&args.input)?.into_store()?;
    let depot = depot.unwrap_or_else(|| config.depot.clone());
    info!(
        containers = store.containers().len(),
        depot = %depot.name,
        remote = config.use_remote_oracle,
        "loaded snapshot"
    );

    let optimizer = RouteOptimizer::from_config(config)?;
    let result = optimizer.optimize_source(&store, &depot, &CancellationToken::new())?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");

    Ok(())
}

fn classify(input: &Path) -> anyhow::Result<()> {
    let (_, store) = read_export(input)?.into_store()?;

    let rows: Vec<Classification> = store
        .snapshot()?
        .into_iter()
        .map(|snapshot| Classification {
            urgency: snapshot.urgency(),
            fill_level: snapshot.reading.as_ref().map(|r| r.fill_level()),
            battery_level: snapshot.reading.as_ref().map(|r| r.battery_level()),
            id: snapshot.container.id,
            name: snapshot.container.name,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
