//! supplygraph CLI - query a directory of supply-chain snapshots
//!
//! Usage:
//!   supplygraph-cli --snapshot-dir ./data/size_1000 --at 3 parts PO_001
//!   supplygraph-cli --snapshot-dir ./data/size_1000 trend ProductOffering demand
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use supplygraph::config::SessionConfig;
use supplygraph::error::GraphError;
use supplygraph::graph::GraphStore;
use supplygraph::profile::profiled;
use supplygraph::query;
use supplygraph::Session;

#[derive(Parser, Debug)]
#[command(name = "supplygraph-cli", about = "Query temporal supply-chain snapshots", version)]
struct Args {
    /// Directory holding timestamp_<n>.json snapshots
    #[arg(long, env = "SUPPLYGRAPH_SNAPSHOT_DIR")]
    snapshot_dir: Option<PathBuf>,

    /// JSON session config; command-line values override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Decoded graphs kept in memory
    #[arg(long, env = "SUPPLYGRAPH_CACHE_CAPACITY")]
    cache_capacity: Option<usize>,

    /// Timestamp for point-in-time queries
    #[arg(long, default_value_t = 0)]
    at: usize,

    /// Logging level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Report elapsed time and memory for the query on stderr
    #[arg(long)]
    profile: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known timestamps
    Timestamps,
    /// Declared node and relationship fields at --at
    Catalog,
    #[command(flatten)]
    Snapshot(SnapshotCommand),
    #[command(flatten)]
    Temporal(TemporalCommand),
}

/// Queries against the graph at --at
#[derive(Subcommand, Debug)]
enum SnapshotCommand {
    /// Vertex ids grouped by node type
    Ids,
    /// Vertex and edge counts per type
    Summary,
    /// Induced subgraph within RADIUS hops of a vertex
    Ego {
        node: String,
        #[arg(default_value_t = 1)]
        radius: usize,
    },
    /// Attributes of one vertex
    Node { id: String },
    /// Edges leaving one vertex
    Edges { id: String },
    /// Attributes of one edge
    Edge { source: String, target: String },
    /// Minimum-weight path
    Path { source: String, destination: String },
    /// Ancestors and descendants of a vertex
    Lineage { id: String },
    /// Parts needed for a product offering
    Parts { offering: String },
    /// Product offerings under a cost ceiling with enough demand
    Profitable { max_cost: f64, min_demand: f64 },
    /// Facilities whose operating cost exceeds THRESHOLD
    HighCost { threshold: f64 },
    /// Suppliers of a part through its warehouses
    Suppliers { part: String },
    /// Parts valid at some point in [START, END] (YYYY-MM-DD)
    ValidParts { start: String, end: String },
    /// Important parts with a short validity window
    Bottleneck { importance: f64, max_life_days: i64 },
    /// Supplier -> warehouse transportation cost
    TransportCost { supplier: String, warehouse: String },
    /// Supplier -> warehouse lead time
    LeadTime { supplier: String, warehouse: String },
    /// Costly links from unreliable suppliers
    SupplierScreen { max_reliability: f64, min_cost: f64 },
    /// Part types a supplier provides
    PartTypes { supplier: String },
    /// Most common part subtypes
    Subtypes {
        #[arg(default_value_t = 5)]
        n: usize,
    },
    /// Long and expensive part shipments
    LongHaul { min_distance: f64, min_cost: f64 },
}

/// Scans across every timestamp
#[derive(Subcommand, Debug)]
enum TemporalCommand {
    /// Mean of a node attribute per timestamp
    Trend { node_type: String, attribute: String },
    /// One vertex's attribute per timestamp
    NodeTrend { node: String, attribute: String },
    /// Mean of an edge attribute per timestamp
    EdgeTrend { relationship_type: String, attribute: String },
    /// Peak / off-peak timestamps for a node attribute
    Peaks {
        node_type: String,
        attribute: String,
        /// Defaults to the session peak threshold
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Timestamps whose mean deviates by more than Z standard deviations
    Anomalies {
        node_type: String,
        attribute: String,
        #[arg(default_value_t = 2.0)]
        z: f64,
    },
}

fn init_tracing(args: &Args) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn session_config(args: &Args) -> anyhow::Result<SessionConfig> {
    let mut config = match (&args.config, &args.snapshot_dir) {
        (Some(path), _) => SessionConfig::load(path).with_context(|| format!("reading config {:?}", path))?,
        (None, Some(dir)) => SessionConfig::new(dir),
        (None, None) => anyhow::bail!("no snapshot directory: pass --snapshot-dir or --config"),
    };
    if let (Some(_), Some(dir)) = (&args.config, &args.snapshot_dir) {
        config.snapshot_dir = dir.clone();
    }
    if let Some(capacity) = args.cache_capacity {
        config = config.cache_capacity(capacity);
    }
    Ok(config)
}

fn to_json<T: Serialize>(value: T) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

fn run(session: &mut Session, at: usize, command: &Command) -> anyhow::Result<serde_json::Value> {
    match command {
        Command::Timestamps => to_json(session.timestamps().collect::<Vec<_>>()),
        Command::Catalog => to_json(session.catalog(at)?),
        Command::Snapshot(command) => run_snapshot(session, at, command),
        Command::Temporal(command) => run_temporal(session, command),
    }
}

fn run_snapshot(session: &mut Session, at: usize, command: &SnapshotCommand) -> anyhow::Result<serde_json::Value> {
    let graph = session.select(at)?;
    let graph = graph.as_ref();

    match command {
        SnapshotCommand::Ids => to_json(query::ids_by_node_type(graph)),
        SnapshotCommand::Summary => to_json(json!({
            "timestamp": at,
            "directed": graph.is_directed(),
            "nodes": graph.node_count(),
            "edges": graph.edge_count(),
            "nodes_by_type": graph.count_nodes_by_type(),
            "edges_by_type": graph.count_edges_by_type(),
            "fingerprint": format!("{:032x}", graph.fingerprint()),
        })),
        SnapshotCommand::Ego { node, radius } => {
            let ego = query::ego_graph(graph, node, *radius)?;
            to_json(json!({
                "nodes": ego.get_all_nodes(),
                "edges": ego.get_all_edges(),
            }))
        }
        SnapshotCommand::Node { id } => to_json(query::node_details(graph, id)?),
        SnapshotCommand::Edges { id } => to_json(query::edge_attributes(graph, id)?),
        SnapshotCommand::Edge { source, target } => to_json(query::edge_details(graph, source, target)?),
        SnapshotCommand::Path { source, destination } => to_json(query::shortest_path(graph, source, destination)?),
        SnapshotCommand::Lineage { id } => to_json(query::ancestors_descendants(graph, id)?),
        SnapshotCommand::Parts { offering } => to_json(query::parts_for_product_offering(graph, offering)),
        SnapshotCommand::Profitable { max_cost, min_demand } => {
            to_json(query::profitable_products(graph, *max_cost, *min_demand))
        }
        SnapshotCommand::HighCost { threshold } => to_json(query::high_operating_cost_facilities(graph, *threshold)),
        SnapshotCommand::Suppliers { part } => to_json(query::suppliers_for_part(graph, part)),
        SnapshotCommand::ValidParts { start, end } => {
            let start = query::parse_date(start)?;
            let end = query::parse_date(end)?;
            to_json(query::valid_parts_in_range(graph, start, end))
        }
        SnapshotCommand::Bottleneck {
            importance,
            max_life_days,
        } => to_json(query::bottleneck_parts(graph, *importance, *max_life_days)),
        SnapshotCommand::TransportCost { supplier, warehouse } => {
            to_json(query::transportation_cost(graph, supplier, warehouse))
        }
        SnapshotCommand::LeadTime { supplier, warehouse } => to_json(query::lead_time(graph, supplier, warehouse)),
        SnapshotCommand::SupplierScreen {
            max_reliability,
            min_cost,
        } => to_json(query::supplier_reliability_costing(graph, *max_reliability, *min_cost)),
        SnapshotCommand::PartTypes { supplier } => to_json(query::supplied_part_types(graph, supplier)),
        SnapshotCommand::Subtypes { n } => to_json(query::most_common_part_subtypes(graph, *n)),
        SnapshotCommand::LongHaul { min_distance, min_cost } => {
            to_json(query::long_haul_shipments(graph, *min_distance, *min_cost))
        }
    }
}

fn run_temporal(session: &Session, command: &TemporalCommand) -> anyhow::Result<serde_json::Value> {
    let analyzer = session.analyzer();

    match command {
        TemporalCommand::Trend { node_type, attribute } => to_json(analyzer.node_attribute_trend(node_type, attribute)?),
        TemporalCommand::NodeTrend { node, attribute } => to_json(analyzer.node_value_trend(node, attribute)?),
        TemporalCommand::EdgeTrend {
            relationship_type,
            attribute,
        } => to_json(analyzer.edge_attribute_trend(relationship_type, attribute)?),
        TemporalCommand::Peaks {
            node_type,
            attribute,
            threshold,
        } => {
            let threshold = threshold.unwrap_or(session.config().peak_threshold);
            to_json(analyzer.peak_classification(node_type, attribute, threshold)?)
        }
        TemporalCommand::Anomalies { node_type, attribute, z } => {
            to_json(analyzer.detect_anomalies(node_type, attribute, *z)?)
        }
    }
}

/// Exit code per failure class, so scripts can tell "absent" from "broken"
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<GraphError>() {
        Some(e) if e.is_not_found() => 2,
        Some(GraphError::NoPath { .. }) => 3,
        Some(GraphError::Schema(_)) | Some(GraphError::Json(_)) | Some(GraphError::InvalidFormat(_)) => 4,
        Some(GraphError::DateParse { .. })
        | Some(GraphError::Config { .. })
        | Some(GraphError::InvalidWeight { .. })
        | Some(GraphError::UndirectedGraph)
        | Some(GraphError::DegenerateDistribution { .. }) => 5,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args);

    let outcome = session_config(&args)
        .and_then(|config| Session::open(config).context("opening snapshot directory"))
        .and_then(|mut session| {
            let (result, profile) = profiled(&format!("{:?}", args.command), || {
                run(&mut session, args.at, &args.command)
            });
            if args.profile {
                eprintln!(
                    "{}: {:.3} ms, memory {:?} -> {:?} bytes",
                    profile.name,
                    profile.elapsed.as_secs_f64() * 1000.0,
                    profile.memory_before,
                    profile.memory_after
                );
            }
            result
        })
        .and_then(|value| Ok(serde_json::to_string_pretty(&value)?));

    match outcome {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
