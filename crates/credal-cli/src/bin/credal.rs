//! Credal CLI - Command-line interface for credal network propagation
//!
//! Usage:
//!   credal <file>                         # Validate and propagate a network description
//!   credal <file> --node <name>           # Print bounds for a single node
//!   credal <file> -o json                 # Output results as JSON
//!   credal <file> --validate-only         # Only validate the description
//!   credal <file> -vv                     # Trace intermediate bounds

use std::process;

use clap::Parser;
use credal_core::engine::observer::TracingObserver;
use credal_core::{
    load_network, Aggregation, CredalNetwork, Marginals, PropagationConfig,
    PropagationDiagnostics,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "credal")]
#[command(version)]
#[command(about = "Credal - interval probability bounds for discrete networks")]
#[command(
    long_about = "Load a credal network description (JSON), validate it, and compute lower/upper marginal bounds for every node"
)]
struct Cli {
    /// Input network description (JSON)
    #[arg(value_name = "FILE")]
    file: String,

    /// Only print bounds for this node
    #[arg(short, long, value_name = "NAME")]
    node: Option<String>,

    /// Output format: summary, json, or debug
    #[arg(short, long, default_value = "summary", value_name = "FORMAT")]
    output: String,

    /// Aggregate scaled rows by total probability instead of pointwise
    #[arg(long)]
    total_probability: bool,

    /// Maximum (corner combination x assignment) evaluations per node
    #[arg(long, value_name = "N")]
    max_enumeration: Option<usize>,

    /// Propagate layer by layer in parallel (requires the `parallel` feature)
    #[arg(long)]
    parallel: bool,

    /// Validate the description without propagating
    #[arg(long)]
    validate_only: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", cli.file, e);
            process::exit(1);
        }
    };

    let network = match load_network(&source) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Parse/validation error: {}", e);
            process::exit(1);
        }
    };

    tracing::info!(file = %cli.file, nodes = network.len(), "network loaded");

    if cli.validate_only {
        println!("✓ Network validated successfully ({} nodes)", network.len());
        return;
    }

    let mut config = PropagationConfig::default();
    if cli.total_probability {
        config.aggregation = Aggregation::TotalProbability;
    }
    if let Some(limit) = cli.max_enumeration {
        config.max_enumeration = limit;
    }

    let (marginals, diagnostics) = match run(&network, config, cli.parallel) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error propagating '{}': {}", cli.file, e);
            process::exit(1);
        }
    };

    let marginals = match &cli.node {
        Some(name) => match marginals.get_key_value(name.as_str()) {
            Some((key, bounds)) => Marginals::from([(key.clone(), bounds.clone())]),
            None => {
                eprintln!("Unknown node '{}'", name);
                process::exit(1);
            }
        },
        None => marginals,
    };

    match cli.output.as_str() {
        "json" => match serde_json::to_string_pretty(&marginals) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing to JSON: {}", e);
                process::exit(1);
            }
        },
        "debug" => {
            println!("{:#?}", marginals);
            println!("{:#?}", diagnostics);
        }
        _ => print_summary(&marginals, &diagnostics),
    }
}

fn run(
    network: &CredalNetwork,
    config: PropagationConfig,
    parallel: bool,
) -> Result<(Marginals, PropagationDiagnostics), credal_core::ExecError> {
    if parallel {
        network.propagate_parallel(config)
    } else {
        network.propagate_observed(config, &mut TracingObserver)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(marginals: &Marginals, diagnostics: &PropagationDiagnostics) {
    println!("=== Marginal Bounds (Extreme-Point Method) ===");
    for (node, bounds) in marginals {
        println!("{}:", node);
        for (state, interval) in bounds {
            println!("  {}: {}", state, interval);
        }
        println!();
    }

    println!(
        "Computed {} nodes ({} cache hits, {} assignments evaluated)",
        diagnostics.nodes_computed, diagnostics.cache_hits, diagnostics.assignments_evaluated
    );
    if diagnostics.degenerate_extremes > 0 {
        println!(
            "  {} degenerate extreme points skipped",
            diagnostics.degenerate_extremes
        );
    }
    if diagnostics.fallback_states > 0 {
        println!(
            "  {} states fell back to [0, 1]",
            diagnostics.fallback_states
        );
    }
}
