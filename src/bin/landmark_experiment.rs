//! Landmark distance-estimation experiment.
//!
//! Usage:
//!   landmark_experiment <edge-list-path|generate> [graph-name] [--stats] [--full-table]
//!
//! Loads an edge list (or generates a seeded small-world graph), keeps the
//! largest connected component, runs every configured selection method over
//! the landmark range, and prints the loss table. Artifacts (distance
//! tables, ground truth, timing log, statistics) land in `data/<name>/`.

use hoplite::experiment::{run_experiment, ExperimentConfig};
use hoplite::selection::SelectionMethod;
use hoplite::stats::GraphStatistics;
use hoplite::{Graph, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const GENERATED_SIZE: usize = 4000;
const GENERATED_NEIGHBORS: usize = 5;
const GENERATED_REWIRE_PROB: f64 = 0.05;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("experiment failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let source = args.first().map(String::as_str).unwrap_or("generate");
    let graph_name = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .nth(1)
        .cloned()
        .unwrap_or_else(|| "smallworld".to_string());
    let with_stats = args.iter().any(|a| a == "--stats");
    let full_table = args.iter().any(|a| a == "--full-table");

    println!("Landmark Distance Estimation");
    println!("============================\n");

    print!("Preparing graph {graph_name}... ");
    let graph = if source == "generate" {
        Graph::watts_strogatz(
            GENERATED_SIZE,
            GENERATED_NEIGHBORS,
            GENERATED_REWIRE_PROB,
            42,
        )
        .largest_component()
    } else {
        Graph::from_edge_list_path(source)?.largest_component()
    };
    println!(
        "done ({} nodes, {} edges)",
        graph.node_count(),
        graph.edge_count()
    );

    let config = ExperimentConfig {
        data_dir: PathBuf::from("data").join(&graph_name),
        graph_name: graph_name.clone(),
        methods: vec![
            SelectionMethod::Random,
            SelectionMethod::Degree,
            SelectionMethod::PageRank,
            SelectionMethod::Closeness,
        ],
        landmark_range: [10, 50, 100, 200, 500, 700, 1000]
            .into_iter()
            .filter(|&k| k <= graph.node_count())
            .collect(),
        num_pairs: 5000.min(graph.node_count() * (graph.node_count() - 1) / 2),
        save_space: !full_table,
        ..ExperimentConfig::default()
    };

    if with_stats {
        std::fs::create_dir_all(&config.data_dir)?;
        let stats = GraphStatistics::compute(&graph);
        println!(
            "Clustering coefficient: {:.4}, average degree: {:.2}",
            stats.clustering_coefficient, stats.average_degree
        );
        stats.write(&config.data_dir, &graph_name)?;
    }

    let losses = run_experiment(&graph, &config)?;

    println!();
    println!("{:<14} {:<12} {:<12}", "Method", "Landmarks", "Loss");
    println!("{}", "-".repeat(38));
    for row in &losses.rows {
        println!(
            "{:<14} {:<12} {:<12.4}",
            row.method.to_string(),
            row.num_landmarks,
            row.loss
        );
    }

    Ok(())
}
