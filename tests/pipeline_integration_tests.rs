//! End-to-end pipeline tests: run the full experiment on small graphs and
//! check the persisted artifacts against in-memory results.

use hoplite::estimate::estimate_distances;
use hoplite::experiment::{run_experiment, ExperimentConfig};
use hoplite::graph::{Graph, NodeId};
use hoplite::pairs::{load_real_distances, sample_pairs};
use hoplite::selection::{LandmarkSelector, SelectionConfig, SelectionMethod};
use hoplite::table::DistanceTable;
use std::path::Path;

fn cycle_graph(n: usize) -> Graph {
    let mut g = Graph::new();
    for i in 0..n {
        g.add_node(NodeId::new(i.to_string()));
    }
    for i in 0..n {
        g.add_edge(i, (i + 1) % n);
    }
    g
}

fn config_for(dir: &Path, methods: Vec<SelectionMethod>, range: Vec<usize>) -> ExperimentConfig {
    ExperimentConfig {
        data_dir: dir.to_path_buf(),
        graph_name: "cycle".to_string(),
        methods,
        landmark_range: range,
        num_pairs: 12,
        seed: 42,
        save_space: false,
        overwrite_tables: true,
        selection: SelectionConfig::default(),
    }
}

#[test]
fn experiment_on_cycle_produces_valid_losses() {
    let graph = cycle_graph(24);
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        dir.path(),
        vec![
            SelectionMethod::Degree,
            SelectionMethod::PageRank,
            SelectionMethod::Closeness,
            SelectionMethod::Betweenness,
            SelectionMethod::Random,
        ],
        vec![1, 3, 6],
    );

    let losses = run_experiment(&graph, &config).unwrap();
    assert_eq!(losses.rows.len(), 15);
    for row in &losses.rows {
        assert!(row.loss >= 0.0, "{}: loss {}", row.method, row.loss);
        assert!(row.loss.is_finite());
    }
}

#[test]
fn persisted_artifacts_reproduce_in_memory_results() {
    let graph = cycle_graph(16);
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), vec![SelectionMethod::Degree], vec![2, 4]);
    run_experiment(&graph, &config).unwrap();

    // Reload the table artifact and rerun the estimator against it.
    let table = DistanceTable::load(dir.path().join("D_matrix.json")).unwrap();
    let pairs = sample_pairs(&graph, config.num_pairs, config.seed).unwrap();
    let mut selector = LandmarkSelector::new(&graph, SelectionConfig::default());
    let landmarks = selector.select(SelectionMethod::Degree, 4).unwrap();

    let real = load_real_distances(dir.path().join("cycle_real_distances.json")).unwrap();
    assert_eq!(real.len(), pairs.len());

    // Every pair in the artifact satisfies the upper-bound invariant.
    let estimates = estimate_distances(&landmarks, &pairs, &table, 4).unwrap();
    for (pair, est) in pairs.iter().zip(&estimates) {
        assert!(*est >= real[&pair.key()]);
    }
}

#[test]
fn timing_log_accumulates_lines() {
    let graph = cycle_graph(16);
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), vec![SelectionMethod::Random], vec![2]);
    run_experiment(&graph, &config).unwrap();
    run_experiment(&graph, &config).unwrap();

    let log = std::fs::read_to_string(dir.path().join("Timer.txt")).unwrap();
    let estimate_lines = log
        .lines()
        .filter(|line| line.starts_with("Estimating distances"))
        .count();
    // Two runs, one (method, k) cell each: the log is append-only.
    assert_eq!(estimate_lines, 2);
    for line in log.lines() {
        let (_, elapsed) = line.rsplit_once(": ").unwrap();
        assert!(elapsed.parse::<f64>().is_ok(), "bad line {line:?}");
    }
}
