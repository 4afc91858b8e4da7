//! Property-based tests for the landmark estimation pipeline.
//!
//! Random connected graphs are generated as a spanning tree plus extra
//! edges, so every distance is finite and the triangle-inequality
//! invariants can be checked unconditionally.

use hoplite::estimate::estimate_distances;
use hoplite::graph::{Graph, NodeId};
use hoplite::pairs::{compute_real_distances, pair_endpoints, sample_pairs, NodePair};
use hoplite::selection::{LandmarkSelector, SelectionConfig, SelectionMethod};
use hoplite::table::{DistanceTable, TableScope};
use proptest::prelude::*;

/// Connected graph strategy: a random spanning tree over 3..=20 nodes with
/// up to 10 extra edges folded in.
fn connected_graph_strategy() -> impl Strategy<Value = Graph> {
    (3usize..=20).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec(0usize..10_000, n - 1),
            prop::collection::vec((0usize..10_000, 0usize..10_000), 0..10),
        )
            .prop_map(|(n, parents, extras)| {
                let mut g = Graph::new();
                for i in 0..n {
                    g.add_node(NodeId::new(i.to_string()));
                }
                for (i, p) in parents.iter().enumerate() {
                    let child = i + 1;
                    g.add_edge(child, p % child);
                }
                for (a, b) in extras {
                    let (a, b) = (a % n, b % n);
                    if a != b {
                        g.add_edge(a, b);
                    }
                }
                g
            })
    })
}

fn all_pairs(graph: &Graph) -> Vec<NodePair> {
    let n = graph.node_count();
    let mut pairs = Vec::new();
    for s in 0..n {
        for t in (s + 1)..n {
            pairs.push(NodePair::new(graph.label(s).clone(), graph.label(t).clone()).unwrap());
        }
    }
    pairs
}

proptest! {
    /// Estimates are true upper bounds: never below the exact distance.
    #[test]
    fn estimate_is_an_upper_bound(graph in connected_graph_strategy(), seed in any::<u64>()) {
        let config = SelectionConfig { random_seed: seed, ..SelectionConfig::default() };
        let mut selector = LandmarkSelector::new(&graph, config);
        let landmarks = selector.select(SelectionMethod::Random, 3.min(graph.node_count())).unwrap();
        let table = DistanceTable::build(&graph, &landmarks, TableScope::Full).unwrap();

        let pairs = all_pairs(&graph);
        let real = compute_real_distances(&graph, &pairs).unwrap();
        let estimates = estimate_distances(&landmarks, &pairs, &table, landmarks.len()).unwrap();

        for (pair, est) in pairs.iter().zip(&estimates) {
            prop_assert!(*est >= real[&pair.key()], "pair {} estimated {} below real {}",
                pair.key(), est, real[&pair.key()]);
        }
    }

    /// Growing the landmark prefix can only tighten (or keep) each estimate.
    #[test]
    fn estimates_are_monotone_in_prefix_length(graph in connected_graph_strategy(), seed in any::<u64>()) {
        let config = SelectionConfig { random_seed: seed, ..SelectionConfig::default() };
        let mut selector = LandmarkSelector::new(&graph, config);
        let count = graph.node_count().min(5);
        let landmarks = selector.select(SelectionMethod::Random, count).unwrap();
        let table = DistanceTable::build(&graph, &landmarks, TableScope::Full).unwrap();
        let pairs = all_pairs(&graph);

        let mut previous: Option<Vec<u32>> = None;
        for k in 1..=landmarks.len() {
            let estimates = estimate_distances(&landmarks, &pairs, &table, k).unwrap();
            if let Some(prev) = &previous {
                for (smaller_k, larger_k) in prev.iter().zip(&estimates) {
                    prop_assert!(larger_k <= smaller_k);
                }
            }
            previous = Some(estimates);
        }
    }

    /// A restricted table answers exactly like the full table on every
    /// node it covers.
    #[test]
    fn restricted_table_matches_full(graph in connected_graph_strategy(), seed in any::<u64>()) {
        let max_pairs = graph.node_count() * (graph.node_count() - 1) / 2;
        let num_pairs = max_pairs.min(5);
        let pairs = sample_pairs(&graph, num_pairs, seed).unwrap();
        let endpoints = pair_endpoints(&pairs);

        let config = SelectionConfig { random_seed: seed, ..SelectionConfig::default() };
        let mut selector = LandmarkSelector::new(&graph, config);
        let landmarks = selector.select(SelectionMethod::Degree, 2.min(graph.node_count())).unwrap();

        let full = DistanceTable::build(&graph, &landmarks, TableScope::Full).unwrap();
        let restricted = DistanceTable::build(&graph, &landmarks, TableScope::Restricted(&endpoints)).unwrap();

        let k = landmarks.len();
        let full_estimates = estimate_distances(&landmarks, &pairs, &full, k).unwrap();
        let restricted_estimates = estimate_distances(&landmarks, &pairs, &restricted, k).unwrap();
        prop_assert_eq!(full_estimates, restricted_estimates);
    }

    /// Pair sampling is duplicate-free, self-pair-free, and seed-stable.
    #[test]
    fn pair_sampling_invariants(graph in connected_graph_strategy(), seed in any::<u64>()) {
        let max_pairs = graph.node_count() * (graph.node_count() - 1) / 2;
        let num_pairs = max_pairs.min(8);
        let pairs = sample_pairs(&graph, num_pairs, seed).unwrap();
        prop_assert_eq!(pairs.len(), num_pairs);

        let mut keys: Vec<String> = pairs.iter().map(NodePair::key).collect();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), num_pairs);
        for pair in &pairs {
            prop_assert!(pair.first() < pair.second());
        }

        let again = sample_pairs(&graph, num_pairs, seed).unwrap();
        prop_assert_eq!(pairs, again);
    }

    /// Random landmark selection is a permutation-free sample, stable per seed.
    #[test]
    fn random_selection_is_seeded(graph in connected_graph_strategy(), seed in any::<u64>()) {
        let count = graph.node_count().min(4);
        let config = SelectionConfig { random_seed: seed, ..SelectionConfig::default() };
        let first = LandmarkSelector::new(&graph, config.clone())
            .select(SelectionMethod::Random, count).unwrap();
        let second = LandmarkSelector::new(&graph, config)
            .select(SelectionMethod::Random, count).unwrap();
        prop_assert_eq!(&first, &second);

        let mut unique = first.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), count);
    }

    /// The two-endpoint query agrees with a full single-source BFS.
    #[test]
    fn pair_query_matches_full_bfs(graph in connected_graph_strategy()) {
        for s in 0..graph.node_count() {
            let full = graph.bfs_distances(s);
            for t in 0..graph.node_count() {
                prop_assert_eq!(graph.pair_distance(s, t), Some(full[t]));
            }
        }
    }
}
