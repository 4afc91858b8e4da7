//! Evaluation pair sampling and ground-truth distances.
//!
//! Pairs are stored canonicalized (smaller label first) so the same
//! unordered pair can never appear twice, and a pair never has equal
//! endpoints. Ground truth uses the two-endpoint bidirectional BFS query
//! rather than a full single-source sweep per pair.

use crate::graph::{Graph, NodeId};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Canonical unordered pair of distinct nodes: `a < b` by label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePair {
    a: NodeId,
    b: NodeId,
}

impl NodePair {
    pub fn new(x: NodeId, y: NodeId) -> Result<Self> {
        if x == y {
            return Err(Error::InvalidArgument(format!(
                "pair endpoints must differ, got {x} twice"
            )));
        }
        let (a, b) = if x < y { (x, y) } else { (y, x) };
        Ok(Self { a, b })
    }

    pub fn first(&self) -> &NodeId {
        &self.a
    }

    pub fn second(&self) -> &NodeId {
        &self.b
    }

    /// Stable artifact key, e.g. `"12,97"`.
    pub fn key(&self) -> String {
        format!("{},{}", self.a, self.b)
    }
}

/// Draw `num_pairs` distinct canonical pairs uniformly at random, seeded.
/// Rejection-samples duplicates, matching a fixed-seed draw-until-full
/// scheme, so the result is deterministic for (graph, seed).
pub fn sample_pairs(graph: &Graph, num_pairs: usize, seed: u64) -> Result<Vec<NodePair>> {
    let n = graph.node_count();
    if n < 2 {
        return Err(Error::InvalidArgument(
            "need at least two nodes to sample pairs".to_string(),
        ));
    }
    let max_pairs = n * (n - 1) / 2;
    if num_pairs > max_pairs {
        return Err(Error::InvalidArgument(format!(
            "requested {num_pairs} pairs but the graph only has {max_pairs}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(num_pairs);
    let mut pairs = Vec::with_capacity(num_pairs);
    while pairs.len() < num_pairs {
        let picked = rand::seq::index::sample(&mut rng, n, 2);
        let (i, j) = (picked.index(0), picked.index(1));
        let canonical = (i.min(j), i.max(j));
        if seen.insert(canonical) {
            pairs.push(NodePair::new(
                graph.label(i).clone(),
                graph.label(j).clone(),
            )?);
        }
    }
    Ok(pairs)
}

/// All distinct endpoints occurring in the pair set, sorted by label.
/// This is the target subset handed to the restricted table builder.
pub fn pair_endpoints(pairs: &[NodePair]) -> Vec<NodeId> {
    let set: BTreeSet<NodeId> = pairs
        .iter()
        .flat_map(|p| [p.a.clone(), p.b.clone()])
        .collect();
    set.into_iter().collect()
}

/// Exact shortest-path distance for every pair, keyed by the canonical pair
/// key. A pair with no connecting path surfaces as `Disconnected`.
pub fn compute_real_distances(
    graph: &Graph,
    pairs: &[NodePair],
) -> Result<BTreeMap<String, u32>> {
    let total = pairs.len();
    let done = AtomicUsize::new(0);
    let entries: Vec<(String, u32)> = pairs
        .par_iter()
        .map(|pair| -> Result<(String, u32)> {
            let s = graph
                .index_of(pair.first())
                .ok_or_else(|| Error::InvalidArgument(format!("unknown node {}", pair.first())))?;
            let t = graph
                .index_of(pair.second())
                .ok_or_else(|| Error::InvalidArgument(format!("unknown node {}", pair.second())))?;
            let dist = graph
                .pair_distance(s, t)
                .ok_or_else(|| Error::Disconnected(pair.key()))?;
            let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
            if completed % 1000 == 0 {
                debug!(completed, total, "real distance progress");
            }
            Ok((pair.key(), dist))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(pairs = total, "computed real distances");
    Ok(entries.into_iter().collect())
}

/// Persist the ground-truth map as a JSON object of `pair key -> distance`.
pub fn save_real_distances(path: impl AsRef<Path>, distances: &BTreeMap<String, u32>) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), distances)?;
    Ok(())
}

pub fn load_real_distances(path: impl AsRef<Path>) -> Result<BTreeMap<String, u32>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Ground-truth distances aligned to the pair-set order.
pub fn real_distances_in_order(
    pairs: &[NodePair],
    distances: &BTreeMap<String, u32>,
) -> Result<Vec<u32>> {
    pairs
        .iter()
        .map(|pair| {
            distances
                .get(&pair.key())
                .copied()
                .ok_or_else(|| Error::MissingData {
                    landmark: "<real>".to_string(),
                    node: pair.key(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn pair_is_canonicalized() {
        let p = NodePair::new(NodeId::new("z"), NodeId::new("a")).unwrap();
        assert_eq!(p.first(), &NodeId::new("a"));
        assert_eq!(p.key(), "a,z");
    }

    #[test]
    fn equal_endpoints_rejected() {
        let err = NodePair::new(NodeId::new("x"), NodeId::new("x")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn sampling_yields_unique_canonical_pairs() {
        let g = cycle_graph(10);
        let pairs = sample_pairs(&g, 20, 42).unwrap();
        assert_eq!(pairs.len(), 20);
        let keys: HashSet<String> = pairs.iter().map(NodePair::key).collect();
        assert_eq!(keys.len(), 20);
        for p in &pairs {
            assert_ne!(p.first(), p.second());
        }
    }

    #[test]
    fn sampling_is_seed_deterministic() {
        let g = cycle_graph(12);
        let a = sample_pairs(&g, 15, 7).unwrap();
        let b = sample_pairs(&g, 15, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn oversampling_is_rejected() {
        let g = cycle_graph(4);
        // C(4,2) = 6 possible pairs.
        assert!(sample_pairs(&g, 7, 1).is_err());
        assert_eq!(sample_pairs(&g, 6, 1).unwrap().len(), 6);
    }

    #[test]
    fn endpoints_are_sorted_and_deduplicated() {
        let pairs = vec![
            NodePair::new(NodeId::new("3"), NodeId::new("1")).unwrap(),
            NodePair::new(NodeId::new("1"), NodeId::new("5")).unwrap(),
        ];
        let endpoints = pair_endpoints(&pairs);
        assert_eq!(
            endpoints,
            vec![NodeId::new("1"), NodeId::new("3"), NodeId::new("5")]
        );
    }

    #[test]
    fn real_distances_match_full_bfs() {
        let g = cycle_graph(9);
        let pairs = sample_pairs(&g, 10, 3).unwrap();
        let real = compute_real_distances(&g, &pairs).unwrap();
        for pair in &pairs {
            let s = g.index_of(pair.first()).unwrap();
            let t = g.index_of(pair.second()).unwrap();
            let expected = g.bfs_distances(s)[t];
            assert_eq!(real[&pair.key()], expected);
        }
    }

    #[test]
    fn disconnected_pair_is_surfaced() {
        let mut g = Graph::new();
        g.add_node(NodeId::new("a"));
        g.add_node(NodeId::new("b"));
        let pairs = vec![NodePair::new(NodeId::new("a"), NodeId::new("b")).unwrap()];
        let err = compute_real_distances(&g, &pairs).unwrap_err();
        assert!(matches!(err, Error::Disconnected(_)));
    }
}
