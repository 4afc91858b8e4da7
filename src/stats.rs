//! Descriptive statistics for a loaded graph: the plain-text statistics
//! artifact and a sampled shortest-path length distribution.

use crate::graph::Graph;
use crate::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphStatistics {
    pub nodes: usize,
    pub edges: usize,
    pub clustering_coefficient: f64,
    pub average_degree: f64,
}

impl GraphStatistics {
    pub fn compute(graph: &Graph) -> Self {
        let n = graph.node_count();
        let degree_sum: usize = (0..n).map(|v| graph.degree(v)).sum();
        Self {
            nodes: n,
            edges: graph.edge_count(),
            clustering_coefficient: transitivity(graph),
            average_degree: if n == 0 {
                0.0
            } else {
                degree_sum as f64 / n as f64
            },
        }
    }

    /// Write `<metric>:\t<value>` lines to `{name}_statistics.txt` in `dir`.
    pub fn write(&self, dir: impl AsRef<Path>, name: &str) -> Result<()> {
        let path = dir.as_ref().join(format!("{name}_statistics.txt"));
        let mut out = BufWriter::new(File::create(&path)?);
        writeln!(out, "Nodes:\t{}", self.nodes)?;
        writeln!(out, "Edges:\t{}", self.edges)?;
        writeln!(out, "Clustering Coefficient:\t{}", self.clustering_coefficient)?;
        writeln!(out, "Average degree:\t{}", self.average_degree)?;
        info!(path = %path.display(), "wrote statistics artifact");
        Ok(())
    }
}

/// Global clustering coefficient (transitivity): closed triplets over all
/// connected triplets.
fn transitivity(graph: &Graph) -> f64 {
    let n = graph.node_count();
    let mut closed = 0u64;
    let mut triplets = 0u64;
    for v in 0..n {
        let neighbors = graph.neighbors(v);
        let degree = neighbors.len() as u64;
        triplets += degree * degree.saturating_sub(1) / 2;
        for (i, &a) in neighbors.iter().enumerate() {
            for &b in &neighbors[i + 1..] {
                if graph.neighbors(a).contains(&b) {
                    closed += 1;
                }
            }
        }
    }
    if triplets == 0 {
        0.0
    } else {
        closed as f64 / triplets as f64
    }
}

/// Histogram of shortest-path lengths, estimated from BFS sweeps over a
/// random node sample when the graph is larger than `sample_size`. Counts
/// are scaled back to the full population and the zero-length self
/// distances are dropped.
pub fn distance_distribution(
    graph: &Graph,
    sample_size: usize,
    seed: u64,
) -> BTreeMap<u32, f64> {
    let n = graph.node_count();
    let sources: Vec<usize> = if n > sample_size {
        let mut rng = StdRng::seed_from_u64(seed);
        rand::seq::index::sample(&mut rng, n, sample_size).into_vec()
    } else {
        (0..n).collect()
    };

    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for &source in &sources {
        for &d in &graph.bfs_distances(source) {
            if d != u32::MAX && d > 0 {
                *counts.entry(d).or_insert(0) += 1;
            }
        }
    }

    let scale = if n > sample_size {
        n as f64 / sample_size as f64
    } else {
        1.0
    };
    counts
        .into_iter()
        .map(|(length, count)| (length, count as f64 * scale))
        .collect()
}
