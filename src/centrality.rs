//! Centrality scores used to rank landmark candidates.
//!
//! All three measures operate on the unweighted, undirected graph. The
//! closeness and betweenness variants take an optional hop cutoff so the
//! per-source sweeps stay tractable on large graphs; with a cutoff they are
//! range-limited approximations, not the exact global measures.

use crate::graph::Graph;
use rayon::prelude::*;
use std::collections::VecDeque;

/// PageRank power-iteration settings. Defaults match the usual
/// damping/tolerance conventions.
#[derive(Debug, Clone)]
pub struct PageRankConfig {
    pub damping: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// PageRank by power iteration. On an undirected graph every node pushes
/// `rank / degree` to each neighbor; isolated nodes redistribute uniformly.
/// Stops when the L1 change drops below the tolerance.
pub fn pagerank(graph: &Graph, config: &PageRankConfig) -> Vec<f64> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    let uniform = 1.0 / n as f64;
    let mut ranks = vec![uniform; n];

    for _ in 0..config.max_iterations {
        let mut dangling = 0.0;
        for v in 0..n {
            if graph.degree(v) == 0 {
                dangling += ranks[v];
            }
        }

        let mut next = vec![(1.0 - config.damping) * uniform + config.damping * dangling * uniform; n];
        for v in 0..n {
            let degree = graph.degree(v);
            if degree == 0 {
                continue;
            }
            let share = config.damping * ranks[v] / degree as f64;
            for &w in graph.neighbors(v) {
                next[w] += share;
            }
        }

        let delta: f64 = ranks
            .iter()
            .zip(next.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();
        ranks = next;
        if delta < config.tolerance {
            break;
        }
    }

    ranks
}

/// Closeness centrality, optionally range-limited to nodes within `cutoff`
/// hops. Score is `(reached - 1) / sum(dist)` over the reached set, 0 for
/// nodes that reach nothing.
pub fn closeness(graph: &Graph, cutoff: Option<u32>) -> Vec<f64> {
    let n = graph.node_count();
    let bound = cutoff.unwrap_or(u32::MAX);
    (0..n)
        .into_par_iter()
        .map(|source| {
            let dist = graph.bfs_distances_bounded(source, bound);
            let mut reached = 0u64;
            let mut total = 0u64;
            for &d in &dist {
                if d != u32::MAX && d > 0 {
                    reached += 1;
                    total += u64::from(d);
                }
            }
            if total == 0 {
                0.0
            } else {
                reached as f64 / total as f64
            }
        })
        .collect()
}

/// Betweenness centrality via Brandes' algorithm, optionally bounded so only
/// shortest paths of length <= `cutoff` contribute. Undirected, so the
/// accumulated dependencies are halved.
pub fn betweenness(graph: &Graph, cutoff: Option<u32>) -> Vec<f64> {
    let n = graph.node_count();
    let bound = cutoff.unwrap_or(u32::MAX);

    (0..n)
        .into_par_iter()
        .map(|source| brandes_from_source(graph, source, bound))
        .reduce(
            || vec![0.0; n],
            |mut acc, partial| {
                for (a, p) in acc.iter_mut().zip(partial) {
                    *a += p;
                }
                acc
            },
        )
        .into_iter()
        .map(|score| score / 2.0)
        .collect()
}

fn brandes_from_source(graph: &Graph, source: usize, cutoff: u32) -> Vec<f64> {
    let n = graph.node_count();
    let mut order = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0f64; n];
    let mut dist = vec![u32::MAX; n];
    sigma[source] = 1.0;
    dist[source] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(v) = queue.pop_front() {
        order.push(v);
        if dist[v] >= cutoff {
            continue;
        }
        for &w in graph.neighbors(v) {
            if dist[w] == u32::MAX {
                dist[w] = dist[v] + 1;
                queue.push_back(w);
            }
            if dist[w] == dist[v] + 1 {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    let mut delta = vec![0.0f64; n];
    let mut scores = vec![0.0f64; n];
    while let Some(w) = order.pop() {
        for &v in &predecessors[w] {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
        if w != source {
            scores[w] += delta[w];
        }
    }
    scores
}
