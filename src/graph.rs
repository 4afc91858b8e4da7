//! Undirected simple graph over string-labelled nodes.
//!
//! Nodes carry stable string labels; internally the graph is an index-based
//! adjacency list so that traversals and tie-breaking are deterministic
//! (insertion order is the "original node order" used by the selection
//! strategies). The graph is immutable once handed to the pipeline.

use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Node identifier: the label from the edge list (or a stringified index
/// for generated graphs). `Ord` on the label is the canonical ordering
/// used for pair canonicalization and the degree-method re-sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Undirected, unweighted, simple graph.
#[derive(Debug, Clone)]
pub struct Graph {
    labels: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            edge_count: 0,
        }
    }

    /// Add a node if it is not present yet; returns its index either way.
    pub fn add_node(&mut self, label: NodeId) -> usize {
        if let Some(&idx) = self.index.get(&label) {
            return idx;
        }
        let idx = self.labels.len();
        self.labels.push(label.clone());
        self.index.insert(label, idx);
        self.adjacency.push(Vec::new());
        idx
    }

    /// Add an undirected edge between two indices. Self-loops and duplicate
    /// edges are dropped so the graph stays simple.
    pub fn add_edge(&mut self, a: usize, b: usize) {
        if a == b || self.adjacency[a].contains(&b) {
            return;
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        self.edge_count += 1;
    }

    /// Read a whitespace-delimited edge list, one undirected edge per line.
    pub fn from_edge_list_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_edge_list_reader(BufReader::new(file))
    }

    /// Parse an edge list from any buffered reader. Empty lines and lines
    /// starting with `%` or `#` (dataset headers) are skipped; anything else
    /// must have exactly two fields.
    pub fn from_edge_list_reader(reader: impl BufRead) -> Result<Self> {
        let mut graph = Self::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') || trimmed.starts_with('#') {
                continue;
            }
            let mut fields = trimmed.split_whitespace();
            let (a, b) = match (fields.next(), fields.next()) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    return Err(Error::InvalidArgument(format!(
                        "malformed edge-list line {}: {trimmed:?}",
                        lineno + 1
                    )))
                }
            };
            let ia = graph.add_node(NodeId::new(a));
            let ib = graph.add_node(NodeId::new(b));
            graph.add_edge(ia, ib);
        }
        Ok(graph)
    }

    /// Generate a Watts-Strogatz small-world graph: a ring lattice of
    /// `size` nodes each linked to `neighbors` nodes on either side, with
    /// every edge endpoint rewired with probability `rewire_prob`.
    /// Labels are the stringified ring positions.
    pub fn watts_strogatz(size: usize, neighbors: usize, rewire_prob: f64, seed: u64) -> Self {
        let mut graph = Self::new();
        for i in 0..size {
            graph.add_node(NodeId::new(i.to_string()));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        for i in 0..size {
            for offset in 1..=neighbors {
                let j = (i + offset) % size;
                if rng.gen::<f64>() < rewire_prob {
                    let target = rng.gen_range(0..size);
                    graph.add_edge(i, target);
                } else {
                    graph.add_edge(i, j);
                }
            }
        }
        graph
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn degree(&self, idx: usize) -> usize {
        self.adjacency[idx].len()
    }

    pub fn label(&self, idx: usize) -> &NodeId {
        &self.labels[idx]
    }

    /// Node labels in insertion order.
    pub fn labels(&self) -> &[NodeId] {
        &self.labels
    }

    pub fn index_of(&self, label: &NodeId) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.adjacency[idx]
    }

    /// Single-source BFS. Returns hop distances indexed by node, with
    /// `u32::MAX` marking unreachable nodes.
    pub fn bfs_distances(&self, source: usize) -> Vec<u32> {
        self.bfs_distances_bounded(source, u32::MAX)
    }

    /// BFS truncated at `cutoff` hops from the source.
    pub fn bfs_distances_bounded(&self, source: usize, cutoff: u32) -> Vec<u32> {
        let mut dist = vec![u32::MAX; self.labels.len()];
        dist[source] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(u) = queue.pop_front() {
            let d = dist[u];
            if d >= cutoff {
                continue;
            }
            for &v in &self.adjacency[u] {
                if dist[v] == u32::MAX {
                    dist[v] = d + 1;
                    queue.push_back(v);
                }
            }
        }
        dist
    }

    /// Two-endpoint shortest-path query via bidirectional BFS. Expands the
    /// smaller frontier level by level and scans the whole level before
    /// concluding, so the first meeting reported is minimal. Returns `None`
    /// when the endpoints are in different components.
    pub fn pair_distance(&self, s: usize, t: usize) -> Option<u32> {
        if s == t {
            return Some(0);
        }
        let n = self.labels.len();
        let mut dist_fwd = vec![u32::MAX; n];
        let mut dist_bwd = vec![u32::MAX; n];
        dist_fwd[s] = 0;
        dist_bwd[t] = 0;
        let mut frontier_fwd = vec![s];
        let mut frontier_bwd = vec![t];

        loop {
            if frontier_fwd.is_empty() || frontier_bwd.is_empty() {
                return None;
            }
            let forward = frontier_fwd.len() <= frontier_bwd.len();
            let (frontier, dist_mine, dist_other) = if forward {
                (&mut frontier_fwd, &mut dist_fwd, &dist_bwd)
            } else {
                (&mut frontier_bwd, &mut dist_bwd, &dist_fwd)
            };

            let mut next = Vec::new();
            let mut best = u32::MAX;
            for &u in frontier.iter() {
                let d = dist_mine[u];
                for &v in &self.adjacency[u] {
                    if dist_other[v] != u32::MAX {
                        best = best.min(d + 1 + dist_other[v]);
                    }
                    if dist_mine[v] == u32::MAX {
                        dist_mine[v] = d + 1;
                        next.push(v);
                    }
                }
            }
            if best != u32::MAX {
                return Some(best);
            }
            *frontier = next;
        }
    }

    pub fn is_connected(&self) -> bool {
        if self.labels.is_empty() {
            return true;
        }
        self.bfs_distances(0).iter().all(|&d| d != u32::MAX)
    }

    /// Extract the largest connected component as a new graph. Node labels
    /// are preserved; their relative insertion order is preserved too.
    pub fn largest_component(&self) -> Self {
        let n = self.labels.len();
        let mut component = vec![usize::MAX; n];
        let mut sizes = Vec::new();
        for start in 0..n {
            if component[start] != usize::MAX {
                continue;
            }
            let id = sizes.len();
            let mut size = 0usize;
            let mut queue = VecDeque::new();
            component[start] = id;
            queue.push_back(start);
            while let Some(u) = queue.pop_front() {
                size += 1;
                for &v in &self.adjacency[u] {
                    if component[v] == usize::MAX {
                        component[v] = id;
                        queue.push_back(v);
                    }
                }
            }
            sizes.push(size);
        }

        let giant = sizes
            .iter()
            .enumerate()
            .max_by_key(|&(_, size)| *size)
            .map(|(id, _)| id)
            .unwrap_or(0);

        let mut sub = Self::new();
        for idx in 0..n {
            if component[idx] == giant {
                sub.add_node(self.labels[idx].clone());
            }
        }
        for idx in 0..n {
            if component[idx] != giant {
                continue;
            }
            let a = sub.index[&self.labels[idx]];
            for &nb in &self.adjacency[idx] {
                let b = sub.index[&self.labels[nb]];
                if a < b {
                    sub.add_edge(a, b);
                }
            }
        }
        sub
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
