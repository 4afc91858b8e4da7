//! Landmark distance table: one BFS sweep per landmark, persisted as a
//! nested JSON mapping of `landmark label -> target label -> hop distance`.
//!
//! Two scopes: `Full` stores distances to every node, `Restricted` stores
//! only the evaluation endpoints. Restricted mode does not change the BFS
//! cost (the sweep still covers the component) but shrinks the persisted
//! artifact, which is what matters for repeated runs on huge graphs.

use crate::graph::{Graph, NodeId};
use crate::{Error, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Which targets the builder stores per landmark.
#[derive(Debug, Clone, Copy)]
pub enum TableScope<'a> {
    /// Every node in the graph.
    Full,
    /// Only the given targets (must cover every node the estimator will
    /// ever query, i.e. all evaluation pair endpoints).
    Restricted(&'a [NodeId]),
}

/// Serialized mapping of landmark label to per-target hop distances.
/// Keys are strings throughout so the artifact and the in-memory lookups
/// agree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistanceTable {
    inner: HashMap<String, HashMap<String, u32>>,
}

impl DistanceTable {
    /// Run one BFS per landmark and collect the scoped distances. Landmarks
    /// are processed in parallel; each writes its own key, so the merged
    /// mapping is race-free. An unreachable scoped target is a
    /// `Disconnected` error, never a stored infinity.
    pub fn build(graph: &Graph, landmarks: &[NodeId], scope: TableScope<'_>) -> Result<Self> {
        let total = landmarks.len();
        let done = AtomicUsize::new(0);

        let rows: Vec<(String, HashMap<String, u32>)> = landmarks
            .par_iter()
            .map(|landmark| -> Result<(String, HashMap<String, u32>)> {
                let source = graph.index_of(landmark).ok_or_else(|| {
                    Error::InvalidArgument(format!("landmark {landmark} is not in the graph"))
                })?;
                let dist = graph.bfs_distances(source);

                let mut row = HashMap::new();
                match scope {
                    TableScope::Full => {
                        for (idx, &d) in dist.iter().enumerate() {
                            if d == u32::MAX {
                                return Err(Error::Disconnected(graph.label(idx).to_string()));
                            }
                            row.insert(graph.label(idx).to_string(), d);
                        }
                    }
                    TableScope::Restricted(targets) => {
                        for target in targets {
                            let t = graph.index_of(target).ok_or_else(|| {
                                Error::InvalidArgument(format!(
                                    "target {target} is not in the graph"
                                ))
                            })?;
                            if dist[t] == u32::MAX {
                                return Err(Error::Disconnected(target.to_string()));
                            }
                            row.insert(target.to_string(), dist[t]);
                        }
                    }
                }

                let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(landmark = %landmark, completed, total, "landmark sweep done");
                Ok((landmark.to_string(), row))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(landmarks = total, "built landmark distance table");
        Ok(Self {
            inner: rows.into_iter().collect(),
        })
    }

    /// Distance from a landmark to a node. A miss means the table was built
    /// with a target subset that does not cover the query.
    pub fn lookup(&self, landmark: &NodeId, node: &NodeId) -> Result<u32> {
        self.inner
            .get(landmark.as_str())
            .and_then(|row| row.get(node.as_str()))
            .copied()
            .ok_or_else(|| Error::MissingData {
                landmark: landmark.to_string(),
                node: node.to_string(),
            })
    }

    pub fn landmark_count(&self) -> usize {
        self.inner.len()
    }

    /// Write the table as JSON. Always overwrites; the reuse decision is
    /// the caller's. Writes a `.tmp` sibling first and renames it into
    /// place so a crash cannot leave a half-written artifact.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let tmp = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp)?;
            serde_json::to_writer(BufWriter::new(file), &self.inner)?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let inner = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self { inner })
    }
}
