//! Triangle-inequality distance estimation and loss evaluation.
//!
//! For a pair (s, t) and landmark m, `dist(m, s) + dist(m, t)` is an upper
//! bound on `dist(s, t)`. The estimate takes the minimum of that bound over
//! the first `k` landmarks of the ranked list, so growing `k` can only
//! tighten the estimate.

use crate::graph::NodeId;
use crate::pairs::NodePair;
use crate::table::DistanceTable;
use crate::{Error, Result};

/// Estimate the distance of every pair using the first `k` landmarks.
/// Results are aligned to the pair-set order. A table miss for any queried
/// node fails loudly with `MissingData`: it means the restricted table was
/// built from a target set that does not cover the pair set.
pub fn estimate_distances(
    landmarks: &[NodeId],
    pairs: &[NodePair],
    table: &DistanceTable,
    k: usize,
) -> Result<Vec<u32>> {
    if k == 0 || k > landmarks.len() {
        return Err(Error::InvalidArgument(format!(
            "landmark prefix {k} out of range 1..={}",
            landmarks.len()
        )));
    }

    pairs
        .iter()
        .map(|pair| {
            let mut shortest = u32::MAX;
            for landmark in &landmarks[..k] {
                let via = table.lookup(landmark, pair.first())?
                    + table.lookup(landmark, pair.second())?;
                shortest = shortest.min(via);
            }
            Ok(shortest)
        })
        .collect()
}

/// Aggregate relative error between estimates and ground truth:
/// `|sum(estimates) - sum(real)| / sum(real)`.
///
/// This is the sum-then-compare aggregation; per-pair mean-of-ratios would
/// produce materially different numbers and is deliberately not offered, so
/// every (method, landmark count) cell is comparable.
pub fn relative_error(estimates: &[u32], real: &[u32]) -> Result<f64> {
    if estimates.len() != real.len() {
        return Err(Error::InvalidArgument(format!(
            "estimate/real length mismatch: {} vs {}",
            estimates.len(),
            real.len()
        )));
    }
    if real.is_empty() {
        return Err(Error::InvalidArgument(
            "cannot evaluate loss over an empty pair set".to_string(),
        ));
    }

    let est_sum: u64 = estimates.iter().map(|&x| u64::from(x)).sum();
    let real_sum: u64 = real.iter().map(|&x| u64::from(x)).sum();
    Ok((est_sum.abs_diff(real_sum)) as f64 / real_sum as f64)
}
