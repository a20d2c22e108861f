use tracing::debug;

use crate::{
    algorithms::search::RingSearch,
    error::{EvalError, Result},
    traits::NearestBoundarySearch,
    types::{BoundaryMap, GroundTruth, MetricRecord},
};

/// Distances strictly below this many pixels count as a boundary-recall hit
pub const DEFAULT_RECALL_TOLERANCE: u32 = 3;

/// Computes boundary recall and closest-distance statistics for one
/// ground-truth / candidate pair
pub struct MetricAggregator {
    search: Box<dyn NearestBoundarySearch>,
    tolerance: u32,
}

impl MetricAggregator {
    pub fn new(search: Box<dyn NearestBoundarySearch>, tolerance: u32) -> Self {
        Self { search, tolerance }
    }

    pub fn tolerance(&self) -> u32 {
        self.tolerance
    }

    pub fn search_name(&self) -> &'static str {
        self.search.name()
    }

    /// Closest-match distance for every ground-truth pixel, in row-major order
    pub fn distances(
        &self,
        label: &str,
        ground_truth: &GroundTruth,
        boundary: &BoundaryMap,
    ) -> Result<Vec<u32>> {
        if ground_truth.dimensions() != boundary.dimensions() {
            return Err(EvalError::DimensionMismatch {
                label: label.to_string(),
                ground_truth: ground_truth.dimensions(),
                candidate: boundary.dimensions(),
            });
        }

        ground_truth
            .boundary_pixels()
            .map(|(x, y)| {
                self.search
                    .nearest(x, y, boundary)
                    .map(|found| found.distance)
                    .ok_or_else(|| EvalError::NoBoundaryMatch {
                        label: label.to_string(),
                        x,
                        y,
                    })
            })
            .collect()
    }

    /// Evaluate a pair; an empty ground truth is an error rather than a NaN recall
    pub fn evaluate(
        &self,
        label: &str,
        ground_truth: &GroundTruth,
        boundary: &BoundaryMap,
    ) -> Result<MetricRecord> {
        let distances = self.distances(label, ground_truth, boundary)?;
        let record = summarize(label, &distances, self.tolerance)?;

        debug!(
            "{}: recall={:.3} mean={:.3} median={:.3} ({} of {} pixels within {}px)",
            label,
            record.boundary_recall,
            record.mean_distance,
            record.median_distance,
            record.hits,
            record.boundary_pixels,
            self.tolerance
        );

        Ok(record)
    }
}

impl Default for MetricAggregator {
    fn default() -> Self {
        Self::new(Box::new(RingSearch), DEFAULT_RECALL_TOLERANCE)
    }
}

/// Reduce a distance list to a metric record
pub fn summarize(label: &str, distances: &[u32], tolerance: u32) -> Result<MetricRecord> {
    let (Some(mean_distance), Some(median_distance)) = (mean(distances), median(distances)) else {
        return Err(EvalError::EmptyGroundTruth {
            label: label.to_string(),
        });
    };

    let hits = distances.iter().filter(|&&d| d < tolerance).count();

    Ok(MetricRecord {
        boundary_recall: hits as f64 / distances.len() as f64,
        mean_distance,
        median_distance,
        boundary_pixels: distances.len(),
        hits,
    })
}

pub fn mean(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    Some(sum / values.len() as f64)
}

/// Middle value, or the average of the two middle values for even counts
pub fn median(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}
