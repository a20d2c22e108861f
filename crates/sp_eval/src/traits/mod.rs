use std::path::Path;

use crate::{
    error::Result,
    io::charts::ChartSeries,
    types::{BoundaryMap, NearestMatch},
};

/// Trait for nearest marked-boundary lookup around a ground-truth pixel
pub trait NearestBoundarySearch: Send + Sync {
    /// Find the closest marked pixel to `(x, y)`, `None` if the map has none
    fn nearest(&self, x: u32, y: u32, boundary: &BoundaryMap) -> Option<NearestMatch>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Trait for chart rendering backends
pub trait ChartRenderer: Send + Sync {
    /// Render a series and write it to `path`
    fn render(&self, series: &ChartSeries, path: &Path) -> Result<()>;
}
