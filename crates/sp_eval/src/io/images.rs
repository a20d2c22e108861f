use std::path::Path;

use image::DynamicImage;

use crate::{
    error::{EvalError, Result},
    types::{BoundaryMap, GroundTruth},
};

fn open(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| EvalError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a ground-truth edge image, any non-zero luma value is an edge
pub fn load_ground_truth<P: AsRef<Path>>(path: P) -> Result<GroundTruth> {
    let image = open(path.as_ref())?;
    Ok(GroundTruth::from_luma(&image.to_luma8()))
}

/// Load a superpixel contour image, borders are pixels with a full red channel
pub fn load_boundary_map<P: AsRef<Path>>(path: P) -> Result<BoundaryMap> {
    let image = open(path.as_ref())?;
    Ok(BoundaryMap::from_rgb(&image.to_rgb8()))
}
