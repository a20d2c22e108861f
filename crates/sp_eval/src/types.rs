use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

/// Red channel value that marks a superpixel border pixel in a contour image
pub const BOUNDARY_RED: u8 = 255;

/// Reference boundary image: `true` marks a ground-truth edge pixel
#[derive(Debug, Clone, PartialEq)]
pub struct GroundTruth {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl GroundTruth {
    /// Build from a closure evaluated at every `(x, y)`
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    /// Any non-zero luma value is a boundary pixel
    pub fn from_luma(image: &GrayImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.pixels().map(|p| p.0[0] != 0).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Boundary pixel coordinates in row-major order
    pub fn boundary_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width;
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .map(move |(i, _)| ((i as u32) % width, (i as u32) / width))
    }

    pub fn boundary_count(&self) -> usize {
        self.pixels.iter().filter(|set| **set).count()
    }
}

/// Candidate superpixel borders extracted from a contour image
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryMap {
    width: u32,
    height: u32,
    marked: Vec<bool>,
}

impl BoundaryMap {
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut marked = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                marked.push(f(x, y));
            }
        }
        Self { width, height, marked }
    }

    /// A pixel is marked iff its red channel equals [`BOUNDARY_RED`]
    pub fn from_rgb(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            marked: image.pixels().map(|p| p.0[0] == BOUNDARY_RED).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Signed lookup, out-of-bounds coordinates are never marked
    pub fn is_marked(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.marked[(y as usize) * (self.width as usize) + x as usize]
    }

    pub fn marked_count(&self) -> usize {
        self.marked.iter().filter(|m| **m).count()
    }
}

/// Closest marked pixel for a query coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearestMatch {
    pub x: u32,
    pub y: u32,
    /// Euclidean distance truncated toward zero
    pub distance: u32,
}

/// Metrics for a single (image, grid step) evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Fraction of ground-truth pixels with a match closer than the tolerance
    pub boundary_recall: f64,
    pub mean_distance: f64,
    pub median_distance: f64,
    /// Number of ground-truth boundary pixels searched
    pub boundary_pixels: usize,
    /// Number of those pixels counted as recall hits
    pub hits: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_ground_truth_from_luma() {
        let image = GrayImage::from_fn(4, 3, |x, y| {
            if x == 1 && y == 2 || x == 3 && y == 0 {
                Luma([1u8])
            } else {
                Luma([0u8])
            }
        });
        let gt = GroundTruth::from_luma(&image);

        assert_eq!(gt.dimensions(), (4, 3));
        assert_eq!(gt.boundary_count(), 2);

        // row-major: (3, 0) comes before (1, 2)
        let pixels: Vec<_> = gt.boundary_pixels().collect();
        assert_eq!(pixels, vec![(3, 0), (1, 2)]);
    }

    #[test]
    fn test_boundary_map_only_counts_full_red() {
        let image = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([254, 255, 255]),
            _ => Rgb([255, 255, 255]),
        });
        let map = BoundaryMap::from_rgb(&image);

        assert!(map.is_marked(0, 0));
        assert!(!map.is_marked(1, 0));
        assert!(map.is_marked(2, 0));
        assert_eq!(map.marked_count(), 2);
    }

    #[test]
    fn test_boundary_map_out_of_bounds() {
        let map = BoundaryMap::from_fn(2, 2, |_, _| true);
        assert!(!map.is_marked(-1, 0));
        assert!(!map.is_marked(0, 2));
        assert!(map.is_marked(1, 1));
    }
}
