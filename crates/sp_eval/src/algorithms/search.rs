use crate::{
    traits::NearestBoundarySearch,
    types::{BoundaryMap, NearestMatch},
};

/// Expanding square-ring search that stops at the first ring holding a match.
///
/// Ring `r` is the border of the `(2r + 1) x (2r + 1)` box centred on the
/// query; radius 0 is the query pixel itself. Rows are scanned at `y - r` and
/// `y + r`, columns at `x - r` and `x + r`, all relative to the query
/// coordinate. The first ring with a match is not guaranteed to hold the true
/// Euclidean nearest pixel: a corner of ring `r` lies at `r * sqrt(2)` while
/// ring `r + 1` may hold a pixel at `r + 1`. See [`ExactRingSearch`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RingSearch;

impl NearestBoundarySearch for RingSearch {
    fn nearest(&self, x: u32, y: u32, boundary: &BoundaryMap) -> Option<NearestMatch> {
        let max_radius = max_radius(boundary);
        let mut best = None;
        for radius in 0..=max_radius {
            scan_ring(x as i64, y as i64, radius, boundary, &mut best);
            if best.is_some() {
                break;
            }
        }
        best.map(Candidate::into_match)
    }

    fn name(&self) -> &'static str {
        "ring"
    }
}

/// Ring search that keeps expanding until no unscanned pixel can be closer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactRingSearch;

impl NearestBoundarySearch for ExactRingSearch {
    fn nearest(&self, x: u32, y: u32, boundary: &BoundaryMap) -> Option<NearestMatch> {
        let max_radius = max_radius(boundary);
        let mut best: Option<Candidate> = None;
        for radius in 0..=max_radius {
            scan_ring(x as i64, y as i64, radius, boundary, &mut best);
            // every pixel outside ring r is at least r + 1 away
            if best.is_some_and(|c| c.distance <= (radius + 1) as f64) {
                break;
            }
        }
        best.map(Candidate::into_match)
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    x: i64,
    y: i64,
    distance: f64,
}

impl Candidate {
    fn into_match(self) -> NearestMatch {
        NearestMatch {
            x: self.x as u32,
            y: self.y as u32,
            distance: self.distance as u32,
        }
    }
}

/// Largest radius that can still reach a pixel inside the image
fn max_radius(boundary: &BoundaryMap) -> i64 {
    boundary.width().max(boundary.height()) as i64
}

fn scan_ring(cx: i64, cy: i64, radius: i64, boundary: &BoundaryMap, best: &mut Option<Candidate>) {
    if radius == 0 {
        consider(cx, cy, cx, cy, boundary, best);
        return;
    }

    // top, bottom
    for x in (cx - radius)..=(cx + radius) {
        consider(x, cy - radius, cx, cy, boundary, best);
    }
    for x in (cx - radius)..=(cx + radius) {
        consider(x, cy + radius, cx, cy, boundary, best);
    }

    // left, right (corners already visited)
    for y in (cy - radius + 1)..=(cy + radius - 1) {
        consider(cx - radius, y, cx, cy, boundary, best);
    }
    for y in (cy - radius + 1)..=(cy + radius - 1) {
        consider(cx + radius, y, cx, cy, boundary, best);
    }
}

fn consider(x: i64, y: i64, cx: i64, cy: i64, boundary: &BoundaryMap, best: &mut Option<Candidate>) {
    if !boundary.is_marked(x, y) {
        return;
    }
    let dx = (x - cx) as f64;
    let dy = (y - cy) as f64;
    let distance = (dx * dx + dy * dy).sqrt();
    if best.is_none_or(|b| distance < b.distance) {
        *best = Some(Candidate { x, y, distance });
    }
}
