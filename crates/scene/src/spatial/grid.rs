use std::collections::HashMap;

use foundation::geo::GeoPoint;
use foundation::math::precision::stable_total_cmp_f64;

/// Larger than the planar diagonal of the lat/lon plane.
const MAX_REACH_DEG: f64 = 720.0;

/// Uniform lat/lon bucket index over a fixed list of points.
///
/// Ordering contract:
/// - `within` returns candidates by ascending planar distance; equal
///   distances keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct GridIndex {
    cell_deg: f64,
    points: Vec<GeoPoint>,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl GridIndex {
    pub const DEFAULT_CELL_DEG: f64 = 5.0;

    pub fn build(points: Vec<GeoPoint>, cell_deg: f64) -> Self {
        let cell_deg = if cell_deg > 0.0 {
            cell_deg
        } else {
            Self::DEFAULT_CELL_DEG
        };
        let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, p) in points.iter().enumerate() {
            cells.entry(cell_of(cell_deg, p)).or_default().push(i);
        }
        Self {
            cell_deg,
            points,
            cells,
        }
    }

    /// `(index, distance)` of every point within `radius_deg` of `at`.
    pub fn within(&self, at: GeoPoint, radius_deg: f64) -> Vec<(usize, f64)> {
        if self.points.is_empty() || radius_deg.is_nan() || radius_deg < 0.0 {
            return Vec::new();
        }
        // Past this every point on the globe is in range anyway.
        let reach = radius_deg.min(MAX_REACH_DEG);

        let lo = cell_of(self.cell_deg, &GeoPoint { lat: at.lat - reach, lon: at.lon - reach });
        let hi = cell_of(self.cell_deg, &GeoPoint { lat: at.lat + reach, lon: at.lon + reach });
        let rows = hi.0.saturating_sub(lo.0).saturating_add(1);
        let cols = hi.1.saturating_sub(lo.1).saturating_add(1);
        let span = rows.saturating_mul(cols);

        let mut out: Vec<(usize, f64)> = Vec::new();
        let mut consider = |i: usize| {
            let d = self.points[i].planar_distance(&at);
            if d <= radius_deg {
                out.push((i, d));
            }
        };

        // Wide queries touch more cells than there are points.
        if span > self.points.len() as i64 {
            (0..self.points.len()).for_each(&mut consider);
        } else {
            for row in lo.0..=hi.0 {
                for col in lo.1..=hi.1 {
                    if let Some(bucket) = self.cells.get(&(row, col)) {
                        bucket.iter().copied().for_each(&mut consider);
                    }
                }
            }
        }

        out.sort_by(|a, b| stable_total_cmp_f64(a.1, b.1).then_with(|| a.0.cmp(&b.0)));
        out
    }
}

fn cell_of(cell_deg: f64, p: &GeoPoint) -> (i64, i64) {
    (
        (p.lat / cell_deg).floor() as i64,
        (p.lon / cell_deg).floor() as i64,
    )
}
