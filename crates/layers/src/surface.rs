use std::sync::Arc;

use dataset::Rgba;
use earcutr::earcut;
use foundation::geo::GeoPoint;
use foundation::math::{Vec3, geo_to_ecef};
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::warn;

use crate::symbology::{LayerConfig, SURFACE_FILL};

/// Background mesh standing in for the planet in globe mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobeSurface {
    /// Closed outline in (lon, lat) degrees, without a repeated closing vertex.
    pub outline: Vec<[f64; 2]>,
    /// Flat triangle list (3 vertices per triangle) on the ellipsoid.
    pub triangles: Vec<Vec3>,
    pub fill_color: Rgba,
}

static SHARED: Lazy<Arc<GlobeSurface>> =
    Lazy::new(|| Arc::new(GlobeSurface::build(&LayerConfig::default())));

impl GlobeSurface {
    /// Process-wide surface for the default config. Built on first use.
    pub fn shared() -> Arc<GlobeSurface> {
        Arc::clone(&SHARED)
    }

    pub fn build(config: &LayerConfig) -> Self {
        let outline = surface_outline(config.surface_step_deg, config.surface_lat_limit);
        let triangles = triangulate(&outline);
        Self {
            outline,
            triangles,
            fill_color: SURFACE_FILL,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Walks the lat/lon rectangle counter-clockwise: south edge west to east, east
/// edge up, north edge back, west edge down.
pub fn surface_outline(step_deg: f64, lat_limit: f64) -> Vec<[f64; 2]> {
    let step = if step_deg > 0.0 { step_deg } else { 5.0 };
    let mut out: Vec<[f64; 2]> = Vec::new();

    let lon_steps = (360.0 / step).round() as i64;
    let lat_steps = ((2.0 * lat_limit) / step).round() as i64;

    for i in 0..=lon_steps {
        push_distinct(&mut out, [-180.0 + i as f64 * step, -lat_limit]);
    }
    for i in 0..=lat_steps {
        push_distinct(&mut out, [180.0, -lat_limit + i as f64 * step]);
    }
    for i in 0..=lon_steps {
        push_distinct(&mut out, [180.0 - i as f64 * step, lat_limit]);
    }
    for i in 0..=lat_steps {
        push_distinct(&mut out, [-180.0, lat_limit - i as f64 * step]);
    }
    drop_closing_duplicate(&mut out);
    out
}

fn push_distinct(out: &mut Vec<[f64; 2]>, p: [f64; 2]) {
    if out.last().is_some_and(|last| same_point(*last, p)) {
        return;
    }
    out.push(p);
}

fn drop_closing_duplicate(points: &mut Vec<[f64; 2]>) {
    if points.len() >= 2 && same_point(points[0], points[points.len() - 1]) {
        points.pop();
    }
}

fn same_point(a: [f64; 2], b: [f64; 2]) -> bool {
    (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
}

fn triangulate(outline: &[[f64; 2]]) -> Vec<Vec3> {
    if outline.len() < 3 {
        return Vec::new();
    }
    // Earcut runs in the (lon, lat) plane; vertices are lifted afterwards.
    let coords: Vec<f64> = outline.iter().flat_map(|p| [p[0], p[1]]).collect();
    let indices = match earcut(&coords, &[], 2) {
        Ok(ix) => ix,
        Err(err) => {
            warn!(?err, "globe surface triangulation failed");
            return Vec::new();
        }
    };

    let mut out = Vec::with_capacity(indices.len());
    for idx in indices {
        if let Some(p) = outline.get(idx) {
            out.push(geo_to_ecef(GeoPoint { lat: p[1], lon: p[0] }, 0.0));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{GlobeSurface, surface_outline};
    use crate::symbology::{LayerConfig, SURFACE_FILL};
    use foundation::math::{WGS84_A, WGS84_B};
    use std::sync::Arc;

    #[test]
    fn outline_is_closed_rectangle_without_repeats() {
        let outline = surface_outline(5.0, 85.0);
        // 72 steps per long edge, 34 per short edge.
        assert_eq!(outline.len(), 2 * 72 + 2 * 34);
        assert_eq!(outline[0], [-180.0, -85.0]);
        assert!(outline.contains(&[180.0, 85.0]));
        for w in outline.windows(2) {
            assert_ne!(w[0], w[1]);
        }
        assert_ne!(outline[0], outline[outline.len() - 1]);
    }

    #[test]
    fn triangulates_the_whole_outline() {
        let s = GlobeSurface::build(&LayerConfig::default());
        assert_eq!(s.fill_color, SURFACE_FILL);
        assert!(s.triangle_count() >= 2);
        assert_eq!(s.triangles.len() % 3, 0);
        for v in &s.triangles {
            let r = v.length();
            assert!(r >= WGS84_B - 1.0 && r <= WGS84_A + 1.0, "{r}");
        }
    }

    #[test]
    fn shared_surface_is_built_once() {
        let a = GlobeSurface::shared();
        let b = GlobeSurface::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
