use dataset::{ClusterId, ClusterRecord, Dataset, Rgba, severity_color};
use foundation::geo::GeoPoint;
use foundation::math::{lng_lat_to_world, meters_per_pixel};
use serde::Serialize;

use crate::layer::{Layer, LayerId};
use crate::symbology::{LayerConfig, POINT_STROKE};

/// One flat disc per cluster on the 2D map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub record_id: ClusterId,
    pub position: GeoPoint,
    /// Web-Mercator world coordinates (512 px tile at zoom 0).
    pub world: [f64; 2],
    /// Ground radius in meters, before pixel clamping.
    pub radius_m: f64,
    pub fill_color: Rgba,
    pub line_color: Rgba,
    pub line_width_min_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterLayer {
    points: Vec<ScatterPoint>,
    radius_min_px: f64,
    radius_max_px: f64,
}

impl ScatterLayer {
    pub fn build(config: &LayerConfig, dataset: &Dataset) -> Self {
        let points = dataset
            .records()
            .iter()
            .map(|r| scatter_point(config, r))
            .collect();
        Self {
            points,
            radius_min_px: config.point_radius_min_px,
            radius_max_px: config.point_radius_max_px,
        }
    }

    pub fn points(&self) -> &[ScatterPoint] {
        &self.points
    }

    /// On-screen radius at `zoom`, clamped to the configured pixel range.
    pub fn radius_px(&self, point: &ScatterPoint, zoom: f64) -> f64 {
        let mpp = meters_per_pixel(point.position.lat, zoom);
        let raw = if mpp > 0.0 { point.radius_m / mpp } else { self.radius_max_px };
        raw.clamp(self.radius_min_px, self.radius_max_px)
    }

    /// Upper bound on any point's ground radius at `zoom`, reached by a
    /// max-size point on the equator.
    pub fn max_radius_m(&self, zoom: f64) -> f64 {
        self.radius_max_px * meters_per_pixel(0.0, zoom)
    }
}

fn scatter_point(config: &LayerConfig, r: &ClusterRecord) -> ScatterPoint {
    ScatterPoint {
        record_id: r.id.clone(),
        position: r.center,
        world: lng_lat_to_world(r.center.lon, r.center.lat),
        radius_m: config.point_radius_m(r.total_mentions),
        fill_color: severity_color(r.avg_severity),
        line_color: POINT_STROKE,
        line_width_min_px: config.point_line_width_min_px,
    }
}

impl Layer for ScatterLayer {
    fn id(&self) -> LayerId {
        LayerId::CLUSTER_POINTS
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    fn record_id(&self, index: usize) -> Option<&ClusterId> {
        self.points.get(index).map(|p| &p.record_id)
    }
}
