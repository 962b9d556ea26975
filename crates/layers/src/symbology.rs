use dataset::Rgba;
use serde::{Deserialize, Serialize};

/// Opaque deep-navy ocean fill of the globe surface.
pub const SURFACE_FILL: Rgba = [12, 18, 30, 255];
/// Faint white ring around map points.
pub const POINT_STROKE: Rgba = [255, 255, 255, 80];
/// Outline drawn around the selected column.
pub const HIGHLIGHT_OUTLINE: Rgba = [255, 255, 255, 255];

/// Styling constants for the cluster layers.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Column footprint radius (meters).
    pub column_radius_m: f64,
    /// Facets around each column.
    pub column_disk_resolution: u32,
    /// Meters of column height per mention.
    pub elevation_scale: f64,
    /// Point radius in meters per square root of mentions.
    pub point_radius_scale: f64,
    pub point_radius_min_px: f64,
    pub point_radius_max_px: f64,
    pub point_line_width_min_px: f64,
    /// Degrees between outline vertices of the globe surface.
    pub surface_step_deg: f64,
    /// Poleward extent of the globe surface (degrees).
    pub surface_lat_limit: f64,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            column_radius_m: 45_000.0,
            column_disk_resolution: 8,
            elevation_scale: 100.0,
            point_radius_scale: 200.0,
            point_radius_min_px: 6.0,
            point_radius_max_px: 40.0,
            point_line_width_min_px: 1.0,
            surface_step_deg: 5.0,
            surface_lat_limit: 85.0,
        }
    }
}

impl LayerConfig {
    /// Linear column height for `total_mentions`.
    pub fn elevation_m(&self, total_mentions: u64) -> f64 {
        total_mentions as f64 * self.elevation_scale
    }

    /// Sub-linear ground radius for `total_mentions`.
    pub fn point_radius_m(&self, total_mentions: u64) -> f64 {
        (total_mentions as f64).sqrt() * self.point_radius_scale
    }
}

#[cfg(test)]
mod tests {
    use super::LayerConfig;

    #[test]
    fn defaults_are_stable() {
        let c = LayerConfig::default();
        assert_eq!(c.column_radius_m, 45_000.0);
        assert_eq!(c.column_disk_resolution, 8);
        assert_eq!(c.elevation_scale, 100.0);
        assert_eq!(c.point_radius_min_px, 6.0);
        assert_eq!(c.point_radius_max_px, 40.0);
        assert_eq!(c.surface_step_deg, 5.0);
        assert_eq!(c.surface_lat_limit, 85.0);
    }

    #[test]
    fn elevation_is_linear_and_radius_compresses() {
        let c = LayerConfig::default();
        assert_eq!(c.elevation_m(4200), 420_000.0);
        assert_eq!(c.elevation_m(8400), 2.0 * c.elevation_m(4200));
        assert_eq!(c.point_radius_m(100), 2_000.0);
        assert_eq!(c.point_radius_m(400), 2.0 * c.point_radius_m(100));
    }
}
