use serde::{Deserialize, Serialize};

use crate::view::ViewState;

/// Engine tunables. Everything the view engine, picking and summary task
/// treat as a constant lives here rather than as a literal at the use site.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Zoom strictly below this renders the globe; at or above, the flat map.
    pub globe_zoom_threshold: f64,
    pub initial_view: ViewState,

    // ── Interaction clamps ──────────────────────────────────
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Degrees.
    pub max_pitch: f64,
    /// Camera target latitude limit (Web-Mercator edge).
    pub max_camera_latitude: f64,

    // ── Fly-to on selection ─────────────────────────────────
    pub fly_to_zoom: f64,
    pub fly_to_pitch: f64,
    pub fly_to_duration_ms: f64,
    /// Path curvature (rho) of the smooth zoom/pan path.
    pub fly_to_curvature: f64,
    /// Viewport in pixels; the fly-to path is scaled to its larger side.
    pub viewport_width_px: f64,
    pub viewport_height_px: f64,

    /// Simulated latency of the on-demand summary.
    pub summary_latency_ms: f64,
    /// Extra pointer slack for geographic hit-testing.
    pub pick_tolerance_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            globe_zoom_threshold: 3.0,
            initial_view: ViewState {
                longitude: 30.0,
                latitude: 20.0,
                zoom: 1.2,
                pitch: 0.0,
                bearing: 0.0,
            },

            min_zoom: 0.0,
            max_zoom: 20.0,
            max_pitch: 60.0,
            max_camera_latitude: 85.051_129,

            fly_to_zoom: 6.0,
            fly_to_pitch: 45.0,
            fly_to_duration_ms: 2000.0,
            fly_to_curvature: 1.414,
            viewport_width_px: 1280.0,
            viewport_height_px: 720.0,

            summary_latency_ms: 2200.0,
            pick_tolerance_px: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EngineConfig;

    #[test]
    fn defaults_are_stable() {
        let c = EngineConfig::default();
        assert_eq!(c.globe_zoom_threshold, 3.0);
        assert_eq!(c.initial_view.longitude, 30.0);
        assert_eq!(c.initial_view.latitude, 20.0);
        assert_eq!(c.initial_view.zoom, 1.2);
        assert_eq!(c.fly_to_zoom, 6.0);
        assert_eq!(c.fly_to_pitch, 45.0);
        assert_eq!(c.fly_to_duration_ms, 2000.0);
        assert_eq!(c.summary_latency_ms, 2200.0);
        assert!(c.initial_view.zoom < c.globe_zoom_threshold);
    }
}
