use foundation::math::{lng_lat_to_world, world_to_lng_lat};
use foundation::time::Time;
use serde::{Deserialize, Serialize};

use crate::view::ViewState;

const EPSILON: f64 = 1e-6;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interpolation {
    /// Straight lerp of every field.
    Linear,
    /// Smooth zoom-out/pan/zoom-in path in Web-Mercator world space.
    FlyTo {
        curvature: f64,
        /// Larger side of the viewport in pixels.
        viewport_px: f64,
    },
}

/// An in-flight camera move.
///
/// The interpolated state is a pure function of `(start, target, elapsed,
/// duration)`; nothing accumulates between frames.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub start: ViewState,
    pub target: ViewState,
    pub started_at: Time,
    pub duration_ms: f64,
    pub interpolation: Interpolation,
}

impl Transition {
    /// Normalized progress in `[0, 1]`. Zero-length transitions are complete
    /// immediately.
    pub fn progress(&self, now: Time) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (now.since(self.started_at) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self, now: Time) -> bool {
        self.progress(now) >= 1.0
    }

    /// State at `now`. Exactly `target` once complete.
    pub fn state_at(&self, now: Time) -> ViewState {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.target;
        }
        interpolate(self.interpolation, &self.start, &self.target, t)
    }
}

pub fn interpolate(kind: Interpolation, start: &ViewState, end: &ViewState, t: f64) -> ViewState {
    let t = t.clamp(0.0, 1.0);
    match kind {
        Interpolation::Linear => ViewState {
            longitude: lerp(start.longitude, end.longitude, t),
            latitude: lerp(start.latitude, end.latitude, t),
            zoom: lerp(start.zoom, end.zoom, t),
            pitch: lerp(start.pitch, end.pitch, t),
            bearing: lerp(start.bearing, end.bearing, t),
        },
        Interpolation::FlyTo {
            curvature,
            viewport_px,
        } => fly_to(start, end, t, curvature, viewport_px),
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Van Wijk & Nuij optimal zoom/pan path.
///
/// Distances are measured in screen pixels at the start zoom, `w` is the
/// visible width relative to the start.
fn fly_to(start: &ViewState, end: &ViewState, t: f64, rho: f64, viewport_px: f64) -> ViewState {
    let pitch = lerp(start.pitch, end.pitch, t);
    let bearing = lerp(start.bearing, end.bearing, t);

    let start_xy = lng_lat_to_world(start.longitude, start.latitude);
    let end_xy = lng_lat_to_world(end.longitude, end.latitude);
    let delta = [end_xy[0] - start_xy[0], end_xy[1] - start_xy[1]];

    let start_scale = start.zoom.exp2();
    let w0 = viewport_px.max(1.0);
    let w1 = w0 / (end.zoom - start.zoom).exp2();
    let u1 = delta[0].hypot(delta[1]) * start_scale;

    let straight = ViewState {
        longitude: lerp(start.longitude, end.longitude, t),
        latitude: lerp(start.latitude, end.latitude, t),
        zoom: lerp(start.zoom, end.zoom, t),
        pitch,
        bearing,
    };
    if u1 < EPSILON || rho <= 0.0 {
        return straight;
    }

    let rho2 = rho * rho;
    let b0 = (w1 * w1 - w0 * w0 + rho2 * rho2 * u1 * u1) / (2.0 * w0 * rho2 * u1);
    let b1 = (w1 * w1 - w0 * w0 - rho2 * rho2 * u1 * u1) / (2.0 * w1 * rho2 * u1);
    // ln(sqrt(b^2 + 1) - b) without the cancellation for large b.
    let r0 = -b0.asinh();
    let r1 = -b1.asinh();
    let path_len = (r1 - r0) / rho;
    if !path_len.is_finite() {
        return straight;
    }

    let s = t * path_len;
    let w = r0.cosh() / (r0 + rho * s).cosh();
    let u = w0 * ((r0.cosh() * (r0 + rho * s).tanh() - r0.sinh()) / rho2) / u1;
    if !(w.is_finite() && w > 0.0 && u.is_finite()) {
        return straight;
    }

    let (longitude, latitude) =
        world_to_lng_lat([start_xy[0] + delta[0] * u, start_xy[1] + delta[1] * u]);
    ViewState {
        longitude,
        latitude,
        zoom: start.zoom + (1.0 / w).log2(),
        pitch,
        bearing,
    }
}
