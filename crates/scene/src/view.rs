use foundation::geo::{GeoPoint, wrap_longitude};
use foundation::time::Time;
use layers::RenderMode;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::transition::{Interpolation, Transition};

/// Camera parameters. Angles in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl ViewState {
    pub fn is_finite(&self) -> bool {
        [self.longitude, self.latitude, self.zoom, self.pitch, self.bearing]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: self.latitude,
            lon: self.longitude,
        }
    }
}

/// Relative change from a drag, scroll or pinch.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewDelta {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl ViewDelta {
    pub fn pan(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            ..Self::default()
        }
    }

    pub fn zoom(zoom: f64) -> Self {
        Self {
            zoom,
            ..Self::default()
        }
    }

    pub fn rotate(bearing: f64, pitch: f64) -> Self {
        Self {
            bearing,
            pitch,
            ..Self::default()
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.longitude, self.latitude, self.zoom, self.pitch, self.bearing]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePhase {
    Idle,
    Transitioning,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No transition in flight.
    Idle,
    /// Transition advanced, still running.
    Advanced,
    /// Transition reached its target this tick.
    Completed,
}

/// Single owner of the live `ViewState`.
///
/// Ordering contract:
/// - `fly_to` always restarts from the state as of the last `tick`; an
///   in-flight transition is replaced outright.
/// - `on_interaction` cancels any in-flight transition before applying.
#[derive(Debug, Clone)]
pub struct ViewEngine {
    config: EngineConfig,
    state: ViewState,
    transition: Option<Transition>,
    now: Time,
}

impl ViewEngine {
    pub fn new(config: EngineConfig) -> Self {
        let state = clamp_state(&config, config.initial_view);
        Self {
            config,
            state,
            transition: None,
            now: Time::ZERO,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn view_state(&self) -> ViewState {
        self.state
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn phase(&self) -> EnginePhase {
        if self.transition.is_some() {
            EnginePhase::Transitioning
        } else {
            EnginePhase::Idle
        }
    }

    /// Engine time as of the last tick.
    pub fn now(&self) -> Time {
        self.now
    }

    pub fn render_mode(&self) -> RenderMode {
        RenderMode::for_zoom(self.state.zoom, self.config.globe_zoom_threshold)
    }

    /// Status label such as `GLOBE | Z1.2`.
    pub fn mode_label(&self) -> String {
        format!("{} | Z{:.1}", self.render_mode().label(), self.state.zoom)
    }

    /// Applies `delta`. A delta with any non-finite component is dropped
    /// whole and leaves both state and transition untouched.
    pub fn on_interaction(&mut self, delta: ViewDelta) -> ViewState {
        if !delta.is_finite() {
            debug!(?delta, "non-finite interaction ignored");
            return self.state;
        }
        if self.transition.take().is_some() {
            debug!("transition cancelled by interaction");
        }
        let next = ViewState {
            longitude: self.state.longitude + delta.longitude,
            latitude: self.state.latitude + delta.latitude,
            zoom: self.state.zoom + delta.zoom,
            pitch: self.state.pitch + delta.pitch,
            bearing: self.state.bearing + delta.bearing,
        };
        self.state = clamp_state(&self.config, next);
        self.state
    }

    /// Smooth flight to `target`. Bearing resets to north.
    ///
    /// Returns `false` and keeps any current transition when the target is
    /// not finite.
    pub fn fly_to(&mut self, target: GeoPoint, zoom: f64, pitch: f64, duration_ms: f64) -> bool {
        let target = ViewState {
            longitude: target.lon,
            latitude: target.lat,
            zoom,
            pitch,
            bearing: 0.0,
        };
        let interpolation = Interpolation::FlyTo {
            curvature: self.config.fly_to_curvature,
            viewport_px: self
                .config
                .viewport_width_px
                .max(self.config.viewport_height_px),
        };
        self.start_transition(target, duration_ms, interpolation)
    }

    pub fn start_transition(
        &mut self,
        target: ViewState,
        duration_ms: f64,
        interpolation: Interpolation,
    ) -> bool {
        if !target.is_finite() {
            debug!(?target, "non-finite transition target ignored");
            return false;
        }
        let target = clamp_state(&self.config, target);
        if self.transition.is_some() {
            debug!("replacing in-flight transition");
        }
        debug!(
            lon = target.longitude,
            lat = target.latitude,
            zoom = target.zoom,
            duration_ms,
            "transition started"
        );
        self.transition = Some(Transition {
            start: self.state,
            target,
            started_at: self.now,
            duration_ms: duration_ms.max(0.0),
            interpolation,
        });
        true
    }

    /// Advances engine time to `now` and the transition with it.
    pub fn tick(&mut self, now: Time) -> TickOutcome {
        if now.0 > self.now.0 {
            self.now = now;
        }
        let Some(tr) = self.transition else {
            return TickOutcome::Idle;
        };

        if tr.is_complete(self.now) {
            self.state = tr.target;
            self.transition = None;
            debug!(zoom = self.state.zoom, "transition completed");
            return TickOutcome::Completed;
        }
        self.state = tr.state_at(self.now);
        trace!(zoom = self.state.zoom, "transition advanced");
        TickOutcome::Advanced
    }
}

fn clamp_state(config: &EngineConfig, s: ViewState) -> ViewState {
    ViewState {
        longitude: if (-180.0..=180.0).contains(&s.longitude) {
            s.longitude
        } else {
            wrap_longitude(s.longitude)
        },
        latitude: s
            .latitude
            .clamp(-config.max_camera_latitude, config.max_camera_latitude),
        zoom: s.zoom.clamp(config.min_zoom, config.max_zoom),
        pitch: s.pitch.clamp(0.0, config.max_pitch),
        bearing: wrap_bearing(s.bearing),
    }
}

fn wrap_bearing(b: f64) -> f64 {
    if (-180.0..=180.0).contains(&b) {
        return b;
    }
    let w = (b + 180.0).rem_euclid(360.0) - 180.0;
    if w == -180.0 { 180.0 } else { w }
}

#[cfg(test)]
mod tests {
    use super::{EnginePhase, TickOutcome, ViewDelta, ViewEngine};
    use crate::config::EngineConfig;
    use foundation::geo::GeoPoint;
    use foundation::time::Time;
    use layers::RenderMode;

    fn engine() -> ViewEngine {
        ViewEngine::new(EngineConfig::default())
    }

    #[test]
    fn starts_idle_on_the_globe() {
        let e = engine();
        assert_eq!(e.phase(), EnginePhase::Idle);
        assert_eq!(e.render_mode(), RenderMode::Globe);
        assert_eq!(e.mode_label(), "GLOBE | Z1.2");
    }

    #[test]
    fn render_mode_follows_zoom() {
        let mut e = engine();
        e.on_interaction(ViewDelta::zoom(1.0));
        assert_eq!(e.render_mode(), RenderMode::Globe);
        e.on_interaction(ViewDelta::zoom(2.0));
        assert_eq!(e.render_mode(), RenderMode::Map);
        assert_eq!(e.mode_label(), "MAP | Z4.2");
    }

    #[test]
    fn interaction_clamps_and_wraps() {
        let mut e = engine();
        let s = e.on_interaction(ViewDelta {
            longitude: 170.0,
            latitude: 200.0,
            zoom: -10.0,
            pitch: 500.0,
            bearing: 270.0,
        });
        assert_eq!(s.longitude, -160.0);
        assert_eq!(s.latitude, 85.051_129);
        assert_eq!(s.zoom, 0.0);
        assert_eq!(s.pitch, 60.0);
        assert_eq!(s.bearing, -90.0);
    }

    #[test]
    fn fly_to_runs_to_exact_target() {
        let mut e = engine();
        e.fly_to(GeoPoint::new(33.3, 44.4).unwrap(), 6.0, 45.0, 2000.0);
        assert_eq!(e.phase(), EnginePhase::Transitioning);

        assert_eq!(e.tick(Time(1000.0)), TickOutcome::Advanced);
        let mid = e.view_state();
        assert!(mid.pitch > 0.0 && mid.pitch < 45.0);

        assert_eq!(e.tick(Time(2000.0)), TickOutcome::Completed);
        let s = e.view_state();
        assert_eq!((s.longitude, s.latitude, s.zoom, s.pitch, s.bearing), (44.4, 33.3, 6.0, 45.0, 0.0));
        assert_eq!(e.phase(), EnginePhase::Idle);
        assert_eq!(e.render_mode(), RenderMode::Map);
        assert_eq!(e.tick(Time(2100.0)), TickOutcome::Idle);
    }

    #[test]
    fn second_fly_to_replaces_the_first() {
        let mut e = engine();
        e.fly_to(GeoPoint::new(33.3, 44.4).unwrap(), 6.0, 45.0, 2000.0);
        e.tick(Time(500.0));
        let restart_from = e.view_state();

        e.fly_to(GeoPoint::new(-15.0, -47.0).unwrap(), 6.0, 45.0, 2000.0);
        let tr = e.transition().copied().unwrap();
        assert_eq!(tr.start, restart_from);
        assert_eq!(tr.started_at, Time(500.0));

        e.tick(Time(2000.0));
        assert_eq!(e.phase(), EnginePhase::Transitioning);
        e.tick(Time(2500.0));
        let s = e.view_state();
        assert_eq!((s.longitude, s.latitude), (-47.0, -15.0));
    }

    #[test]
    fn interaction_cancels_transition() {
        let mut e = engine();
        e.fly_to(GeoPoint::new(10.0, 10.0).unwrap(), 6.0, 45.0, 2000.0);
        e.tick(Time(300.0));
        let before = e.view_state();
        let after = e.on_interaction(ViewDelta::pan(1.0, 0.0));
        assert_eq!(e.phase(), EnginePhase::Idle);
        assert!((after.longitude - before.longitude - 1.0).abs() < 1e-9);
        assert_eq!(e.tick(Time(5000.0)), TickOutcome::Idle);
        assert_eq!(e.view_state(), after);
    }

    #[test]
    fn non_finite_interaction_is_ignored() {
        let mut e = engine();
        let before = e.view_state();
        for delta in [
            ViewDelta::zoom(f64::NAN),
            ViewDelta::pan(f64::NAN, 0.0),
            ViewDelta::pan(0.0, f64::INFINITY),
            ViewDelta::rotate(f64::NEG_INFINITY, 0.0),
        ] {
            assert_eq!(e.on_interaction(delta), before);
        }
        assert_eq!(e.render_mode(), RenderMode::Globe);

        e.fly_to(GeoPoint::new(10.0, 10.0).unwrap(), 6.0, 45.0, 2000.0);
        e.on_interaction(ViewDelta::zoom(f64::NAN));
        assert_eq!(e.phase(), EnginePhase::Transitioning);
    }

    #[test]
    fn non_finite_fly_to_is_ignored() {
        let mut e = engine();
        assert!(!e.fly_to(GeoPoint::new(10.0, 10.0).unwrap(), f64::NAN, 45.0, 2000.0));
        assert!(!e.fly_to(GeoPoint::new(10.0, 10.0).unwrap(), 6.0, f64::INFINITY, 2000.0));
        assert_eq!(e.phase(), EnginePhase::Idle);

        assert!(e.fly_to(GeoPoint::new(10.0, 10.0).unwrap(), 6.0, 45.0, 2000.0));
        let tr = e.transition().copied().unwrap();
        assert!(!e.fly_to(GeoPoint::new(20.0, 20.0).unwrap(), f64::NAN, 45.0, 2000.0));
        assert_eq!(e.transition().copied(), Some(tr));
        e.tick(Time(2000.0));
        assert!(e.view_state().zoom.is_finite());
    }

    #[test]
    fn time_never_runs_backwards() {
        let mut e = engine();
        e.tick(Time(100.0));
        e.tick(Time(50.0));
        assert_eq!(e.now(), Time(100.0));
    }
}
