use dataset::{ClusterId, ClusterRecord, Dataset, DatasetStats};
use foundation::geo::{GeoError, GeoPoint};
use layers::{LayerConfig, LayerSet, RenderMode, build_layers_with};
use runtime::{Event, EventBus, Frame, TimerQueue};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::detail::{ClusterDetail, summary_text};
use crate::picking::{PickHit, hit_test, resolve_pick};
use crate::selection::{Selection, SummaryState, SummaryTask, SummaryToken};
use crate::spatial::GridIndex;
use crate::view::{EnginePhase, TickOutcome, ViewDelta, ViewEngine, ViewState};

/// State changes observed by whoever drives the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DashboardEvent {
    RenderModeChanged { mode: RenderMode },
    TransitionStarted { target: ViewState },
    TransitionCompleted { state: ViewState },
    TransitionCancelled,
    Selected { record_id: ClusterId },
    SelectionCleared,
    SummaryPending { record_id: ClusterId, token: SummaryToken },
    SummaryReady { record_id: ClusterId },
    SummaryDiscarded { token: SummaryToken },
    DatasetReplaced { revision: u64, stats: DatasetStats },
    LayersBuilt { revision: u64, mode: RenderMode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DashboardTimer {
    SummaryDue(SummaryToken),
}

#[derive(Debug, Clone)]
struct CachedLayers {
    revision: u64,
    mode: RenderMode,
    highlight: Option<ClusterId>,
    set: LayerSet,
}

/// Single owner of the dataset, view, selection and summary state.
///
/// All mutation goes through these methods; each one emits the matching
/// [`DashboardEvent`] tagged with the current frame.
#[derive(Debug)]
pub struct Dashboard {
    config: EngineConfig,
    layer_config: LayerConfig,
    dataset: Dataset,
    revision: u64,
    grid: GridIndex,
    engine: ViewEngine,
    last_mode: RenderMode,
    selection: Selection,
    summary: SummaryTask,
    timers: TimerQueue<DashboardTimer>,
    frame: Frame,
    events: EventBus<DashboardEvent>,
    cache: Option<CachedLayers>,
}

impl Dashboard {
    pub fn new(dataset: Dataset, config: EngineConfig) -> Self {
        Self::with_layer_config(dataset, config, LayerConfig::default())
    }

    pub fn with_layer_config(dataset: Dataset, config: EngineConfig, layer_config: LayerConfig) -> Self {
        let engine = ViewEngine::new(config);
        let last_mode = engine.render_mode();
        let grid = build_grid(&dataset);
        Self {
            config,
            layer_config,
            dataset,
            revision: 0,
            grid,
            engine,
            last_mode,
            selection: Selection::new(),
            summary: SummaryTask::new(),
            timers: TimerQueue::new(),
            frame: Frame::first(),
            events: EventBus::new(),
            cache: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn stats(&self) -> DatasetStats {
        self.dataset.stats()
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn view_state(&self) -> ViewState {
        self.engine.view_state()
    }

    pub fn phase(&self) -> EnginePhase {
        self.engine.phase()
    }

    pub fn render_mode(&self) -> RenderMode {
        self.engine.render_mode()
    }

    pub fn mode_label(&self) -> String {
        self.engine.mode_label()
    }

    pub fn selected_id(&self) -> Option<&ClusterId> {
        self.selection.current()
    }

    pub fn selected(&self) -> Option<&ClusterRecord> {
        self.selection.current().and_then(|id| self.dataset.get(id))
    }

    pub fn detail(&self) -> Option<ClusterDetail> {
        self.selected().map(ClusterDetail::from_record)
    }

    pub fn summary_state(&self) -> &SummaryState {
        self.summary.state()
    }

    pub fn events(&self) -> &[Event<DashboardEvent>] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event<DashboardEvent>> {
        self.events.drain()
    }

    // ── View ────────────────────────────────────────────────

    pub fn on_interaction(&mut self, delta: ViewDelta) -> ViewState {
        let was_moving = self.engine.phase() == EnginePhase::Transitioning;
        let state = self.engine.on_interaction(delta);
        if was_moving && self.engine.phase() == EnginePhase::Idle {
            self.emit(DashboardEvent::TransitionCancelled);
        }
        self.note_view_change();
        state
    }

    pub fn fly_to(&mut self, target: GeoPoint, zoom: f64, pitch: f64, duration_ms: f64) {
        if !self.engine.fly_to(target, zoom, pitch, duration_ms) {
            return;
        }
        if let Some(tr) = self.engine.transition() {
            let target = tr.target;
            self.emit(DashboardEvent::TransitionStarted { target });
        }
    }

    /// Fires due timers, then advances any in-flight transition.
    pub fn tick(&mut self, frame: Frame) {
        self.frame = frame;
        for timer in self.timers.take_due(frame.time) {
            match timer {
                DashboardTimer::SummaryDue(token) => self.finish_summary(token),
            }
        }

        if self.engine.tick(frame.time) == TickOutcome::Completed {
            let state = self.engine.view_state();
            self.emit(DashboardEvent::TransitionCompleted { state });
        }
        self.note_view_change();
    }

    // ── Picking ─────────────────────────────────────────────

    /// Resolves `hit`, flies to the record and selects it. Misses and
    /// unknown ids change nothing.
    pub fn on_pick(&mut self, hit: Option<&PickHit>) -> Option<&ClusterRecord> {
        let record = resolve_pick(&self.dataset, hit)?;
        let (id, center) = (record.id.clone(), record.center);
        self.focus(id.clone(), center);
        self.dataset.get(&id)
    }

    /// Hit-tests the current layers at a geographic pointer position.
    pub fn pick_at(&mut self, at: GeoPoint) -> Option<&ClusterRecord> {
        let zoom = self.engine.view_state().zoom;
        let tolerance = self.config.pick_tolerance_px;
        self.layers();
        let hit = self
            .cache
            .as_ref()
            .and_then(|c| hit_test(&c.set, &self.grid, at, zoom, tolerance));
        self.on_pick(hit.as_ref())
    }

    /// Search input: selects the planar-nearest cluster as if it was picked.
    pub fn on_city_select(&mut self, lat: f64, lon: f64) -> Result<Option<&ClusterRecord>, GeoError> {
        let at = GeoPoint::new(lat, lon)?;
        let Some(record) = self.dataset.nearest(at) else {
            debug!(lat, lon, "city select on empty dataset");
            return Ok(None);
        };
        let (id, center) = (record.id.clone(), record.center);
        self.focus(id.clone(), center);
        Ok(self.dataset.get(&id))
    }

    fn focus(&mut self, id: ClusterId, center: GeoPoint) {
        self.fly_to(
            center,
            self.config.fly_to_zoom,
            self.config.fly_to_pitch,
            self.config.fly_to_duration_ms,
        );
        self.select(&id);
    }

    // ── Selection ───────────────────────────────────────────

    /// Selects `id` if it exists. Re-selecting the current record is a no-op.
    pub fn select(&mut self, id: &ClusterId) -> bool {
        if !self.dataset.contains(id) {
            warn!(record_id = %id, "select on unknown record ignored");
            return false;
        }
        if !self.selection.select(id.clone()) {
            return false;
        }
        self.summary.reset();
        debug!(record_id = %id, "selected");
        self.emit(DashboardEvent::Selected { record_id: id.clone() });
        true
    }

    pub fn clear(&mut self) -> bool {
        if !self.selection.clear() {
            return false;
        }
        self.summary.reset();
        debug!("selection cleared");
        self.emit(DashboardEvent::SelectionCleared);
        true
    }

    /// Starts summary generation for the current selection.
    pub fn request_summary(&mut self) -> Option<SummaryToken> {
        let Some(record_id) = self.selection.current().cloned() else {
            debug!("summary requested with nothing selected");
            return None;
        };
        let token = self.summary.begin(record_id.clone())?;
        let due = self.engine.now().after(self.config.summary_latency_ms);
        self.timers.schedule(due, DashboardTimer::SummaryDue(token));
        self.emit(DashboardEvent::SummaryPending { record_id, token });
        Some(token)
    }

    fn finish_summary(&mut self, token: SummaryToken) {
        let selected = self.selection.current().cloned();
        let text = selected
            .as_ref()
            .and_then(|id| self.dataset.get(id))
            .map(summary_text)
            .unwrap_or_default();
        if self.summary.complete(token, selected.as_ref(), text) {
            if let Some(record_id) = selected {
                self.emit(DashboardEvent::SummaryReady { record_id });
            }
        } else {
            warn!(token = token.0, "stale summary dropped");
            self.emit(DashboardEvent::SummaryDiscarded { token });
        }
    }

    // ── Layers ──────────────────────────────────────────────

    /// Current draw list, rebuilt only when the dataset revision, render
    /// mode or highlighted record changed since the last call.
    pub fn layers(&mut self) -> &LayerSet {
        let mode = self.engine.render_mode();
        let highlight = self.selection.current().cloned();
        let revision = self.revision;

        let cache = match self.cache.take() {
            Some(mut cache) if cache.revision == revision && cache.mode == mode => {
                if cache.highlight != highlight {
                    // Only the old and new highlighted columns are touched.
                    if let Some(columns) = cache.set.columns_mut() {
                        columns.restyle_highlight(highlight.as_ref());
                    }
                    cache.highlight = highlight;
                }
                cache
            }
            _ => {
                let set = build_layers_with(&self.layer_config, &self.dataset, mode, highlight.as_ref());
                debug!(revision, ?mode, "layers built");
                self.emit(DashboardEvent::LayersBuilt { revision, mode });
                CachedLayers {
                    revision,
                    mode,
                    highlight,
                    set,
                }
            }
        };
        &self.cache.insert(cache).set
    }

    // ── Dataset ─────────────────────────────────────────────

    /// Swaps in a new dataset. A selection whose id vanished is cleared.
    pub fn replace_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.revision += 1;
        self.grid = build_grid(&self.dataset);

        let vanished = self
            .selection
            .current()
            .is_some_and(|id| !self.dataset.contains(id));
        if vanished {
            self.clear();
        }

        let stats = self.dataset.stats();
        debug!(revision = self.revision, clusters = stats.cluster_count, "dataset replaced");
        self.emit(DashboardEvent::DatasetReplaced {
            revision: self.revision,
            stats,
        });
    }

    fn note_view_change(&mut self) {
        let mode = self.engine.render_mode();
        if mode != self.last_mode {
            debug!(?mode, zoom = self.engine.view_state().zoom, "render mode switched");
            self.last_mode = mode;
            self.emit(DashboardEvent::RenderModeChanged { mode });
        }
    }

    fn emit(&mut self, event: DashboardEvent) {
        self.events.emit(self.frame, event);
    }
}

fn build_grid(dataset: &Dataset) -> GridIndex {
    GridIndex::build(
        dataset.records().iter().map(|r| r.center).collect(),
        GridIndex::DEFAULT_CELL_DEG,
    )
}

#[cfg(test)]
mod tests {
    use super::{Dashboard, DashboardEvent};
    use crate::config::EngineConfig;
    use crate::view::ViewDelta;
    use chrono::{TimeZone, Utc};
    use dataset::{ClusterId, ClusterRecord, Dataset};
    use foundation::geo::GeoPoint;
    use layers::RenderMode;

    fn dashboard() -> Dashboard {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let ds = Dataset::new(vec![
            ClusterRecord::new("a", GeoPoint::new(1.0, 1.0).unwrap(), 3, 300, -8.5, t, "A, Iraq"),
            ClusterRecord::new("b", GeoPoint::new(10.0, 10.0).unwrap(), 2, 200, -6.5, t, "B"),
        ])
        .unwrap();
        Dashboard::new(ds, EngineConfig::default())
    }

    fn builds(d: &Dashboard) -> usize {
        d.events()
            .iter()
            .filter(|e| matches!(e.payload, DashboardEvent::LayersBuilt { .. }))
            .count()
    }

    #[test]
    fn layers_are_memoized_per_revision_and_mode() {
        let mut d = dashboard();
        d.layers();
        d.layers();
        assert_eq!(builds(&d), 1);

        d.select(&ClusterId::new("a"));
        let set = d.layers();
        let columns = set.columns().unwrap();
        assert_eq!(columns.highlighted(), Some(&ClusterId::new("a")));
        assert_eq!(builds(&d), 1);

        d.on_interaction(ViewDelta::zoom(4.0));
        assert_eq!(d.layers().mode, RenderMode::Map);
        assert_eq!(builds(&d), 2);
    }

    #[test]
    fn highlight_restyle_matches_a_fresh_build() {
        let mut d = dashboard();
        d.layers();
        d.select(&ClusterId::new("b"));
        let restyled = d.layers().clone();
        let fresh = layers::build_layers(d.dataset(), RenderMode::Globe, Some(&ClusterId::new("b")));
        assert_eq!(restyled, fresh);
    }

    #[test]
    fn non_finite_camera_input_leaves_no_trace() {
        let mut d = dashboard();
        d.fly_to(GeoPoint::new(10.0, 10.0).unwrap(), 6.0, 45.0, 2000.0);
        d.drain_events();

        d.on_interaction(ViewDelta::zoom(f64::NAN));
        d.fly_to(GeoPoint::new(1.0, 1.0).unwrap(), f64::NAN, 45.0, 2000.0);
        assert!(d.events().is_empty());
        assert_eq!(d.phase(), crate::view::EnginePhase::Transitioning);
        assert!(d.view_state().is_finite());
    }

    #[test]
    fn unknown_select_is_ignored() {
        let mut d = dashboard();
        assert!(!d.select(&ClusterId::new("zz")));
        assert!(d.selected().is_none());
        assert!(d.events().is_empty());
    }

    #[test]
    fn pick_at_resolves_pointer_position() {
        let mut d = dashboard();
        let hit = d.pick_at(GeoPoint { lat: 10.2, lon: 9.9 }).map(|r| r.id.clone());
        assert_eq!(hit, Some(ClusterId::new("b")));
        assert_eq!(d.selected_id(), Some(&ClusterId::new("b")));
        assert!(d.pick_at(GeoPoint { lat: -60.0, lon: -120.0 }).is_none());
        assert_eq!(d.selected_id(), Some(&ClusterId::new("b")));
    }
}
