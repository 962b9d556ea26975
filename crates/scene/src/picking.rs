use dataset::{ClusterId, ClusterRecord, Dataset};
use foundation::geo::GeoPoint;
use foundation::math::{EARTH_CIRCUMFERENCE_M, meters_per_pixel};
use layers::columns::ColumnLayer;
use layers::points::ScatterLayer;
use layers::{Layer, LayerId, LayerSet, RenderLayer};
use serde::Serialize;
use tracing::warn;

use crate::spatial::GridIndex;

const METERS_PER_DEGREE: f64 = EARTH_CIRCUMFERENCE_M / 360.0;

/// A primitive under the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickHit {
    pub layer: LayerId,
    pub index: usize,
    pub record_id: ClusterId,
}

impl PickHit {
    /// Hit for primitive `index` of `layer`, if that primitive exists.
    pub fn from_primitive(layers: &LayerSet, layer: LayerId, index: usize) -> Option<Self> {
        let record_id = layers.record_id(layer, index)?.clone();
        Some(Self {
            layer,
            index,
            record_id,
        })
    }
}

/// Primitive -> record lookup used by the picking bridge.
pub trait PickResolver {
    fn resolve(&self, record_id: &ClusterId) -> Option<&ClusterRecord>;
}

impl PickResolver for Dataset {
    fn resolve(&self, record_id: &ClusterId) -> Option<&ClusterRecord> {
        self.get(record_id)
    }
}

/// Misses and ids that no longer exist both resolve to `None`.
pub fn resolve_pick<'a, R>(resolver: &'a R, hit: Option<&PickHit>) -> Option<&'a ClusterRecord>
where
    R: PickResolver + ?Sized,
{
    let hit = hit?;
    let record = resolver.resolve(&hit.record_id);
    if record.is_none() {
        warn!(record_id = %hit.record_id, layer = hit.layer.0, "pick on unknown record ignored");
    }
    record
}

/// Geographic hit-test over the pickable layer of `layers`.
///
/// `grid` must index the primitive centers in primitive order. The closest
/// center whose footprint (plus `tolerance_px` converted at `zoom`) covers
/// `at` wins; ties go to the lower primitive index.
pub fn hit_test(
    layers: &LayerSet,
    grid: &GridIndex,
    at: GeoPoint,
    zoom: f64,
    tolerance_px: f64,
) -> Option<PickHit> {
    let pickable = layers.layers.iter().find_map(|l| match l {
        RenderLayer::Columns(c) => Some(Pickable::Columns(c)),
        RenderLayer::Points(p) => Some(Pickable::Points(p)),
        RenderLayer::Surface(_) => None,
    })?;
    let reach_m = |i: usize| pickable.footprint_m(i, zoom);

    let tolerance_m = tolerance_px.max(0.0) * meters_per_pixel(at.lat, zoom);
    let max_reach_m = pickable.max_footprint_m(zoom);
    let search_deg = (max_reach_m + tolerance_m) / METERS_PER_DEGREE;

    grid.within(at, search_deg)
        .into_iter()
        .find(|&(i, d)| d <= (reach_m(i) + tolerance_m) / METERS_PER_DEGREE)
        .and_then(|(i, _)| PickHit::from_primitive(layers, pickable.id(), i))
}

#[derive(Clone, Copy)]
enum Pickable<'a> {
    Columns(&'a ColumnLayer),
    Points(&'a ScatterLayer),
}

impl Pickable<'_> {
    fn id(self) -> LayerId {
        match self {
            Pickable::Columns(c) => c.id(),
            Pickable::Points(p) => p.id(),
        }
    }

    /// Bound on `footprint_m` over every primitive, without visiting them.
    fn max_footprint_m(self, zoom: f64) -> f64 {
        match self {
            Pickable::Columns(c) => c.radius_m(),
            Pickable::Points(p) => p.max_radius_m(zoom),
        }
    }

    /// Ground radius of primitive `i` in meters as drawn at `zoom`.
    fn footprint_m(self, i: usize, zoom: f64) -> f64 {
        match self {
            Pickable::Columns(c) => c.columns().get(i).map_or(0.0, |col| col.radius_m),
            Pickable::Points(p) => p.points().get(i).map_or(0.0, |pt| {
                p.radius_px(pt, zoom) * meters_per_pixel(pt.position.lat, zoom)
            }),
        }
    }
}
