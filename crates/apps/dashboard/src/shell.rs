use anyhow::{Context, Result, anyhow, bail};
use dataset::ClusterRecord;
use foundation::geo::GeoPoint;
use layers::{Layer, LayerId, LayerSet, RenderLayer};
use runtime::Frame;
use scene::{Dashboard, PickHit, SummaryState, ViewDelta};
use serde::Serialize;
use tracing::debug;

use crate::search::{Key, SearchSurface};

/// Upper bound on frames a single `tick`/`wait` may run.
pub const MAX_ADVANCE_FRAMES: u64 = 100_000;

/// Line-oriented driver for a headless dashboard session.
pub struct Shell {
    dashboard: Dashboard,
    search: SearchSurface,
    frame: Frame,
    frame_ms: f64,
    pretty: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Serialize)]
struct LayerSummary {
    id: &'static str,
    primitives: usize,
}

impl Shell {
    pub fn new(dashboard: Dashboard, frame_ms: f64, pretty: bool) -> Self {
        Self {
            dashboard,
            search: SearchSurface::new(),
            frame: Frame::first(),
            frame_ms: frame_ms.max(1.0),
            pretty,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Runs one command, appending any output lines to `out`.
    pub fn execute(&mut self, line: &str, out: &mut Vec<String>) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }
        let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let args: Vec<&str> = rest.split_whitespace().collect();
        debug!(cmd, ?args, "command");

        match cmd {
            "quit" | "exit" => return Ok(Flow::Quit),
            "view" => out.push(self.json(&self.dashboard.view_state())?),
            "mode" => out.push(self.dashboard.mode_label()),
            "pan" => {
                let d = ViewDelta::pan(num(&args, 0)?, num(&args, 1)?);
                self.dashboard.on_interaction(d);
                out.push(self.dashboard.mode_label());
            }
            "zoom" => {
                self.dashboard.on_interaction(ViewDelta::zoom(num(&args, 0)?));
                out.push(self.dashboard.mode_label());
            }
            "rotate" => {
                let d = ViewDelta::rotate(num(&args, 0)?, num(&args, 1).unwrap_or(0.0));
                self.dashboard.on_interaction(d);
                out.push(self.dashboard.mode_label());
            }
            "pick" => {
                let layer = parse_layer(args.first().copied().unwrap_or_default())?;
                let index: usize = args
                    .get(1)
                    .context("usage: pick <columns|points> <index>")?
                    .parse()
                    .context("index must be an integer")?;
                let hit = PickHit::from_primitive(self.dashboard.layers(), layer, index);
                let picked = self.dashboard.on_pick(hit.as_ref());
                out.push(describe(picked));
            }
            "click" => {
                let at = GeoPoint::new(num(&args, 0)?, num(&args, 1)?)?;
                let picked = self.dashboard.pick_at(at);
                out.push(describe(picked));
            }
            "key" => {
                let key = args
                    .first()
                    .and_then(|k| Key::parse(k))
                    .context("usage: key <ctrl+k|cmd+k|escape>")?;
                self.search.on_key(key);
                out.push(format!("search {}", if self.search.is_open() { "open" } else { "closed" }));
            }
            "type" => {
                if !self.search.set_query(rest.trim()) {
                    out.push("search closed (ctrl+k to open)".to_string());
                } else {
                    self.list_results(out);
                }
            }
            "search" => {
                self.search.on_key(Key::Palette);
                self.search.set_query(rest.trim());
                self.list_results(out);
            }
            "choose" => {
                let index: usize = args
                    .first()
                    .context("usage: choose <n>")?
                    .parse()
                    .context("n must be an integer")?;
                let city = self
                    .search
                    .choose(index.saturating_sub(1))
                    .ok_or_else(|| anyhow!("no search result {index}"))?;
                let picked = self.dashboard.on_city_select(city.lat, city.lon)?;
                out.push(format!("{} -> {}", city.name, describe(picked)));
            }
            "select" => {
                let id = dataset::ClusterId::new(*args.first().context("usage: select <id>")?);
                if !self.dashboard.select(&id) {
                    out.push(format!("no change ({id})"));
                }
            }
            "clear" => {
                self.dashboard.clear();
            }
            "summary" => match self.dashboard.request_summary() {
                Some(token) => out.push(format!("summary pending (token {})", token.0)),
                None => out.push("summary not started".to_string()),
            },
            "tick" => {
                let frames: u64 = match args.first() {
                    Some(n) => n.parse().context("frames must be an integer")?,
                    None => 1,
                };
                self.advance(frames)?;
                out.push(format!("t={}ms {}", self.frame.time.as_millis(), self.dashboard.mode_label()));
            }
            "wait" => {
                let ms = num(&args, 0)?;
                let frames = (ms / self.frame_ms).ceil().clamp(0.0, (MAX_ADVANCE_FRAMES + 1) as f64) as u64;
                self.advance(frames)?;
                out.push(format!("t={}ms {}", self.frame.time.as_millis(), self.dashboard.mode_label()));
            }
            "detail" => match self.dashboard.detail() {
                Some(detail) => {
                    out.push(self.json(&detail)?);
                    out.push(format!("summary: {}", summary_line(self.dashboard.summary_state())));
                }
                None => out.push("nothing selected".to_string()),
            },
            "stats" => {
                let s = self.dashboard.stats();
                out.push(format!(
                    "{} clusters | {} events | {} critical",
                    s.cluster_count, s.total_events, s.critical_count
                ));
            }
            "layers" => {
                let summary = layer_summary(self.dashboard.layers());
                out.push(self.json(&summary)?);
            }
            "dump-layers" => {
                let layers = self.dashboard.layers().clone();
                out.push(self.json(&layers)?);
            }
            "events" => {
                for e in self.dashboard.drain_events() {
                    out.push(format!("[{}] {}", e.frame_index, serde_json::to_string(&e.payload)?));
                }
            }
            other => bail!("unknown command: {other}"),
        }
        Ok(Flow::Continue)
    }

    fn advance(&mut self, frames: u64) -> Result<()> {
        if frames > MAX_ADVANCE_FRAMES {
            bail!("cannot advance more than {MAX_ADVANCE_FRAMES} frames at once");
        }
        for _ in 0..frames {
            self.frame = self.frame.advance(self.frame_ms);
            self.dashboard.tick(self.frame);
        }
        Ok(())
    }

    fn list_results(&self, out: &mut Vec<String>) {
        let results = self.search.results();
        if results.is_empty() {
            out.push("no matches".to_string());
        }
        for (i, c) in results.iter().enumerate() {
            out.push(format!("{}. {} ({})", i + 1, c.name, c.country));
        }
    }

    fn json<T: Serialize>(&self, value: &T) -> Result<String> {
        let s = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(s)
    }
}

fn num(args: &[&str], i: usize) -> Result<f64> {
    let raw = args.get(i).with_context(|| format!("missing argument {}", i + 1))?;
    let value: f64 = raw.parse().with_context(|| format!("not a number: {raw}"))?;
    if !value.is_finite() {
        bail!("not a finite number: {raw}");
    }
    Ok(value)
}

fn parse_layer(s: &str) -> Result<LayerId> {
    match s {
        "columns" | "hot-clusters-columns" => Ok(LayerId::CLUSTER_COLUMNS),
        "points" | "hot-clusters-scatter" => Ok(LayerId::CLUSTER_POINTS),
        "surface" | "globe-surface" => Ok(LayerId::GLOBE_SURFACE),
        _ => bail!("unknown layer: {s:?}"),
    }
}

fn describe(record: Option<&ClusterRecord>) -> String {
    match record {
        Some(r) => format!("selected {} ({})", r.region_name, r.id),
        None => "miss".to_string(),
    }
}

fn summary_line(state: &SummaryState) -> String {
    match state {
        SummaryState::Ready { text, .. } => text.clone(),
        other => other.label().to_string(),
    }
}

fn layer_summary(set: &LayerSet) -> Vec<LayerSummary> {
    set.layers
        .iter()
        .map(|l| LayerSummary {
            id: l.id().0,
            primitives: match l {
                RenderLayer::Surface(s) => s.triangle_count(),
                _ => l.as_pickable().map_or(0, |p| p.len()),
            },
        })
        .collect()
}
