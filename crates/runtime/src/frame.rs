use foundation::time::Time;
use serde::{Deserialize, Serialize};

/// Deterministic frame metadata.
///
/// This is the primary timebase for the engine runtime. It is intentionally
/// small and pure so it can be recorded and replayed.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (milliseconds).
    pub dt_ms: f64,
    /// Engine time at the start of the frame.
    pub time: Time,
}

impl Frame {
    /// Frame `index` of a fixed-rate clock starting at zero.
    pub fn new(index: u64, dt_ms: f64) -> Self {
        Self {
            index,
            dt_ms,
            time: Time(index as f64 * dt_ms),
        }
    }

    pub fn first() -> Self {
        Self::new(0, 0.0)
    }

    /// Advances by `dt_ms`, which may differ from the previous frame's delta.
    pub fn advance(self, dt_ms: f64) -> Self {
        let dt_ms = dt_ms.max(0.0);
        Self {
            index: self.index + 1,
            dt_ms,
            time: self.time.after(dt_ms),
        }
    }
}
