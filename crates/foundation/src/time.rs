//! Engine time primitives.
//!
//! The engine never reads a wall clock. Every operation that depends on time
//! takes a `Time` from the caller, so transitions and deferred work are pure
//! functions of the timestamps they were handed.

use serde::{Deserialize, Serialize};

/// Milliseconds on the engine's monotonic timebase.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Self = Self(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Self(ms)
    }

    pub fn as_millis(self) -> f64 {
        self.0
    }

    pub fn after(self, ms: f64) -> Self {
        Self(self.0 + ms)
    }

    /// Milliseconds elapsed since `earlier`, never negative.
    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}
