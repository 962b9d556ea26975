use serde::{Deserialize, Serialize};

/// 8-bit RGBA.
pub type Rgba = [u8; 4];

/// Upper (least severe) edge of each band, inclusive.
pub const CRITICAL_MAX: f64 = -8.0;
pub const HIGH_MAX: f64 = -7.0;
pub const MEDIUM_MAX: f64 = -6.0;

/// Step classification of a Goldstein-style severity.
///
/// Bands are closed on their upper side and never overlap:
/// `(-inf, -8]`, `(-8, -7]`, `(-7, -6]`, `(-6, +inf)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityBand {
    Critical,
    High,
    Medium,
    Elevated,
}

impl SeverityBand {
    pub const ALL: [SeverityBand; 4] = [
        SeverityBand::Critical,
        SeverityBand::High,
        SeverityBand::Medium,
        SeverityBand::Elevated,
    ];

    pub fn classify(avg_severity: f64) -> Self {
        if avg_severity <= CRITICAL_MAX {
            SeverityBand::Critical
        } else if avg_severity <= HIGH_MAX {
            SeverityBand::High
        } else if avg_severity <= MEDIUM_MAX {
            SeverityBand::Medium
        } else {
            SeverityBand::Elevated
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeverityBand::Critical => "CRITICAL",
            SeverityBand::High => "HIGH",
            SeverityBand::Medium => "MEDIUM",
            SeverityBand::Elevated => "ELEVATED",
        }
    }

    pub fn color(self) -> Rgba {
        match self {
            // red
            SeverityBand::Critical => [220, 50, 50, 220],
            // orange
            SeverityBand::High => [240, 140, 30, 200],
            // yellow
            SeverityBand::Medium => [240, 200, 50, 180],
            // cyan
            SeverityBand::Elevated => [50, 180, 200, 160],
        }
    }
}

pub fn severity_label(avg_severity: f64) -> &'static str {
    SeverityBand::classify(avg_severity).label()
}

pub fn severity_color(avg_severity: f64) -> Rgba {
    SeverityBand::classify(avg_severity).color()
}
