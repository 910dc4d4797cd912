//! Run diagnostics for brick wall generation.
//!
//! Collected alongside the bricks so hosts can inspect fit quality, skipped
//! bricks and warnings without re-running the engine.

use std::fmt;

use serde::Serialize;

use super::metrics::BrickTimingReport;
use super::topology::UnitClass;

/// A brick left out under [`DegenerateBrickPolicy::Skip`](super::DegenerateBrickPolicy::Skip).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedBrick {
    pub row: usize,
    pub column: usize,
    pub unit: UnitClass,
    pub reason: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BrickWallDiagnostics {
    /// Evaluated grid samples (each with base, front and back frames).
    pub sample_count: usize,

    pub double_unit_count: usize,
    pub single_unit_count: usize,

    /// Bricks whose fitted plane was flipped to face the surface normal.
    pub flipped_plane_count: usize,

    /// Largest plane fit deviation over all bricks.
    pub max_fit_deviation: f64,

    /// Mean plane fit deviation over all bricks.
    pub mean_fit_deviation: f64,

    pub skipped_bricks: Vec<SkippedBrick>,

    /// Only populated with the `brick_metrics` feature on native targets.
    pub timing: Option<BrickTimingReport>,

    pub warnings: Vec<String>,
}

impl BrickWallDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn brick_count(&self) -> usize {
        self.double_unit_count + self.single_unit_count
    }

    /// Returns `true` if nothing was skipped and no warnings were recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped_bricks.is_empty() && self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Counts a finished brick and folds its deviation into the statistics.
    pub fn record_brick(&mut self, unit: UnitClass, deviation: f64, flipped: bool) {
        let previous = self.brick_count() as f64;
        match unit {
            UnitClass::Double => self.double_unit_count += 1,
            UnitClass::Single => self.single_unit_count += 1,
        }
        if flipped {
            self.flipped_plane_count += 1;
        }
        self.max_fit_deviation = self.max_fit_deviation.max(deviation);
        self.mean_fit_deviation = (self.mean_fit_deviation * previous + deviation) / (previous + 1.0);
    }

    pub fn record_skip(&mut self, skipped: SkippedBrick) {
        self.add_warning(format!(
            "skipped brick at row {}, column {}: {}",
            skipped.row, skipped.column, skipped.reason
        ));
        self.skipped_bricks.push(skipped);
    }

    /// Short summary suitable for logging.
    ///
    /// Format: `"S:{samples} B:{bricks} (D:{doubles} S:{singles}) [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "S:{} B:{} (D:{} S:{})",
            self.sample_count,
            self.brick_count(),
            self.double_unit_count,
            self.single_unit_count
        )];

        if self.flipped_plane_count > 0 {
            parts.push(format!("flipped:{}", self.flipped_plane_count));
        }
        if self.max_fit_deviation > 0.0 {
            parts.push(format!("dev:{:.3e}", self.max_fit_deviation));
        }
        if !self.skipped_bricks.is_empty() {
            parts.push(format!("skipped:{}", self.skipped_bricks.len()));
        }
        if let Some(timing) = &self.timing {
            parts.push(format!("{:.3}ms", timing.total_ms()));
        }

        parts.join(" ")
    }
}

impl fmt::Display for BrickWallDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_brick_tracks_mean_and_max() {
        let mut diag = BrickWallDiagnostics::new();
        diag.record_brick(UnitClass::Double, 0.2, false);
        diag.record_brick(UnitClass::Single, 0.4, true);
        diag.record_brick(UnitClass::Double, 0.0, false);

        assert_eq!(diag.brick_count(), 3);
        assert_eq!(diag.double_unit_count, 2);
        assert_eq!(diag.flipped_plane_count, 1);
        assert!((diag.max_fit_deviation - 0.4).abs() < 1e-12);
        assert!((diag.mean_fit_deviation - 0.2).abs() < 1e-12);
        assert!(diag.is_clean());
    }

    #[test]
    fn skips_become_warnings() {
        let mut diag = BrickWallDiagnostics::new();
        diag.record_skip(SkippedBrick {
            row: 1,
            column: 3,
            unit: UnitClass::Single,
            reason: "points are collinear or coincident".to_string(),
        });
        assert!(!diag.is_clean());
        assert_eq!(diag.warnings.len(), 1);
        assert!(diag.summary().contains("skipped:1"));
    }
}
