//! Opt-in timing hooks for the brick engine.
//!
//! Timing is only collected when the `brick_metrics` feature is enabled and the
//! target is not WASM (`std::time::Instant` is unavailable there). Otherwise
//! every call compiles down to running the closure.
//!
//! ```ignore
//! let mut metrics = BrickMetrics::default();
//! metrics.begin();
//! let grid = metrics.time(TimingBucket::Sampling, || sample_grid(&surface, &spec));
//! if let Some(report) = metrics.end() {
//!     log::debug!("sampling took {} ns", report.sampling_ns);
//! }
//! ```

use serde::Serialize;

/// Phases of a brick wall run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Grid construction, pattern offsets and surface evaluation.
    Sampling,
    /// Point gathering, plane fitting and orientation correction.
    Assembly,
    /// Face table expansion, normals and outlines.
    Meshing,
}

/// Cumulative nanoseconds per [`TimingBucket`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BrickTimingReport {
    pub sampling_ns: u64,
    pub assembly_ns: u64,
    pub meshing_ns: u64,
}

impl BrickTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.sampling_ns
            .saturating_add(self.assembly_ns)
            .saturating_add(self.meshing_ns)
    }

    /// Returns the total time in milliseconds (for display purposes).
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing brick wall phases.
///
/// When the `brick_metrics` feature is disabled (or on WASM), all methods are
/// no-ops and [`end`](Self::end) returns `None`.
#[derive(Debug, Default)]
pub struct BrickMetrics {
    #[cfg(all(feature = "brick_metrics", not(target_arch = "wasm32")))]
    report: BrickTimingReport,
}

impl BrickMetrics {
    /// Resets all timing counters to zero.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "brick_metrics", not(target_arch = "wasm32")))]
        {
            self.report = BrickTimingReport::default();
        }
    }

    #[must_use]
    pub fn end(&self) -> Option<BrickTimingReport> {
        #[cfg(all(feature = "brick_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "brick_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Times `f` and accumulates the elapsed time in `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "brick_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "brick_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "brick_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::Sampling => &mut self.report.sampling_ns,
            TimingBucket::Assembly => &mut self.report.assembly_ns,
            TimingBucket::Meshing => &mut self.report.meshing_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_total() {
        let report = BrickTimingReport {
            sampling_ns: 1000,
            assembly_ns: 2000,
            meshing_ns: 3000,
        };
        assert_eq!(report.total_ns(), 6000);
        assert!((report.total_ms() - 0.006).abs() < 1e-9);
    }

    #[test]
    fn time_returns_closure_result() {
        let mut metrics = BrickMetrics::default();
        metrics.begin();
        assert_eq!(metrics.time(TimingBucket::Assembly, || 42), 42);

        let report = metrics.end();
        #[cfg(all(feature = "brick_metrics", not(target_arch = "wasm32")))]
        assert!(report.is_some());
        #[cfg(not(all(feature = "brick_metrics", not(target_arch = "wasm32"))))]
        assert!(report.is_none());
    }
}
