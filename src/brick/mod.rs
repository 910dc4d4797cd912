//! Brick wall generation over a parametric surface.
//!
//! The pipeline runs in three phases:
//!
//! 1. **Sampling** ([`sampler`]): a `(R + 1) x (C + 1)` UV grid is evaluated
//!    with base, front and back frames, where the front/back UVs come from the
//!    active [`pattern`] variant.
//! 2. **Assembly** ([`assembler`]): each course is tiled into double and single
//!    spans, and every span gets a fitted center plane oriented along the
//!    surface normal.
//! 3. **Meshing** ([`topology`]): spans become closed quad solids and outline
//!    loops, and are stored in a [`BrickIndex`] by row and by sequence.
//!
//! # Example
//!
//! ```
//! use brickwall_engine::brick::{BrickWallOptions, generate_brick_wall};
//! use brickwall_engine::geom::{PlaneSurface, Point3, Vec3};
//!
//! let wall = PlaneSurface::new(Point3::ORIGIN, Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
//! let options = BrickWallOptions {
//!     row_count: 2,
//!     column_count: 2,
//!     ..BrickWallOptions::default()
//! };
//! let result = generate_brick_wall(&wall, &options).unwrap();
//! assert_eq!(result.bricks.len(), 5);
//! ```

pub mod assembler;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod metrics;
pub mod options;
pub mod pattern;
pub mod sampler;
pub mod topology;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

pub use assembler::{Brick, BrickFit, BrickSpan, assemble_brick, fit_brick, row_spans};
pub use diagnostics::{BrickWallDiagnostics, SkippedBrick};
pub use error::{BrickWallError, SurfaceEvalFailure};
pub use index::{BrickId, BrickIndex, BrickIndexError};
pub use metrics::{BrickMetrics, BrickTimingReport, TimingBucket};
pub use options::{BrickWallOptions, DegenerateBrickPolicy};
pub use pattern::{AxisRule, OffsetSpec, Parity, PatternRule, PatternVariant, SeamOffsets, offsets};
pub use sampler::{GridSample, GridSpec, RoleSample, SampleGrid, SampleRole, sample_grid};
pub use topology::{UnitClass, build_mesh, build_outlines};

use crate::geom::{PlaneFitError, Surface};

/// `Sync` when the `parallel` feature is on, no bound otherwise.
#[cfg(feature = "parallel")]
pub trait MaybeSync: Sync {}
#[cfg(feature = "parallel")]
impl<T: Sync + ?Sized> MaybeSync for T {}

#[cfg(not(feature = "parallel"))]
pub trait MaybeSync {}
#[cfg(not(feature = "parallel"))]
impl<T: ?Sized> MaybeSync for T {}

/// Everything one run produces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BrickWall {
    /// `None` when the grid configuration was rejected.
    pub grid: Option<SampleGrid>,
    pub bricks: BrickIndex,
    pub diagnostics: BrickWallDiagnostics,
}

impl BrickWall {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }
}

type SpanFit = (BrickSpan, Result<BrickFit, PlaneFitError>);

/// Generates the brick wall for `surface`.
///
/// A grid below 2 x 2 is not an error: the result is empty and carries a
/// warning. Degenerate bricks follow `options.degenerate_policy`.
pub fn generate_brick_wall<S>(surface: &S, options: &BrickWallOptions) -> Result<BrickWall, BrickWallError>
where
    S: Surface + MaybeSync + ?Sized,
{
    let mut diagnostics = BrickWallDiagnostics::new();

    let spec = match GridSpec::new(options) {
        Ok(spec) => spec,
        Err(err @ BrickWallError::InvalidGridConfiguration { .. }) => {
            log::warn!("brick wall skipped: {err}");
            diagnostics.add_warning(err.to_string());
            return Ok(BrickWall {
                diagnostics,
                ..BrickWall::default()
            });
        }
        Err(err) => return Err(err),
    };

    let mut metrics = BrickMetrics::default();
    metrics.begin();

    let grid = metrics.time(TimingBucket::Sampling, || sample_grid(surface, &spec))?;
    diagnostics.sample_count = grid.len();

    let fits = metrics.time(TimingBucket::Assembly, || fit_rows(surface, &grid, &spec));

    let bricks = metrics.time(TimingBucket::Meshing, || {
        collect_bricks(fits, options, &mut diagnostics)
    })?;

    diagnostics.timing = metrics.end();
    log::debug!("brick wall generated: {}", diagnostics.summary());

    Ok(BrickWall {
        grid: Some(grid),
        bricks,
        diagnostics,
    })
}

#[cfg(feature = "parallel")]
fn fit_rows<S>(surface: &S, grid: &SampleGrid, spec: &GridSpec) -> Vec<Vec<SpanFit>>
where
    S: Surface + MaybeSync + ?Sized,
{
    (0..spec.rows)
        .into_par_iter()
        .map(|row| fit_row(surface, grid, spec, row))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn fit_rows<S>(surface: &S, grid: &SampleGrid, spec: &GridSpec) -> Vec<Vec<SpanFit>>
where
    S: Surface + MaybeSync + ?Sized,
{
    (0..spec.rows)
        .map(|row| fit_row(surface, grid, spec, row))
        .collect()
}

fn fit_row<S>(surface: &S, grid: &SampleGrid, spec: &GridSpec, row: usize) -> Vec<SpanFit>
where
    S: Surface + ?Sized,
{
    row_spans(row, spec.columns)
        .into_iter()
        .map(|span| (span, fit_brick(surface, grid, span)))
        .collect()
}

/// Numbers, meshes and stores the fitted spans in generation order.
///
/// A skipped brick does not consume a sequence number.
fn collect_bricks(
    fits: Vec<Vec<SpanFit>>,
    options: &BrickWallOptions,
    diagnostics: &mut BrickWallDiagnostics,
) -> Result<BrickIndex, BrickWallError> {
    let mut index = BrickIndex::new();
    let mut sequence = 0;

    for (span, fit) in fits.into_iter().flatten() {
        match fit.and_then(|fit| fit.into_brick(sequence, options.wall_thickness)) {
            Ok(brick) => {
                diagnostics.record_brick(brick.unit(), brick.fit_deviation(), brick.flipped());
                index.insert(brick)?;
                sequence += 1;
            }
            Err(source) => {
                let err = BrickWallError::DegenerateBrick {
                    row: span.row,
                    column: span.column,
                    sequence,
                    source: source.clone(),
                };
                match options.degenerate_policy {
                    DegenerateBrickPolicy::Abort => return Err(err),
                    DegenerateBrickPolicy::Skip => {
                        log::warn!("{err}");
                        diagnostics.record_skip(SkippedBrick {
                            row: span.row,
                            column: span.column,
                            unit: span.unit,
                            reason: source.to_string(),
                        });
                    }
                }
            }
        }
    }

    Ok(index)
}

#[cfg(test)]
mod tests;
