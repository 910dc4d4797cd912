//! UV grid sampling.
//!
//! Builds the `(R + 1) x (C + 1)` sample grid over the normalised surface
//! domain. Each sample carries three evaluated frames (base, front, back), the
//! front/back points pushed off the surface by the seam offset, and the
//! projection vector between them.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use super::MaybeSync;
use super::error::{BrickWallError, SurfaceEvalFailure};
use super::options::BrickWallOptions;
use super::pattern::{OffsetSpec, PatternVariant};
use crate::geom::{Plane, Point3, Surface, Tolerance, UvPoint, Vec3};

/// Resolved grid dimensions and sampling parameters for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// `R`, number of brick courses.
    pub rows: usize,
    /// `C = 2 * ColumnNum`.
    pub columns: usize,
    pub offsets: OffsetSpec,
    pub variant: PatternVariant,
    pub seam_offset: f64,
    pub first_row_horizontal: bool,
}

impl GridSpec {
    pub fn new(options: &BrickWallOptions) -> Result<Self, BrickWallError> {
        let rows = options.row_count;
        let columns = options.column_count.saturating_mul(2);
        if rows < 2 || columns < 2 {
            return Err(BrickWallError::InvalidGridConfiguration { rows, columns });
        }

        Ok(Self {
            rows,
            columns,
            offsets: OffsetSpec::new(
                rows,
                columns,
                options.horizontal_seam_indent,
                options.vertical_seam_indent,
            ),
            variant: PatternVariant::try_from(options.pattern)?,
            seam_offset: options.seam_offset,
            first_row_horizontal: options.first_row_horizontal,
        })
    }

    #[must_use]
    pub const fn du(&self) -> f64 {
        self.offsets.du
    }

    #[must_use]
    pub const fn dv(&self) -> f64 {
        self.offsets.dv
    }

    #[must_use]
    pub const fn samples_per_row(&self) -> usize {
        self.columns + 1
    }

    #[must_use]
    pub const fn sample_count(&self) -> usize {
        (self.rows + 1) * (self.columns + 1)
    }
}

/// One evaluated role (base, front or back) of a grid sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoleSample {
    pub uv: UvPoint,
    pub frame: Plane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleRole {
    Base,
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSample {
    pub row: usize,
    pub column: usize,
    pub base: RoleSample,
    pub front: RoleSample,
    pub back: RoleSample,
    /// Front frame origin pushed `+seam_offset` along its normal.
    pub front_point: Point3,
    /// Back frame origin pushed `-seam_offset` along its normal.
    pub back_point: Point3,
    /// `back_point - front_point`
    pub projection: Vec3,
}

impl GridSample {
    #[must_use]
    pub const fn role(&self, role: SampleRole) -> &RoleSample {
        match role {
            SampleRole::Base => &self.base,
            SampleRole::Front => &self.front,
            SampleRole::Back => &self.back,
        }
    }
}

/// Row-major sample storage with row and `(i, j)` access.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleGrid {
    rows: usize,
    columns: usize,
    samples: Vec<GridSample>,
}

impl SampleGrid {
    /// Number of brick courses `R`; the grid holds `R + 1` sample rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns `C`; each sample row holds `C + 1` samples.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<&GridSample> {
        if i > self.rows || j > self.columns {
            return None;
        }
        self.samples.get(i * (self.columns + 1) + j)
    }

    #[must_use]
    pub fn row(&self, i: usize) -> Option<&[GridSample]> {
        let width = self.columns + 1;
        self.samples.get(i * width..(i + 1) * width)
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[GridSample]> {
        self.samples.chunks(self.columns + 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridSample> {
        self.samples.iter()
    }

    /// Projects every sample through `f`, keeping the row grouping.
    pub fn map_rows<T>(&self, f: impl Fn(&GridSample) -> T) -> Vec<Vec<T>> {
        self.iter_rows()
            .map(|row| row.iter().map(&f).collect())
            .collect()
    }

    #[must_use]
    pub fn uvs(&self, role: SampleRole) -> Vec<Vec<UvPoint>> {
        self.map_rows(|s| s.role(role).uv)
    }

    #[must_use]
    pub fn frames(&self, role: SampleRole) -> Vec<Vec<Plane>> {
        self.map_rows(|s| s.role(role).frame)
    }

    #[must_use]
    pub fn front_points(&self) -> Vec<Vec<Point3>> {
        self.map_rows(|s| s.front_point)
    }

    #[must_use]
    pub fn back_points(&self) -> Vec<Vec<Point3>> {
        self.map_rows(|s| s.back_point)
    }

    #[must_use]
    pub fn projection_vectors(&self) -> Vec<Vec<Vec3>> {
        self.map_rows(|s| s.projection)
    }
}

/// Samples the whole grid. Rows are independent and run in parallel with the
/// `parallel` feature; the result is identical either way.
pub fn sample_grid<S>(surface: &S, spec: &GridSpec) -> Result<SampleGrid, BrickWallError>
where
    S: Surface + MaybeSync + ?Sized,
{
    let rows = sample_rows(surface, spec)?;
    let mut samples = Vec::with_capacity(spec.sample_count());
    for row in rows {
        samples.extend(row);
    }

    log::debug!(
        "sampled {} grid points ({} x {}) with pattern {}",
        samples.len(),
        spec.rows + 1,
        spec.columns + 1,
        spec.variant
    );

    Ok(SampleGrid {
        rows: spec.rows,
        columns: spec.columns,
        samples,
    })
}

#[cfg(feature = "parallel")]
fn sample_rows<S>(surface: &S, spec: &GridSpec) -> Result<Vec<Vec<GridSample>>, BrickWallError>
where
    S: Surface + MaybeSync + ?Sized,
{
    (0..=spec.rows)
        .into_par_iter()
        .map(|i| sample_row(surface, spec, i))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn sample_rows<S>(surface: &S, spec: &GridSpec) -> Result<Vec<Vec<GridSample>>, BrickWallError>
where
    S: Surface + MaybeSync + ?Sized,
{
    (0..=spec.rows).map(|i| sample_row(surface, spec, i)).collect()
}

fn sample_row<S>(surface: &S, spec: &GridSpec, i: usize) -> Result<Vec<GridSample>, BrickWallError>
where
    S: Surface + ?Sized,
{
    (0..=spec.columns)
        .map(|j| sample_point(surface, spec, i, j))
        .collect()
}

/// Evaluates base, front and back roles of sample `(i, j)`.
pub fn sample_point<S>(surface: &S, spec: &GridSpec, i: usize, j: usize) -> Result<GridSample, BrickWallError>
where
    S: Surface + ?Sized,
{
    let uvs = spec.variant.rule().offsets(i, j, &spec.offsets);
    let flatten = spec.first_row_horizontal && i == 0;

    let base = evaluate_role(surface, uvs.base, i, j, flatten)?;
    let front = evaluate_role(surface, uvs.front, i, j, flatten)?;
    let back = evaluate_role(surface, uvs.back, i, j, flatten)?;

    let front_point = front.frame.point_at(0.0, 0.0, spec.seam_offset);
    let back_point = back.frame.point_at(0.0, 0.0, -spec.seam_offset);

    Ok(GridSample {
        row: i,
        column: j,
        base,
        front,
        back,
        front_point,
        back_point,
        projection: back_point - front_point,
    })
}

fn evaluate_role<S>(surface: &S, uv: UvPoint, row: usize, column: usize, flatten: bool) -> Result<RoleSample, BrickWallError>
where
    S: Surface + ?Sized,
{
    let fail = |reason| BrickWallError::SurfaceEvaluation {
        row,
        column,
        u: uv.u,
        v: uv.v,
        reason,
    };

    let tol = Tolerance::DEFAULT;
    if !uv.is_finite() || !tol.contains(0.0, 1.0, uv.u) || !tol.contains(0.0, 1.0, uv.v) {
        return Err(fail(SurfaceEvalFailure::OutOfDomain));
    }

    let mut frame = surface.frame_at(uv.u.clamp(0.0, 1.0), uv.v.clamp(0.0, 1.0));
    if !frame.is_finite() {
        return Err(fail(SurfaceEvalFailure::NonFiniteFrame));
    }

    if flatten {
        frame = Plane::from_origin_x_y(frame.origin, frame.x_axis, Vec3::Z);
    }

    Ok(RoleSample { uv, frame })
}
