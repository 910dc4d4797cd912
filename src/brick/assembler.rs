//! Brick assembly: tiling rows into spans and turning each span of grid
//! samples into a [`Brick`].

use serde::Serialize;

use super::error::BrickWallError;
use super::sampler::SampleGrid;
use super::topology::{UnitClass, build_mesh, build_outlines};
use crate::geom::{Plane, PlaneFitError, Point3, Polyline, QuadMesh, Surface, UvPoint, fit_plane_to_points};

/// Grid block covered by one brick: rows `row..=row + 1`, columns
/// `column..column + unit.points_per_row()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrickSpan {
    pub row: usize,
    pub column: usize,
    pub unit: UnitClass,
}

/// Tiles course `row` of a grid with `columns` columns.
///
/// Even courses are all double bricks. Odd courses start and end with a single
/// brick and fill the middle with doubles, shifting the bond by one cell.
#[must_use]
pub fn row_spans(row: usize, columns: usize) -> Vec<BrickSpan> {
    let span = |column, unit| BrickSpan { row, column, unit };

    if columns < 2 {
        return Vec::new();
    }

    if row % 2 == 0 {
        return (0..columns)
            .step_by(2)
            .take_while(|&j| j + 2 <= columns)
            .map(|j| span(j, UnitClass::Double))
            .collect();
    }

    let mut spans = vec![span(0, UnitClass::Single)];
    let mut j = 1;
    while j + 2 < columns {
        spans.push(span(j, UnitClass::Double));
        j += 2;
    }
    spans.push(span(columns - 1, UnitClass::Single));
    spans
}

/// Points gathered for a span and the fitted, orientation-corrected center
/// plane. Turned into a [`Brick`] by [`BrickFit::into_brick`].
#[derive(Debug, Clone, PartialEq)]
pub struct BrickFit {
    pub span: BrickSpan,
    pub center_points: Vec<Point3>,
    pub front_points: Vec<Point3>,
    pub back_points: Vec<Point3>,
    pub uvs: Vec<UvPoint>,
    pub centroid: Point3,
    pub back_centroid: Point3,
    pub reference_frame: Plane,
    pub center_plane: Plane,
    pub fit_deviation: f64,
    pub flipped: bool,
}

/// Gathers the span's samples row-major and fits its center plane.
pub fn fit_brick<S>(surface: &S, grid: &SampleGrid, span: BrickSpan) -> Result<BrickFit, PlaneFitError>
where
    S: Surface + ?Sized,
{
    let per_row = span.unit.points_per_row();
    let count = span.unit.points_per_face();

    let mut center_points = Vec::with_capacity(count);
    let mut front_points = Vec::with_capacity(count);
    let mut back_points = Vec::with_capacity(count);
    let mut uvs = Vec::with_capacity(count);

    for n in 0..2 {
        for m in 0..per_row {
            let sample = grid
                .get(span.row + n, span.column + m)
                .ok_or(PlaneFitError::TooFewPoints {
                    count: center_points.len(),
                })?;
            center_points.push(sample.base.frame.origin);
            front_points.push(sample.front_point);
            back_points.push(sample.back_point);
            uvs.push(sample.base.uv);
        }
    }

    let mean_uv = UvPoint::mean(&uvs).ok_or(PlaneFitError::TooFewPoints { count: 0 })?;
    let reference_frame = surface.frame_at(mean_uv.u, mean_uv.v);
    if !reference_frame.is_finite() {
        return Err(PlaneFitError::NonFinite);
    }

    let fit = fit_plane_to_points(&center_points)?;
    let centroid = fit.plane.origin;
    let back_centroid = Point3::centroid(&back_points).ok_or(PlaneFitError::TooFewPoints { count: 0 })?;

    let flipped = fit.plane.z_axis.dot(reference_frame.z_axis) < 0.0;
    let center_plane = if flipped { fit.plane.flip() } else { fit.plane };

    Ok(BrickFit {
        span,
        center_points,
        front_points,
        back_points,
        uvs,
        centroid,
        back_centroid,
        reference_frame,
        center_plane,
        fit_deviation: fit.deviation,
        flipped,
    })
}

impl BrickFit {
    /// Derives the offset planes, mesh and outlines.
    pub fn into_brick(self, sequence: usize, thickness: f64) -> Result<Brick, PlaneFitError> {
        let too_few = PlaneFitError::TooFewPoints {
            count: self.front_points.len(),
        };
        let mesh = build_mesh(self.span.unit, &self.front_points, &self.back_points).ok_or(too_few.clone())?;
        let (front_outline, back_outline) =
            build_outlines(self.span.unit, &self.front_points, &self.back_points).ok_or(too_few)?;

        let half = self.center_plane.z_axis.mul_scalar(thickness * 0.5);

        Ok(Brick {
            sequence,
            span: self.span,
            front_plane: self.center_plane.translated(half),
            back_plane: self.center_plane.translated(-half),
            back_reference_frame: self.reference_frame.with_origin(self.back_centroid),
            center_points: self.center_points,
            front_points: self.front_points,
            back_points: self.back_points,
            uvs: self.uvs,
            centroid: self.centroid,
            back_centroid: self.back_centroid,
            reference_frame: self.reference_frame,
            center_plane: self.center_plane,
            fit_deviation: self.fit_deviation,
            flipped: self.flipped,
            mesh,
            front_outline,
            back_outline,
        })
    }
}

/// Assembles the brick covering `span` in one go.
pub fn assemble_brick<S>(
    surface: &S,
    grid: &SampleGrid,
    span: BrickSpan,
    thickness: f64,
    sequence: usize,
) -> Result<Brick, BrickWallError>
where
    S: Surface + ?Sized,
{
    fit_brick(surface, grid, span)
        .and_then(|fit| fit.into_brick(sequence, thickness))
        .map_err(|source| BrickWallError::DegenerateBrick {
            row: span.row,
            column: span.column,
            sequence,
            source,
        })
}

/// A finished brick. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Brick {
    sequence: usize,
    span: BrickSpan,
    center_points: Vec<Point3>,
    front_points: Vec<Point3>,
    back_points: Vec<Point3>,
    uvs: Vec<UvPoint>,
    centroid: Point3,
    back_centroid: Point3,
    reference_frame: Plane,
    back_reference_frame: Plane,
    center_plane: Plane,
    fit_deviation: f64,
    flipped: bool,
    front_plane: Plane,
    back_plane: Plane,
    mesh: QuadMesh,
    front_outline: Polyline,
    back_outline: Polyline,
}

impl Brick {
    #[must_use]
    pub const fn sequence(&self) -> usize {
        self.sequence
    }

    #[must_use]
    pub const fn row(&self) -> usize {
        self.span.row
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.span.column
    }

    #[must_use]
    pub const fn unit(&self) -> UnitClass {
        self.span.unit
    }

    #[must_use]
    pub const fn span(&self) -> BrickSpan {
        self.span
    }

    /// Base frame origins, row-major.
    #[must_use]
    pub fn center_points(&self) -> &[Point3] {
        &self.center_points
    }

    #[must_use]
    pub fn front_points(&self) -> &[Point3] {
        &self.front_points
    }

    #[must_use]
    pub fn back_points(&self) -> &[Point3] {
        &self.back_points
    }

    #[must_use]
    pub fn uvs(&self) -> &[UvPoint] {
        &self.uvs
    }

    #[must_use]
    pub const fn centroid(&self) -> Point3 {
        self.centroid
    }

    #[must_use]
    pub const fn back_centroid(&self) -> Point3 {
        self.back_centroid
    }

    /// Surface frame at the mean UV of the brick.
    #[must_use]
    pub const fn reference_frame(&self) -> &Plane {
        &self.reference_frame
    }

    /// Reference frame moved to the centroid of the back points.
    #[must_use]
    pub const fn back_reference_frame(&self) -> &Plane {
        &self.back_reference_frame
    }

    #[must_use]
    pub const fn center_plane(&self) -> &Plane {
        &self.center_plane
    }

    /// Largest distance of a center point to the fitted plane.
    #[must_use]
    pub const fn fit_deviation(&self) -> f64 {
        self.fit_deviation
    }

    /// Whether the fitted plane had to be flipped to face the reference normal.
    #[must_use]
    pub const fn flipped(&self) -> bool {
        self.flipped
    }

    /// Center plane moved `+thickness / 2` along its normal.
    ///
    /// Not used for vertex placement; the mesh keeps the sampled points.
    #[must_use]
    pub const fn front_plane(&self) -> &Plane {
        &self.front_plane
    }

    #[must_use]
    pub const fn back_plane(&self) -> &Plane {
        &self.back_plane
    }

    #[must_use]
    pub const fn mesh(&self) -> &QuadMesh {
        &self.mesh
    }

    #[must_use]
    pub const fn front_outline(&self) -> &Polyline {
        &self.front_outline
    }

    #[must_use]
    pub const fn back_outline(&self) -> &Polyline {
        &self.back_outline
    }
}
