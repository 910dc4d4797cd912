//! Fixed brick topologies.
//!
//! A brick's vertices are its front points followed by its back points, each
//! set laid out row-major over the two sample rows it spans. Both face tables
//! describe closed solids with every face wound outward when the front points
//! lie on the surface-normal side.

use serde::Serialize;

use crate::geom::{Point3, Polyline, QuadMesh};

/// Size class of a brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnitClass {
    /// Spans two grid cells: 3 columns, 12 vertices.
    Double,
    /// Half brick at a staggered course end: 2 columns, 8 vertices.
    Single,
}

impl UnitClass {
    /// Grid columns covered per sample row.
    #[must_use]
    pub const fn points_per_row(self) -> usize {
        match self {
            Self::Double => 3,
            Self::Single => 2,
        }
    }

    /// Points on one face (front or back).
    #[must_use]
    pub const fn points_per_face(self) -> usize {
        2 * self.points_per_row()
    }

    #[must_use]
    pub const fn vertex_count(self) -> usize {
        2 * self.points_per_face()
    }

    #[must_use]
    pub const fn faces(self) -> &'static [[u32; 4]] {
        match self {
            Self::Double => &DOUBLE_UNIT_FACES,
            Self::Single => &SINGLE_UNIT_FACES,
        }
    }

    #[must_use]
    pub const fn outline(self) -> &'static [usize] {
        match self {
            Self::Double => &DOUBLE_UNIT_OUTLINE,
            Self::Single => &SINGLE_UNIT_OUTLINE,
        }
    }
}

pub const DOUBLE_UNIT_FACES: [[u32; 4]; 10] = [
    [0, 1, 4, 3],
    [1, 2, 5, 4],
    [2, 8, 11, 5],
    [8, 7, 10, 11],
    [7, 6, 9, 10],
    [6, 0, 3, 9],
    [3, 4, 10, 9],
    [4, 5, 11, 10],
    [0, 6, 7, 1],
    [1, 7, 8, 2],
];

pub const SINGLE_UNIT_FACES: [[u32; 4]; 6] = [
    [0, 1, 3, 2],
    [1, 5, 7, 3],
    [5, 4, 6, 7],
    [4, 0, 2, 6],
    [2, 3, 7, 6],
    [0, 4, 5, 1],
];

pub const DOUBLE_UNIT_OUTLINE: [usize; 7] = [0, 1, 2, 5, 4, 3, 0];
pub const SINGLE_UNIT_OUTLINE: [usize; 5] = [0, 1, 3, 2, 0];

fn matches_unit(unit: UnitClass, front: &[Point3], back: &[Point3]) -> bool {
    front.len() == unit.points_per_face() && back.len() == unit.points_per_face()
}

/// Builds the brick solid with vertex and face normals.
///
/// Returns `None` when the point counts do not match `unit`.
#[must_use]
pub fn build_mesh(unit: UnitClass, front: &[Point3], back: &[Point3]) -> Option<QuadMesh> {
    if !matches_unit(unit, front, back) {
        return None;
    }

    let vertices: Vec<Point3> = front.iter().chain(back).copied().collect();
    let mut mesh = QuadMesh::from_points(&vertices, unit.faces());
    mesh.compute_normals();
    Some(mesh)
}

/// Closed front and back outlines of a brick.
#[must_use]
pub fn build_outlines(unit: UnitClass, front: &[Point3], back: &[Point3]) -> Option<(Polyline, Polyline)> {
    if !matches_unit(unit, front, back) {
        return None;
    }

    Some((
        Polyline::from_indices(front, unit.outline())?,
        Polyline::from_indices(back, unit.outline())?,
    ))
}
