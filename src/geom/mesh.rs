use std::collections::HashMap;

use serde::Serialize;

use super::{Point3, Vec3};

/// Quad-faced polygon mesh with per-vertex and per-face normals.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QuadMesh {
    pub positions: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 4]>,
    pub vertex_normals: Vec<[f64; 3]>,
    pub face_normals: Vec<[f64; 3]>,
}

impl QuadMesh {
    /// Create a mesh from positions and faces; normals stay empty until
    /// [`compute_normals`](Self::compute_normals) runs.
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, faces: Vec<[u32; 4]>) -> Self {
        Self {
            positions,
            faces,
            vertex_normals: Vec::new(),
            face_normals: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_points(points: &[Point3], faces: &[[u32; 4]]) -> Self {
        Self::new(
            points.iter().map(|p| p.to_array()).collect(),
            faces.to_vec(),
        )
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn point(&self, index: u32) -> Point3 {
        let [x, y, z] = self.positions[index as usize];
        Point3::new(x, y, z)
    }

    /// Unnormalised face normal: cross product of the two diagonals.
    ///
    /// Its length is twice the area of the (possibly non-planar) quad.
    fn face_area_vector(&self, face: [u32; 4]) -> Vec3 {
        let [a, b, c, d] = face.map(|i| self.point(i));
        c.sub_point(a).cross(d.sub_point(b))
    }

    /// Recomputes face normals (right-hand rule over the face order) and
    /// area-weighted vertex normals. Zero-area faces get a zero normal.
    pub fn compute_normals(&mut self) {
        let mut vertex_sums = vec![Vec3::ZERO; self.positions.len()];
        let mut face_normals = Vec::with_capacity(self.faces.len());

        for &face in &self.faces {
            let area = self.face_area_vector(face);
            for index in face {
                let slot = &mut vertex_sums[index as usize];
                *slot = *slot + area;
            }
            face_normals.push(area.normalized().unwrap_or(Vec3::ZERO).to_array());
        }

        self.face_normals = face_normals;
        self.vertex_normals = vertex_sums
            .into_iter()
            .map(|sum| sum.normalized().unwrap_or(Vec3::ZERO).to_array())
            .collect();
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all face indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len() as u32;
        self.faces.iter().flatten().all(|&i| i < n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if !self.vertex_normals.is_empty() && self.vertex_normals.len() != self.positions.len() {
            return Err("vertex normal buffer does not match vertex count".to_string());
        }
        if !self.face_normals.is_empty() && self.face_normals.len() != self.faces.len() {
            return Err("face normal buffer does not match face count".to_string());
        }
        Ok(())
    }

    /// Every directed edge has exactly one reverse twin: the mesh is closed
    /// and all faces are wound consistently.
    #[must_use]
    pub fn is_closed_and_consistent(&self) -> bool {
        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        for face in &self.faces {
            for k in 0..4 {
                let edge = (face[k], face[(k + 1) % 4]);
                *directed.entry(edge).or_default() += 1;
            }
        }

        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// Signed enclosed volume (divergence theorem over the quad fan).
    ///
    /// Positive for a closed mesh whose faces wind counter-clockwise seen from
    /// outside.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let mut six_volume = 0.0;
        for face in &self.faces {
            let [a, b, c, d] = face.map(|i| self.point(i).to_vec3());
            six_volume += a.dot(b.cross(c));
            six_volume += a.dot(c.cross(d));
        }
        six_volume / 6.0
    }

    /// Returns the position buffer as a flat slice: `[x0, y0, z0, x1, y1, z1, ...]`.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        self.positions.as_flattened()
    }

    /// Returns the face buffer as a flat slice of quad indices.
    #[must_use]
    pub fn faces_flat(&self) -> &[u32] {
        self.faces.as_flattened()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> QuadMesh {
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ];
        let faces = vec![
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
        ];
        QuadMesh::new(positions, faces)
    }

    #[test]
    fn cube_is_closed_with_unit_volume() {
        let cube = unit_cube();
        assert!(cube.is_closed_and_consistent());
        assert!((cube.signed_volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn flipped_face_breaks_consistency() {
        let mut cube = unit_cube();
        cube.faces[1] = [7, 6, 5, 4];
        assert!(!cube.is_closed_and_consistent());
    }

    #[test]
    fn normals_point_outward() {
        let mut cube = unit_cube();
        cube.compute_normals();
        assert_eq!(cube.face_normals[0], [0.0, 0.0, -1.0]);
        assert_eq!(cube.face_normals[1], [0.0, 0.0, 1.0]);

        let corner = cube.vertex_normals[6];
        let expected = 1.0 / 3f64.sqrt();
        for c in corner {
            assert!((c - expected).abs() < 1e-12);
        }
        assert!(cube.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_index() {
        let mut cube = unit_cube();
        cube.faces[0][0] = 42;
        assert!(cube.validate().is_err());
    }

    #[test]
    fn flat_views_cover_buffers() {
        let cube = unit_cube();
        assert_eq!(cube.positions_flat().len(), 24);
        assert_eq!(cube.faces_flat().len(), 24);
        assert_eq!(cube.faces_flat()[4..8], [4, 5, 6, 7]);
    }
}
