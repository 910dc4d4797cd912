//! Oriented planes (surface frames) and least-squares plane fitting.
//!
//! A [`Plane`] is an origin plus an orthonormal, right-handed set of axes. The
//! same type is used for surface frames (`x_axis` along dU, `z_axis` along the
//! surface normal) and for fitted/offset brick planes.

use serde::{Deserialize, Serialize};

use super::core::{Point3, Tolerance, Vec3};

/// Largest off-diagonal magnitude accepted as converged in the Jacobi sweep.
const JACOBI_TOLERANCE: f64 = 1e-12;
const JACOBI_MAX_ITERATIONS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub z_axis: Vec3,
}

impl Default for Plane {
    fn default() -> Self {
        Self::world_xy()
    }
}

impl Plane {
    #[must_use]
    pub const fn world_xy() -> Self {
        Self {
            origin: Point3::ORIGIN,
            x_axis: Vec3::X,
            y_axis: Vec3::Y,
            z_axis: Vec3::Z,
        }
    }

    /// Builds a plane from an X direction hint and a normal.
    ///
    /// The normal is kept as-is (normalized), the hint is projected into the
    /// plane. A hint parallel to the normal falls back to an arbitrary
    /// perpendicular direction.
    #[must_use]
    pub fn from_origin_x_normal(origin: Point3, x_hint: Vec3, normal: Vec3) -> Self {
        let z = normal.normalized().unwrap_or(Vec3::Z);
        let projected = x_hint.sub(z.mul_scalar(x_hint.dot(z)));
        let x = projected
            .normalized()
            .unwrap_or_else(|| orthogonal_unit_vector(z));
        let y = z.cross(x).normalized().unwrap_or(Vec3::Y);
        Self {
            origin,
            x_axis: x,
            y_axis: y,
            z_axis: z,
        }
    }

    /// Builds a plane from an X direction and a Y direction hint.
    ///
    /// X is kept (normalized), the hint is made perpendicular to it and
    /// `Z = X × Y`. A hint parallel to X falls back to an arbitrary
    /// perpendicular direction.
    #[must_use]
    pub fn from_origin_x_y(origin: Point3, x_axis: Vec3, y_hint: Vec3) -> Self {
        let x = x_axis.normalized().unwrap_or(Vec3::X);
        let projected = y_hint.sub(x.mul_scalar(y_hint.dot(x)));
        let y = projected
            .normalized()
            .unwrap_or_else(|| orthogonal_unit_vector(x));
        let z = x.cross(y).normalized().unwrap_or(Vec3::Z);
        Self {
            origin,
            x_axis: x,
            y_axis: y,
            z_axis: z,
        }
    }

    /// Frame from surface partial derivatives: X along dU, Z along dU × dV.
    #[must_use]
    pub fn from_derivatives(origin: Point3, du: Vec3, dv: Vec3) -> Self {
        let normal = du.cross(dv).normalized().unwrap_or(Vec3::Z);
        let x_hint = if du.length() > Tolerance::DEFAULT.eps { du } else { dv };
        Self::from_origin_x_normal(origin, x_hint, normal)
    }

    /// Maps frame-local coordinates to world space.
    #[must_use]
    pub fn point_at(&self, x: f64, y: f64, z: f64) -> Point3 {
        self.origin
            .add_vec(self.x_axis.mul_scalar(x))
            .add_vec(self.y_axis.mul_scalar(y))
            .add_vec(self.z_axis.mul_scalar(z))
    }

    /// Swaps the X and Y axes and inverts Z, keeping the frame right-handed.
    #[must_use]
    pub fn flip(self) -> Self {
        Self {
            origin: self.origin,
            x_axis: self.y_axis,
            y_axis: self.x_axis,
            z_axis: -self.z_axis,
        }
    }

    #[must_use]
    pub fn translated(self, offset: Vec3) -> Self {
        Self {
            origin: self.origin + offset,
            ..self
        }
    }

    #[must_use]
    pub fn with_origin(self, origin: Point3) -> Self {
        Self { origin, ..self }
    }

    /// Signed distance of `point` along the plane normal.
    #[must_use]
    pub fn signed_distance(&self, point: Point3) -> f64 {
        point.sub_point(self.origin).dot(self.z_axis)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.origin.is_finite()
            && self.x_axis.is_finite()
            && self.y_axis.is_finite()
            && self.z_axis.is_finite()
    }
}

pub(crate) fn orthogonal_unit_vector(reference: Vec3) -> Vec3 {
    let candidate = if reference.x.abs() < reference.y.abs() {
        Vec3::new(0.0, -reference.z, reference.y)
    } else {
        Vec3::new(-reference.z, 0.0, reference.x)
    };

    candidate.normalized().unwrap_or(Vec3::X)
}

// ─────────────────────────────────────────────────────────────────────────────
// Plane fitting
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaneFitError {
    #[error("plane fit requires at least 3 points, got {count}")]
    TooFewPoints { count: usize },
    #[error("points are collinear or coincident")]
    Collinear,
    #[error("points contain non-finite coordinates")]
    NonFinite,
}

/// Result of a least-squares plane fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaneFit {
    /// Fitted plane, origin at the centroid of the input points.
    pub plane: Plane,
    /// Largest absolute distance of any input point to `plane`.
    pub deviation: f64,
}

/// Fits a plane minimising the squared orthogonal distances to `points`.
///
/// The normal is the eigenvector of the smallest eigenvalue of the point
/// covariance matrix. The X axis follows the first point, projected into the
/// plane, so the orientation is stable for a given input order.
pub fn fit_plane_to_points(points: &[Point3]) -> Result<PlaneFit, PlaneFitError> {
    if points.len() < 3 {
        return Err(PlaneFitError::TooFewPoints {
            count: points.len(),
        });
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(PlaneFitError::NonFinite);
    }

    let centroid = Point3::centroid(points).ok_or(PlaneFitError::TooFewPoints { count: 0 })?;

    let mut xx = 0.0;
    let mut xy = 0.0;
    let mut xz = 0.0;
    let mut yy = 0.0;
    let mut yz = 0.0;
    let mut zz = 0.0;
    for point in points {
        let d = point.sub_point(centroid);
        xx += d.x * d.x;
        xy += d.x * d.y;
        xz += d.x * d.z;
        yy += d.y * d.y;
        yz += d.y * d.z;
        zz += d.z * d.z;
    }

    let (values, vectors) = jacobi_eigen_decomposition([[xx, xy, xz], [xy, yy, yz], [xz, yz, zz]]);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let (smallest, middle, largest) = (order[0], order[1], order[2]);

    // A rank < 2 covariance means the points span at most a line.
    let scale = values[largest].abs();
    if scale <= Tolerance::ZERO_LENGTH.eps || values[middle].abs() <= scale * Tolerance::DEFAULT.eps {
        return Err(PlaneFitError::Collinear);
    }

    let normal = Vec3::new(
        vectors[0][smallest],
        vectors[1][smallest],
        vectors[2][smallest],
    )
    .normalized()
    .ok_or(PlaneFitError::Collinear)?;

    let mut x_hint = points[0].sub_point(centroid);
    if x_hint.length() <= Tolerance::ZERO_LENGTH.eps {
        x_hint = Vec3::new(vectors[0][largest], vectors[1][largest], vectors[2][largest]);
    }
    let plane = Plane::from_origin_x_normal(centroid, x_hint, normal);

    let deviation = points
        .iter()
        .map(|p| plane.signed_distance(*p).abs())
        .fold(0.0_f64, f64::max);

    Ok(PlaneFit { plane, deviation })
}

/// Cyclic Jacobi eigen decomposition of a symmetric 3x3 matrix.
///
/// Returns the eigenvalues and the eigenvectors stored column-wise.
fn jacobi_eigen_decomposition(mut m: [[f64; 3]; 3]) -> ([f64; 3], [[f64; 3]; 3]) {
    let mut vectors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    for _ in 0..JACOBI_MAX_ITERATIONS {
        let mut p = 0;
        let mut q = 1;
        if m[0][1].abs() < m[0][2].abs() {
            q = 2;
        }
        if m[p][q].abs() < m[1][2].abs() {
            p = 1;
            q = 2;
        }
        if m[p][q].abs() < JACOBI_TOLERANCE {
            break;
        }

        let app = m[p][p];
        let aqq = m[q][q];
        let apq = m[p][q];
        let angle = 0.5 * (2.0 * apq).atan2(aqq - app);
        let c = angle.cos();
        let s = angle.sin();

        for k in 0..3 {
            if k == p || k == q {
                continue;
            }
            let mkp = m[k][p];
            let mkq = m[k][q];
            m[k][p] = c * mkp - s * mkq;
            m[p][k] = m[k][p];
            m[k][q] = c * mkq + s * mkp;
            m[q][k] = m[k][q];
        }
        m[p][p] = c * c * app - 2.0 * s * c * apq + s * s * aqq;
        m[q][q] = s * s * app + 2.0 * s * c * apq + c * c * aqq;
        m[p][q] = 0.0;
        m[q][p] = 0.0;

        for row in &mut vectors {
            let vip = row[p];
            let viq = row[q];
            row[p] = c * vip - s * viq;
            row[q] = s * vip + c * viq;
        }
    }

    ([m[0][0], m[1][1], m[2][2]], vectors)
}
