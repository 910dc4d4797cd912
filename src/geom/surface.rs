//! Parametric surfaces evaluated by the brick engine.
//!
//! The engine only needs point and frame evaluation; every surface exposes a
//! UV domain and derives frames from its partial derivatives. Hosts that
//! already own a surface representation implement [`Surface`] directly;
//! [`NormalizedSurface`] remaps an arbitrary domain onto `[0, 1]²`.

use super::core::{Point3, Tolerance, Vec3};
use super::plane::{Plane, orthogonal_unit_vector};

fn wrap_param(value: f64, start: f64, end: f64) -> f64 {
    let span = end - start;
    if !span.is_finite() || span == 0.0 {
        return start;
    }
    let mut t = (value - start) % span;
    if t < 0.0 {
        t += span;
    }
    start + t
}

pub trait Surface {
    fn point_at(&self, u: f64, v: f64) -> Point3;

    #[must_use]
    fn domain_u(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn domain_v(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn is_u_closed(&self) -> bool {
        false
    }

    #[must_use]
    fn is_v_closed(&self) -> bool {
        false
    }

    /// First partial derivatives `(dP/du, dP/dv)`.
    ///
    /// The default uses central differences, one-sided at open domain ends.
    #[must_use]
    fn partial_derivatives_at(&self, u: f64, v: f64) -> (Vec3, Vec3) {
        let (u0, u1) = self.domain_u();
        let (v0, v1) = self.domain_v();

        let u = if self.is_u_closed() { wrap_param(u, u0, u1) } else { u.clamp(u0, u1) };
        let v = if self.is_v_closed() { wrap_param(v, v0, v1) } else { v.clamp(v0, v1) };

        let mut du = Vec3::ZERO;
        let mut dv = Vec3::ZERO;

        let h = Tolerance::DERIVATIVE.relative_to(u1 - u0);
        if h.is_finite() && h > 0.0 {
            let ua = if self.is_u_closed() { u - h } else { (u - h).max(u0) };
            let ub = if self.is_u_closed() { u + h } else { (u + h).min(u1) };
            if ua != ub {
                du = self.point_at(ub, v).sub_point(self.point_at(ua, v)).mul_scalar(1.0 / (ub - ua));
            }
        }

        let h = Tolerance::DERIVATIVE.relative_to(v1 - v0);
        if h.is_finite() && h > 0.0 {
            let va = if self.is_v_closed() { v - h } else { (v - h).max(v0) };
            let vb = if self.is_v_closed() { v + h } else { (v + h).min(v1) };
            if va != vb {
                dv = self.point_at(u, vb).sub_point(self.point_at(u, va)).mul_scalar(1.0 / (vb - va));
            }
        }

        (du, dv)
    }

    /// Surface frame: origin on the surface, X along dU, Z along the normal.
    #[must_use]
    fn frame_at(&self, u: f64, v: f64) -> Plane {
        let (du, dv) = self.partial_derivatives_at(u, v);
        Plane::from_derivatives(self.point_at(u, v), du, dv)
    }
}

impl<S: Surface + ?Sized> Surface for &S {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        (**self).point_at(u, v)
    }

    fn domain_u(&self) -> (f64, f64) {
        (**self).domain_u()
    }

    fn domain_v(&self) -> (f64, f64) {
        (**self).domain_v()
    }

    fn is_u_closed(&self) -> bool {
        (**self).is_u_closed()
    }

    fn is_v_closed(&self) -> bool {
        (**self).is_v_closed()
    }

    fn partial_derivatives_at(&self, u: f64, v: f64) -> (Vec3, Vec3) {
        (**self).partial_derivatives_at(u, v)
    }

    fn frame_at(&self, u: f64, v: f64) -> Plane {
        (**self).frame_at(u, v)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PlaneSurface
// ─────────────────────────────────────────────────────────────────────────────

/// Flat parallelogram `origin + u * u_axis + v * v_axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSurface {
    pub origin: Point3,
    pub u_axis: Vec3,
    pub v_axis: Vec3,
}

impl PlaneSurface {
    #[must_use]
    pub const fn new(origin: Point3, u_axis: Vec3, v_axis: Vec3) -> Self {
        Self {
            origin,
            u_axis,
            v_axis,
        }
    }
}

impl Surface for PlaneSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        self.origin
            .add_vec(self.u_axis.mul_scalar(u))
            .add_vec(self.v_axis.mul_scalar(v))
    }

    fn partial_derivatives_at(&self, _u: f64, _v: f64) -> (Vec3, Vec3) {
        (self.u_axis, self.v_axis)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CylinderSurface
// ─────────────────────────────────────────────────────────────────────────────

/// Cylindrical patch: U sweeps `sweep` radians around the axis, V runs along it.
///
/// A full `TAU` sweep is closed in U. The normal points away from the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderSurface {
    pub base: Point3,
    pub axis: Vec3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius: f64,
    pub sweep: f64,
}

impl CylinderSurface {
    pub fn new(base: Point3, axis: Vec3, radius: f64, sweep: f64) -> Result<Self, String> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err("cylinder radius must be finite and > 0".to_string());
        }
        if !sweep.is_finite() || sweep <= 0.0 || sweep > std::f64::consts::TAU {
            return Err("cylinder sweep must be in (0, 2π]".to_string());
        }

        let axis_dir = axis
            .normalized()
            .ok_or_else(|| "cylinder axis must be non-zero".to_string())?;
        let x_axis = orthogonal_unit_vector(axis_dir);
        let y_axis = axis_dir.cross(x_axis).normalized().unwrap_or(Vec3::Y);

        Ok(Self {
            base,
            axis,
            x_axis,
            y_axis,
            radius,
            sweep,
        })
    }

    fn angle(&self, u: f64) -> f64 {
        let u = if self.is_u_closed() { wrap_param(u, 0.0, 1.0) } else { u };
        self.sweep * u
    }
}

impl Surface for CylinderSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let angle = self.angle(u);
        let radial = self
            .x_axis
            .mul_scalar(angle.cos())
            .add(self.y_axis.mul_scalar(angle.sin()))
            .mul_scalar(self.radius);

        self.base.add_vec(self.axis.mul_scalar(v)).add_vec(radial)
    }

    fn is_u_closed(&self) -> bool {
        Tolerance::DEFAULT.approx_eq_f64(self.sweep, std::f64::consts::TAU)
    }

    fn partial_derivatives_at(&self, u: f64, _v: f64) -> (Vec3, Vec3) {
        let angle = self.angle(u);
        let du = self
            .x_axis
            .mul_scalar(-angle.sin())
            .add(self.y_axis.mul_scalar(angle.cos()))
            .mul_scalar(self.radius * self.sweep);
        (du, self.axis)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FourPointSurface
// ─────────────────────────────────────────────────────────────────────────────

/// Bilinear patch through four corners.
///
/// - `p00` at (u=0, v=0)
/// - `p10` at (u=1, v=0)
/// - `p01` at (u=0, v=1)
/// - `p11` at (u=1, v=1)
///
/// Non-coplanar corners give a twisted (hyperbolic paraboloid) wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourPointSurface {
    pub p00: Point3,
    pub p10: Point3,
    pub p01: Point3,
    pub p11: Point3,
}

impl FourPointSurface {
    #[must_use]
    pub const fn new(p00: Point3, p10: Point3, p01: Point3, p11: Point3) -> Self {
        Self { p00, p10, p01, p11 }
    }

    /// Builds the patch from 3 or 4 corners; 3 corners complete a parallelogram.
    pub fn from_points(points: &[Point3]) -> Result<Self, String> {
        match points {
            [p00, p10, p01] => Ok(Self::new(*p00, *p10, *p01, *p10 + p01.sub_point(*p00))),
            [p00, p10, p01, p11, ..] => Ok(Self::new(*p00, *p10, *p01, *p11)),
            _ => Err("four-point surface requires at least 3 corner points".to_string()),
        }
    }
}

impl Surface for FourPointSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let s = 1.0 - u;
        let t = 1.0 - v;

        Point3::new(
            s * t * self.p00.x + u * t * self.p10.x + s * v * self.p01.x + u * v * self.p11.x,
            s * t * self.p00.y + u * t * self.p10.y + s * v * self.p01.y + u * v * self.p11.y,
            s * t * self.p00.z + u * t * self.p10.z + s * v * self.p01.z + u * v * self.p11.z,
        )
    }

    fn partial_derivatives_at(&self, u: f64, v: f64) -> (Vec3, Vec3) {
        let bottom = self.p10.sub_point(self.p00);
        let top = self.p11.sub_point(self.p01);
        let left = self.p01.sub_point(self.p00);
        let right = self.p11.sub_point(self.p10);
        (
            bottom.mul_scalar(1.0 - v).add(top.mul_scalar(v)),
            left.mul_scalar(1.0 - u).add(right.mul_scalar(u)),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// NormalizedSurface
// ─────────────────────────────────────────────────────────────────────────────

/// Presents any surface with its domain reparametrised to `[0, 1]²`.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedSurface<'a, S: Surface + ?Sized> {
    surface: &'a S,
    u_range: (f64, f64),
    v_range: (f64, f64),
}

impl<'a, S: Surface + ?Sized> NormalizedSurface<'a, S> {
    #[must_use]
    pub fn new(surface: &'a S) -> Self {
        Self {
            surface,
            u_range: surface.domain_u(),
            v_range: surface.domain_v(),
        }
    }

    fn remap(&self, u: f64, v: f64) -> (f64, f64) {
        let (u0, u1) = self.u_range;
        let (v0, v1) = self.v_range;
        (u0 + (u1 - u0) * u, v0 + (v1 - v0) * v)
    }
}

impl<S: Surface + ?Sized> Surface for NormalizedSurface<'_, S> {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let (u, v) = self.remap(u, v);
        self.surface.point_at(u, v)
    }

    fn is_u_closed(&self) -> bool {
        self.surface.is_u_closed()
    }

    fn is_v_closed(&self) -> bool {
        self.surface.is_v_closed()
    }

    fn partial_derivatives_at(&self, u: f64, v: f64) -> (Vec3, Vec3) {
        let (mu, mv) = self.remap(u, v);
        let (du, dv) = self.surface.partial_derivatives_at(mu, mv);
        (
            du.mul_scalar(self.u_range.1 - self.u_range.0),
            dv.mul_scalar(self.v_range.1 - self.v_range.0),
        )
    }
}
