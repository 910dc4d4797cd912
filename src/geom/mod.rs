mod core;
mod mesh;
mod plane;
mod polyline;
mod surface;

pub use self::core::{Point3, Tolerance, UvPoint, Vec3};
pub use mesh::QuadMesh;
pub use plane::{Plane, PlaneFit, PlaneFitError, fit_plane_to_points};
pub use polyline::Polyline;
pub use surface::{CylinderSurface, FourPointSurface, NormalizedSurface, PlaneSurface, Surface};
