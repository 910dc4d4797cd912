use crate::brick::{BrickWallOptions, PatternVariant, UnitClass, generate_brick_wall};
use crate::geom::{CylinderSurface, FourPointSurface, PlaneSurface, Point3, Vec3};

fn options(pattern: PatternVariant) -> BrickWallOptions {
    BrickWallOptions {
        row_count: 4,
        column_count: 3,
        pattern: pattern.code(),
        ..BrickWallOptions::default()
    }
}

#[test]
fn every_brick_is_a_closed_outward_solid() {
    let plane = PlaneSurface::new(Point3::ORIGIN, Vec3::new(6.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
    let twisted = FourPointSurface::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(6.0, 0.0, 0.0),
        Point3::new(0.0, 0.5, 2.0),
        Point3::new(6.0, -0.5, 2.0),
    );
    let arc = CylinderSurface::new(Point3::ORIGIN, Vec3::new(0.0, 0.0, 2.0), 4.0, 1.2).expect("cylinder");

    for variant in PatternVariant::ALL {
        for wall in [
            generate_brick_wall(&plane, &options(variant)),
            generate_brick_wall(&twisted, &options(variant)),
            generate_brick_wall(&arc, &options(variant)),
        ] {
            let wall = wall.expect("wall");
            assert!(!wall.is_empty());
            for brick in wall.bricks.iter() {
                let mesh = brick.mesh();
                let (vertices, faces) = match brick.unit() {
                    UnitClass::Double => (12, 10),
                    UnitClass::Single => (8, 6),
                };
                assert_eq!(mesh.vertex_count(), vertices);
                assert_eq!(mesh.face_count(), faces);
                assert!(mesh.validate().is_ok());
                assert!(mesh.is_closed_and_consistent());
                assert!(mesh.signed_volume() > 0.0, "{variant} brick #{}", brick.sequence());
                assert_eq!(mesh.vertex_normals.len(), vertices);
                assert_eq!(mesh.face_normals.len(), faces);
            }
        }
    }
}

#[test]
fn outlines_are_closed_loops_of_face_points() {
    let plane = PlaneSurface::new(Point3::ORIGIN, Vec3::new(6.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
    let wall = generate_brick_wall(&plane, &options(PatternVariant::Staggered)).expect("wall");

    for brick in wall.bricks.iter() {
        let (front, back) = wall.bricks.outlines(brick.sequence()).expect("outlines");
        let expected = match brick.unit() {
            UnitClass::Double => 7,
            UnitClass::Single => 5,
        };
        assert_eq!(front.len(), expected);
        assert_eq!(back.len(), expected);
        assert!(front.is_closed() && back.is_closed());
        assert!(front.points.iter().all(|p| brick.front_points().contains(p)));
        assert!(back.points.iter().all(|p| brick.back_points().contains(p)));
    }
}

#[test]
fn front_face_normal_points_off_the_surface() {
    let plane = PlaneSurface::new(Point3::ORIGIN, Vec3::new(6.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
    let wall = generate_brick_wall(&plane, &options(PatternVariant::Standard)).expect("wall");

    for brick in wall.bricks.iter() {
        let [x, y, z] = brick.mesh().face_normals[0];
        let normal = Vec3::new(x, y, z);
        assert!(normal.dot(brick.reference_frame().z_axis) > 0.9);
    }
}
