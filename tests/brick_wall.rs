use brickwall_engine::brick::{
    BrickWallError, BrickWallOptions, DegenerateBrickPolicy, PatternVariant, SurfaceEvalFailure, UnitClass,
    generate_brick_wall,
};
use brickwall_engine::geom::{
    CylinderSurface, FourPointSurface, NormalizedSurface, PlaneFitError, PlaneSurface, Point3, Surface, UvPoint,
    Vec3,
};

struct LineSurface;

impl Surface for LineSurface {
    fn point_at(&self, u: f64, _v: f64) -> Point3 {
        Point3::new(3.0 * u, 0.0, 0.0)
    }
}

struct BrokenSurface;

impl Surface for BrokenSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        if v > 0.5 {
            Point3::new(f64::NAN, 0.0, 0.0)
        } else {
            Point3::new(u, 0.0, v)
        }
    }
}

fn flat_wall() -> PlaneSurface {
    PlaneSurface::new(Point3::ORIGIN, Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0))
}

fn small_options() -> BrickWallOptions {
    BrickWallOptions {
        row_count: 2,
        column_count: 2,
        horizontal_seam_indent: 0.1,
        vertical_seam_indent: 0.1,
        seam_offset: 0.05,
        wall_thickness: 0.02,
        pattern: 5,
        ..BrickWallOptions::default()
    }
}

#[test]
fn two_by_two_staggered_wall() {
    let wall = generate_brick_wall(&flat_wall(), &small_options()).expect("wall");

    assert_eq!(wall.bricks.len(), 5);
    assert_eq!(wall.diagnostics.sample_count, 3 * 5);
    assert_eq!(wall.diagnostics.double_unit_count, 3);
    assert_eq!(wall.diagnostics.single_unit_count, 2);
    assert!(wall.diagnostics.is_clean());

    let row0: Vec<_> = wall.bricks.row(0).map(|b| (b.column(), b.unit())).collect();
    assert_eq!(row0, vec![(0, UnitClass::Double), (2, UnitClass::Double)]);

    let row1: Vec<_> = wall.bricks.row(1).map(|b| (b.column(), b.unit())).collect();
    assert_eq!(
        row1,
        vec![(0, UnitClass::Single), (1, UnitClass::Double), (3, UnitClass::Single)]
    );

    let grid = wall.grid.as_ref().expect("grid");
    for (i, j, u, v) in [(0, 0, 0.0, 0.0), (0, 4, 1.0, 0.0), (2, 0, 0.0, 1.0), (2, 4, 1.0, 1.0)] {
        let sample = grid.get(i, j).expect("corner");
        assert_eq!(sample.front.uv, UvPoint::new(u, v));
        assert_eq!(sample.back.uv, UvPoint::new(u, v));
    }
}

#[test]
fn sequences_follow_row_major_generation_order() {
    let options = BrickWallOptions {
        row_count: 5,
        column_count: 3,
        ..BrickWallOptions::default()
    };
    let wall = generate_brick_wall(&flat_wall(), &options).expect("wall");

    let order: Vec<_> = wall.bricks.iter().map(|b| (b.row(), b.column())).collect();
    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert_eq!(order, sorted);

    for (n, brick) in wall.bricks.iter().enumerate() {
        assert_eq!(brick.sequence(), n);
        assert_eq!(wall.bricks.by_sequence(n).map(|b| b.sequence()), Some(n));
    }
    assert_eq!(wall.bricks.row_count(), 5);
}

#[test]
fn too_small_grid_is_an_empty_wall() {
    let options = BrickWallOptions {
        row_count: 1,
        column_count: 1,
        ..BrickWallOptions::default()
    };
    let wall = generate_brick_wall(&flat_wall(), &options).expect("no error");
    assert!(wall.is_empty());
    assert!(wall.grid.is_none());
    assert_eq!(wall.diagnostics.warnings.len(), 1);

    let options = BrickWallOptions {
        row_count: 3,
        column_count: 0,
        ..BrickWallOptions::default()
    };
    assert!(generate_brick_wall(&flat_wall(), &options).expect("no error").is_empty());
}

#[test]
fn unknown_pattern_code_is_rejected() {
    let options = BrickWallOptions {
        pattern: 9,
        ..small_options()
    };
    assert_eq!(
        generate_brick_wall(&flat_wall(), &options).map(|w| w.bricks.len()),
        Err(BrickWallError::InvalidPatternType(9))
    );
}

#[test]
fn identical_inputs_give_identical_walls() {
    let surface = FourPointSurface::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(5.0, 0.0, 0.0),
        Point3::new(0.0, 0.7, 3.0),
        Point3::new(5.0, -0.7, 3.0),
    );
    for variant in PatternVariant::ALL {
        let options = BrickWallOptions {
            row_count: 5,
            column_count: 4,
            pattern: variant.code(),
            ..BrickWallOptions::default()
        };
        let a = generate_brick_wall(&surface, &options).expect("wall");
        let b = generate_brick_wall(&surface, &options).expect("wall");

        assert_eq!(a.grid, b.grid);
        let a_json = serde_json::to_string(&a.bricks).expect("json");
        let b_json = serde_json::to_string(&b.bricks).expect("json");
        assert_eq!(a_json, b_json, "{variant}");
    }
}

#[test]
fn center_planes_agree_with_the_surface_normal() {
    let arc = CylinderSurface::new(Point3::ORIGIN, Vec3::new(0.0, 0.0, 2.0), 3.0, 2.5).expect("cylinder");
    for variant in PatternVariant::ALL {
        let options = BrickWallOptions {
            row_count: 4,
            column_count: 5,
            pattern: variant.code(),
            ..BrickWallOptions::default()
        };
        let wall = generate_brick_wall(&arc, &options).expect("wall");
        assert_eq!(wall.diagnostics.brick_count(), wall.bricks.len());
        for brick in wall.bricks.iter() {
            assert!(brick.center_plane().z_axis.dot(brick.reference_frame().z_axis) >= 0.0);
            assert!(brick.mesh().signed_volume() > 0.0);
        }
    }
}

#[test]
fn first_row_flattening_levels_only_the_first_course() {
    let leaning = FourPointSurface::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(4.0, 0.0, 0.0),
        Point3::new(0.0, 0.6, 2.0),
        Point3::new(4.0, 0.6, 2.0),
    );
    let options = BrickWallOptions {
        first_row_horizontal: true,
        ..small_options()
    };
    let wall = generate_brick_wall(&leaning, &options).expect("wall");
    let grid = wall.grid.as_ref().expect("grid");

    for sample in grid.row(0).expect("row 0") {
        assert!(sample.base.frame.z_axis.z.abs() < 1e-9);
        assert!(sample.base.frame.y_axis.dot(Vec3::Z) > 1.0 - 1e-9);
        assert!((sample.front_point.z - sample.front.frame.origin.z).abs() < 1e-12);
        assert!((sample.back_point.z - sample.back.frame.origin.z).abs() < 1e-12);
    }
    for sample in grid.row(1).expect("row 1") {
        assert!(sample.base.frame.z_axis.z.abs() > 0.1);
    }
    for brick in wall.bricks.iter() {
        assert!(brick.mesh().signed_volume() > 0.0);
    }
}

#[test]
fn first_row_flattening_leaves_a_vertical_wall_unchanged() {
    let plain = generate_brick_wall(&flat_wall(), &small_options()).expect("wall");
    let options = BrickWallOptions {
        first_row_horizontal: true,
        ..small_options()
    };
    let flattened = generate_brick_wall(&flat_wall(), &options).expect("wall");

    assert_eq!(plain.bricks.len(), flattened.bricks.len());
    for (a, b) in plain.bricks.iter().zip(flattened.bricks.iter()) {
        assert!((a.mesh().signed_volume() - b.mesh().signed_volume()).abs() < 1e-9);
        for (p, q) in a.front_points().iter().zip(b.front_points()) {
            assert!(p.distance_to(*q) < 1e-9);
        }
        for (p, q) in a.back_points().iter().zip(b.back_points()) {
            assert!(p.distance_to(*q) < 1e-9);
        }
    }
}

#[test]
fn degenerate_bricks_are_skipped_or_abort() {
    let wall = generate_brick_wall(&LineSurface, &small_options()).expect("skip policy");
    assert!(wall.is_empty());
    assert_eq!(wall.diagnostics.skipped_bricks.len(), 5);
    assert_eq!(wall.diagnostics.skipped_bricks[2].row, 1);
    assert_eq!(wall.diagnostics.skipped_bricks[2].unit, UnitClass::Single);
    assert!(!wall.diagnostics.is_clean());

    let options = BrickWallOptions {
        degenerate_policy: DegenerateBrickPolicy::Abort,
        ..small_options()
    };
    let err = generate_brick_wall(&LineSurface, &options).expect_err("abort policy");
    assert_eq!(
        err,
        BrickWallError::DegenerateBrick {
            row: 0,
            column: 0,
            sequence: 0,
            source: PlaneFitError::Collinear,
        }
    );
}

#[test]
fn sampling_failures_carry_the_grid_position() {
    let options = BrickWallOptions {
        vertical_seam_indent: 3.0,
        ..small_options()
    };
    match generate_brick_wall(&flat_wall(), &options) {
        Err(BrickWallError::SurfaceEvaluation { u, v, reason, .. }) => {
            assert!(!(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v));
            assert_eq!(reason, SurfaceEvalFailure::OutOfDomain);
        }
        other => panic!("expected an out-of-domain failure, got {other:?}"),
    }

    match generate_brick_wall(&BrokenSurface, &small_options()) {
        Err(BrickWallError::SurfaceEvaluation { row, reason, .. }) => {
            assert!(row >= 1);
            assert_eq!(reason, SurfaceEvalFailure::NonFiniteFrame);
        }
        other => panic!("expected a non-finite failure, got {other:?}"),
    }
}

#[test]
fn normalized_domain_matches_the_unit_domain() {
    struct Stretched;

    impl Surface for Stretched {
        fn point_at(&self, u: f64, v: f64) -> Point3 {
            Point3::new(u, 0.0, v)
        }

        fn domain_u(&self) -> (f64, f64) {
            (0.0, 4.0)
        }

        fn domain_v(&self) -> (f64, f64) {
            (0.0, 2.0)
        }
    }

    let normalized = NormalizedSurface::new(&Stretched);
    let a = generate_brick_wall(&normalized, &small_options()).expect("wall");
    let b = generate_brick_wall(&flat_wall(), &small_options()).expect("wall");

    for (x, y) in a.bricks.iter().zip(b.bricks.iter()) {
        for (p, q) in x.front_points().iter().zip(y.front_points()) {
            assert!(p.distance_to(*q) < 1e-6);
        }
    }
}

#[test]
fn options_load_from_partial_json() {
    let options: BrickWallOptions =
        serde_json::from_str(r#"{ "row_count": 3, "pattern": 2, "degenerate_policy": "abort" }"#).expect("json");
    assert_eq!(options.row_count, 3);
    assert_eq!(options.column_count, BrickWallOptions::default().column_count);
    assert_eq!(options.pattern, 2);
    assert_eq!(options.degenerate_policy, DegenerateBrickPolicy::Abort);

    let wall = generate_brick_wall(&flat_wall(), &options).expect("wall");
    assert_eq!(wall.bricks.row_count(), 3);
}
