use crate::brick::{PatternVariant, offsets};

const GRIDS: [(usize, usize); 6] = [(2, 2), (2, 4), (3, 6), (4, 4), (5, 8), (6, 10)];

#[test]
fn corners_are_never_indented() {
    for variant in PatternVariant::ALL {
        for (rows, columns) in GRIDS {
            for (i, j) in [(0, 0), (0, columns), (rows, 0), (rows, columns)] {
                let o = offsets(i, j, rows, columns, variant, 0.1, 0.2);
                assert_eq!(o.front, o.base, "{variant} front at ({i}, {j})");
                assert_eq!(o.back, o.base, "{variant} back at ({i}, {j})");
            }
        }
    }
}

#[test]
fn edges_move_only_along_the_free_axis() {
    for variant in PatternVariant::ALL {
        for (rows, columns) in GRIDS {
            for i in 0..=rows {
                for j in 0..=columns {
                    let row_edge = i == 0 || i == rows;
                    let column_edge = j == 0 || j == columns;
                    if row_edge == column_edge {
                        continue;
                    }
                    let o = offsets(i, j, rows, columns, variant, 0.1, 0.2);
                    if row_edge {
                        assert_eq!(o.front.v, o.base.v);
                        assert_eq!(o.back.v, o.base.v);
                        assert_ne!(o.front.u, o.base.u);
                        assert_ne!(o.back.u, o.base.u);
                    } else {
                        assert_eq!(o.front.u, o.base.u);
                        assert_eq!(o.back.u, o.base.u);
                        assert_ne!(o.front.v, o.base.v);
                        assert_ne!(o.back.v, o.base.v);
                    }
                }
            }
        }
    }
}

#[test]
fn interior_samples_move_along_both_axes() {
    for variant in PatternVariant::ALL {
        let o = offsets(1, 1, 4, 4, variant, 0.1, 0.2);
        assert_ne!(o.front.u, o.base.u);
        assert_ne!(o.front.v, o.base.v);
        assert_ne!(o.back.u, o.base.u);
        assert_ne!(o.back.v, o.base.v);
    }
}

#[test]
fn base_uv_is_the_plain_grid() {
    let o = offsets(3, 5, 4, 8, PatternVariant::Standard, 0.1, 0.1);
    assert_eq!(o.base.u, 5.0 * (1.0 / 8.0));
    assert_eq!(o.base.v, 3.0 * (1.0 / 4.0));
}

#[test]
fn staggered_matches_hand_evaluated_expressions() {
    let (rows, columns) = (2usize, 4usize);
    let du = 1.0 / columns as f64;
    let dv = 1.0 / rows as f64;
    let indh = du * 0.1;
    let indv = dv * 0.1;

    for i in 0..=rows {
        for j in 0..=columns {
            let o = offsets(i, j, rows, columns, PatternVariant::Staggered, 0.1, 0.1);
            let (x, y) = (j as f64 * du, i as f64 * dv);
            let pi = (i % 2) as f64;
            let pij = ((i + j) % 2) as f64;

            let interior = !(i == 0 || i == rows || j == 0 || j == columns);
            if interior {
                assert_eq!(o.front.u, x - indh + 2.0 * indh * pi);
                assert_eq!(o.front.v, y - indv + 2.0 * indv * pij);
                assert_eq!(o.back.u, x + indh - 2.0 * indh * pi);
                assert_eq!(o.back.v, y + indv - 2.0 * indv * pij);
            } else if (i == 0 || i == rows) && !(j == 0 || j == columns) {
                assert_eq!(o.front.u, x - indh + 2.0 * indh * pi);
                assert_eq!(o.back.u, x + indh - 2.0 * indh * pi);
            } else if !(i == 0 || i == rows) {
                assert_eq!(o.front.v, y - indv + 2.0 * indv * pij);
                assert_eq!(o.back.v, y + indv - 2.0 * indv * pij);
            }
        }
    }
}

#[test]
fn variant_specific_interior_rules() {
    let (rows, columns) = (4usize, 8usize);
    let du = 1.0 / columns as f64;
    let dv = 1.0 / rows as f64;
    let indh = du * 0.3;
    let indv = dv * 0.2;
    let (i, j) = (1usize, 2usize);
    let (x, y) = (j as f64 * du, i as f64 * dv);
    let pi = (i % 2) as f64;
    let pj = (j % 2) as f64;
    let pij = ((i + j) % 2) as f64;

    let at = |variant| offsets(i, j, rows, columns, variant, 0.2, 0.3);

    let o = at(PatternVariant::ShiftedRows);
    assert_eq!(o.front.u, x + indh + 2.0 * indh * pi);
    assert_eq!(o.back.u, x - indh - 2.0 * indh * pi);

    let o = at(PatternVariant::InvertedColumns);
    assert_eq!(o.front.v, y - indv - 2.0 * indv * pj);
    assert_eq!(o.back.v, y + indv + 2.0 * indv * pj);

    let o = at(PatternVariant::SwappedAxes);
    assert_eq!(o.front.u, x - indh + 2.0 * indh * pj);
    assert_eq!(o.front.v, y - indv + 2.0 * indv * pi);

    let o = at(PatternVariant::SplitFaces);
    assert_eq!(o.front.u, x - indh + 2.0 * indh * pj);
    assert_eq!(o.front.v, y - indv + 2.0 * indv * pj);
    assert_eq!(o.back.u, x + indh - 2.0 * indh * pi);
    assert_eq!(o.back.v, y + indv - 2.0 * indv * pi);

    let o = at(PatternVariant::StaggeredDiagonal);
    assert_eq!(o.front.u, x - indh + 2.0 * indh * pij);
    assert_eq!(o.back.v, y + indv - 2.0 * indv * pij);
}

#[test]
fn boundary_tie_breaks_per_variant() {
    // Last column on an odd row: the column parity picks the sign for the
    // default rule, the combined parity for the staggered rules.
    let (rows, columns) = (3usize, 4usize);
    let dv = 1.0 / rows as f64;
    let indv = dv * 0.25;
    let y = 1.0 * dv;

    let standard = offsets(1, columns, rows, columns, PatternVariant::Standard, 0.25, 0.0);
    assert_eq!(standard.front.v, y - indv + 2.0 * indv * 0.0);

    let stag = offsets(1, columns, rows, columns, PatternVariant::Staggered, 0.25, 0.0);
    assert_eq!(stag.front.v, y - indv + 2.0 * indv * 1.0);

    let inv = offsets(1, columns, rows, columns, PatternVariant::InvertedColumns, 0.25, 0.0);
    assert_eq!(inv.front.v, y - indv - 2.0 * indv * 0.0);
}

#[test]
fn offsets_are_deterministic() {
    for variant in PatternVariant::ALL {
        for i in 0..=4 {
            for j in 0..=6 {
                let a = offsets(i, j, 4, 6, variant, 0.13, 0.07);
                let b = offsets(i, j, 4, 6, variant, 0.13, 0.07);
                assert_eq!(a.front.u.to_bits(), b.front.u.to_bits());
                assert_eq!(a.back.v.to_bits(), b.back.v.to_bits());
            }
        }
    }
}
