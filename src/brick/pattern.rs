//! Seam-offset pattern rules.
//!
//! Every grid sample `(i, j)` gets a base UV `(j * du, i * dv)` plus a front
//! and a back UV displaced by the seam indents. Corners are never displaced,
//! boundary samples only move along the free axis, interior samples move
//! along both. The variants only differ in which parity term drives each axis
//! and in the sign of the constant and parity parts.
//!
//! A displaced coordinate is always evaluated as
//! `(base + sign * indent) + parity_sign * (2 * indent * parity)`
//! in exactly that order so that results are reproducible bit for bit.

use serde::{Deserialize, Serialize};

use super::error::BrickWallError;
use crate::geom::UvPoint;

/// Which index parity drives an offset axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// `i % 2`
    Row,
    /// `j % 2`
    Column,
    /// `(i + j) % 2`
    Sum,
}

impl Parity {
    #[must_use]
    pub const fn value(self, i: usize, j: usize) -> u32 {
        match self {
            Self::Row => (i % 2) as u32,
            Self::Column => (j % 2) as u32,
            Self::Sum => ((i + j) % 2) as u32,
        }
    }
}

/// Offset rule for one UV axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRule {
    pub sign: i8,
    pub parity_sign: i8,
    pub parity: Parity,
}

impl AxisRule {
    #[must_use]
    pub const fn new(sign: i8, parity_sign: i8, parity: Parity) -> Self {
        Self {
            sign,
            parity_sign,
            parity,
        }
    }

    /// The mirrored rule: both signs inverted, same parity term.
    #[must_use]
    pub const fn negated(self) -> Self {
        Self::new(-self.sign, -self.parity_sign, self.parity)
    }

    #[must_use]
    pub fn apply(self, base: f64, indent: f64, i: usize, j: usize) -> f64 {
        let shifted = if self.sign < 0 { base - indent } else { base + indent };
        let step = 2.0 * indent * f64::from(self.parity.value(i, j));
        if self.parity_sign < 0 { shifted - step } else { shifted + step }
    }
}

const STANDARD_U: AxisRule = AxisRule::new(-1, 1, Parity::Row);
const STANDARD_V: AxisRule = AxisRule::new(-1, 1, Parity::Column);

/// Full offset strategy of one pattern variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRule {
    /// U offset on the first/last row (`i == 0 || i == R`).
    pub row_edge_u: AxisRule,
    /// V offset on the first/last column (`j == 0 || j == C`).
    pub column_edge_v: AxisRule,
    pub front_u: AxisRule,
    pub front_v: AxisRule,
    pub back_u: AxisRule,
    pub back_v: AxisRule,
}

impl PatternRule {
    /// Rule whose back offsets mirror the front ones.
    const fn mirrored(row_edge_u: AxisRule, column_edge_v: AxisRule, front_u: AxisRule, front_v: AxisRule) -> Self {
        Self {
            row_edge_u,
            column_edge_v,
            front_u,
            front_v,
            back_u: front_u.negated(),
            back_v: front_v.negated(),
        }
    }

    /// Front/back UVs for sample `(i, j)` of an `R x C` grid.
    #[must_use]
    pub fn offsets(&self, i: usize, j: usize, spec: &OffsetSpec) -> SeamOffsets {
        let base = spec.base(i, j);
        let row_edge = i == 0 || i == spec.rows;
        let column_edge = j == 0 || j == spec.columns;

        let (front, back) = match (row_edge, column_edge) {
            (true, true) => (base, base),
            (true, false) => {
                let rule = self.row_edge_u;
                (
                    UvPoint::new(rule.apply(base.u, spec.indent_u, i, j), base.v),
                    UvPoint::new(rule.negated().apply(base.u, spec.indent_u, i, j), base.v),
                )
            }
            (false, true) => {
                let rule = self.column_edge_v;
                (
                    UvPoint::new(base.u, rule.apply(base.v, spec.indent_v, i, j)),
                    UvPoint::new(base.u, rule.negated().apply(base.v, spec.indent_v, i, j)),
                )
            }
            (false, false) => (
                UvPoint::new(
                    self.front_u.apply(base.u, spec.indent_u, i, j),
                    self.front_v.apply(base.v, spec.indent_v, i, j),
                ),
                UvPoint::new(
                    self.back_u.apply(base.u, spec.indent_u, i, j),
                    self.back_v.apply(base.v, spec.indent_v, i, j),
                ),
            ),
        };

        SeamOffsets { base, front, back }
    }
}

/// The seven seam patterns, addressed by their integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum PatternVariant {
    Standard,
    ShiftedRows,
    InvertedColumns,
    SwappedAxes,
    SplitFaces,
    Staggered,
    StaggeredDiagonal,
}

impl PatternVariant {
    pub const ALL: [Self; 7] = [
        Self::Standard,
        Self::ShiftedRows,
        Self::InvertedColumns,
        Self::SwappedAxes,
        Self::SplitFaces,
        Self::Staggered,
        Self::StaggeredDiagonal,
    ];

    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Standard => 0,
            Self::ShiftedRows => 1,
            Self::InvertedColumns => 2,
            Self::SwappedAxes => 3,
            Self::SplitFaces => 4,
            Self::Staggered => 5,
            Self::StaggeredDiagonal => 6,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::ShiftedRows => "shifted-rows",
            Self::InvertedColumns => "inverted-columns",
            Self::SwappedAxes => "swapped-axes",
            Self::SplitFaces => "split-faces",
            Self::Staggered => "staggered",
            Self::StaggeredDiagonal => "staggered-diagonal",
        }
    }

    #[must_use]
    pub fn rule(self) -> &'static PatternRule {
        match self {
            Self::Standard => &STANDARD,
            Self::ShiftedRows => &SHIFTED_ROWS,
            Self::InvertedColumns => &INVERTED_COLUMNS,
            Self::SwappedAxes => &SWAPPED_AXES,
            Self::SplitFaces => &SPLIT_FACES,
            Self::Staggered => &STAGGERED,
            Self::StaggeredDiagonal => &STAGGERED_DIAGONAL,
        }
    }
}

/// Only codes `0..=6` are accepted. Unknown codes fail with
/// [`BrickWallError::InvalidPatternType`]; they are never routed to
/// [`PatternVariant::Standard`] as a catch-all.
impl TryFrom<i32> for PatternVariant {
    type Error = BrickWallError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.code() == code)
            .ok_or(BrickWallError::InvalidPatternType(code))
    }
}

impl From<PatternVariant> for i32 {
    fn from(variant: PatternVariant) -> Self {
        variant.code()
    }
}

impl std::fmt::Display for PatternVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

static STANDARD: PatternRule = PatternRule::mirrored(STANDARD_U, STANDARD_V, STANDARD_U, STANDARD_V);

static SHIFTED_ROWS: PatternRule = PatternRule::mirrored(
    AxisRule::new(1, 1, Parity::Row),
    STANDARD_V,
    AxisRule::new(1, 1, Parity::Row),
    STANDARD_V,
);

static INVERTED_COLUMNS: PatternRule = PatternRule::mirrored(
    STANDARD_U,
    AxisRule::new(-1, -1, Parity::Column),
    STANDARD_U,
    AxisRule::new(-1, -1, Parity::Column),
);

static SWAPPED_AXES: PatternRule = PatternRule::mirrored(
    STANDARD_U,
    STANDARD_V,
    AxisRule::new(-1, 1, Parity::Column),
    AxisRule::new(-1, 1, Parity::Row),
);

// Front follows the column parity, back the row parity.
static SPLIT_FACES: PatternRule = PatternRule {
    row_edge_u: STANDARD_U,
    column_edge_v: STANDARD_V,
    front_u: AxisRule::new(-1, 1, Parity::Column),
    front_v: AxisRule::new(-1, 1, Parity::Column),
    back_u: AxisRule::new(1, -1, Parity::Row),
    back_v: AxisRule::new(1, -1, Parity::Row),
};

static STAGGERED: PatternRule = PatternRule::mirrored(
    STANDARD_U,
    AxisRule::new(-1, 1, Parity::Sum),
    STANDARD_U,
    AxisRule::new(-1, 1, Parity::Sum),
);

static STAGGERED_DIAGONAL: PatternRule = PatternRule::mirrored(
    STANDARD_U,
    AxisRule::new(-1, 1, Parity::Sum),
    AxisRule::new(-1, 1, Parity::Sum),
    AxisRule::new(-1, 1, Parity::Sum),
);

/// Grid size and UV-space indents shared by every sample of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetSpec {
    pub rows: usize,
    pub columns: usize,
    pub du: f64,
    pub dv: f64,
    /// `du * VerticalSeamIndent`
    pub indent_u: f64,
    /// `dv * HorizontalSeamIndent`
    pub indent_v: f64,
}

impl OffsetSpec {
    #[must_use]
    pub fn new(rows: usize, columns: usize, horizontal_seam_indent: f64, vertical_seam_indent: f64) -> Self {
        let du = 1.0 / columns as f64;
        let dv = 1.0 / rows as f64;
        Self {
            rows,
            columns,
            du,
            dv,
            indent_u: du * vertical_seam_indent,
            indent_v: dv * horizontal_seam_indent,
        }
    }

    #[must_use]
    pub fn base(&self, i: usize, j: usize) -> UvPoint {
        UvPoint::new(j as f64 * self.du, i as f64 * self.dv)
    }
}

/// Base, front and back UV of one grid sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeamOffsets {
    pub base: UvPoint,
    pub front: UvPoint,
    pub back: UvPoint,
}

/// Seam offsets of sample `(i, j)` on an `rows x columns` grid.
#[must_use]
pub fn offsets(
    i: usize,
    j: usize,
    rows: usize,
    columns: usize,
    variant: PatternVariant,
    horizontal_seam_indent: f64,
    vertical_seam_indent: f64,
) -> SeamOffsets {
    let spec = OffsetSpec::new(rows, columns, horizontal_seam_indent, vertical_seam_indent);
    variant.rule().offsets(i, j, &spec)
}
