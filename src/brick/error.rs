use super::index::BrickIndexError;
use crate::geom::PlaneFitError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BrickWallError {
    #[error("grid needs at least 2 rows and 2 columns, got {rows} x {columns}")]
    InvalidGridConfiguration { rows: usize, columns: usize },

    #[error("surface evaluation failed at sample ({row}, {column}) uv=({u}, {v}): {reason}")]
    SurfaceEvaluation {
        row: usize,
        column: usize,
        u: f64,
        v: f64,
        reason: SurfaceEvalFailure,
    },

    #[error("brick #{sequence} at row {row}, column {column} is degenerate: {source}")]
    DegenerateBrick {
        row: usize,
        column: usize,
        sequence: usize,
        #[source]
        source: PlaneFitError,
    },

    #[error("pattern type {0} is not in 0..=6")]
    InvalidPatternType(i32),

    #[error(transparent)]
    Index(#[from] BrickIndexError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceEvalFailure {
    #[error("parameter outside the [0, 1] domain")]
    OutOfDomain,
    #[error("surface returned a non-finite frame")]
    NonFiniteFrame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = BrickWallError::DegenerateBrick {
            row: 1,
            column: 3,
            sequence: 7,
            source: PlaneFitError::Collinear,
        };
        let text = err.to_string();
        assert!(text.contains("#7"));
        assert!(text.contains("row 1"));
        assert!(text.contains("collinear"));

        let err = BrickWallError::SurfaceEvaluation {
            row: 0,
            column: 2,
            u: 1.5,
            v: 0.0,
            reason: SurfaceEvalFailure::OutOfDomain,
        };
        assert!(err.to_string().contains("outside"));
    }
}
