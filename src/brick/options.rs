use serde::{Deserialize, Serialize};

/// What to do with a brick whose center points cannot define a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateBrickPolicy {
    /// Leave the brick out, record it in the diagnostics and keep going.
    #[default]
    Skip,
    /// Stop the run and return the error.
    Abort,
}

/// Inputs of a brick wall run.
///
/// Field names follow the host component inputs. Missing fields fall back to
/// [`Default`] when deserialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrickWallOptions {
    /// Number of brick courses (`RowNum`).
    pub row_count: usize,
    /// Number of double-unit bricks per course (`ColumnNum`); the grid uses
    /// twice as many columns.
    pub column_count: usize,
    /// Seam indent along V, as a fraction of a row height.
    pub horizontal_seam_indent: f64,
    /// Seam indent along U, as a fraction of a column width.
    pub vertical_seam_indent: f64,
    /// Levels the frames of the first sample row: Y becomes world Z, so the
    /// normal stays horizontal.
    pub first_row_horizontal: bool,
    /// Distance between the surface and the front/back points.
    pub seam_offset: f64,
    pub wall_thickness: f64,
    /// Pattern code, `0..=6`.
    pub pattern: i32,
    pub degenerate_policy: DegenerateBrickPolicy,
}

impl Default for BrickWallOptions {
    fn default() -> Self {
        Self {
            row_count: 4,
            column_count: 4,
            horizontal_seam_indent: 0.1,
            vertical_seam_indent: 0.1,
            first_row_horizontal: false,
            seam_offset: 0.05,
            wall_thickness: 0.02,
            pattern: 5,
            degenerate_policy: DegenerateBrickPolicy::Skip,
        }
    }
}
