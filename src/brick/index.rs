//! Result store for the bricks of one run.
//!
//! Bricks live once in an arena; two lookups address them by course row and by
//! global sequence number. Both keep insertion order.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::assembler::Brick;
use crate::geom::{Plane, Polyline, QuadMesh};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct BrickId(pub usize);

impl BrickId {
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BrickIndex {
    bricks: Vec<Brick>,
    by_row: BTreeMap<usize, Vec<BrickId>>,
    by_sequence: Vec<BrickId>,
}

impl BrickIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a brick. Sequence numbers must arrive as `0, 1, 2, ...`.
    pub fn insert(&mut self, brick: Brick) -> Result<BrickId, BrickIndexError> {
        let expected = self.by_sequence.len();
        if brick.sequence() != expected {
            return Err(BrickIndexError::SequenceGap {
                expected,
                found: brick.sequence(),
            });
        }

        let id = BrickId::new(self.bricks.len());
        self.by_row.entry(brick.row()).or_default().push(id);
        self.by_sequence.push(id);
        self.bricks.push(brick);
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: BrickId) -> Option<&Brick> {
        self.bricks.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Number of courses that produced at least one brick.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.by_row.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_row.keys().copied()
    }

    /// Bricks in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.by_sequence.iter().filter_map(|id| self.get(*id))
    }

    /// Bricks of course `row`, in generation order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &Brick> {
        self.by_row
            .get(&row)
            .into_iter()
            .flatten()
            .filter_map(|id| self.get(*id))
    }

    #[must_use]
    pub fn by_sequence(&self, sequence: usize) -> Option<&Brick> {
        self.by_sequence.get(sequence).and_then(|id| self.get(*id))
    }

    /// Front and back outline of brick `sequence`.
    #[must_use]
    pub fn outlines(&self, sequence: usize) -> Option<(&Polyline, &Polyline)> {
        self.by_sequence(sequence)
            .map(|brick| (brick.front_outline(), brick.back_outline()))
    }

    #[must_use]
    pub fn meshes_in_row(&self, row: usize) -> Vec<&QuadMesh> {
        self.row(row).map(Brick::mesh).collect()
    }

    #[must_use]
    pub fn reference_frames_in_row(&self, row: usize) -> Vec<&Plane> {
        self.row(row).map(Brick::reference_frame).collect()
    }

    #[must_use]
    pub fn back_reference_frames_in_row(&self, row: usize) -> Vec<&Plane> {
        self.row(row).map(Brick::back_reference_frame).collect()
    }
}

/// Errors raised while filling a [`BrickIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrickIndexError {
    SequenceGap { expected: usize, found: usize },
}

impl fmt::Display for BrickIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SequenceGap { expected, found } => {
                write!(f, "expected brick sequence {expected}, got {found}")
            }
        }
    }
}

impl std::error::Error for BrickIndexError {}
