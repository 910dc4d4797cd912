use serde::Serialize;

use super::{Point3, Tolerance};

/// Ordered point list; closed when the last point repeats the first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Polyline {
    pub points: Vec<Point3>,
}

impl Polyline {
    #[must_use]
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Picks `source[index]` for each index in `order`.
    ///
    /// Returns `None` if an index is out of range.
    #[must_use]
    pub fn from_indices(source: &[Point3], order: &[usize]) -> Option<Self> {
        order
            .iter()
            .map(|&i| source.get(i).copied())
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 2 => {
                Tolerance::DEFAULT.approx_eq_point3(*first, *last)
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(pair[1]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_loop_is_closed() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let outline = Polyline::from_indices(&pts, &[0, 1, 2, 3, 0]).expect("indices in range");
        assert!(outline.is_closed());
        assert_eq!(outline.len(), 5);
        assert!((outline.length() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn open_and_out_of_range() {
        let pts = [Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0)];
        assert!(!Polyline::new(pts.to_vec()).is_closed());
        assert!(Polyline::from_indices(&pts, &[0, 2]).is_none());
    }
}
