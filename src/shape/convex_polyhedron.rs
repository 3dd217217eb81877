use crate::math::{Isometry, Point, Real, Vector};
use crate::shape::SupportMap;
use crate::utils;
use alloc::vec::Vec;

/// Errors raised when building a [`ConvexPolyhedron`].
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConvexPolyhedronError {
    /// No point was given.
    #[error("a convex polyhedron needs at least one point")]
    Empty,
    /// One of the given points has a NaN or infinite coordinate.
    #[error("the point at index {0} has a non-finite coordinate")]
    NonFinite(usize),
}

/// A convex polyhedron represented by the set of its vertices.
///
/// Only the vertices are stored: the support mapping of a convex hull is the
/// support mapping of its vertex cloud, so neither the faces nor the hull
/// topology are needed by the queries. Points lying inside the hull are
/// allowed and simply never selected as support points.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub struct ConvexPolyhedron {
    points: Vec<Point<Real>>,
}

impl ConvexPolyhedron {
    /// Creates a new convex polyhedron from the given points.
    pub fn from_points(points: Vec<Point<Real>>) -> Result<Self, ConvexPolyhedronError> {
        if points.is_empty() {
            return Err(ConvexPolyhedronError::Empty);
        }

        if let Some(i) = points
            .iter()
            .position(|pt| !pt.coords.iter().all(|e| e.is_finite()))
        {
            return Err(ConvexPolyhedronError::NonFinite(i));
        }

        Ok(ConvexPolyhedron { points })
    }

    /// The points this polyhedron is the convex hull of.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// Creates a new convex polyhedron equal to `self` with all its points transformed by `pos`.
    pub fn transform_by(&self, pos: &Isometry<Real>) -> Self {
        ConvexPolyhedron {
            points: self.points.iter().map(|pt| pos * pt).collect(),
        }
    }
}

impl SupportMap for ConvexPolyhedron {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        utils::point_cloud_support_point(dir, &self.points)
    }
}
