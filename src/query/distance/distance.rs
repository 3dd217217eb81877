use crate::math::{Isometry, Point, Real};
use crate::query::details::distance_support_map_support_map;
use crate::shape::SupportMap;

/// The distance between two separated shapes, with a pair of closest points.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShapeDistance {
    /// The distance between the shapes.
    pub distance: Real,
    /// The point of the first shape closest to the second one, in world-space.
    pub point1: Point<Real>,
    /// The point of the second shape closest to the first one, in world-space.
    pub point2: Point<Real>,
}

/// Computes the minimum distance separating two shapes.
///
/// Returns `None` if the shapes overlap or if GJK did not converge. Use
/// [`details::distance_support_map_support_map`](crate::query::details::distance_support_map_support_map)
/// to tell those cases apart and get the closest points.
///
/// # Example
///
/// ```
/// # #[cfg(feature = "f32")] {
/// use narrowphase3d::math::Isometry;
/// use narrowphase3d::query;
/// use narrowphase3d::shape::Ball;
///
/// let ball1 = Ball::new(1.0);
/// let ball2 = Ball::new(0.5);
/// let pos1 = Isometry::identity();
/// let pos2 = Isometry::translation(0.0, 4.0, 0.0);
///
/// let dist = query::shape_distance(&pos1, &ball1, &pos2, &ball2).unwrap();
/// assert!((dist - 2.5).abs() < 1.0e-3);
/// # }
/// ```
pub fn shape_distance<G1, G2>(
    pos1: &Isometry<Real>,
    g1: &G1,
    pos2: &Isometry<Real>,
    g2: &G2,
) -> Option<Real>
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    distance_support_map_support_map(pos1, g1, pos2, g2)
        .ok()
        .map(|res| res.distance)
}
