use na::Unit;

use crate::math::{Isometry, Point, Real, Vector};
use crate::query::details::intersect_support_map_support_map;
use crate::shape::SupportMap;

/// The penetration between two overlapping shapes.
///
/// All quantities are expressed in world-space.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShapeIntersection {
    /// A point halfway between the two penetrating surfaces.
    pub contact_point: Point<Real>,
    /// The penetration depth, positive or zero.
    pub depth: Real,
    /// The direction from the second shape toward the first one.
    ///
    /// Translating the first shape by `normal * depth` brings the shapes in contact.
    pub normal: Unit<Vector<Real>>,
}

/// Computes the penetration between two shapes.
///
/// Returns `None` if the shapes are separated, or if GJK or EPA could not compute a
/// reliable penetration. Use
/// [`details::intersect_support_map_support_map`](crate::query::details::intersect_support_map_support_map)
/// to tell those cases apart.
///
/// # Example
///
/// ```
/// # #[cfg(feature = "f32")] {
/// use narrowphase3d::math::{Isometry, Vector};
/// use narrowphase3d::query;
/// use narrowphase3d::shape::Cuboid;
///
/// let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
/// let pos1 = Isometry::identity();
/// let pos2 = Isometry::translation(1.5, 0.0, 0.0);
///
/// let hit = query::shape_intersect(&pos1, &cuboid, &pos2, &cuboid).unwrap();
/// assert!((hit.depth - 0.5).abs() < 1.0e-3);
/// assert!((hit.normal.x + 1.0).abs() < 1.0e-3);
/// # }
/// ```
pub fn shape_intersect<G1, G2>(
    pos1: &Isometry<Real>,
    g1: &G1,
    pos2: &Isometry<Real>,
    g2: &G2,
) -> Option<ShapeIntersection>
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    intersect_support_map_support_map(pos1, g1, pos2, g2)
        .ok()
        .flatten()
}
