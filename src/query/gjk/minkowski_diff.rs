use crate::math::{Isometry, Real, Rotation, Vector};
use crate::shape::SupportMap;

/// The Minkowski difference `g1 - g2` of two shapes placed in space.
///
/// Everything is expressed in the local-space of the first shape. The support
/// mapping of the difference toward `d` is `support0(d) - support1(-d)`.
///
/// This is the Configuration-Space Obstacle GJK and EPA operate on: the two
/// shapes overlap iff. it contains the origin, and its distance to the origin
/// is the distance between the shapes.
pub struct MinkowskiDiff<'a, G1: ?Sized, G2: ?Sized> {
    /// The two shapes.
    pub shapes: (&'a G1, &'a G2),
    /// Rotates a direction from the frame of the first shape into the frame of the second.
    pub to_shape1: Rotation<Real>,
    /// Maps a point from the frame of the second shape into the frame of the first.
    pub to_shape0: Isometry<Real>,
}

impl<G1: ?Sized, G2: ?Sized> Clone for MinkowskiDiff<'_, G1, G2> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G1: ?Sized, G2: ?Sized> Copy for MinkowskiDiff<'_, G1, G2> {}

impl<'a, G1, G2> MinkowskiDiff<'a, G1, G2>
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    /// Builds the Minkowski difference of `g1` at `pos1` and `g2` at `pos2`.
    pub fn new(pos1: &Isometry<Real>, g1: &'a G1, pos2: &Isometry<Real>, g2: &'a G2) -> Self {
        let to_shape0 = pos1.inv_mul(pos2);
        MinkowskiDiff {
            shapes: (g1, g2),
            to_shape1: to_shape0.rotation.inverse(),
            to_shape0,
        }
    }

    /// Builds the Minkowski difference from the relative position `pos12` of `g2` with
    /// respect to `g1`.
    pub fn from_relative(pos12: &Isometry<Real>, g1: &'a G1, g2: &'a G2) -> Self {
        MinkowskiDiff {
            shapes: (g1, g2),
            to_shape1: pos12.rotation.inverse(),
            to_shape0: *pos12,
        }
    }

    /// The support point of the first shape toward `dir`.
    #[inline]
    pub fn support0(&self, dir: &Vector<Real>) -> Vector<Real> {
        self.shapes.0.local_support_point(dir).coords
    }

    /// The support point of the second shape toward `dir`, expressed in the frame of the
    /// first shape.
    #[inline]
    pub fn support1(&self, dir: &Vector<Real>) -> Vector<Real> {
        let local_dir = self.to_shape1 * dir;
        (self.to_shape0 * self.shapes.1.local_support_point(&local_dir)).coords
    }

    /// The support point of the `index`-th shape (0 or 1) toward `dir`.
    #[inline]
    pub fn support_on(&self, dir: &Vector<Real>, index: usize) -> Vector<Real> {
        if index == 0 {
            self.support0(dir)
        } else {
            self.support1(dir)
        }
    }

    /// The support point of the Minkowski difference toward `dir`.
    #[inline]
    pub fn support(&self, dir: &Vector<Real>) -> Vector<Real> {
        self.support0(dir) - self.support1(&-dir)
    }
}
