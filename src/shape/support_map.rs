//! The support-mapping capability every convex shape exposes to the queries.

use crate::math::{Isometry, Point, Real, Vector};
use na::Unit;

/// A convex shape described by its support mapping.
///
/// The support mapping of a convex shape associates to a direction `d` the point
/// `p` of the shape maximizing `p.dot(d)`. This is the only information GJK and
/// EPA need about a shape.
///
/// Implementations must be deterministic and satisfy the supporting-hyperplane
/// property: `support(d).dot(d) >= p.dot(d)` for every point `p` of the shape.
/// This is not checked by the queries. A mapping breaking it makes them
/// converge to a wrong result or not at all.
pub trait SupportMap {
    /// Evaluates the support function of this shape in its local-space.
    ///
    /// `dir` is not required to be normalized, but it must not be zero.
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real>;

    /// Same as `self.local_support_point` except that `dir` is normalized.
    fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
        self.local_support_point(dir.as_ref())
    }

    /// Evaluates the support function of this shape placed at `transform`.
    ///
    /// Both `dir` and the returned point are expressed in the frame `transform` maps into.
    fn support_point(&self, transform: &Isometry<Real>, dir: &Vector<Real>) -> Point<Real> {
        let local_dir = transform.inverse_transform_vector(dir);
        transform * self.local_support_point(&local_dir)
    }

    /// Same as `self.support_point` except that `dir` is normalized.
    fn support_point_toward(
        &self,
        transform: &Isometry<Real>,
        dir: &Unit<Vector<Real>>,
    ) -> Point<Real> {
        let local_dir = Unit::new_unchecked(transform.inverse_transform_vector(dir));
        transform * self.local_support_point_toward(&local_dir)
    }
}

impl<S: ?Sized + SupportMap> SupportMap for &S {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        (**self).local_support_point(dir)
    }

    #[inline]
    fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
        (**self).local_support_point_toward(dir)
    }
}
