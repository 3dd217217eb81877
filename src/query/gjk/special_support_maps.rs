use na::Unit;

use crate::math::{Isometry, Point, Real, Vector};
use crate::shape::SupportMap;

/// A support mapping that is a single point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantPoint(pub Point<Real>);

impl SupportMap for ConstantPoint {
    #[inline]
    fn support_point(&self, m: &Isometry<Real>, _: &Vector<Real>) -> Point<Real> {
        m * self.0
    }

    #[inline]
    fn local_support_point(&self, _: &Vector<Real>) -> Point<Real> {
        self.0
    }
}

/// A support mapping that is the point at (0.0, 0.0, 0.0).
///
/// Querying a shape against `ConstantOrigin` placed at `p` measures the shape against
/// the point `p`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConstantOrigin;

impl SupportMap for ConstantOrigin {
    #[inline]
    fn support_point(&self, m: &Isometry<Real>, _: &Vector<Real>) -> Point<Real> {
        m.translation.vector.into()
    }

    #[inline]
    fn local_support_point(&self, _: &Vector<Real>) -> Point<Real> {
        Point::origin()
    }
}

/// The Minkowski sum of a shape and a ball.
///
/// Dilating both shapes of a pair by `r1` and `r2` shrinks their distance by `r1 + r2`
/// and deepens their penetration by the same amount.
#[derive(Copy, Clone, Debug)]
pub struct DilatedShape<'a, S: ?Sized + SupportMap> {
    /// The shape involved in the Minkowski sum.
    pub shape: &'a S,
    /// The radius of the ball involved in the Minkowski sum.
    pub radius: Real,
}

impl<'a, S: ?Sized + SupportMap> DilatedShape<'a, S> {
    /// Dilates `shape` by a ball of the given radius.
    pub fn new(shape: &'a S, radius: Real) -> Self {
        DilatedShape { shape, radius }
    }
}

impl<S: ?Sized + SupportMap> SupportMap for DilatedShape<'_, S> {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        self.local_support_point_toward(&Unit::new_normalize(*dir))
    }

    #[inline]
    fn local_support_point_toward(&self, dir: &Unit<Vector<Real>>) -> Point<Real> {
        self.shape.local_support_point_toward(dir) + **dir * self.radius
    }
}
