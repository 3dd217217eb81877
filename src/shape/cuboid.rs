//! Support mapping based Cuboid shape.

use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;
use crate::utils::WSign;

/// Shape of a box.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Cuboid {
    /// The half-extents of the cuboid.
    pub half_extents: Vector<Real>,
}

impl Cuboid {
    /// Creates a new box from its half-extents. Half-extents are the box half-width along each
    /// axis. Each half-extent must be positive.
    #[inline]
    pub fn new(half_extents: Vector<Real>) -> Cuboid {
        Cuboid { half_extents }
    }

    /// The eight vertices of this cuboid, in its local-space.
    pub fn vertices(&self) -> [Point<Real>; 8] {
        let he = self.half_extents;
        core::array::from_fn(|i| {
            Point::new(
                if i & 1 == 0 { he.x } else { -he.x },
                if i & 2 == 0 { he.y } else { -he.y },
                if i & 4 == 0 { he.z } else { -he.z },
            )
        })
    }
}

impl SupportMap for Cuboid {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        dir.copy_sign_to(self.half_extents).into()
    }
}
