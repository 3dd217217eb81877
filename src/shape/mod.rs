//! Shapes exposing a support mapping.
//!
//! The queries of this crate never inspect shape-specific data: any type implementing
//! [`SupportMap`] can be used. The shapes defined here cover the common convex
//! primitives.

pub use self::ball::Ball;
pub use self::capsule::Capsule;
pub use self::cone::Cone;
pub use self::cuboid::Cuboid;
pub use self::cylinder::Cylinder;
pub use self::segment::Segment;
#[doc(inline)]
pub use self::support_map::SupportMap;
pub use self::triangle::Triangle;

#[cfg(feature = "alloc")]
pub use self::convex_polyhedron::{ConvexPolyhedron, ConvexPolyhedronError};

mod ball;
mod capsule;
mod cone;
#[cfg(feature = "alloc")]
mod convex_polyhedron;
mod cuboid;
mod cylinder;
mod segment;
#[doc(hidden)]
pub mod support_map;
mod triangle;
