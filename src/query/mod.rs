//! Non-persistent geometric queries.
//!
//! The two entry points of this module are:
//!
//! * [`query::shape_distance()`](shape_distance) to compute the distance between two separated shapes.
//! * [`query::shape_intersect()`](shape_intersect) to compute the penetration depth, normal and
//!   a contact point of two overlapping shapes.
//!
//! Both accept any pair of shapes implementing [`SupportMap`](crate::shape::SupportMap),
//! including trait objects.
//!
//! # Specific cases
//! The functions exported by the `details` submodule report why a query failed instead of
//! returning `None`, and let the caller pick the initial search direction and the parameters
//! of GJK and EPA. They have the form `[operation]_support_map_support_map[_with_params]()`.

pub use self::distance::{shape_distance, ShapeDistance};
pub use self::error::NarrowPhaseError;
pub use self::intersect::{shape_intersect, ShapeIntersection};
pub use self::query_options::NarrowPhaseOptions;

mod distance;
pub mod epa;
mod error;
pub mod gjk;
mod intersect;
mod query_options;

/// Queries reporting the detailed outcome of GJK and EPA.
pub mod details {
    pub use super::distance::{
        distance_support_map_support_map, distance_support_map_support_map_with_params,
    };
    pub use super::intersect::{
        intersect_support_map_support_map, intersect_support_map_support_map_with_params,
    };
}
