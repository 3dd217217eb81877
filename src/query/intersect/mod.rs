//! Implementation details of the `shape_intersect` function.

pub use self::intersect::{shape_intersect, ShapeIntersection};
pub use self::intersect_support_map_support_map::{
    intersect_support_map_support_map, intersect_support_map_support_map_with_params,
};

mod intersect;
mod intersect_support_map_support_map;
