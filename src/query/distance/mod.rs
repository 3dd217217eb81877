//! Implementation details of the `shape_distance` function.

pub use self::distance::{shape_distance, ShapeDistance};
pub use self::distance_support_map_support_map::{
    distance_support_map_support_map, distance_support_map_support_map_with_params,
};

mod distance;
mod distance_support_map_support_map;
