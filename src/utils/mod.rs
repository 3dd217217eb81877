//! Various unsorted geometrical and logical operators.

pub use self::point_cloud_support_point::{
    point_cloud_support_point, point_cloud_support_point_id,
};
pub(crate) use self::wops::WSign;

mod point_cloud_support_point;
mod wops;
