//! The GJK algorithm for distance computation and overlap detection.

pub use self::gjk::{GjkOptions, GjkStatus, GJK, GJK_EPS, GJK_MAX_ITERATIONS};
pub use self::minkowski_diff::MinkowskiDiff;
pub(crate) use self::simplex::det;
pub use self::simplex::{
    project_origin_segment, project_origin_tetrahedron, project_origin_triangle,
    OriginProjection, Simplex, SimplexVertex,
};
pub use self::special_support_maps::{ConstantOrigin, ConstantPoint, DilatedShape};

mod gjk;
mod minkowski_diff;
mod simplex;
mod special_support_maps;
