//! The EPA algorithm for penetration depth computation.

pub use self::epa::{
    EpaOptions, EpaStatus, HullFace, EPA, EPA_EPS, EPA_MAX_FACES, EPA_MAX_ITERATIONS,
    EPA_MAX_VERTICES, EPA_PLANE_EPS,
};

mod epa;
