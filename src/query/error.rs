use crate::query::epa::EpaStatus;

/// Error returned by the narrow-phase queries when no reliable answer could be computed.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum NarrowPhaseError {
    /// The shapes overlap, so they have no separating distance.
    #[error("the shapes overlap")]
    Overlapping,
    /// GJK exhausted its iteration budget or could not build a simplex.
    #[error("GJK did not converge")]
    GjkFailed,
    /// EPA ended without a usable penetration.
    #[error("EPA ended with the status {0:?}")]
    Epa(EpaStatus),
}
