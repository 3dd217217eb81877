use crate::query::epa::EpaOptions;
use crate::query::gjk::GjkOptions;

/// The parameters of both algorithms run by the narrow-phase queries.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NarrowPhaseOptions {
    /// The parameters of GJK.
    pub gjk: GjkOptions,
    /// The parameters of EPA.
    pub epa: EpaOptions,
}
