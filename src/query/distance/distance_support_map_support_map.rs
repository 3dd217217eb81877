use crate::math::{Isometry, Point, Real, Vector};
use crate::query::gjk::{GjkStatus, MinkowskiDiff, GJK};
use crate::query::{NarrowPhaseError, NarrowPhaseOptions, ShapeDistance};
use crate::shape::SupportMap;

/// Distance between support-mapped shapes.
pub fn distance_support_map_support_map<G1, G2>(
    pos1: &Isometry<Real>,
    g1: &G1,
    pos2: &Isometry<Real>,
    g2: &G2,
) -> Result<ShapeDistance, NarrowPhaseError>
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    distance_support_map_support_map_with_params(
        pos1,
        g1,
        pos2,
        g2,
        &Vector::x(),
        &NarrowPhaseOptions::default(),
    )
}

/// Distance between support-mapped shapes.
///
/// This allows a more fine grained control over the underlying GJK algorithm. The first
/// support point is searched along `guess`, expressed in the local-space of `g1`.
pub fn distance_support_map_support_map_with_params<G1, G2>(
    pos1: &Isometry<Real>,
    g1: &G1,
    pos2: &Isometry<Real>,
    g2: &G2,
    guess: &Vector<Real>,
    options: &NarrowPhaseOptions,
) -> Result<ShapeDistance, NarrowPhaseError>
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let shape = MinkowskiDiff::new(pos1, g1, pos2, g2);
    let mut gjk = GJK::with_options(options.gjk);

    match gjk.evaluate(&shape, &-guess) {
        GjkStatus::Valid => {
            let (w0, w1) = gjk.simplex_vertices().fold(
                (Vector::zeros(), Vector::zeros()),
                |(w0, w1), (vertex, weight)| {
                    (
                        w0 + shape.support0(&vertex.d) * weight,
                        w1 + shape.support1(&-vertex.d) * weight,
                    )
                },
            );

            Ok(ShapeDistance {
                distance: (w0 - w1).norm(),
                point1: pos1 * Point::from(w0),
                point2: pos1 * Point::from(w1),
            })
        }
        GjkStatus::Inside => Err(NarrowPhaseError::Overlapping),
        GjkStatus::Failed => Err(NarrowPhaseError::GjkFailed),
    }
}
